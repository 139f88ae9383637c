use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::{STARTER_CAP, SUBSTITUTE_CAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Starters,
    Substitutes,
}

/// Result of an add. Everything except `Added` leaves the roster untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Full,
    AlreadySelected(Side),
    UnknownPlayer,
}

/// Starters and substitutes, stored as catalog names.
///
/// Starter order is the pitch slot order. A name lives in at most one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    starters: Vec<String>,
    substitutes: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a roster from raw name lists without consulting a catalog, so
    /// names may be stale. Caps and exclusivity still apply, first entry wins.
    pub fn from_names<S: AsRef<str>>(starters: &[S], substitutes: &[S]) -> Self {
        let mut roster = Self::new();
        for (names, side) in [(starters, Side::Starters), (substitutes, Side::Substitutes)] {
            for name in names {
                let name = name.as_ref();
                if roster.side_of(name).is_some() || roster.len_of(side) >= cap_of(side) {
                    continue;
                }
                match side {
                    Side::Starters => roster.starters.push(name.to_string()),
                    Side::Substitutes => roster.substitutes.push(name.to_string()),
                }
            }
        }
        roster
    }

    pub fn starters(&self) -> &[String] {
        &self.starters
    }

    pub fn substitutes(&self) -> &[String] {
        &self.substitutes
    }

    pub fn is_empty(&self) -> bool {
        self.starters.is_empty() && self.substitutes.is_empty()
    }

    pub fn side_of(&self, name: &str) -> Option<Side> {
        if self.starters.iter().any(|n| n == name) {
            Some(Side::Starters)
        } else if self.substitutes.iter().any(|n| n == name) {
            Some(Side::Substitutes)
        } else {
            None
        }
    }

    pub fn add_starter(&mut self, catalog: &Catalog, name: &str) -> AddOutcome {
        self.add(catalog, name, Side::Starters)
    }

    pub fn add_substitute(&mut self, catalog: &Catalog, name: &str) -> AddOutcome {
        self.add(catalog, name, Side::Substitutes)
    }

    pub fn add(&mut self, catalog: &Catalog, name: &str, side: Side) -> AddOutcome {
        if !catalog.contains(name) {
            return AddOutcome::UnknownPlayer;
        }
        if let Some(existing) = self.side_of(name) {
            return AddOutcome::AlreadySelected(existing);
        }
        let (list, cap) = match side {
            Side::Starters => (&mut self.starters, STARTER_CAP),
            Side::Substitutes => (&mut self.substitutes, SUBSTITUTE_CAP),
        };
        if list.len() >= cap {
            return AddOutcome::Full;
        }
        list.push(name.to_string());
        AddOutcome::Added
    }

    /// Removes `name` from whichever list holds it.
    pub fn remove(&mut self, name: &str) -> Option<Side> {
        if let Some(idx) = self.starters.iter().position(|n| n == name) {
            self.starters.remove(idx);
            return Some(Side::Starters);
        }
        if let Some(idx) = self.substitutes.iter().position(|n| n == name) {
            self.substitutes.remove(idx);
            return Some(Side::Substitutes);
        }
        None
    }

    /// Removes the player if already on `side`, otherwise tries to add there.
    /// A player on the other side is moved only if `side` has room.
    pub fn toggle(&mut self, catalog: &Catalog, name: &str, side: Side) -> ToggleOutcome {
        match self.side_of(name) {
            Some(current) if current == side => {
                self.remove(name);
                ToggleOutcome::Removed
            }
            Some(_) => {
                if !catalog.contains(name) {
                    return ToggleOutcome::Rejected(AddOutcome::UnknownPlayer);
                }
                if self.len_of(side) >= cap_of(side) {
                    return ToggleOutcome::Rejected(AddOutcome::Full);
                }
                self.remove(name);
                match self.add(catalog, name, side) {
                    AddOutcome::Added => ToggleOutcome::Moved,
                    other => ToggleOutcome::Rejected(other),
                }
            }
            None => match self.add(catalog, name, side) {
                AddOutcome::Added => ToggleOutcome::Added,
                other => ToggleOutcome::Rejected(other),
            },
        }
    }

    pub fn len_of(&self, side: Side) -> usize {
        match side {
            Side::Starters => self.starters.len(),
            Side::Substitutes => self.substitutes.len(),
        }
    }

    pub fn clear(&mut self) {
        self.starters.clear();
        self.substitutes.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Moved,
    Rejected(AddOutcome),
}

pub fn cap_of(side: Side) -> usize {
    match side {
        Side::Starters => STARTER_CAP,
        Side::Substitutes => SUBSTITUTE_CAP,
    }
}

pub fn side_label(side: Side) -> &'static str {
    match side {
        Side::Starters => "starters",
        Side::Substitutes => "substitutes",
    }
}
