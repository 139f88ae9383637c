use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::STARTER_CAP;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Formation {
    #[default]
    #[serde(rename = "4-3-3")]
    FourThreeThree,
    #[serde(rename = "4-4-2")]
    FourFourTwo,
}

/// A pitch position. `top` and `left` are percentages measured from the
/// opponent's goal line and the left touchline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub label: &'static str,
    pub top: u8,
    pub left: u8,
}

const fn slot(label: &'static str, top: u8, left: u8) -> Slot {
    Slot { label, top, left }
}

const BACK_FOUR: [Slot; 5] = [
    slot("GK", 90, 50),
    slot("LB", 70, 15),
    slot("CB", 70, 40),
    slot("CB", 70, 60),
    slot("RB", 70, 85),
];

const SLOTS_433: [Slot; STARTER_CAP] = [
    BACK_FOUR[0],
    BACK_FOUR[1],
    BACK_FOUR[2],
    BACK_FOUR[3],
    BACK_FOUR[4],
    slot("CM", 50, 25),
    slot("CM", 50, 50),
    slot("CM", 50, 75),
    slot("LW", 25, 20),
    slot("ST", 20, 50),
    slot("RW", 25, 80),
];

const SLOTS_442: [Slot; STARTER_CAP] = [
    BACK_FOUR[0],
    BACK_FOUR[1],
    BACK_FOUR[2],
    BACK_FOUR[3],
    BACK_FOUR[4],
    slot("LM", 35, 20),
    slot("CM", 50, 40),
    slot("CM", 50, 60),
    slot("RM", 35, 80),
    slot("ST", 15, 35),
    slot("ST", 15, 65),
];

impl Formation {
    pub const ALL: [Formation; 2] = [Formation::FourThreeThree, Formation::FourFourTwo];

    pub fn label(self) -> &'static str {
        match self {
            Formation::FourThreeThree => "4-3-3",
            Formation::FourFourTwo => "4-4-2",
        }
    }

    pub fn slots(self) -> &'static [Slot; STARTER_CAP] {
        match self {
            Formation::FourThreeThree => &SLOTS_433,
            Formation::FourFourTwo => &SLOTS_442,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Formation::FourThreeThree => Formation::FourFourTwo,
            Formation::FourFourTwo => Formation::FourThreeThree,
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Formation {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Formation::ALL
            .into_iter()
            .find(|f| f.label() == trimmed)
            .ok_or_else(|| {
                anyhow!(
                    "unknown formation {raw:?} (expected one of: {})",
                    Formation::ALL.map(Formation::label).join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedPlayer {
    pub label: &'static str,
    pub top: u8,
    pub left: u8,
    pub name: String,
    pub overall: f64,
    pub color: &'static str,
}

impl PlacedPlayer {
    pub fn rating_text(&self) -> String {
        format!("{:.0}", self.overall)
    }
}

/// Fills the formation's slots with starters in selection order. Names the
/// catalog cannot resolve are skipped; with fewer than 11 starters only the
/// leading slots are filled.
pub fn layout<S: AsRef<str>>(
    formation: Formation,
    starters: &[S],
    catalog: &Catalog,
) -> Vec<PlacedPlayer> {
    starters
        .iter()
        .filter_map(|name| catalog.get(name.as_ref()))
        .zip(formation.slots().iter())
        .map(|(player, slot)| PlacedPlayer {
            label: slot.label,
            top: slot.top,
            left: slot.left,
            name: player.name.clone(),
            overall: player.overall,
            color: position_color(slot.label),
        })
        .collect()
}

pub const DEFAULT_SLOT_COLOR: &str = "#32CD32";

pub fn position_color(label: &str) -> &'static str {
    match label {
        "GK" => "#FFA500",
        "CB" | "LB" | "RB" => "#1E90FF",
        "CM" | "LM" | "RM" => "#32CD32",
        "LW" | "RW" | "ST" => "#DC143C",
        _ => DEFAULT_SLOT_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_strict() {
        assert_eq!("4-3-3".parse::<Formation>().unwrap(), Formation::FourThreeThree);
        assert_eq!(" 4-4-2 ".parse::<Formation>().unwrap(), Formation::FourFourTwo);
        let err = "3-5-2".parse::<Formation>().unwrap_err();
        assert!(err.to_string().contains("3-5-2"));
    }

    #[test]
    fn unmapped_labels_get_default_color() {
        assert_eq!(position_color("GK"), "#FFA500");
        assert_eq!(position_color("CAM"), DEFAULT_SLOT_COLOR);
        assert_eq!(position_color(""), DEFAULT_SLOT_COLOR);
    }

    #[test]
    fn templates_have_distinct_coordinates() {
        for formation in Formation::ALL {
            let slots = formation.slots();
            for (i, a) in slots.iter().enumerate() {
                for b in &slots[i + 1..] {
                    assert!((a.top, a.left) != (b.top, b.left), "{formation}");
                }
            }
        }
    }
}
