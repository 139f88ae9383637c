use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{
    AUXILIARY_COLUMNS, COL_NAME, COL_OVERALL, COL_POSITION, COL_PRICE, COL_RANK, Catalog, Player,
};
use crate::config::RosterConfig;

/// Market filters. Every empty set or blank query means "no restriction".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub positions: BTreeSet<String>,
    pub ranks: BTreeSet<String>,
    pub price_min: f64,
    pub price_max: f64,
    pub name_query: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            positions: BTreeSet::new(),
            ranks: BTreeSet::new(),
            price_min: f64::NEG_INFINITY,
            price_max: f64::INFINITY,
            name_query: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Criteria for the first render: the full price span with the upper bound
    /// pulled down to the configured ceiling.
    pub fn initial(catalog: &Catalog, config: &RosterConfig) -> Self {
        let Some(bounds) = PriceBounds::for_catalog(catalog) else {
            return Self::default();
        };
        Self {
            price_min: bounds.min,
            price_max: config.price_ceiling.clamp(bounds.min, bounds.max),
            ..Self::default()
        }
    }

    pub fn toggle_position(&mut self, position: &str) {
        if !self.positions.remove(position) {
            self.positions.insert(position.to_string());
        }
    }

    pub fn toggle_rank(&mut self, rank: &str) {
        if !self.ranks.remove(rank) {
            self.ranks.insert(rank.to_string());
        }
    }

    pub fn matches(&self, player: &Player) -> bool {
        if !self.positions.is_empty() && !self.positions.contains(&player.position) {
            return false;
        }
        if !self.ranks.is_empty() && !self.ranks.contains(&player.rank) {
            return false;
        }
        if !self.name_query.is_empty() && !name_matches(&player.name, &self.name_query) {
            return false;
        }
        self.price_min <= player.price && player.price <= self.price_max
    }
}

/// Slider bounds derived from the catalog at load time (whole units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub fn for_catalog(catalog: &Catalog) -> Option<Self> {
        let (lo, hi) = catalog.price_bounds()?;
        Some(Self {
            min: lo.floor(),
            max: hi.ceil(),
        })
    }
}

/// Stable filter over the catalog; never reorders, never mutates.
pub fn filter<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> Vec<&'a Player> {
    filter_players(catalog.iter(), criteria)
}

pub fn filter_players<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    criteria: &FilterCriteria,
) -> Vec<&'a Player> {
    players
        .into_iter()
        .filter(|player| criteria.matches(player))
        .collect()
}

fn name_matches(name: &str, query: &str) -> bool {
    if name.trim().is_empty() {
        return false;
    }
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Market table headers: catalog columns minus the auxiliary ratings.
pub fn visible_columns(catalog: &Catalog) -> Vec<&str> {
    let mut cols = vec![COL_NAME, COL_POSITION, COL_RANK, COL_PRICE, COL_OVERALL];
    cols.extend(
        catalog
            .extra_columns()
            .iter()
            .map(String::as_str)
            .filter(|col| !AUXILIARY_COLUMNS.contains(col)),
    );
    cols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_never_match_a_query() {
        assert!(!name_matches("  ", "a"));
        assert!(name_matches("Ana Silva", "ana"));
        assert!(name_matches("JOÃO Félix", "joão"));
    }

    #[test]
    fn toggles_are_symmetric() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_position("GK");
        criteria.toggle_rank("S");
        assert!(criteria.positions.contains("GK"));
        assert!(criteria.ranks.contains("S"));
        criteria.toggle_position("GK");
        criteria.toggle_rank("S");
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn initial_criteria_clamps_ceiling_into_bounds() {
        let catalog = Catalog::from_players(vec![
            Player::new("A", "GK", "B", 3.4, 70.0),
            Player::new("B", "ST", "A", 12.6, 80.0),
        ])
        .unwrap();
        let criteria = FilterCriteria::initial(&catalog, &RosterConfig::default());
        assert_eq!(criteria.price_min, 3.0);
        assert_eq!(criteria.price_max, 13.0);

        let empty = FilterCriteria::initial(&Catalog::default(), &RosterConfig::default());
        assert_eq!(empty, FilterCriteria::default());
    }
}
