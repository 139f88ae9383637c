use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::roster::Roster;

/// Spend and rating figures for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget: f64,
    pub cost_starters: f64,
    pub cost_subs: f64,
    pub total_cost: f64,
    /// Negative once the squad is over budget.
    pub remaining: f64,
    pub avg_overall: f64,
    /// Selected names that resolved in the catalog.
    pub starters_resolved: usize,
    pub subs_resolved: usize,
}

impl BudgetSummary {
    pub fn is_over_budget(&self) -> bool {
        self.total_cost > self.budget
    }

    pub fn overspend(&self) -> f64 {
        (self.total_cost - self.budget).max(0.0)
    }

    pub fn has_selection(&self) -> bool {
        self.starters_resolved + self.subs_resolved > 0
    }
}

/// One pass over the catalog; names missing from it contribute nothing.
pub fn summarize(catalog: &Catalog, roster: &Roster, budget: f64) -> BudgetSummary {
    let starters: HashSet<&str> = roster.starters().iter().map(String::as_str).collect();
    let subs: HashSet<&str> = roster.substitutes().iter().map(String::as_str).collect();

    let mut cost_starters = 0.0;
    let mut cost_subs = 0.0;
    let mut overall_sum = 0.0;
    let mut starters_resolved = 0usize;
    let mut subs_resolved = 0usize;

    for player in catalog.iter().filter(|p| p.has_name()) {
        if starters.contains(player.name.as_str()) {
            cost_starters += player.price;
            overall_sum += player.overall;
            starters_resolved += 1;
        }
        if subs.contains(player.name.as_str()) {
            cost_subs += player.price;
            subs_resolved += 1;
        }
    }

    let total_cost = cost_starters + cost_subs;
    let avg_overall = if starters_resolved == 0 {
        0.0
    } else {
        overall_sum / starters_resolved as f64
    };

    BudgetSummary {
        budget,
        cost_starters,
        cost_subs,
        total_cost,
        remaining: budget - total_cost,
        avg_overall,
        starters_resolved,
        subs_resolved,
    }
}
