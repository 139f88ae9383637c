use std::collections::HashSet;

use serde::Serialize;

use crate::budget::{BudgetSummary, summarize};
use crate::catalog::{Catalog, Player};
use crate::config::{RosterConfig, STARTER_CAP, SUBSTITUTE_CAP};
use crate::filter::{FilterCriteria, filter, visible_columns};
use crate::formation::{Formation, PlacedPlayer, layout};
use crate::roster::Roster;

/// Everything the user can change. The catalog is passed alongside, never owned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    pub criteria: FilterCriteria,
    pub roster: Roster,
    pub formation: Formation,
}

impl SelectionState {
    pub fn initial(catalog: &Catalog, config: &RosterConfig) -> Self {
        Self {
            criteria: FilterCriteria::initial(catalog, config),
            roster: Roster::new(),
            formation: Formation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    OverBudget {
        budget: f64,
        total_cost: f64,
    },
    PitchWithheld {
        starters: usize,
        substitutes: usize,
        budget: f64,
    },
}

impl Alert {
    pub fn message(&self) -> String {
        match self {
            Alert::OverBudget { budget, total_cost } => format!(
                "Total cost {total_cost:.1} is over the {budget:.0} coin budget"
            ),
            Alert::PitchWithheld {
                starters,
                substitutes,
                budget,
            } => format!(
                "Pick exactly {STARTER_CAP} starters ({starters} now), up to {SUBSTITUTE_CAP} substitutes ({substitutes} now) and stay within {budget:.0} coins"
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Alert::OverBudget { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchView<'a> {
    pub formation: Formation,
    pub placed: Vec<PlacedPlayer>,
    /// Substitutes in catalog order.
    pub bench: Vec<&'a Player>,
    pub bench_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel<'a> {
    pub columns: Vec<&'a str>,
    pub filtered: Vec<&'a Player>,
    /// `None` until at least one selected name resolves.
    pub metrics: Option<BudgetSummary>,
    pub pitch: Option<PitchView<'a>>,
    pub alerts: Vec<Alert>,
}

impl ViewModel<'_> {
    pub fn has_pitch(&self) -> bool {
        self.pitch.is_some()
    }

    /// The instruction shown in place of a withheld pitch.
    pub fn pitch_warning(&self) -> Option<&Alert> {
        self.alerts
            .iter()
            .find(|a| matches!(a, Alert::PitchWithheld { .. }))
    }
}

/// Full pipeline for one render: filter, budget, pitch gate, layout.
pub fn derive_view<'a>(
    catalog: &'a Catalog,
    state: &SelectionState,
    config: &RosterConfig,
) -> ViewModel<'a> {
    let filtered = filter(catalog, &state.criteria);
    let summary = summarize(catalog, &state.roster, config.budget);

    let mut alerts = Vec::new();
    if summary.is_over_budget() {
        alerts.push(Alert::OverBudget {
            budget: summary.budget,
            total_cost: summary.total_cost,
        });
    }

    let pitch = if pitch_ready(&summary) {
        Some(PitchView {
            formation: state.formation,
            placed: layout(state.formation, state.roster.starters(), catalog),
            bench: bench_players(catalog, &state.roster),
            bench_cost: summary.cost_subs,
        })
    } else {
        alerts.push(Alert::PitchWithheld {
            starters: summary.starters_resolved,
            substitutes: summary.subs_resolved,
            budget: summary.budget,
        });
        None
    };

    ViewModel {
        columns: visible_columns(catalog),
        filtered,
        metrics: summary.has_selection().then_some(summary),
        pitch,
        alerts,
    }
}

/// Full eleven, bench within its cap, squad within budget.
pub fn pitch_ready(summary: &BudgetSummary) -> bool {
    summary.starters_resolved == STARTER_CAP
        && summary.subs_resolved <= SUBSTITUTE_CAP
        && !summary.is_over_budget()
}

fn bench_players<'a>(catalog: &'a Catalog, roster: &Roster) -> Vec<&'a Player> {
    let subs: HashSet<&str> = roster.substitutes().iter().map(String::as_str).collect();
    catalog
        .iter()
        .filter(|p| p.has_name() && subs.contains(p.name.as_str()))
        .collect()
}
