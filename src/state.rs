use std::collections::VecDeque;
use std::sync::Arc;

use crate::catalog::{Catalog, Player};
use crate::config::RosterConfig;
use crate::filter::{PriceBounds, filter};
use crate::formation::Formation;
use crate::roster::{AddOutcome, Side, ToggleOutcome, cap_of, side_label};
use crate::view::{SelectionState, ViewModel, derive_view};

pub const MAX_LOGS: usize = 200;
pub const PRICE_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Market,
    Pitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Positions,
    Ranks,
    Price,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub config: RosterConfig,
    pub selection: SelectionState,
    pub price_bounds: Option<PriceBounds>,
    pub screen: Screen,
    pub focus: Focus,
    pub selected: usize,
    pub position_cursor: usize,
    pub rank_cursor: usize,
    pub search_active: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, config: RosterConfig) -> Self {
        let selection = SelectionState::initial(&catalog, &config);
        let price_bounds = PriceBounds::for_catalog(&catalog);
        let mut state = Self {
            catalog,
            config,
            selection,
            price_bounds,
            screen: Screen::Market,
            focus: Focus::Table,
            selected: 0,
            position_cursor: 0,
            rank_cursor: 0,
            search_active: false,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
        };
        state.push_log(format!(
            "[INFO] Loaded {} players from {}",
            state.catalog.len(),
            state.config.catalog_path.display()
        ));
        state
    }

    pub fn view(&self) -> ViewModel<'_> {
        derive_view(&self.catalog, &self.selection, &self.config)
    }

    pub fn filtered(&self) -> Vec<&Player> {
        filter(&self.catalog, &self.selection.criteria)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.filtered().get(self.selected).copied()
    }

    pub fn position_options(&self) -> Vec<&str> {
        self.catalog.positions()
    }

    pub fn rank_options(&self) -> Vec<&str> {
        self.catalog.ranks()
    }

    pub fn select_next(&mut self) {
        let total = self.filtered().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.filtered().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.filtered().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Table => Focus::Positions,
            Focus::Positions => Focus::Ranks,
            Focus::Ranks => Focus::Price,
            Focus::Price => Focus::Table,
        };
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Market => Screen::Pitch,
            Screen::Pitch => Screen::Market,
        };
    }

    /// Moves the option cursor of the focused multi-select, wrapping.
    pub fn move_option_cursor(&mut self, forward: bool) {
        let positions = self.position_options().len();
        let ranks = self.rank_options().len();
        let (len, cursor) = match self.focus {
            Focus::Positions => (positions, &mut self.position_cursor),
            Focus::Ranks => (ranks, &mut self.rank_cursor),
            _ => return,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = if forward {
            (*cursor + 1) % len
        } else if *cursor == 0 {
            len - 1
        } else {
            *cursor - 1
        };
    }

    pub fn toggle_option_at_cursor(&mut self) {
        let option = match self.focus {
            Focus::Positions => self
                .position_options()
                .get(self.position_cursor)
                .map(|s| s.to_string()),
            Focus::Ranks => self
                .rank_options()
                .get(self.rank_cursor)
                .map(|s| s.to_string()),
            _ => None,
        };
        let Some(option) = option else {
            return;
        };
        let criteria = &mut self.selection.criteria;
        match self.focus {
            Focus::Positions => criteria.toggle_position(&option),
            Focus::Ranks => criteria.toggle_rank(&option),
            _ => {}
        }
        self.clamp_selection();
    }

    /// Moves the lower price bound, never past the upper one.
    pub fn adjust_price_min(&mut self, delta: f64) {
        let Some(bounds) = self.price_bounds else {
            return;
        };
        let criteria = &mut self.selection.criteria;
        criteria.price_min = (criteria.price_min + delta).clamp(bounds.min, criteria.price_max);
        self.clamp_selection();
    }

    /// Moves the upper price bound, never below the lower one.
    pub fn adjust_price_max(&mut self, delta: f64) {
        let Some(bounds) = self.price_bounds else {
            return;
        };
        let criteria = &mut self.selection.criteria;
        criteria.price_max = (criteria.price_max + delta).clamp(criteria.price_min, bounds.max);
        self.clamp_selection();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.selection.criteria.name_query.push(c);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.selection.criteria.name_query.pop();
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.selection.criteria.name_query.clear();
        self.search_active = false;
        self.clamp_selection();
    }

    /// Adds or removes the highlighted player on `side`.
    pub fn toggle_selected(&mut self, side: Side) {
        let Some(name) = self.selected_player().map(|p| p.name.clone()) else {
            self.push_log("[INFO] No player highlighted");
            return;
        };
        let outcome = self.selection.roster.toggle(&self.catalog, &name, side);
        let msg = match outcome {
            ToggleOutcome::Added => format!("[INFO] {name} added to {}", side_label(side)),
            ToggleOutcome::Removed => format!("[INFO] {name} removed from {}", side_label(side)),
            ToggleOutcome::Moved => format!("[INFO] {name} moved to {}", side_label(side)),
            ToggleOutcome::Rejected(AddOutcome::Full) => format!(
                "[WARN] {} already has {} players",
                side_label(side),
                cap_of(side)
            ),
            ToggleOutcome::Rejected(AddOutcome::AlreadySelected(other)) => {
                format!("[WARN] {name} is already in {}", side_label(other))
            }
            ToggleOutcome::Rejected(AddOutcome::UnknownPlayer) => {
                format!("[WARN] {name} is not in the catalog")
            }
            ToggleOutcome::Rejected(AddOutcome::Added) => return,
        };
        self.push_log(msg);
    }

    pub fn cycle_formation(&mut self) {
        self.selection.formation = self.selection.formation.next();
        let label = self.selection.formation.label();
        self.push_log(format!("[INFO] Formation {label}"));
    }

    pub fn set_formation(&mut self, formation: Formation) {
        self.selection.formation = formation;
    }

    pub fn clear_roster(&mut self) {
        self.selection.roster.clear();
        self.push_log("[INFO] Roster cleared");
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn focus_label(focus: Focus) -> &'static str {
    match focus {
        Focus::Table => "TABLE",
        Focus::Positions => "POSITIONS",
        Focus::Ranks => "RANKS",
        Focus::Price => "PRICE",
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Market => "MARKET",
        Screen::Pitch => "PITCH",
    }
}
