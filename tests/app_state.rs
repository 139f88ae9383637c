use std::path::PathBuf;
use std::sync::Arc;

use pes21_fantasy::catalog::Catalog;
use pes21_fantasy::config::RosterConfig;
use pes21_fantasy::formation::Formation;
use pes21_fantasy::roster::Side;
use pes21_fantasy::state::{AppState, Focus, MAX_LOGS, Screen};

fn app() -> AppState {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("catalog.csv");
    let catalog = Catalog::load(&path).expect("fixture should load");
    AppState::new(Arc::new(catalog), RosterConfig::default())
}

fn highlight(state: &mut AppState, name: &str) {
    let idx = state
        .filtered()
        .iter()
        .position(|p| p.name == name)
        .expect("player visible");
    state.selected = idx;
}

#[test]
fn starts_on_market_with_load_log() {
    let state = app();
    assert_eq!(state.screen, Screen::Market);
    assert_eq!(state.focus, Focus::Table);
    assert_eq!(state.filtered().len(), 14);
    assert!(state.logs.back().unwrap().contains("Loaded 17 players"));
}

#[test]
fn selection_wraps_both_ways() {
    let mut state = app();
    state.select_prev();
    assert_eq!(state.selected, 13);
    state.select_next();
    assert_eq!(state.selected, 0);
}

#[test]
fn toggling_highlighted_player_updates_roster_and_log() {
    let mut state = app();
    highlight(&mut state, "Felipe Nunes");
    state.toggle_selected(Side::Starters);
    assert_eq!(state.selection.roster.starters(), ["Felipe Nunes".to_string()]);
    assert!(state.logs.back().unwrap().contains("added to starters"));

    state.toggle_selected(Side::Substitutes);
    assert_eq!(state.selection.roster.side_of("Felipe Nunes"), Some(Side::Substitutes));
    assert!(state.logs.back().unwrap().contains("moved"));

    state.toggle_selected(Side::Substitutes);
    assert!(state.selection.roster.is_empty());
}

#[test]
fn position_filter_via_cursor() {
    let mut state = app();
    state.cycle_focus();
    assert_eq!(state.focus, Focus::Positions);
    // GK is the first position seen in the catalog.
    state.toggle_option_at_cursor();
    let names: Vec<String> = state.filtered().iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["Ana Silva", "Mateus Reis"]);

    state.move_option_cursor(false);
    assert_eq!(state.position_cursor, state.position_options().len() - 1);
}

#[test]
fn price_sliders_stay_ordered_and_in_bounds() {
    let mut state = app();
    state.adjust_price_max(100.0);
    assert_eq!(state.selection.criteria.price_max, 30.0);
    assert_eq!(state.filtered().len(), 17);

    state.adjust_price_min(-100.0);
    assert_eq!(state.selection.criteria.price_min, 4.0);

    state.adjust_price_max(-100.0);
    assert_eq!(state.selection.criteria.price_max, 4.0);
    state.adjust_price_min(5.0);
    assert_eq!(state.selection.criteria.price_min, 4.0);
    assert_eq!(state.filtered().len(), 1);
    assert_eq!(state.selected, 0);
}

#[test]
fn search_narrows_and_resets_cursor() {
    let mut state = app();
    state.selected = 5;
    for c in "MOURA".chars() {
        state.push_search_char(c);
    }
    assert_eq!(state.selected, 0);
    assert_eq!(state.selected_player().unwrap().name, "Lucas Moura");
    state.clear_search();
    assert!(state.selection.criteria.name_query.is_empty());
    assert_eq!(state.filtered().len(), 14);
}

#[test]
fn formation_cycles_and_screen_toggles() {
    let mut state = app();
    state.cycle_formation();
    assert_eq!(state.selection.formation, Formation::FourFourTwo);
    state.set_formation(Formation::FourThreeThree);
    assert_eq!(state.selection.formation, Formation::FourThreeThree);
    state.toggle_screen();
    assert_eq!(state.screen, Screen::Pitch);
}

#[test]
fn log_is_bounded() {
    let mut state = app();
    for i in 0..(MAX_LOGS + 25) {
        state.push_log(format!("[INFO] entry {i}"));
    }
    assert_eq!(state.logs.len(), MAX_LOGS);
    assert_eq!(state.logs.back().unwrap(), &format!("[INFO] entry {}", MAX_LOGS + 24));
}

#[test]
fn clear_roster_drops_everyone() {
    let mut state = app();
    highlight(&mut state, "Ana Silva");
    state.toggle_selected(Side::Starters);
    state.clear_roster();
    assert!(state.selection.roster.is_empty());
    assert!(state.view().metrics.is_none());
}
