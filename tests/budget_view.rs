use std::path::PathBuf;

use pes21_fantasy::budget::summarize;
use pes21_fantasy::catalog::{Catalog, Player};
use pes21_fantasy::config::RosterConfig;
use pes21_fantasy::formation::Formation;
use pes21_fantasy::roster::Roster;
use pes21_fantasy::view::{Alert, SelectionState, derive_view, pitch_ready};

const FIRST_ELEVEN: [&str; 11] = [
    "Ana Silva",
    "Bruno Costa",
    "Carlos Lima",
    "Diego Rocha",
    "Eduardo Pires",
    "Felipe Nunes",
    "Gabriel Souza",
    "Hugo Alves",
    "Igor Martins",
    "Juan",
    "Kleber Dias",
];

fn fixture() -> Catalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("catalog.csv");
    Catalog::load(&path).expect("fixture should load")
}

fn state_with(starters: &[&str], subs: &[&str]) -> SelectionState {
    SelectionState {
        roster: Roster::from_names(starters, subs),
        ..SelectionState::default()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn average_overall_is_zero_without_starters() {
    let catalog = fixture();
    let summary = summarize(&catalog, &Roster::from_names(&[], &["Juan"]), 185.0);
    assert_eq!(summary.avg_overall, 0.0);
    assert_eq!(summary.total_cost, 25.0);
}

#[test]
fn average_overall_covers_starters_only() {
    let catalog = Catalog::from_players(vec![
        Player::new("A", "ST", "A", 10.0, 80.0),
        Player::new("B", "ST", "A", 10.0, 90.0),
        Player::new("C", "GK", "C", 10.0, 50.0),
    ])
    .unwrap();
    let summary = summarize(&catalog, &Roster::from_names(&["A", "B"], &["C"]), 185.0);
    assert!(approx(summary.avg_overall, 85.0));
    assert!(approx(summary.total_cost, 30.0));
}

#[test]
fn spending_past_budget_goes_negative_and_raises_error() {
    let catalog = Catalog::from_players(vec![
        Player::new("A", "ST", "S", 120.0, 90.0),
        Player::new("B", "GK", "S", 80.0, 88.0),
    ])
    .unwrap();
    let config = RosterConfig::default();
    let state = state_with(&["A"], &["B"]);
    let view = derive_view(&catalog, &state, &config);

    let metrics = view.metrics.expect("selection is non-empty");
    assert!(approx(metrics.total_cost, 200.0));
    assert!(approx(metrics.remaining, -15.0));
    assert!(metrics.is_over_budget());
    assert!(approx(metrics.overspend(), 15.0));
    assert_eq!(
        view.alerts[0],
        Alert::OverBudget {
            budget: 185.0,
            total_cost: 200.0
        }
    );
    assert!(view.alerts[0].is_error());
    assert!(view.pitch.is_none());
}

#[test]
fn partial_squad_shows_metrics_but_withholds_pitch() {
    let catalog = Catalog::from_players(vec![
        Player::new("A", "CB", "B", 10.0, 75.0),
        Player::new("B", "CM", "A", 15.0, 80.0),
        Player::new("C", "ST", "S", 20.0, 85.0),
    ])
    .unwrap();
    let view = derive_view(&catalog, &state_with(&["A", "B", "C"], &[]), &RosterConfig::default());

    let metrics = view.metrics.expect("three starters selected");
    assert!(approx(metrics.total_cost, 45.0));
    assert!(approx(metrics.remaining, 140.0));
    assert!(approx(metrics.avg_overall, 80.0));
    assert!(!view.has_pitch());
    assert_eq!(view.alerts.len(), 1);
    assert!(!view.alerts[0].is_error());
    assert!(view.alerts[0].message().contains("3 now"));
}

#[test]
fn empty_selection_has_no_metrics() {
    let catalog = fixture();
    let view = derive_view(&catalog, &SelectionState::default(), &RosterConfig::default());
    assert!(view.metrics.is_none());
    assert!(view.pitch.is_none());
    assert!(view.pitch_warning().is_some());
    assert_eq!(view.filtered.len(), catalog.len());
}

#[test]
fn full_squad_within_budget_renders_pitch() {
    let catalog = fixture();
    let subs = [
        "Paulo Ribeiro",
        "Lucas Moura",
        "Mateus Reis",
        "Nathan Melo",
        "Otavio Gomes",
    ];
    let state = state_with(&FIRST_ELEVEN, &subs);
    let view = derive_view(&catalog, &state, &RosterConfig::default());

    let metrics = view.metrics.unwrap();
    assert!(approx(metrics.cost_starters, 142.0));
    assert!(approx(metrics.cost_subs, 38.0));
    assert!(approx(metrics.total_cost, 180.0));
    assert!(approx(metrics.remaining, 5.0));
    assert!(approx(metrics.avg_overall, 900.0 / 11.0));
    assert!(view.alerts.is_empty());

    let pitch = view.pitch.expect("squad is complete");
    assert_eq!(pitch.formation, Formation::FourThreeThree);
    assert_eq!(pitch.placed.len(), 11);
    assert_eq!(pitch.placed[0].name, "Ana Silva");
    assert_eq!(pitch.placed[0].label, "GK");
    assert_eq!(pitch.placed[9].name, "Juan");
    assert_eq!(pitch.placed[9].label, "ST");
    assert!(approx(pitch.bench_cost, 38.0));

    // Bench follows catalog order, not the order the subs were picked.
    let bench: Vec<&str> = pitch.bench.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        bench,
        vec![
            "Lucas Moura",
            "Mateus Reis",
            "Nathan Melo",
            "Otavio Gomes",
            "Paulo Ribeiro"
        ]
    );
}

#[test]
fn spending_exactly_the_budget_still_renders_pitch() {
    let catalog = fixture();
    let subs = ["Quirino Lopes", "Otavio Gomes", "Mateus Reis"];
    let view = derive_view(&catalog, &state_with(&FIRST_ELEVEN, &subs), &RosterConfig::default());

    let metrics = view.metrics.unwrap();
    assert!(approx(metrics.total_cost, 185.0));
    assert!(approx(metrics.remaining, 0.0));
    assert!(!metrics.is_over_budget());
    assert!(pitch_ready(&metrics));
    assert!(view.alerts.is_empty());
    assert!(approx(view.pitch.expect("budget is met exactly").bench_cost, 43.0));
}

#[test]
fn full_squad_over_budget_withholds_pitch() {
    let catalog = fixture();
    let subs = [
        "Lucas Moura",
        "Mateus Reis",
        "Quirino Lopes",
        "Otavio Gomes",
        "Paulo Ribeiro",
    ];
    let view = derive_view(&catalog, &state_with(&FIRST_ELEVEN, &subs), &RosterConfig::default());
    let metrics = view.metrics.unwrap();
    assert!(approx(metrics.total_cost, 205.0));
    assert!(approx(metrics.overspend(), 20.0));
    assert!(view.pitch.is_none());
    assert_eq!(view.alerts.len(), 2);
    assert!(view.alerts[0].is_error());

    // The pitch panel carries one instruction; the overspend stays in the banner.
    let warning = view.pitch_warning().expect("pitch is withheld");
    assert!(!warning.is_error());
    assert!(warning.message().contains("11 now"));
}

#[test]
fn stale_starter_blocks_the_pitch() {
    let catalog = fixture();
    let mut starters = FIRST_ELEVEN.to_vec();
    starters[10] = "Retired Player";
    let view = derive_view(&catalog, &state_with(&starters, &[]), &RosterConfig::default());
    let metrics = view.metrics.unwrap();
    assert_eq!(metrics.starters_resolved, 10);
    assert!(!pitch_ready(&metrics));
    assert!(view.pitch.is_none());
}

#[test]
fn budget_comes_from_config() {
    let catalog = fixture();
    let config = RosterConfig {
        budget: 150.0,
        ..RosterConfig::default()
    };
    let view = derive_view(&catalog, &state_with(&FIRST_ELEVEN, &["Lucas Moura"]), &config);
    let metrics = view.metrics.unwrap();
    assert!(approx(metrics.remaining, -3.0));
    assert!(view.pitch.is_none());
}

#[test]
fn view_serializes_for_reporting() {
    let catalog = fixture();
    let view = derive_view(&catalog, &state_with(&["Juan"], &[]), &RosterConfig::default());
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["metrics"]["total_cost"], 25.0);
    assert_eq!(json["alerts"][0]["kind"], "pitch_withheld");
    assert!(json["pitch"].is_null());
}
