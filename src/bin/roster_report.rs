use anyhow::{Context, Result, bail};

use pes21_fantasy::catalog::Catalog;
use pes21_fantasy::config::RosterConfig;
use pes21_fantasy::formation::Formation;
use pes21_fantasy::roster::{AddOutcome, Side, side_label};
use pes21_fantasy::view::{SelectionState, ViewModel, derive_view};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        print_usage();
        return Ok(());
    }

    let config = RosterConfig::from_env().with_args(&args);
    let catalog = Catalog::load(&config.catalog_path)?;
    let state = selection_from_args(&args, &catalog, &config)?;
    let view = derive_view(&catalog, &state, &config);

    if has_flag(&args, "--json") {
        let json = serde_json::to_string_pretty(&view).context("serialize view")?;
        println!("{json}");
    } else {
        print_text(&catalog, &config, &state, &view);
    }
    Ok(())
}

fn selection_from_args(
    args: &[String],
    catalog: &Catalog,
    config: &RosterConfig,
) -> Result<SelectionState> {
    let mut state = SelectionState::initial(catalog, config);

    if let Some(raw) = arg_value(args, "--formation") {
        state.formation = raw.parse::<Formation>()?;
    }
    for pos in list_arg(args, "--pos", &[',', ';']) {
        state.criteria.positions.insert(pos);
    }
    for rank in list_arg(args, "--rank", &[',', ';']) {
        state.criteria.ranks.insert(rank);
    }
    if let Some(raw) = arg_value(args, "--min") {
        state.criteria.price_min = parse_price(&raw, "--min")?;
    }
    if let Some(raw) = arg_value(args, "--max") {
        state.criteria.price_max = parse_price(&raw, "--max")?;
    }
    if state.criteria.price_min > state.criteria.price_max {
        bail!(
            "--min {} is above --max {}",
            state.criteria.price_min,
            state.criteria.price_max
        );
    }
    if let Some(name) = arg_value(args, "--name") {
        state.criteria.name_query = name;
    }

    for (flag, side) in [("--starters", Side::Starters), ("--subs", Side::Substitutes)] {
        for name in list_arg(args, flag, &[';']) {
            match state.roster.add(catalog, &name, side) {
                AddOutcome::Added => {}
                AddOutcome::Full => {
                    eprintln!("[WARN] {} full, skipped {name}", side_label(side))
                }
                AddOutcome::AlreadySelected(other) => {
                    eprintln!("[WARN] {name} already in {}, skipped", side_label(other))
                }
                AddOutcome::UnknownPlayer => eprintln!("[WARN] unknown player {name:?}, skipped"),
            }
        }
    }
    Ok(state)
}

fn print_text(catalog: &Catalog, config: &RosterConfig, state: &SelectionState, view: &ViewModel) {
    println!(
        "Catalog: {} ({} players)",
        config.catalog_path.display(),
        catalog.len()
    );
    println!(
        "Filtered: {} players | price {:.1}-{:.1}",
        view.filtered.len(),
        state.criteria.price_min,
        state.criteria.price_max
    );
    println!("{}", view.columns.join(" | "));
    for p in &view.filtered {
        let mut cells = vec![
            p.name.clone(),
            p.position.clone(),
            p.rank.clone(),
            format!("{:.1}", p.price),
            format!("{:.0}", p.overall),
        ];
        cells.extend(p.extras.iter().cloned());
        println!("{}", cells.join(" | "));
    }

    println!();
    println!("Formation: {}", state.formation);
    match &view.metrics {
        Some(m) => println!(
            "Total spent: {:.1} coins | Remaining: {:.1} | Team overall: {:.1}",
            m.total_cost, m.remaining, m.avg_overall
        ),
        None => println!("No players selected"),
    }
    for alert in &view.alerts {
        let tag = if alert.is_error() { "ERROR" } else { "WARN" };
        println!("[{tag}] {}", alert.message());
    }

    let Some(pitch) = &view.pitch else {
        return;
    };
    println!();
    println!("Pitch:");
    for placed in &pitch.placed {
        println!(
            "  {:<3} ({:>2}%, {:>2}%) {} {}",
            placed.label,
            placed.top,
            placed.left,
            placed.name,
            placed.rating_text()
        );
    }
    println!("Bench:");
    if pitch.bench.is_empty() {
        println!("  (none)");
    }
    for p in &pitch.bench {
        println!(
            "  {} | {} | {:.1} | {:.0}",
            p.name, p.position, p.price, p.overall
        );
    }
    println!("Bench cost: {:.1} coins", pitch.bench_cost);
}

fn print_usage() {
    println!("roster_report [--catalog PATH] [--formation 4-3-3|4-4-2]");
    println!("              [--pos GK,CB] [--rank S,A] [--min N] [--max N] [--name TEXT]");
    println!("              [--starters \"A;B;...\"] [--subs \"C;D;...\"] [--json]");
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            return Some(next.clone());
        }
    }
    None
}

fn list_arg(args: &[String], flag: &str, separators: &[char]) -> Vec<String> {
    arg_value(args, flag)
        .map(|raw| {
            raw.split(separators)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_price(raw: &str, flag: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .with_context(|| format!("{flag} expects a number, got {raw:?}"))
}
