use std::env;
use std::path::PathBuf;

/// Total currency allowance for the whole squad (starters + substitutes).
pub const DEFAULT_BUDGET: f64 = 185.0;
/// Pitch slots per formation.
pub const STARTER_CAP: usize = 11;
pub const SUBSTITUTE_CAP: usize = 12;
/// Upper price bound pre-selected on the first render.
pub const DEFAULT_PRICE_CEILING: f64 = 20.0;
pub const DEFAULT_CATALOG_PATH: &str = "base_precificada.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct RosterConfig {
    pub catalog_path: PathBuf,
    pub budget: f64,
    pub price_ceiling: f64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            budget: DEFAULT_BUDGET,
            price_ceiling: DEFAULT_PRICE_CEILING,
        }
    }
}

impl RosterConfig {
    /// Reads `ROSTER_CATALOG`, `ROSTER_BUDGET` and `ROSTER_PRICE_CEILING`.
    /// Unset, blank or unusable values keep the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = env::var("ROSTER_CATALOG")
            && !path.trim().is_empty()
        {
            config.catalog_path = PathBuf::from(path.trim());
        }
        if let Some(budget) = positive_env("ROSTER_BUDGET") {
            config.budget = budget;
        }
        if let Some(ceiling) = positive_env("ROSTER_PRICE_CEILING") {
            config.price_ceiling = ceiling;
        }
        config
    }

    /// `--catalog <path>` or `--catalog=<path>` wins over the environment.
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(path) = parse_catalog_arg(args) {
            self.catalog_path = path;
        }
        self
    }
}

fn positive_env(key: &str) -> Option<f64> {
    env::var(key)
        .ok()
        .and_then(|raw| parse_positive(&raw))
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

pub fn parse_catalog_arg(args: &[String]) -> Option<PathBuf> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--catalog=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--catalog" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
