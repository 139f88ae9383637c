use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;

pub const COL_NAME: &str = "Jogador";
pub const COL_POSITION: &str = "pos";
pub const COL_RANK: &str = "rank";
pub const COL_PRICE: &str = "preco";
pub const COL_OVERALL: &str = "overall";

pub const COL_VEL: &str = "vel";
pub const COL_KICKING: &str = "kicking";
pub const COL_DESTRUCTION: &str = "destruction";
pub const COL_CREATION: &str = "creation";

pub const REQUIRED_COLUMNS: [&str; 5] = [COL_NAME, COL_POSITION, COL_RANK, COL_PRICE, COL_OVERALL];
/// Parsed when present, hidden from the market table.
pub const AUXILIARY_COLUMNS: [&str; 4] = [COL_VEL, COL_KICKING, COL_DESTRUCTION, COL_CREATION];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub position: String,
    pub rank: String,
    pub price: f64,
    pub overall: f64,
    pub vel: Option<f64>,
    pub kicking: Option<f64>,
    pub destruction: Option<f64>,
    pub creation: Option<f64>,
    // Values of `Catalog::extra_columns`, same order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
}

impl Player {
    pub fn new(name: &str, position: &str, rank: &str, price: f64, overall: f64) -> Self {
        Self {
            name: name.to_string(),
            position: position.to_string(),
            rank: rank.to_string(),
            price,
            overall,
            vel: None,
            kicking: None,
            destruction: None,
            creation: None,
            extras: Vec::new(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Read-only player table, loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    players: Vec<Player>,
    extra_columns: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("open player catalog {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("load player catalog {}", path.display()))
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = reader.headers().context("read catalog header row")?.clone();
        let layout = ColumnLayout::from_headers(&headers)?;

        let mut players = Vec::with_capacity(256);
        for (idx, record) in reader.records().enumerate() {
            // Header is line 1.
            let fallback_line = idx as u64 + 2;
            let record = record.with_context(|| format!("read catalog line {fallback_line}"))?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(fallback_line);
            let player = layout
                .parse_player(&record)
                .with_context(|| format!("catalog line {line}"))?;
            players.push(player);
        }

        Self::from_parts(players, layout.extra_names)
    }

    pub fn from_players(players: Vec<Player>) -> Result<Self> {
        Self::from_parts(players, Vec::new())
    }

    fn from_parts(players: Vec<Player>, extra_columns: Vec<String>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(players.len());
        for (idx, player) in players.iter().enumerate() {
            if !player.has_name() {
                continue;
            }
            if by_name.insert(player.name.clone(), idx).is_some() {
                bail!("duplicate player name {:?}", player.name);
            }
        }
        Ok(Self {
            players,
            extra_columns,
            by_name,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.by_name.get(name).and_then(|idx| self.players.get(*idx))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Headers outside the required and auxiliary sets, in file order.
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Distinct positions in first-seen order.
    pub fn positions(&self) -> Vec<&str> {
        distinct(self.players.iter().map(|p| p.position.as_str()))
    }

    /// Distinct ranks in first-seen order.
    pub fn ranks(&self) -> Vec<&str> {
        distinct(self.players.iter().map(|p| p.rank.as_str()))
    }

    /// Lowest and highest price, `None` for an empty catalog.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.players.iter().map(|p| p.price);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .collect()
}

struct ColumnLayout {
    name: usize,
    position: usize,
    rank: usize,
    price: usize,
    overall: usize,
    vel: Option<usize>,
    kicking: Option<usize>,
    destruction: Option<usize>,
    creation: Option<usize>,
    extra_idx: Vec<usize>,
    extra_names: Vec<String>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |col: &str| headers.iter().position(|h| h == col);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| find(col).is_none())
            .collect();
        if !missing.is_empty() {
            bail!(
                "catalog is missing required column(s): {}",
                missing.join(", ")
            );
        }
        let required = |col: &str| find(col).ok_or_else(|| anyhow!("missing column {col}"));

        let mut extra_idx = Vec::new();
        let mut extra_names = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if REQUIRED_COLUMNS.contains(&header) || AUXILIARY_COLUMNS.contains(&header) {
                continue;
            }
            extra_idx.push(idx);
            extra_names.push(header.to_string());
        }

        Ok(Self {
            name: required(COL_NAME)?,
            position: required(COL_POSITION)?,
            rank: required(COL_RANK)?,
            price: required(COL_PRICE)?,
            overall: required(COL_OVERALL)?,
            vel: find(COL_VEL),
            kicking: find(COL_KICKING),
            destruction: find(COL_DESTRUCTION),
            creation: find(COL_CREATION),
            extra_idx,
            extra_names,
        })
    }

    fn parse_player(&self, record: &csv::StringRecord) -> Result<Player> {
        let text = |idx: usize| record.get(idx).unwrap_or("").to_string();
        Ok(Player {
            name: text(self.name),
            position: text(self.position),
            rank: text(self.rank),
            price: required_number(record, self.price, COL_PRICE)?,
            overall: required_number(record, self.overall, COL_OVERALL)?,
            vel: optional_number(record, self.vel, COL_VEL)?,
            kicking: optional_number(record, self.kicking, COL_KICKING)?,
            destruction: optional_number(record, self.destruction, COL_DESTRUCTION)?,
            creation: optional_number(record, self.creation, COL_CREATION)?,
            extras: self.extra_idx.iter().map(|idx| text(*idx)).collect(),
        })
    }
}

fn required_number(record: &csv::StringRecord, idx: usize, col: &str) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("");
    if raw.is_empty() {
        bail!("column {col} is empty");
    }
    parse_number(raw, col)
}

fn optional_number(record: &csv::StringRecord, idx: Option<usize>, col: &str) -> Result<Option<f64>> {
    let Some(idx) = idx else {
        return Ok(None);
    };
    let raw = record.get(idx).unwrap_or("");
    if raw.is_empty() {
        return Ok(None);
    }
    parse_number(raw, col).map(Some)
}

fn parse_number(raw: &str, col: &str) -> Result<f64> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("column {col}: {raw:?} is not a number"))?;
    if !value.is_finite() {
        bail!("column {col}: {raw:?} is not a finite number");
    }
    Ok(value)
}
