// Card pool loading from JSON or CSV exports.
//
// JSON files hold an array of card objects (or `{"cards": [...]}`) with
// ratings flattened onto each card. CSV files use one column per rating plus
// a `pitches` column of `name@speed/control/movement` entries joined by `;`.
// Malformed records are skipped with a warning rather than failing the load.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::model::card::{Card, CardId, Hand, Pitch, Ratings};
use crate::model::position::Position;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unsupported card file format: {path} (expected .json or .csv)")]
    UnsupportedFormat { path: String },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum CardFile {
    List(Vec<serde_json::Value>),
    Wrapped { cards: Vec<serde_json::Value> },
}

fn load_json_from_reader<R: Read>(rdr: R) -> Result<Vec<Card>, serde_json::Error> {
    let records = match serde_json::from_reader::<_, CardFile>(rdr)? {
        CardFile::List(records) | CardFile::Wrapped { cards: records } => records,
    };

    let mut cards = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Card>(record) {
            Ok(card) => cards.push(card),
            Err(e) => warn!("skipping malformed card record #{}: {}", index, e),
        }
    }
    Ok(cards)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Map a CSV column name onto the rating field it fills.
fn rating_slot<'r>(ratings: &'r mut Ratings, column: &str) -> Option<&'r mut Option<f64>> {
    let slot = match column {
        "ovr" => &mut ratings.ovr,
        "situational_ovr" => &mut ratings.situational_ovr,
        "contact_left" => &mut ratings.contact_left,
        "contact_right" => &mut ratings.contact_right,
        "power_left" => &mut ratings.power_left,
        "power_right" => &mut ratings.power_right,
        "vision" => &mut ratings.vision,
        "discipline" => &mut ratings.discipline,
        "clutch" => &mut ratings.clutch,
        "bunting_ability" => &mut ratings.bunting_ability,
        "drag_bunting_ability" => &mut ratings.drag_bunting_ability,
        "vs_left" => &mut ratings.vs_left,
        "vs_right" => &mut ratings.vs_right,
        "speed" => &mut ratings.speed,
        "baserunning_ability" => &mut ratings.baserunning_ability,
        "baserunning_aggression" => &mut ratings.baserunning_aggression,
        "fielding_ability" => &mut ratings.fielding_ability,
        "arm_strength" => &mut ratings.arm_strength,
        "arm_accuracy" => &mut ratings.arm_accuracy,
        "reaction_time" => &mut ratings.reaction_time,
        "pitch_velocity" => &mut ratings.pitch_velocity,
        "pitch_control" => &mut ratings.pitch_control,
        "pitch_movement" => &mut ratings.pitch_movement,
        "pitching_clutch" => &mut ratings.pitching_clutch,
        "stamina" => &mut ratings.stamina,
        "k_per_bf" => &mut ratings.k_per_bf,
        "bb_per_bf" => &mut ratings.bb_per_bf,
        _ => return None,
    };
    Some(slot)
}

/// Parse an optional numeric cell. Blank is `None`; garbage or non-finite
/// values are errors.
fn parse_number(cell: &str) -> Result<Option<f64>, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(format!("non-finite value '{cell}'")),
        Err(_) => Err(format!("invalid number '{cell}'")),
    }
}

/// Parse `name@speed/control/movement;...`. Missing numbers are `None`.
fn parse_pitches(cell: &str) -> Result<Vec<Pitch>, String> {
    let mut pitches = Vec::new();
    for entry in cell.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, numbers) = entry.split_once('@').unwrap_or((entry, ""));
        let mut parts = numbers.split('/');
        let mut next = || parse_number(parts.next().unwrap_or(""));
        pitches.push(Pitch {
            name: name.trim().to_string(),
            speed: next()?,
            control: next()?,
            movement: next()?,
        });
    }
    Ok(pitches)
}

fn card_from_record(
    columns: &HashMap<String, usize>,
    record: &csv::StringRecord,
) -> Result<Card, String> {
    let cell = |name: &str| -> &str {
        columns
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .trim()
    };

    let raw_id = cell("id");
    if raw_id.is_empty() {
        return Err("missing id".into());
    }
    let raw_position = cell("position");
    let position = Position::from_str_pos(raw_position)
        .ok_or_else(|| format!("unknown position '{raw_position}'"))?;

    let mut ratings = Ratings::default();
    for (column, &index) in columns {
        if let Some(slot) = rating_slot(&mut ratings, column) {
            *slot = parse_number(record.get(index).unwrap_or(""))
                .map_err(|e| format!("column {column}: {e}"))?;
        }
    }

    Ok(Card {
        id: CardId::parse(raw_id),
        name: cell("name").to_string(),
        position,
        bat_hand: Hand::from_str_hand(cell("bat_hand")),
        throw_hand: Hand::from_str_hand(cell("throw_hand")),
        ratings,
        pitches: parse_pitches(cell("pitches"))?,
    })
}

fn load_csv_from_reader<R: Read>(rdr: R) -> Result<Vec<Card>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase(), i))
        .collect();

    let mut cards = Vec::new();
    for (row, result) in reader.records().enumerate() {
        match result {
            Ok(record) => match card_from_record(&columns, &record) {
                Ok(card) => cards.push(card),
                Err(reason) => warn!("skipping card row {}: {}", row + 1, reason),
            },
            Err(e) => warn!("skipping malformed card row {}: {}", row + 1, e),
        }
    }
    Ok(cards)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, PoolError> {
    std::fs::File::open(path).map_err(|e| PoolError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load cards from a JSON file.
pub fn load_json_cards(path: &Path) -> Result<Vec<Card>, PoolError> {
    load_json_from_reader(open(path)?).map_err(|e| PoolError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load cards from a CSV file.
pub fn load_csv_cards(path: &Path) -> Result<Vec<Card>, PoolError> {
    load_csv_from_reader(open(path)?).map_err(|e| PoolError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a card pool, choosing the parser from the file extension.
pub fn load_cards(path: &Path) -> Result<Vec<Card>, PoolError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let cards = match extension.as_deref() {
        Some("json") => load_json_cards(path)?,
        Some("csv") => load_csv_cards(path)?,
        _ => {
            return Err(PoolError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    };

    if cards.is_empty() {
        return Err(PoolError::Validation(format!(
            "{} produced zero valid cards",
            path.display()
        )));
    }

    info!("loaded {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
