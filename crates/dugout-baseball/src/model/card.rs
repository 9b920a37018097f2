// Player cards: identity, handedness, ratings and pitch repertoire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::pitch::PitchType;
use super::position::Position;

/// Separator between a card's base identity and its variant tag.
pub const VARIANT_SEPARATOR: char = '|';

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Card identity as a (base, variant) pair.
///
/// Alternate cards of the same player share a base identity and differ only
/// in the variant tag, so every uniqueness check in the engine keys on `base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardId {
    pub base: String,
    pub variant: Option<String>,
}

impl CardId {
    /// Split a raw id on the first `|`. Empty variants are dropped.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once(VARIANT_SEPARATOR) {
            Some((base, variant)) => CardId {
                base: base.trim().to_string(),
                variant: Some(variant.trim().to_string()).filter(|v| !v.is_empty()),
            },
            None => CardId {
                base: raw.to_string(),
                variant: None,
            },
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}{}{}", self.base, VARIANT_SEPARATOR, variant),
            None => write!(f, "{}", self.base),
        }
    }
}

impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Raw ids arrive as strings or bare numbers depending on the data source.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
        };
        if raw.trim().is_empty() {
            return Err(serde::de::Error::custom("card id must not be empty"));
        }
        Ok(CardId::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

/// Batting or throwing hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Hand {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "S")]
    Switch,
    #[default]
    #[serde(rename = "?")]
    Unknown,
}

impl Hand {
    /// Lenient parse: `L`/`Left`, `R`/`Right`, `S`/`B`/`Switch`/`Both`.
    /// Anything else is `Unknown`.
    pub fn from_str_hand(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "L" | "LEFT" => Hand::Left,
            "R" | "RIGHT" => Hand::Right,
            "S" | "B" | "SWITCH" | "BOTH" => Hand::Switch,
            _ => Hand::Unknown,
        }
    }

    /// Two hands conflict when both are the same known side. Switch and
    /// unknown hands never conflict.
    pub fn conflicts_with(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Left, Hand::Left) | (Hand::Right, Hand::Right)
        )
    }
}

impl<'de> Deserialize<'de> for Hand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Hand::from_str_hand).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// Numeric ratings. Every field is optional: `None` means the data source
/// had nothing for it. Read through [`rating`] for arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ratings {
    pub ovr: Option<f64>,
    pub situational_ovr: Option<f64>,
    // Hitting
    pub contact_left: Option<f64>,
    pub contact_right: Option<f64>,
    pub power_left: Option<f64>,
    pub power_right: Option<f64>,
    pub vision: Option<f64>,
    pub discipline: Option<f64>,
    pub clutch: Option<f64>,
    pub bunting_ability: Option<f64>,
    pub drag_bunting_ability: Option<f64>,
    pub vs_left: Option<f64>,
    pub vs_right: Option<f64>,
    // Running
    pub speed: Option<f64>,
    pub baserunning_ability: Option<f64>,
    pub baserunning_aggression: Option<f64>,
    // Fielding
    pub fielding_ability: Option<f64>,
    pub arm_strength: Option<f64>,
    pub arm_accuracy: Option<f64>,
    pub reaction_time: Option<f64>,
    // Pitching
    pub pitch_velocity: Option<f64>,
    pub pitch_control: Option<f64>,
    pub pitch_movement: Option<f64>,
    pub pitching_clutch: Option<f64>,
    pub stamina: Option<f64>,
    /// Strikeouts per batter faced, as a fraction.
    pub k_per_bf: Option<f64>,
    /// Walks per batter faced, as a fraction.
    pub bb_per_bf: Option<f64>,
}

/// Read an optional rating for arithmetic: absent or non-finite is 0.
pub fn rating(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Whether an optional rating carries usable data.
pub fn has_rating(value: Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}

// ---------------------------------------------------------------------------
// Pitches and cards
// ---------------------------------------------------------------------------

/// One pitch in a pitcher's repertoire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    pub name: String,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub control: Option<f64>,
    #[serde(default)]
    pub movement: Option<f64>,
}

impl Pitch {
    pub fn kind(&self) -> PitchType {
        PitchType::classify(&self.name)
    }

    pub fn speed(&self) -> f64 {
        rating(self.speed)
    }
}

/// A candidate player card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "display_position", alias = "pos")]
    pub position: Position,
    #[serde(default)]
    pub bat_hand: Hand,
    #[serde(default)]
    pub throw_hand: Hand,
    #[serde(flatten)]
    pub ratings: Ratings,
    #[serde(default)]
    pub pitches: Vec<Pitch>,
}

impl Card {
    /// Base identity used for every uniqueness check.
    pub fn base_id(&self) -> &str {
        self.id.base()
    }

    /// Fielders and DH-only cards.
    pub fn is_hitter(&self) -> bool {
        !self.position.is_pitcher()
    }

    pub fn is_pitcher(&self) -> bool {
        self.position.is_pitcher()
    }

    pub fn pitch_types(&self) -> impl Iterator<Item = PitchType> + '_ {
        self.pitches.iter().map(Pitch::kind)
    }

    /// Fastest pitch of the given type, if the card throws one.
    pub fn fastest(&self, kind: PitchType) -> Option<f64> {
        self.pitches
            .iter()
            .filter(|p| p.kind() == kind)
            .map(Pitch::speed)
            .reduce(f64::max)
    }
}
