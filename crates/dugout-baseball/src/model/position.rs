// Position tags carried by cards and lineup slots.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Baseball positions. The eight field positions and the three pitcher tags
/// appear on cards; `DesignatedHitter` only appears on lineup slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    StartingPitcher,
    ReliefPitcher,
    ClosingPitcher,
}

/// The eight fielding positions in canonical (scorebook) order.
pub const FIELD_POSITIONS: [Position; 8] = [
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
];

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Case-insensitive. Accepts the usual abbreviations plus `CL` as an
    /// alias for the closer tag.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Some(Position::Catcher),
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "3B" => Some(Position::ThirdBase),
            "SS" => Some(Position::ShortStop),
            "LF" => Some(Position::LeftField),
            "CF" => Some(Position::CenterField),
            "RF" => Some(Position::RightField),
            "DH" => Some(Position::DesignatedHitter),
            "SP" => Some(Position::StartingPitcher),
            "RP" => Some(Position::ReliefPitcher),
            "CP" | "CL" => Some(Position::ClosingPitcher),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::StartingPitcher => "SP",
            Position::ReliefPitcher => "RP",
            Position::ClosingPitcher => "CP",
        }
    }

    /// Whether this is one of the eight fielding positions.
    pub fn is_field(&self) -> bool {
        FIELD_POSITIONS.contains(self)
    }

    pub fn is_pitcher(&self) -> bool {
        matches!(
            self,
            Position::StartingPitcher | Position::ReliefPitcher | Position::ClosingPitcher
        )
    }

    /// Whether this position pitches out of the bullpen (RP or CP).
    pub fn is_reliever(&self) -> bool {
        matches!(self, Position::ReliefPitcher | Position::ClosingPitcher)
    }

    pub fn is_outfield(&self) -> bool {
        matches!(
            self,
            Position::LeftField | Position::CenterField | Position::RightField
        )
    }

    /// Catcher and the four infield spots.
    pub fn is_infield(&self) -> bool {
        matches!(
            self,
            Position::Catcher
                | Position::FirstBase
                | Position::SecondBase
                | Position::ThirdBase
                | Position::ShortStop
        )
    }

    /// Index into `FIELD_POSITIONS`, or `None` for non-field tags.
    pub fn field_index(&self) -> Option<usize> {
        FIELD_POSITIONS.iter().position(|p| p == self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_str())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Position::from_str_pos(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown position '{raw}'")))
    }
}
