// Pitch-type classification from free-text pitch names.

use serde::{Deserialize, Serialize};

/// Closed set of pitch types the bullpen heuristics reason about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchType {
    FourSeam,
    TwoSeam,
    Sinker,
    Cutter,
    Slider,
    Curveball,
    KnuckleCurve,
    Changeup,
    Splitter,
    Palmball,
    Screwball,
    Knuckleball,
    Other,
}

/// Ordered matching rules: the first rule with any matching needle wins.
/// A rule whose needles are all required is expressed as a separate check
/// ahead of this table (see `classify`).
const RULES: &[(&[&str], PitchType)] = &[
    (&["knuckle"], PitchType::Knuckleball),
    (&["palm"], PitchType::Palmball),
    (&["screw"], PitchType::Screwball),
    (&["sinker"], PitchType::Sinker),
    (&["2 seam", "two seam"], PitchType::TwoSeam),
    (&["4 seam", "four seam"], PitchType::FourSeam),
    (&["cutter", "cut fastball"], PitchType::Cutter),
    (&["split", "fork"], PitchType::Splitter),
    (&["change"], PitchType::Changeup),
    (&["slurve"], PitchType::Curveball),
    (&["slider", "sweeper"], PitchType::Slider),
    (&["curve"], PitchType::Curveball),
    (&["fastball"], PitchType::FourSeam),
];

impl PitchType {
    /// Classify a raw pitch name. Total: unmatched names are `Other`.
    pub fn classify(name: &str) -> Self {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();

        if normalized.contains("knuckle") && normalized.contains("curve") {
            return PitchType::KnuckleCurve;
        }

        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| normalized.contains(n)))
            .map(|(_, kind)| *kind)
            .unwrap_or(PitchType::Other)
    }

    /// Fastball-family pitches used for the primary velocity reading.
    pub fn is_fastball_family(&self) -> bool {
        matches!(
            self,
            PitchType::FourSeam | PitchType::TwoSeam | PitchType::Sinker | PitchType::Cutter
        )
    }

    /// Pitches that run toward the pitcher's arm side.
    pub fn is_arm_side(&self) -> bool {
        matches!(
            self,
            PitchType::Sinker
                | PitchType::TwoSeam
                | PitchType::Changeup
                | PitchType::Splitter
                | PitchType::Screwball
        )
    }

    /// Pitches that break toward the pitcher's glove side.
    pub fn is_glove_side(&self) -> bool {
        matches!(self, PitchType::Cutter | PitchType::Slider)
    }

    pub fn is_curve_family(&self) -> bool {
        matches!(self, PitchType::Curveball | PitchType::KnuckleCurve)
    }

    /// Oddball offerings that earn a dedicated bullpen spot.
    pub fn is_junk(&self) -> bool {
        matches!(
            self,
            PitchType::Palmball
                | PitchType::Screwball
                | PitchType::Knuckleball
                | PitchType::KnuckleCurve
        )
    }
}
