// Scoring metrics and the per-side scoring functions.
//
// Hitters score directly off the selected metric. Pitchers honor only the
// overall and platoon metrics; everything else reads the situational overall.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::card::{has_rating, rating, Card, Ratings};

/// Score given to a hitter with no data at all for the selected metric, so
/// such cards sort below genuine zeros.
pub const MISSING_SCORE: f64 = -1.0;

// ---------------------------------------------------------------------------
// Metric selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMetric {
    TrueOverall,
    SituationalOverall,
    Power,
    Contact,
    Bunting,
    Defense,
    Baserunning,
    VsLeft,
    VsRight,
}

pub const ALL_METRICS: [ScoringMetric; 9] = [
    ScoringMetric::TrueOverall,
    ScoringMetric::SituationalOverall,
    ScoringMetric::Power,
    ScoringMetric::Contact,
    ScoringMetric::Bunting,
    ScoringMetric::Defense,
    ScoringMetric::Baserunning,
    ScoringMetric::VsLeft,
    ScoringMetric::VsRight,
];

impl ScoringMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMetric::TrueOverall => "true_overall",
            ScoringMetric::SituationalOverall => "situational_overall",
            ScoringMetric::Power => "power",
            ScoringMetric::Contact => "contact",
            ScoringMetric::Bunting => "bunting",
            ScoringMetric::Defense => "defense",
            ScoringMetric::Baserunning => "baserunning",
            ScoringMetric::VsLeft => "vs_left",
            ScoringMetric::VsRight => "vs_right",
        }
    }

    /// The metric pitchers actually use when this one is selected.
    pub fn for_pitchers(self) -> ScoringMetric {
        match self {
            ScoringMetric::TrueOverall | ScoringMetric::VsLeft | ScoringMetric::VsRight => self,
            _ => ScoringMetric::SituationalOverall,
        }
    }
}

impl fmt::Display for ScoringMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scoring metric '{0}'")]
pub struct ParseMetricError(pub String);

impl FromStr for ScoringMetric {
    type Err = ParseMetricError;

    /// Accepts snake_case, kebab-case and a few short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        let metric = match key.as_str() {
            "true_overall" | "ovr" | "overall" => ScoringMetric::TrueOverall,
            "situational_overall" | "sit_ovr" | "situational" => ScoringMetric::SituationalOverall,
            "power" => ScoringMetric::Power,
            "contact" => ScoringMetric::Contact,
            "bunting" => ScoringMetric::Bunting,
            "defense" | "fielding" => ScoringMetric::Defense,
            "baserunning" | "speed" => ScoringMetric::Baserunning,
            "vs_left" | "vsl" => ScoringMetric::VsLeft,
            "vs_right" | "vsr" => ScoringMetric::VsRight,
            _ => return Err(ParseMetricError(s.to_string())),
        };
        Ok(metric)
    }
}

// ---------------------------------------------------------------------------
// Component blends
// ---------------------------------------------------------------------------

/// Mean of the components, absent ones counted as 0. `None` when every
/// component is absent.
fn mean_of(values: &[Option<f64>]) -> Option<f64> {
    if values.is_empty() || !values.iter().any(|v| has_rating(*v)) {
        return None;
    }
    Some(values.iter().map(|v| rating(*v)).sum::<f64>() / values.len() as f64)
}

fn platoon(direct: Option<f64>, contact: Option<f64>, power: Option<f64>) -> Option<f64> {
    if has_rating(direct) {
        return direct;
    }
    mean_of(&[contact, power])
}

fn hitter_metric_value(r: &Ratings, metric: ScoringMetric) -> Option<f64> {
    match metric {
        ScoringMetric::TrueOverall => r.ovr.filter(|v| v.is_finite()),
        ScoringMetric::SituationalOverall => r.situational_ovr.filter(|v| v.is_finite()),
        ScoringMetric::Power => mean_of(&[r.power_left, r.power_right]),
        ScoringMetric::Contact => mean_of(&[r.contact_left, r.contact_right]),
        ScoringMetric::Bunting => mean_of(&[r.bunting_ability, r.drag_bunting_ability]),
        ScoringMetric::Defense => mean_of(&[
            r.fielding_ability,
            r.arm_strength,
            r.arm_accuracy,
            r.reaction_time,
        ]),
        ScoringMetric::Baserunning => mean_of(&[
            r.speed,
            r.baserunning_ability,
            r.baserunning_aggression,
        ]),
        ScoringMetric::VsLeft => platoon(r.vs_left, r.contact_left, r.power_left),
        ScoringMetric::VsRight => platoon(r.vs_right, r.contact_right, r.power_right),
    }
}

// ---------------------------------------------------------------------------
// Public scoring functions
// ---------------------------------------------------------------------------

/// Score a hitter under `metric`. Cards with no data for the metric score
/// [`MISSING_SCORE`].
pub fn hitter_score(card: &Card, metric: ScoringMetric) -> f64 {
    hitter_metric_value(&card.ratings, metric).unwrap_or(MISSING_SCORE)
}

/// Score a pitcher under `metric`, after degrading unsupported metrics to
/// the situational overall. Absent data scores 0.
pub fn pitcher_score(card: &Card, metric: ScoringMetric) -> f64 {
    let r = &card.ratings;
    match metric.for_pitchers() {
        ScoringMetric::TrueOverall => rating(r.ovr),
        ScoringMetric::VsLeft => rating(r.vs_left),
        ScoringMetric::VsRight => rating(r.vs_right),
        _ => rating(r.situational_ovr),
    }
}

/// Score any card with the scorer for its side.
pub fn card_score(card: &Card, metric: ScoringMetric) -> f64 {
    if card.is_pitcher() {
        pitcher_score(card, metric)
    } else {
        hitter_score(card, metric)
    }
}

/// Average contact across both splits (0 when absent).
pub fn contact(card: &Card) -> f64 {
    (rating(card.ratings.contact_left) + rating(card.ratings.contact_right)) / 2.0
}

/// Average power across both splits (0 when absent).
pub fn power(card: &Card) -> f64 {
    (rating(card.ratings.power_left) + rating(card.ratings.power_right)) / 2.0
}

/// Plain hitting skill: contact and power, equally weighted.
pub fn hit_skill(card: &Card) -> f64 {
    (contact(card) + power(card)) / 2.0
}

pub fn speed(card: &Card) -> f64 {
    rating(card.ratings.speed)
}

/// How evenly a hitter handles both sides: 100 for identical platoon
/// splits, lower as they diverge.
pub fn platoon_balance(card: &Card) -> f64 {
    let vs_left = hitter_score(card, ScoringMetric::VsLeft).max(0.0);
    let vs_right = hitter_score(card, ScoringMetric::VsRight).max(0.0);
    100.0 - (vs_left - vs_right).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::{CardId, Hand};
    use crate::model::position::Position;

    fn card(position: Position, ratings: Ratings) -> Card {
        Card {
            id: CardId::parse("t"),
            name: "Test".into(),
            position,
            bat_hand: Hand::Right,
            throw_hand: Hand::Right,
            ratings,
            pitches: vec![],
        }
    }

    #[test]
    fn parse_metric_names_and_aliases() {
        assert_eq!("true_overall".parse(), Ok(ScoringMetric::TrueOverall));
        assert_eq!("vs-left".parse(), Ok(ScoringMetric::VsLeft));
        assert_eq!("VS RIGHT".parse(), Ok(ScoringMetric::VsRight));
        assert_eq!("ovr".parse(), Ok(ScoringMetric::TrueOverall));
        assert_eq!(
            "velocity".parse::<ScoringMetric>(),
            Err(ParseMetricError("velocity".into()))
        );
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for metric in ALL_METRICS {
            assert_eq!(metric.to_string().parse(), Ok(metric));
        }
    }

    #[test]
    fn hitter_direct_lookup() {
        let c = card(
            Position::FirstBase,
            Ratings {
                ovr: Some(85.0),
                situational_ovr: Some(80.0),
                ..Default::default()
            },
        );
        assert_eq!(hitter_score(&c, ScoringMetric::TrueOverall), 85.0);
        assert_eq!(hitter_score(&c, ScoringMetric::SituationalOverall), 80.0);
    }

    #[test]
    fn hitter_missing_metric_is_sentinel() {
        let c = card(Position::FirstBase, Ratings::default());
        for metric in ALL_METRICS {
            assert_eq!(hitter_score(&c, metric), MISSING_SCORE);
        }
    }

    #[test]
    fn genuine_zero_beats_missing() {
        let zero = card(
            Position::FirstBase,
            Ratings {
                ovr: Some(0.0),
                ..Default::default()
            },
        );
        let missing = card(Position::FirstBase, Ratings::default());
        assert!(
            hitter_score(&zero, ScoringMetric::TrueOverall)
                > hitter_score(&missing, ScoringMetric::TrueOverall)
        );
    }

    #[test]
    fn partial_composite_counts_absent_as_zero() {
        let c = card(
            Position::CenterField,
            Ratings {
                power_left: Some(80.0),
                ..Default::default()
            },
        );
        assert_eq!(hitter_score(&c, ScoringMetric::Power), 40.0);
    }

    #[test]
    fn platoon_prefers_direct_split_rating() {
        let c = card(
            Position::LeftField,
            Ratings {
                vs_left: Some(70.0),
                contact_left: Some(90.0),
                power_left: Some(90.0),
                contact_right: Some(60.0),
                power_right: Some(80.0),
                ..Default::default()
            },
        );
        assert_eq!(hitter_score(&c, ScoringMetric::VsLeft), 70.0);
        assert_eq!(hitter_score(&c, ScoringMetric::VsRight), 70.0);
        assert_eq!(platoon_balance(&c), 100.0);
    }

    #[test]
    fn pitcher_metric_fallback() {
        let c = card(
            Position::StartingPitcher,
            Ratings {
                ovr: Some(90.0),
                situational_ovr: Some(75.0),
                vs_left: Some(60.0),
                ..Default::default()
            },
        );
        assert_eq!(pitcher_score(&c, ScoringMetric::TrueOverall), 90.0);
        assert_eq!(pitcher_score(&c, ScoringMetric::VsLeft), 60.0);
        assert_eq!(pitcher_score(&c, ScoringMetric::VsRight), 0.0);
        assert_eq!(pitcher_score(&c, ScoringMetric::Power), 75.0);
        assert_eq!(pitcher_score(&c, ScoringMetric::Defense), 75.0);
        assert_eq!(card_score(&c, ScoringMetric::Bunting), 75.0);
    }
}
