// Bench selection: four specialist roles filled greedily from the hitters
// left over after the lineup, each with a fallback chain.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::card::{rating, Card};
use crate::scoring::{hitter_score, speed, ScoringMetric};
use crate::select::pick_best;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchRole {
    PinchRunner,
    DefensiveSub,
    VsLeftBat,
    VsRightBat,
}

/// Roles in the order they are filled and reported.
pub const BENCH_ROLES: [BenchRole; 4] = [
    BenchRole::PinchRunner,
    BenchRole::DefensiveSub,
    BenchRole::VsLeftBat,
    BenchRole::VsRightBat,
];

impl BenchRole {
    pub fn display_str(&self) -> &'static str {
        match self {
            BenchRole::PinchRunner => "Pinch Runner",
            BenchRole::DefensiveSub => "Defensive Sub",
            BenchRole::VsLeftBat => "Bat vs LHP",
            BenchRole::VsRightBat => "Bat vs RHP",
        }
    }
}

fn runner_score(card: &Card) -> f64 {
    0.6 * speed(card) + 0.4 * rating(card.ratings.baserunning_ability)
}

fn pick_for_role<'a>(
    role: BenchRole,
    hitters: &[&'a Card],
    used: &HashSet<&str>,
    metric: ScoringMetric,
) -> Option<&'a Card> {
    let any = |_: &Card| true;
    let by_metric = |c: &Card| hitter_score(c, metric);
    let defense = |c: &Card| hitter_score(c, ScoringMetric::Defense);

    match role {
        BenchRole::PinchRunner => pick_best(hitters, used, |c| c.position.is_outfield(), runner_score)
            .or_else(|| pick_best(hitters, used, any, speed))
            .or_else(|| pick_best(hitters, used, any, by_metric)),
        BenchRole::DefensiveSub => pick_best(hitters, used, |c| c.position.is_outfield(), defense)
            .or_else(|| pick_best(hitters, used, |c| c.position.is_infield(), defense))
            .or_else(|| pick_best(hitters, used, any, defense)),
        BenchRole::VsLeftBat => {
            pick_best(hitters, used, any, |c| hitter_score(c, ScoringMetric::VsLeft))
                .or_else(|| pick_best(hitters, used, any, by_metric))
        }
        BenchRole::VsRightBat => {
            pick_best(hitters, used, any, |c| hitter_score(c, ScoringMetric::VsRight))
                .or_else(|| pick_best(hitters, used, any, by_metric))
        }
    }
}

/// Fill the bench roles in order. `used` holds the starters' base
/// identities; each pick is added to it.
pub fn select_bench<'a>(
    hitters: &[&'a Card],
    used: &mut HashSet<&'a str>,
    metric: ScoringMetric,
) -> Vec<(BenchRole, &'a Card)> {
    let mut bench = Vec::with_capacity(BENCH_ROLES.len());
    for role in BENCH_ROLES {
        match pick_for_role(role, hitters, used, metric) {
            Some(card) => {
                debug!("bench {}: {}", role.display_str(), card.id);
                used.insert(card.base_id());
                bench.push((role, card));
            }
            None => warn!("no unused hitter left for bench role {}", role.display_str()),
        }
    }
    bench
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::{CardId, Hand, Ratings};
    use crate::model::position::Position;

    fn hitter(id: &str, position: Position, ratings: Ratings) -> Card {
        Card {
            id: CardId::parse(id),
            name: id.into(),
            position,
            bat_hand: Hand::Right,
            throw_hand: Hand::Right,
            ratings,
            pitches: vec![],
        }
    }

    fn refs(cards: &[Card]) -> Vec<&Card> {
        cards.iter().collect()
    }

    #[test]
    fn pinch_runner_prefers_fast_outfielder() {
        let cards = vec![
            hitter(
                "fast-ss",
                Position::ShortStop,
                Ratings {
                    speed: Some(99.0),
                    ..Default::default()
                },
            ),
            hitter(
                "quick-cf",
                Position::CenterField,
                Ratings {
                    speed: Some(80.0),
                    baserunning_ability: Some(70.0),
                    ..Default::default()
                },
            ),
        ];
        let hitters = refs(&cards);
        let mut used = HashSet::new();
        let bench = select_bench(&hitters, &mut used, ScoringMetric::TrueOverall);
        assert_eq!(bench[0].0, BenchRole::PinchRunner);
        assert_eq!(bench[0].1.base_id(), "quick-cf");
        // The infielder falls through to the defensive sub chain.
        assert_eq!(bench[1].0, BenchRole::DefensiveSub);
        assert_eq!(bench[1].1.base_id(), "fast-ss");
    }

    #[test]
    fn pinch_runner_falls_back_to_any_hitter_by_speed() {
        let cards = vec![
            hitter(
                "slow-1b",
                Position::FirstBase,
                Ratings {
                    speed: Some(20.0),
                    ..Default::default()
                },
            ),
            hitter(
                "quick-2b",
                Position::SecondBase,
                Ratings {
                    speed: Some(85.0),
                    ..Default::default()
                },
            ),
        ];
        let hitters = refs(&cards);
        let used = HashSet::new();
        let pick = pick_for_role(BenchRole::PinchRunner, &hitters, &used, ScoringMetric::Power);
        assert_eq!(pick.map(|c| c.base_id()), Some("quick-2b"));
    }

    #[test]
    fn defensive_sub_prefers_outfield_then_infield() {
        let defense = |v: f64| Ratings {
            fielding_ability: Some(v),
            arm_strength: Some(v),
            arm_accuracy: Some(v),
            reaction_time: Some(v),
            ..Default::default()
        };
        let cards = vec![
            hitter("glove-c", Position::Catcher, defense(95.0)),
            hitter("ok-rf", Position::RightField, defense(60.0)),
        ];
        let hitters = refs(&cards);
        let mut used = HashSet::new();
        let pick = pick_for_role(BenchRole::DefensiveSub, &hitters, &used, ScoringMetric::Power);
        assert_eq!(pick.map(|c| c.base_id()), Some("ok-rf"));

        used.insert("ok-rf");
        let pick = pick_for_role(BenchRole::DefensiveSub, &hitters, &used, ScoringMetric::Power);
        assert_eq!(pick.map(|c| c.base_id()), Some("glove-c"));
    }

    #[test]
    fn platoon_bats_use_split_scores() {
        let cards = vec![
            hitter(
                "lefty-killer",
                Position::FirstBase,
                Ratings {
                    vs_left: Some(90.0),
                    vs_right: Some(40.0),
                    ..Default::default()
                },
            ),
            hitter(
                "righty-killer",
                Position::FirstBase,
                Ratings {
                    vs_left: Some(40.0),
                    vs_right: Some(90.0),
                    ..Default::default()
                },
            ),
        ];
        let hitters = refs(&cards);
        let used = HashSet::new();
        let vl = pick_for_role(BenchRole::VsLeftBat, &hitters, &used, ScoringMetric::TrueOverall);
        let vr = pick_for_role(BenchRole::VsRightBat, &hitters, &used, ScoringMetric::TrueOverall);
        assert_eq!(vl.map(|c| c.base_id()), Some("lefty-killer"));
        assert_eq!(vr.map(|c| c.base_id()), Some("righty-killer"));
    }

    #[test]
    fn starters_and_shared_bases_excluded() {
        let cards = vec![
            hitter("starter|lf", Position::LeftField, Ratings::default()),
            hitter("starter|cf", Position::CenterField, Ratings::default()),
            hitter("bench", Position::RightField, Ratings::default()),
        ];
        let hitters = refs(&cards);
        let mut used: HashSet<&str> = HashSet::from(["starter"]);
        let bench = select_bench(&hitters, &mut used, ScoringMetric::TrueOverall);
        assert_eq!(bench.len(), 1);
        assert_eq!(bench[0].1.base_id(), "bench");
    }

    #[test]
    fn empty_pool_yields_empty_bench() {
        let hitters: Vec<&Card> = Vec::new();
        let mut used = HashSet::new();
        assert!(select_bench(&hitters, &mut used, ScoringMetric::TrueOverall).is_empty());
    }
}
