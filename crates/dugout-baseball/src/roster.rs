// Roster assembly: runs every selection stage over one card pool and
// packages the owned, serializable result.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use dugout_core::config::{EngineConfig, DEFAULT_BULLPEN_SHORTLIST, DEFAULT_SHORTLIST_CAP};

use crate::model::card::Card;
use crate::model::position::Position;
use crate::pool::CardPool;
use crate::scoring::ScoringMetric;
use crate::select::batting_order::{build_batting_order, OrderedHitter};
use crate::select::bench::{select_bench, BenchRole};
use crate::select::bullpen::{select_bullpen, BullpenRole};
use crate::select::lineup::optimize_lineup;
use crate::select::rotation::select_rotation;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunables for one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Candidates kept per field position in the lineup search.
    pub shortlist_cap: usize,
    /// Relievers considered for the bullpen role picks.
    pub bullpen_shortlist: usize,
    /// Allow a player on the hitter side to also pitch.
    pub allow_two_way: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            shortlist_cap: DEFAULT_SHORTLIST_CAP,
            bullpen_shortlist: DEFAULT_BULLPEN_SHORTLIST,
            allow_two_way: true,
        }
    }
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        EngineOptions {
            shortlist_cap: config.shortlist_cap,
            bullpen_shortlist: config.bullpen_shortlist,
            allow_two_way: config.allow_two_way,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub position: Position,
    pub card: Card,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub card: Card,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingSlot {
    /// 1-based.
    pub slot: usize,
    /// Field position, or DH.
    pub lineup_position: Position,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchAssignment {
    pub role: BenchRole,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BullpenEntry {
    pub role: BullpenRole,
    pub card: Card,
    pub score: f64,
}

/// A complete roster for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterResult {
    pub metric: ScoringMetric,
    pub lineup: Vec<FieldAssignment>,
    pub designated_hitter: Option<RosterEntry>,
    pub batting_order: Vec<BattingSlot>,
    pub bench: Vec<BenchAssignment>,
    pub rotation: Vec<RosterEntry>,
    pub bullpen: Vec<BullpenEntry>,
    /// Fielder scores plus the DH score.
    pub lineup_score: f64,
}

/// A structural problem found by [`RosterResult::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterViolation {
    #[error("player '{base}' holds more than one hitter-side slot")]
    DuplicateHitter { base: String },
    #[error("player '{base}' holds more than one pitcher-side slot")]
    DuplicatePitcher { base: String },
    #[error("bullpen has {count} closers, expected exactly one")]
    CloserCount { count: usize },
    #[error("card '{card}' assigned to {position} but plays {actual}")]
    WrongPosition {
        card: String,
        position: Position,
        actual: Position,
    },
    #[error("batting order does not match the starting nine")]
    BattingOrderMismatch,
}

fn duplicates<'a>(bases: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for base in bases {
        if !seen.insert(base) && !dupes.iter().any(|d: &String| d == base) {
            dupes.push(base.to_string());
        }
    }
    dupes
}

impl RosterResult {
    /// Base identities of the starting nine.
    fn starter_bases(&self) -> impl Iterator<Item = &str> {
        self.lineup
            .iter()
            .map(|a| a.card.base_id())
            .chain(self.designated_hitter.iter().map(|d| d.card.base_id()))
    }

    /// Re-check the structural invariants. An empty list means the roster
    /// is consistent.
    pub fn validate(&self) -> Vec<RosterViolation> {
        let mut violations = Vec::new();

        let hitter_side = self
            .starter_bases()
            .chain(self.bench.iter().map(|b| b.card.base_id()));
        for base in duplicates(hitter_side) {
            violations.push(RosterViolation::DuplicateHitter { base });
        }

        let pitcher_side = self
            .rotation
            .iter()
            .map(|r| r.card.base_id())
            .chain(self.bullpen.iter().map(|b| b.card.base_id()));
        for base in duplicates(pitcher_side) {
            violations.push(RosterViolation::DuplicatePitcher { base });
        }

        let closers = self
            .bullpen
            .iter()
            .filter(|b| b.role == BullpenRole::Closer)
            .count();
        if !self.bullpen.is_empty() && closers != 1 {
            violations.push(RosterViolation::CloserCount { count: closers });
        }

        for assignment in &self.lineup {
            if assignment.card.position != assignment.position {
                violations.push(RosterViolation::WrongPosition {
                    card: assignment.card.id.to_string(),
                    position: assignment.position,
                    actual: assignment.card.position,
                });
            }
        }

        let starters: HashSet<&str> = self.starter_bases().collect();
        let batters: HashSet<&str> = self.batting_order.iter().map(|s| s.card.base_id()).collect();
        if starters != batters || batters.len() != self.batting_order.len() {
            violations.push(RosterViolation::BattingOrderMismatch);
        }

        violations
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build a roster from `cards` under `metric`. Never fails: thin pools
/// produce partially staffed results.
pub fn build_roster(cards: &[Card], metric: ScoringMetric, options: &EngineOptions) -> RosterResult {
    let pool = CardPool::new(cards);
    info!(
        "building roster ({}): {} hitters, {} starters, {} relievers",
        metric,
        pool.hitters.len(),
        pool.starters.len(),
        pool.relievers.len()
    );

    let lineup = optimize_lineup(&pool, metric, options.shortlist_cap);

    let starters: Vec<OrderedHitter<'_>> = lineup
        .fielders
        .iter()
        .map(|(position, s)| OrderedHitter {
            card: s.card,
            lineup_position: *position,
        })
        .chain(lineup.designated_hitter.map(|dh| OrderedHitter {
            card: dh.card,
            lineup_position: Position::DesignatedHitter,
        }))
        .collect();
    let order = build_batting_order(&starters);

    let mut hitter_bases = lineup.used_bases();
    let bench = select_bench(&pool.hitters, &mut hitter_bases, metric);

    let mut pitcher_excluded: HashSet<&str> = if options.allow_two_way {
        HashSet::new()
    } else {
        hitter_bases.clone()
    };
    let rotation = select_rotation(&pool.starters, &pitcher_excluded, metric);
    pitcher_excluded.extend(rotation.iter().map(|s| s.card.base_id()));
    let bullpen = select_bullpen(
        &pool.relievers,
        &pitcher_excluded,
        metric,
        options.bullpen_shortlist,
    );

    let result = RosterResult {
        metric,
        lineup: lineup
            .fielders
            .iter()
            .map(|(position, s)| FieldAssignment {
                position: *position,
                card: s.card.clone(),
                score: s.score,
            })
            .collect(),
        designated_hitter: lineup.designated_hitter.map(|dh| RosterEntry {
            card: dh.card.clone(),
            score: dh.score,
        }),
        batting_order: order
            .iter()
            .enumerate()
            .map(|(i, h)| BattingSlot {
                slot: i + 1,
                lineup_position: h.lineup_position,
                card: h.card.clone(),
            })
            .collect(),
        bench: bench
            .iter()
            .map(|(role, card)| BenchAssignment {
                role: *role,
                card: (*card).clone(),
            })
            .collect(),
        rotation: rotation
            .iter()
            .map(|s| RosterEntry {
                card: s.card.clone(),
                score: s.score,
            })
            .collect(),
        bullpen: bullpen
            .iter()
            .map(|p| BullpenEntry {
                role: p.role,
                card: p.card.clone(),
                score: p.score,
            })
            .collect(),
        lineup_score: lineup.total_score(),
    };

    info!(
        "roster built: {} fielders, {} batting, {} bench, {} rotation, {} bullpen, lineup score {:.2}",
        result.lineup.len(),
        result.batting_order.len(),
        result.bench.len(),
        result.rotation.len(),
        result.bullpen.len(),
        result.lineup_score
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::{CardId, Hand, Ratings};
    use crate::model::position::FIELD_POSITIONS;

    fn card(id: &str, position: Position, ovr: f64) -> Card {
        Card {
            id: CardId::parse(id),
            name: id.into(),
            position,
            bat_hand: Hand::Right,
            throw_hand: Hand::Right,
            ratings: Ratings {
                ovr: Some(ovr),
                ..Default::default()
            },
            pitches: vec![],
        }
    }

    #[test]
    fn options_from_config() {
        let config = EngineConfig {
            metric: "power".into(),
            shortlist_cap: 6,
            bullpen_shortlist: 20,
            allow_two_way: false,
        };
        let options = EngineOptions::from(&config);
        assert_eq!(options.shortlist_cap, 6);
        assert_eq!(options.bullpen_shortlist, 20);
        assert!(!options.allow_two_way);
        assert_eq!(EngineOptions::default().shortlist_cap, 14);
    }

    #[test]
    fn empty_pool_builds_empty_roster() {
        let result = build_roster(&[], ScoringMetric::TrueOverall, &EngineOptions::default());
        assert!(result.lineup.is_empty());
        assert!(result.designated_hitter.is_none());
        assert!(result.batting_order.is_empty());
        assert!(result.bullpen.is_empty());
        assert_eq!(result.lineup_score, 0.0);
        assert!(result.validate().is_empty());
    }

    #[test]
    fn two_way_player_excluded_when_disallowed() {
        let mut cards: Vec<Card> = FIELD_POSITIONS
            .iter()
            .map(|&p| card(&format!("{p}-1"), p, 60.0))
            .collect();
        cards[0] = card("ohtani|bat", Position::Catcher, 99.0);
        cards.push(card("ohtani|arm", Position::StartingPitcher, 99.0));
        cards.push(card("backup-sp", Position::StartingPitcher, 50.0));

        let allowed = build_roster(&cards, ScoringMetric::TrueOverall, &EngineOptions::default());
        assert_eq!(allowed.rotation[0].card.base_id(), "ohtani");

        let options = EngineOptions {
            allow_two_way: false,
            ..EngineOptions::default()
        };
        let strict = build_roster(&cards, ScoringMetric::TrueOverall, &options);
        let rotation: Vec<&str> = strict.rotation.iter().map(|r| r.card.base_id()).collect();
        assert_eq!(rotation, vec!["backup-sp"]);
    }

    #[test]
    fn validate_flags_tampered_results() {
        let cards: Vec<Card> = FIELD_POSITIONS
            .iter()
            .map(|&p| card(&format!("{p}-1"), p, 60.0))
            .chain([card("rp1", Position::ReliefPitcher, 70.0)])
            .collect();
        let mut result = build_roster(&cards, ScoringMetric::TrueOverall, &EngineOptions::default());
        assert!(result.validate().is_empty());

        result.bullpen[0].role = BullpenRole::Depth;
        result.bench.push(BenchAssignment {
            role: BenchRole::PinchRunner,
            card: result.lineup[0].card.clone(),
        });
        result.batting_order.pop();
        let violations = result.validate();
        assert!(violations.contains(&RosterViolation::CloserCount { count: 0 }));
        assert!(violations.contains(&RosterViolation::DuplicateHitter { base: "C-1".into() }));
        assert!(violations.contains(&RosterViolation::BattingOrderMismatch));
    }

    #[test]
    fn result_serializes_to_json() {
        let cards = vec![card("ss", Position::ShortStop, 70.0)];
        let result = build_roster(&cards, ScoringMetric::VsLeft, &EngineOptions::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metric"], "vs_left");
        assert_eq!(json["lineup"][0]["position"], "SS");
        assert_eq!(json["batting_order"][0]["slot"], 1);
    }
}
