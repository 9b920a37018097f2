// Bullpen selection.
//
// Eight greedy role picks from a shortlist of the best relievers, then a
// diversity pass that guarantees two left-handers, then depth padding from
// the full relief pool.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::card::{rating, Card, Hand};
use crate::scoring::{pitcher_score, ScoringMetric};
use crate::select::lineup::{rank_desc, Scored};
use crate::select::pick_best;
use crate::select::synergy::pitch_mix_synergy;

pub const BULLPEN_SIZE: usize = 8;
pub const MIN_LEFTIES: usize = 2;

/// K/BF at which the strikeout term saturates.
const ELITE_K_RATE: f64 = 0.35;
/// BB/BF at which the walk term bottoms out.
const WALK_CEILING: f64 = 0.15;
/// Rescales synergy onto roughly the same 0-100 range as ratings.
const SYNERGY_SCALE: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BullpenRole {
    Closer,
    Setup,
    RightVelocity,
    LeftVelocity,
    RightControl,
    LeftControl,
    PitchMix,
    JunkPitch,
    Depth,
}

impl BullpenRole {
    pub fn display_str(&self) -> &'static str {
        match self {
            BullpenRole::Closer => "Closer",
            BullpenRole::Setup => "Setup",
            BullpenRole::RightVelocity => "RHP Velocity",
            BullpenRole::LeftVelocity => "LHP Velocity",
            BullpenRole::RightControl => "RHP Control",
            BullpenRole::LeftControl => "LHP Control",
            BullpenRole::PitchMix => "Pitch Mix",
            BullpenRole::JunkPitch => "Junk Pitch",
            BullpenRole::Depth => "Depth",
        }
    }
}

/// One bullpen slot. `score` is the plain pitcher score, not the role
/// composite used to pick it.
#[derive(Debug, Clone, Copy)]
pub struct BullpenPick<'a> {
    pub role: BullpenRole,
    pub card: &'a Card,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Composite terms
// ---------------------------------------------------------------------------

pub fn strikeout_term(card: &Card) -> f64 {
    (rating(card.ratings.k_per_bf) / ELITE_K_RATE * 100.0).min(100.0)
}

/// Zero when the walk rate is unknown.
pub fn walk_term(card: &Card) -> f64 {
    let bb = rating(card.ratings.bb_per_bf);
    if bb > 0.0 {
        (1.0 - bb / WALK_CEILING).clamp(0.0, 1.0) * 100.0
    } else {
        0.0
    }
}

/// Fastest fastball-family pitch, or 0 without one.
pub fn primary_fastball(card: &Card) -> f64 {
    card.pitches
        .iter()
        .filter(|p| p.kind().is_fastball_family())
        .map(|p| p.speed())
        .fold(0.0, f64::max)
}

pub fn velocity_term(card: &Card) -> f64 {
    0.6 * primary_fastball(card) + 0.4 * rating(card.ratings.pitch_velocity)
}

fn throws_junk(card: &Card) -> bool {
    card.pitch_types().any(|t| t.is_junk())
}

fn throws(hand: Hand) -> impl Fn(&Card) -> bool {
    move |c: &Card| c.throw_hand == hand
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

struct RoleScorer {
    metric: ScoringMetric,
}

impl RoleScorer {
    fn score(&self, c: &Card) -> f64 {
        pitcher_score(c, self.metric)
    }

    fn closer(&self, c: &Card) -> f64 {
        0.40 * self.score(c)
            + 0.25 * strikeout_term(c)
            + 0.20 * velocity_term(c)
            + 0.15 * rating(c.ratings.pitching_clutch)
    }

    fn setup(&self, c: &Card) -> f64 {
        0.30 * self.score(c)
            + 0.25 * strikeout_term(c)
            + 0.30 * velocity_term(c)
            + 0.15 * rating(c.ratings.pitching_clutch)
    }

    fn velocity(&self, c: &Card) -> f64 {
        0.60 * velocity_term(c) + 0.30 * strikeout_term(c) + 0.10 * self.score(c)
    }

    fn control(&self, c: &Card) -> f64 {
        0.40 * rating(c.ratings.pitch_control)
            + 0.25 * walk_term(c)
            + 0.15 * rating(c.ratings.pitch_movement)
            + 0.20 * self.score(c)
    }

    fn pitch_mix(&self, c: &Card) -> f64 {
        0.50 * (pitch_mix_synergy(c) * SYNERGY_SCALE)
            + 0.30 * self.score(c)
            + 0.20 * rating(c.ratings.pitch_control)
    }

    fn junk(&self, c: &Card) -> f64 {
        0.60 * self.score(c) + 0.40 * rating(c.ratings.pitch_movement)
    }
}

fn pick_role<'a>(
    role: BullpenRole,
    shortlist: &[&'a Card],
    used: &HashSet<&str>,
    scorer: &RoleScorer,
) -> Option<&'a Card> {
    let any = |_: &Card| true;
    match role {
        BullpenRole::Closer => pick_best(shortlist, used, any, |c| scorer.closer(c)),
        BullpenRole::Setup => pick_best(shortlist, used, any, |c| scorer.setup(c)),
        BullpenRole::RightVelocity => {
            pick_best(shortlist, used, throws(Hand::Right), |c| scorer.velocity(c))
        }
        BullpenRole::LeftVelocity => {
            pick_best(shortlist, used, throws(Hand::Left), |c| scorer.velocity(c))
        }
        BullpenRole::RightControl => {
            pick_best(shortlist, used, throws(Hand::Right), |c| scorer.control(c))
        }
        BullpenRole::LeftControl => {
            pick_best(shortlist, used, throws(Hand::Left), |c| scorer.control(c))
        }
        BullpenRole::PitchMix => pick_best(shortlist, used, any, |c| scorer.pitch_mix(c)),
        BullpenRole::JunkPitch => pick_best(shortlist, used, throws_junk, |c| scorer.junk(c))
            .or_else(|| pick_best(shortlist, used, any, |c| scorer.score(c))),
        BullpenRole::Depth => None,
    }
}

const ROLE_ORDER: [BullpenRole; BULLPEN_SIZE] = [
    BullpenRole::Closer,
    BullpenRole::Setup,
    BullpenRole::RightVelocity,
    BullpenRole::LeftVelocity,
    BullpenRole::RightControl,
    BullpenRole::LeftControl,
    BullpenRole::PitchMix,
    BullpenRole::JunkPitch,
];

/// Add left-handers until [`MIN_LEFTIES`] are present, best pitcher score
/// first from `pool`. Each takes a vacant left-handed role, or Depth when
/// both are held. Runs before padding, so slots are always open: a full set
/// of role picks already holds two left-handed specialists.
fn ensure_lefties<'a>(
    picks: &mut Vec<BullpenPick<'a>>,
    pool: &[Scored<'a>],
    used: &mut HashSet<&'a str>,
) {
    while picks.len() < BULLPEN_SIZE {
        let lefties = picks.iter().filter(|p| p.card.throw_hand == Hand::Left).count();
        if lefties >= MIN_LEFTIES {
            return;
        }
        let Some(candidate) = pool
            .iter()
            .find(|s| s.card.throw_hand == Hand::Left && !used.contains(s.card.base_id()))
        else {
            return;
        };
        let role = [BullpenRole::LeftVelocity, BullpenRole::LeftControl]
            .into_iter()
            .find(|r| !picks.iter().any(|p| p.role == *r))
            .unwrap_or(BullpenRole::Depth);
        debug!(
            "bullpen diversity: {} added as {}",
            candidate.card.id,
            role.display_str()
        );
        used.insert(candidate.card.base_id());
        picks.push(BullpenPick {
            role,
            card: candidate.card,
            score: candidate.score,
        });
    }
}

/// Build the bullpen from `relievers`, skipping base identities in
/// `excluded`. Only the top `shortlist_size` relievers by pitcher score are
/// considered for role picks; repair and padding draw on the whole pool.
pub fn select_bullpen<'a>(
    relievers: &[&'a Card],
    excluded: &HashSet<&str>,
    metric: ScoringMetric,
    shortlist_size: usize,
) -> Vec<BullpenPick<'a>> {
    let scorer = RoleScorer { metric };
    let eligible: Vec<&'a Card> = relievers
        .iter()
        .copied()
        .filter(|c| !excluded.contains(c.base_id()))
        .collect();
    let ranked = rank_desc(&eligible, |c| scorer.score(c));
    // At least one candidate so a non-empty pool always yields a closer.
    let shortlist: Vec<&'a Card> = ranked
        .iter()
        .take(shortlist_size.max(1))
        .map(|s| s.card)
        .collect();

    let mut used: HashSet<&'a str> = HashSet::new();
    let mut picks: Vec<BullpenPick<'a>> = Vec::with_capacity(BULLPEN_SIZE);
    for role in ROLE_ORDER {
        match pick_role(role, &shortlist, &used, &scorer) {
            Some(card) => {
                debug!("bullpen {}: {}", role.display_str(), card.id);
                used.insert(card.base_id());
                picks.push(BullpenPick {
                    role,
                    card,
                    score: scorer.score(card),
                });
            }
            None => debug!("bullpen {}: no eligible reliever", role.display_str()),
        }
    }

    ensure_lefties(&mut picks, &ranked, &mut used);

    for s in &ranked {
        if picks.len() >= BULLPEN_SIZE {
            break;
        }
        if used.insert(s.card.base_id()) {
            picks.push(BullpenPick {
                role: BullpenRole::Depth,
                card: s.card,
                score: s.score,
            });
        }
    }

    let lefties = picks.iter().filter(|p| p.card.throw_hand == Hand::Left).count();
    if picks.len() < BULLPEN_SIZE {
        warn!("bullpen short-handed: {} of {} filled", picks.len(), BULLPEN_SIZE);
    }
    if lefties < MIN_LEFTIES {
        warn!("bullpen has only {} left-handed relievers", lefties);
    }
    info!(
        "bullpen: {} relievers ({} left-handed) from {} eligible",
        picks.len(),
        lefties,
        eligible.len()
    );
    picks
}
