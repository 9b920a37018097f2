// Fielder and DH assignment.
//
// Branch-and-bound over per-position shortlists. Each position keeps only its
// top `shortlist_cap` candidates, positions are searched scarcest-first, and a
// subtree is cut as soon as its optimistic bound cannot beat the best complete
// assignment seen so far. The DH is picked afterwards as the best unused
// hitter in the whole pool.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::model::card::Card;
use crate::model::position::{Position, FIELD_POSITIONS};
use crate::pool::CardPool;
use crate::scoring::{hitter_score, ScoringMetric};

/// A card paired with its score under the active metric.
#[derive(Debug, Clone, Copy)]
pub struct Scored<'a> {
    pub card: &'a Card,
    pub score: f64,
}

/// Outcome of the fielder search plus the DH pick.
#[derive(Debug, Clone)]
pub struct LineupSolution<'a> {
    /// Filled field positions in canonical order. Positions that could not
    /// be staffed are absent.
    pub fielders: Vec<(Position, Scored<'a>)>,
    pub designated_hitter: Option<Scored<'a>>,
    /// Number of search nodes expanded, for diagnostics.
    pub nodes_visited: u64,
}

impl<'a> LineupSolution<'a> {
    pub fn fielder_score(&self) -> f64 {
        self.fielders.iter().map(|(_, s)| s.score).sum()
    }

    /// Fielders plus DH.
    pub fn total_score(&self) -> f64 {
        self.fielder_score() + self.designated_hitter.map_or(0.0, |dh| dh.score)
    }

    /// Base identities of every starter, DH included.
    pub fn used_bases(&self) -> HashSet<&'a str> {
        self.fielders
            .iter()
            .map(|(_, s)| s.card.base_id())
            .chain(self.designated_hitter.map(|dh| dh.card.base_id()))
            .collect()
    }
}

/// Stable sort by score, best first. Equal scores keep pool order.
pub fn rank_desc<'a>(cards: &[&'a Card], score: impl Fn(&Card) -> f64) -> Vec<Scored<'a>> {
    let mut ranked: Vec<Scored<'a>> = cards
        .iter()
        .map(|&card| Scored {
            card,
            score: score(card),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

// ---------------------------------------------------------------------------
// Shortlists
// ---------------------------------------------------------------------------

/// One position's capped candidate list, best first.
#[derive(Debug, Clone)]
pub struct Shortlist<'a> {
    pub position: Position,
    pub candidates: Vec<Scored<'a>>,
}

/// Build every position's shortlist and order them scarcest-first. Ties in
/// size keep canonical field order.
pub fn build_shortlists<'a>(
    pool: &CardPool<'a>,
    metric: ScoringMetric,
    shortlist_cap: usize,
) -> Vec<Shortlist<'a>> {
    let mut shortlists: Vec<Shortlist<'a>> = FIELD_POSITIONS
        .iter()
        .map(|&position| {
            let mut candidates = rank_desc(pool.at(position), |c| hitter_score(c, metric));
            candidates.truncate(shortlist_cap);
            Shortlist {
                position,
                candidates,
            }
        })
        .collect();
    shortlists.sort_by_key(|s| s.candidates.len());
    shortlists
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Depth-first search state. `used` holds the base identities on the active
/// path only and is restored on backtrack.
///
/// Assignments compare by filled positions first, then total score, so a
/// position is only left empty when staffing it would cost another one.
struct Search<'a, 's> {
    shortlists: &'s [Shortlist<'a>],
    used: HashSet<&'a str>,
    current: Vec<Option<usize>>,
    best: Vec<Option<usize>>,
    best_filled: usize,
    best_score: f64,
    nodes: u64,
}

impl<'a, 's> Search<'a, 's> {
    fn new(shortlists: &'s [Shortlist<'a>]) -> Self {
        Search {
            shortlists,
            used: HashSet::new(),
            current: vec![None; shortlists.len()],
            best: vec![None; shortlists.len()],
            best_filled: 0,
            best_score: f64::NEG_INFINITY,
            nodes: 0,
        }
    }

    /// Optimistic (filled, score) for the subtree below `depth`: every
    /// remaining position takes its best candidate not on the active path.
    /// A completion filling all of those positions scores at most the sum of
    /// their best candidates, and one filling fewer loses on the first key,
    /// so negative scores are summed as they are.
    fn upper_bound(&self, depth: usize, filled: usize, running: f64) -> (usize, f64) {
        self.shortlists[depth..]
            .iter()
            .filter_map(|list| {
                list.candidates
                    .iter()
                    .find(|c| !self.used.contains(c.card.base_id()))
            })
            .fold((filled, running), |(f, s), c| (f + 1, s + c.score))
    }

    fn beats_best(&self, filled: usize, score: f64) -> bool {
        filled > self.best_filled || (filled == self.best_filled && score > self.best_score)
    }

    fn descend(&mut self, depth: usize, filled: usize, running: f64) {
        self.nodes += 1;
        if depth == self.shortlists.len() {
            if self.beats_best(filled, running) {
                self.best_filled = filled;
                self.best_score = running;
                self.best.clone_from(&self.current);
            }
            return;
        }
        let (bound_filled, bound_score) = self.upper_bound(depth, filled, running);
        if !self.beats_best(bound_filled, bound_score) {
            return;
        }

        let shortlists = self.shortlists;
        for (index, candidate) in shortlists[depth].candidates.iter().enumerate() {
            let base = candidate.card.base_id();
            if self.used.contains(base) {
                continue;
            }
            self.used.insert(base);
            self.current[depth] = Some(index);
            self.descend(depth + 1, filled + 1, running + candidate.score);
            self.current[depth] = None;
            self.used.remove(base);
        }

        // Leaving the position empty is tried last.
        self.descend(depth + 1, filled, running);
    }
}

/// Solve the fielder assignment over prepared shortlists. Returns the chosen
/// candidate per shortlist (same order as the input) and the node count.
pub fn solve_shortlists<'a>(shortlists: &[Shortlist<'a>]) -> (Vec<Option<Scored<'a>>>, u64) {
    let mut search = Search::new(shortlists);
    search.descend(0, 0, 0.0);
    let picks = shortlists
        .iter()
        .zip(&search.best)
        .map(|(list, pick)| pick.map(|i| list.candidates[i]))
        .collect();
    (picks, search.nodes)
}

/// Highest-scoring hitter whose base identity is not in `used`. Ties keep
/// pool order.
pub fn pick_designated_hitter<'a>(
    hitters: &[&'a Card],
    used: &HashSet<&str>,
    metric: ScoringMetric,
) -> Option<Scored<'a>> {
    let mut best: Option<Scored<'a>> = None;
    for &card in hitters {
        if used.contains(card.base_id()) {
            continue;
        }
        let score = hitter_score(card, metric);
        if best.map_or(true, |b| score > b.score) {
            best = Some(Scored { card, score });
        }
    }
    best
}

/// Assign the eight field positions and the DH.
pub fn optimize_lineup<'a>(
    pool: &CardPool<'a>,
    metric: ScoringMetric,
    shortlist_cap: usize,
) -> LineupSolution<'a> {
    let shortlists = build_shortlists(pool, metric, shortlist_cap);
    debug!(
        "lineup search order: {}",
        shortlists
            .iter()
            .map(|s| format!("{}({})", s.position, s.candidates.len()))
            .collect::<Vec<_>>()
            .join(" ")
    );

    let (picks, nodes_visited) = solve_shortlists(&shortlists);

    let mut fielders: Vec<(Position, Scored<'a>)> = shortlists
        .iter()
        .zip(picks)
        .filter_map(|(list, pick)| pick.map(|p| (list.position, p)))
        .collect();
    fielders.sort_by_key(|(position, _)| position.field_index());

    for list in &shortlists {
        if !fielders.iter().any(|(p, _)| *p == list.position) {
            warn!("no eligible candidate for {}; slot left empty", list.position);
        }
    }

    let used: HashSet<&str> = fielders.iter().map(|(_, s)| s.card.base_id()).collect();
    let designated_hitter = pick_designated_hitter(&pool.hitters, &used, metric);
    if designated_hitter.is_none() {
        warn!("no unused hitter left for DH");
    }

    let solution = LineupSolution {
        fielders,
        designated_hitter,
        nodes_visited,
    };
    info!(
        "lineup optimized: {} fielders, DH {}, total score {:.2} ({} nodes)",
        solution.fielders.len(),
        if solution.designated_hitter.is_some() { "set" } else { "missing" },
        solution.total_score(),
        nodes_visited
    );
    solution
}
