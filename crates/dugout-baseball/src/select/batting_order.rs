// Batting order construction.
//
// Slots are filled one at a time from hand-tuned fitness blends that ignore
// the optimizer's metric. After the leadoff pick, each slot prefers hitters
// whose bat hand does not match the previous batter's. A repair pass then
// swaps away any same-handed neighbours it can.

use std::collections::HashSet;

use tracing::debug;

use crate::model::card::{Card, Hand};
use crate::model::position::Position;
use crate::scoring::{contact, hit_skill, platoon_balance, power, speed};

/// Bonus added to a switch-hitter's two-hole fitness.
pub const SWITCH_HITTER_BONUS: f64 = 5.0;

/// A hitter in the order, tagged with the lineup position they start at.
#[derive(Debug, Clone, Copy)]
pub struct OrderedHitter<'a> {
    pub card: &'a Card,
    pub lineup_position: Position,
}

// ---------------------------------------------------------------------------
// Slot fitness
// ---------------------------------------------------------------------------

pub fn leadoff_fitness(card: &Card) -> f64 {
    0.45 * contact(card) + 0.35 * speed(card) + 0.10 * power(card) + 0.10 * platoon_balance(card)
}

pub fn two_hole_fitness(card: &Card) -> f64 {
    let bonus = if card.bat_hand == Hand::Switch {
        SWITCH_HITTER_BONUS
    } else {
        0.0
    };
    0.50 * hit_skill(card) + 0.25 * speed(card) + 0.25 * platoon_balance(card) + bonus
}

pub fn three_hole_fitness(card: &Card) -> f64 {
    0.55 * power(card) + 0.45 * hit_skill(card)
}

pub fn cleanup_fitness(card: &Card) -> f64 {
    0.70 * power(card) + 0.30 * hit_skill(card)
}

/// Fitness function for a 1-based lineup slot.
fn fitness_for_slot(slot: usize) -> fn(&Card) -> f64 {
    match slot {
        1 => leadoff_fitness,
        2 => two_hole_fitness,
        3 => three_hole_fitness,
        4 => cleanup_fitness,
        _ => hit_skill,
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Whether two adjacent hitters break the alternation rule.
pub fn same_handed(a: &Card, b: &Card) -> bool {
    a.bat_hand.conflicts_with(b.bat_hand)
}

/// Best remaining hitter for `slot`, preferring ones that do not share the
/// previous batter's hand. Ties keep input order.
fn pick_for_slot<'a>(
    remaining: &[OrderedHitter<'a>],
    previous: Option<&Card>,
    slot: usize,
) -> Option<usize> {
    let fitness = fitness_for_slot(slot);
    let best_among = |allowed: &dyn Fn(&Card) -> bool| -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, hitter) in remaining.iter().enumerate() {
            if !allowed(hitter.card) {
                continue;
            }
            let value = fitness(hitter.card);
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((i, value));
            }
        }
        best.map(|(i, _)| i)
    };

    match previous {
        Some(prev) => best_among(&|c| !same_handed(prev, c)).or_else(|| best_among(&|_| true)),
        None => best_among(&|_| true),
    }
}

/// Build the batting order from the starters (fielders plus DH).
pub fn build_batting_order<'a>(starters: &[OrderedHitter<'a>]) -> Vec<OrderedHitter<'a>> {
    let mut seen = HashSet::new();
    let mut remaining: Vec<OrderedHitter<'a>> = starters
        .iter()
        .copied()
        .filter(|h| seen.insert(h.card.base_id()))
        .collect();

    let mut order: Vec<OrderedHitter<'a>> = Vec::with_capacity(remaining.len());
    let mut slot = 1;
    while !remaining.is_empty() {
        let previous = order.last().map(|h| h.card);
        let Some(index) = pick_for_slot(&remaining, previous, slot) else {
            break;
        };
        let picked = remaining.remove(index);
        debug!(
            "batting slot {}: {} ({})",
            slot, picked.card.id, picked.lineup_position
        );
        order.push(picked);
        slot += 1;
    }

    repair_alternation(&mut order);
    order
}

// ---------------------------------------------------------------------------
// Repair
// ---------------------------------------------------------------------------

/// For each same-handed neighbour pair, swap the second hitter with the
/// nearest later non-switch hitter who does not clash with the first one,
/// provided the swap does not raise the order's total violation count. Pairs
/// further down are left to later iterations of the scan. Switch-hitters
/// never move. Returns the number of swaps made.
pub fn repair_alternation(order: &mut [OrderedHitter<'_>]) -> usize {
    let mut swaps = 0;
    for i in 0..order.len().saturating_sub(1) {
        if !same_handed(order[i].card, order[i + 1].card) {
            continue;
        }
        let before = count_violations(order);
        for j in (i + 2)..order.len() {
            if order[j].card.bat_hand == Hand::Switch || same_handed(order[i].card, order[j].card) {
                continue;
            }
            order.swap(i + 1, j);
            if count_violations(order) <= before {
                debug!("batting order repair: swapped slots {} and {}", i + 2, j + 1);
                swaps += 1;
                break;
            }
            order.swap(i + 1, j);
        }
    }
    swaps
}

/// Number of adjacent same-handed pairs left in an order.
pub fn count_violations(order: &[OrderedHitter<'_>]) -> usize {
    order
        .windows(2)
        .filter(|pair| same_handed(pair[0].card, pair[1].card))
        .count()
}
