// Roster stages: lineup search, batting order, bench, rotation and bullpen.

pub mod batting_order;
pub mod bench;
pub mod bullpen;
pub mod lineup;
pub mod rotation;
pub mod synergy;

use std::collections::HashSet;

use crate::model::card::Card;

/// Highest `score` among cards passing `eligible` whose base identity is not
/// in `used`. The first of equal scores wins, so ties keep input order.
pub fn pick_best<'a>(
    cards: &[&'a Card],
    used: &HashSet<&str>,
    eligible: impl Fn(&Card) -> bool,
    score: impl Fn(&Card) -> f64,
) -> Option<&'a Card> {
    let mut best: Option<(&'a Card, f64)> = None;
    for &card in cards {
        if used.contains(card.base_id()) || !eligible(card) {
            continue;
        }
        let value = score(card);
        if best.map_or(true, |(_, b)| value > b) {
            best = Some((card, value));
        }
    }
    best.map(|(card, _)| card)
}
