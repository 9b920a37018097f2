// Starting rotation: the top starters by pitcher score, one card per player.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::model::card::Card;
use crate::scoring::{pitcher_score, ScoringMetric};
use crate::select::lineup::{rank_desc, Scored};

pub const ROTATION_SIZE: usize = 5;

/// Pick up to [`ROTATION_SIZE`] starters. Base identities in `excluded`
/// are skipped.
pub fn select_rotation<'a>(
    starters: &[&'a Card],
    excluded: &HashSet<&str>,
    metric: ScoringMetric,
) -> Vec<Scored<'a>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let rotation: Vec<Scored<'a>> = rank_desc(starters, |c| pitcher_score(c, metric))
        .into_iter()
        .filter(|s| !excluded.contains(s.card.base_id()))
        .filter(|s| seen.insert(s.card.base_id()))
        .take(ROTATION_SIZE)
        .collect();

    if rotation.len() < ROTATION_SIZE {
        warn!(
            "only {} distinct starters available for a {}-man rotation",
            rotation.len(),
            ROTATION_SIZE
        );
    }
    info!(
        "rotation: {}",
        rotation
            .iter()
            .map(|s| s.card.id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    rotation
}
