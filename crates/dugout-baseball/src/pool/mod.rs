// Candidate pool: partitions cards into hitters by field position and
// pitchers by role.

pub mod loader;

use std::collections::HashMap;

use crate::model::card::Card;
use crate::model::position::{Position, FIELD_POSITIONS};

/// Borrowed view over an input card list, split by side.
///
/// Pool order is preserved everywhere: every list here keeps the order the
/// cards arrived in, which is what score ties fall back to.
#[derive(Debug, Clone)]
pub struct CardPool<'a> {
    /// All hitters in pool order, DH-only cards included.
    pub hitters: Vec<&'a Card>,
    /// Hitters keyed by their field position.
    pub by_position: HashMap<Position, Vec<&'a Card>>,
    /// Cards tagged SP.
    pub starters: Vec<&'a Card>,
    /// Cards tagged RP or CP.
    pub relievers: Vec<&'a Card>,
}

impl<'a> CardPool<'a> {
    pub fn new(cards: &'a [Card]) -> Self {
        let mut by_position: HashMap<Position, Vec<&'a Card>> =
            FIELD_POSITIONS.iter().map(|&p| (p, Vec::new())).collect();
        let mut hitters = Vec::new();
        let mut starters = Vec::new();
        let mut relievers = Vec::new();

        for card in cards {
            match card.position {
                Position::StartingPitcher => starters.push(card),
                pos if pos.is_reliever() => relievers.push(card),
                pos if pos.is_field() => {
                    hitters.push(card);
                    by_position.entry(pos).or_default().push(card);
                }
                // DH-only cards can bat or sit on the bench but never field.
                _ => hitters.push(card),
            }
        }

        CardPool {
            hitters,
            by_position,
            starters,
            relievers,
        }
    }

    /// Hitters eligible at `position`, in pool order.
    pub fn at(&self, position: Position) -> &[&'a Card] {
        self.by_position
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::{CardId, Hand, Ratings};

    fn card(id: &str, position: Position) -> Card {
        Card {
            id: CardId::parse(id),
            name: id.into(),
            position,
            bat_hand: Hand::Right,
            throw_hand: Hand::Right,
            ratings: Ratings::default(),
            pitches: vec![],
        }
    }

    #[test]
    fn partitions_by_side_and_position() {
        let cards = vec![
            card("c1", Position::Catcher),
            card("sp1", Position::StartingPitcher),
            card("rp1", Position::ReliefPitcher),
            card("cp1", Position::ClosingPitcher),
            card("c2", Position::Catcher),
            card("dh", Position::DesignatedHitter),
            card("lf", Position::LeftField),
        ];
        let pool = CardPool::new(&cards);

        assert_eq!(pool.hitters.len(), 4);
        assert_eq!(pool.starters.len(), 1);
        assert_eq!(pool.relievers.len(), 2);

        let catchers: Vec<&str> = pool.at(Position::Catcher).iter().map(|c| c.base_id()).collect();
        assert_eq!(catchers, vec!["c1", "c2"]);
        assert_eq!(pool.at(Position::LeftField).len(), 1);
        assert!(pool.at(Position::ShortStop).is_empty());
        assert!(pool.at(Position::StartingPitcher).is_empty());
    }
}
