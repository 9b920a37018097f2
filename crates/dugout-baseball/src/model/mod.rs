// Card model: identity, positions, ratings and pitch types.

pub mod card;
pub mod pitch;
pub mod position;
