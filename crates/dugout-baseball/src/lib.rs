// Library root for the roster engine: card model, pool loading, scoring,
// the selection stages and the assembled roster result.

pub mod model;
pub mod pool;
pub mod roster;
pub mod scoring;
pub mod select;

pub use model::card::{Card, CardId, Hand};
pub use roster::{build_roster, EngineOptions, RosterResult, RosterViolation};
pub use scoring::ScoringMetric;
