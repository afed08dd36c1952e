pub mod entity;
pub mod ranking;

pub use entity::{EntityKind, EntityRef, MovieAttribute};
pub use ranking::{Candidate, RankedMovie, RankingOutcome};
