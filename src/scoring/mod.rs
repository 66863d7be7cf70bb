//! File and domain level scores
//!
//! - cohesion: how related a file's exports are (0..=1, higher is better)
//! - fragmentation: how scattered a domain's files are (0..=1, lower is better)

pub mod cohesion;
pub mod fragmentation;

pub use cohesion::{calculate_cohesion, is_test_file};
pub use fragmentation::calculate_fragmentation;
