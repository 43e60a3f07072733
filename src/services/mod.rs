//! Engine stages: materialization, enumeration, scoring, diversification,
//! and the orchestrator tying them together.

pub mod diversity;
pub mod evaluator;
pub mod generator;
pub mod options;
pub mod scheduler;

pub use diversity::diversify_schedules;
pub use evaluator::{evaluate_schedule, normalized_score, RatingCache, ScoreBreakdown};
pub use generator::{generate_all_valid_schedules, DEFAULT_LIMIT};
pub use options::prepare_spot_options;
pub use scheduler::{Scheduler, DEFAULT_TOP_N};
