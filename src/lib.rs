//! # USC Scheduler
//!
//! Weekly university schedule builder. Given a list of *spots* (each a
//! set of alternative course codes) and a set of user preferences, the
//! engine enumerates every conflict-free schedule that takes one course
//! per spot with all of its required section types, scores the
//! candidates, and returns a diverse top-K.
//!
//! ## Pipeline
//!
//! 1. **Materialization** ([`services::options`]): each course's section
//!    catalog is combined into packages (anchor lecture + one section of
//!    every other required type, honoring parent-lock).
//! 2. **Enumeration** ([`services::generator`]): breadth-first Cartesian
//!    expansion across spots with conflict pruning and a hard cap.
//! 3. **Evaluation** ([`services::evaluator`]): weighted bundle scoring
//!    (professor quality, days off, time of day, misc), parallelized
//!    with per-worker rating caches.
//! 4. **Diversification** ([`services::diversity`]): greedy max-min
//!    selection so the returned top-K stays varied.
//!
//! ## Architecture
//!
//! - [`models`]: section, schedule, time, and preference types
//! - [`db`]: catalog access (Postgres via Diesel, plus an in-memory
//!   backend for tests and offline use)
//! - [`services`]: the engine stages and the orchestrator
//! - [`cli`] / [`output`]: command-line surface and report rendering

pub mod cli;
pub mod db;
pub mod models;
pub mod output;
pub mod services;
