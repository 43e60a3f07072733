//! Pipeline orchestration.
//!
//! Wires materialization, enumeration, parallel scoring, and
//! diversification. Scoring partitions the candidate schedules across a
//! worker pool; each worker opens its own catalog handle and rating
//! cache, and the shared top-K accumulator is a mutex-guarded bounded
//! min-heap whose critical section is O(log K).

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::db::{CatalogProvider, CatalogResult};
use crate::models::{Schedule, UserPreferences};
use crate::services::diversity::diversify_schedules;
use crate::services::evaluator::{evaluate_schedule, normalized_score, RatingCache};
use crate::services::generator::{generate_all_valid_schedules, DEFAULT_LIMIT};

/// Number of diverse schedules returned by default.
pub const DEFAULT_TOP_N: usize = 10;

/// Heap entry ordered by raw score.
struct ScoredSchedule {
    score: f64,
    schedule: Schedule,
}

impl PartialEq for ScoredSchedule {
    fn eq(&self, other: &Self) -> bool {
        self.score.total_cmp(&other.score) == std::cmp::Ordering::Equal
    }
}

impl Eq for ScoredSchedule {}

impl PartialOrd for ScoredSchedule {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredSchedule {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score.total_cmp(&other.score)
    }
}

/// End-to-end schedule builder over a catalog provider.
pub struct Scheduler<P: CatalogProvider> {
    provider: P,
    limit: usize,
}

impl<P: CatalogProvider> Scheduler<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Override the enumeration cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Build the top `top_n` diverse schedules for the given spots.
    ///
    /// Returns `(schedule, normalized_score)` pairs in the diversifier's
    /// emission order. An empty vector means no valid schedule exists.
    pub fn build(
        &self,
        class_spots: &[Vec<String>],
        prefs: &UserPreferences,
        top_n: usize,
    ) -> CatalogResult<Vec<(Schedule, f64)>> {
        info!(spots = class_spots.len(), "generating schedules");
        let mut catalog = self.provider.open()?;
        let schedules = generate_all_valid_schedules(&mut catalog, class_spots, prefs, self.limit)?;
        info!(count = schedules.len(), "valid schedules found");
        if schedules.is_empty() {
            return Ok(Vec::new());
        }

        let scored = self.score_top(&schedules, prefs, top_n)?;
        Ok(diversify_schedules(&scored, top_n))
    }

    /// Score every candidate in parallel and keep the raw top `top_n`,
    /// returned sorted by normalized score descending.
    fn score_top(
        &self,
        schedules: &[Schedule],
        prefs: &UserPreferences,
        top_n: usize,
    ) -> CatalogResult<Vec<(Schedule, f64)>> {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(schedules.len() / 1000 + 1)
            .max(2);
        debug!(workers, "scoring schedules");

        let heap: Mutex<BinaryHeap<Reverse<ScoredSchedule>>> =
            Mutex::new(BinaryHeap::with_capacity(top_n + 1));
        let chunk_size = schedules.len().div_ceil(workers);

        thread::scope(|scope| -> CatalogResult<()> {
            let handles: Vec<_> = schedules
                .chunks(chunk_size)
                .map(|chunk| {
                    let heap = &heap;
                    let provider = &self.provider;
                    scope.spawn(move || -> CatalogResult<()> {
                        let mut catalog = provider.open()?;
                        let mut cache = RatingCache::new();
                        for schedule in chunk {
                            let score = evaluate_schedule(&mut catalog, schedule, prefs, &mut cache)?;
                            let mut heap = heap.lock();
                            if heap.len() < top_n {
                                heap.push(Reverse(ScoredSchedule {
                                    score,
                                    schedule: schedule.clone(),
                                }));
                            } else if let Some(Reverse(lowest)) = heap.peek() {
                                if score > lowest.score {
                                    heap.pop();
                                    heap.push(Reverse(ScoredSchedule {
                                        score,
                                        schedule: schedule.clone(),
                                    }));
                                }
                            }
                        }
                        Ok(())
                    })
                })
                .collect();

            for handle in handles {
                handle.join().expect("scoring worker panicked")?;
            }
            Ok(())
        })?;

        // Ascending by Reverse is descending by score.
        let top = heap.into_inner().into_sorted_vec();
        Ok(top
            .into_iter()
            .map(|Reverse(entry)| (entry.schedule, normalized_score(entry.score)))
            .collect())
    }
}
