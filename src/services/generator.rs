//! Breadth-first schedule enumeration.
//!
//! The frontier starts as one single-item schedule per option of spot 0
//! and is expanded one spot at a time through a precomputed compatibility
//! matrix. A hard cap bounds the surviving candidates per level; large
//! frontiers are partitioned across threads since expansion is pure.

use std::collections::{BTreeSet, HashMap};
use std::thread;

use tracing::{info, warn};

use crate::db::{Catalog, CatalogResult};
use crate::models::{packages_conflict, Schedule, SpotOptions, UserPreferences};
use crate::services::options::prepare_spot_options;

/// Default ceiling on surviving candidates per expansion level.
pub const DEFAULT_LIMIT: usize = 10_000_000;

/// Frontier size above which expansion is partitioned across threads.
const PARALLEL_THRESHOLD: usize = 5_000;

/// Enumerate every conflict-free, complete schedule, capped at `limit`.
pub fn generate_all_valid_schedules<C: Catalog>(
    catalog: &mut C,
    class_spots: &[Vec<String>],
    prefs: &UserPreferences,
    limit: usize,
) -> CatalogResult<Vec<Schedule>> {
    let spot_options = prepare_spot_options(catalog, class_spots, prefs)?;
    if spot_options.is_empty() || spot_options[0].is_empty() {
        info!("no valid packages for the first spot");
        return Ok(Vec::new());
    }

    // Seed the frontier from spot 0.
    let mut frontier: Vec<Schedule> = Vec::with_capacity(spot_options[0].len().min(limit));
    for option in &spot_options[0] {
        if frontier.len() >= limit {
            warn!(limit, "too many options for the first spot, truncating seeds");
            break;
        }
        frontier.push(vec![option.clone()]);
    }

    for (spot_idx, options) in spot_options.iter().enumerate().skip(1) {
        frontier = expand_level(&frontier, options, limit);
        info!(spot = spot_idx, schedules = frontier.len(), "expanded spot");
        if frontier.is_empty() {
            return Ok(Vec::new());
        }
        if frontier.len() >= limit {
            warn!(limit, "frontier reached cap, truncating");
            frontier.truncate(limit);
        }
    }

    // Keep only complete schedules: one item per spot, each from that
    // spot's alternatives, covering every required section type.
    let required = required_types_by_course(catalog, class_spots)?;
    let mut valid: Vec<Schedule> = Vec::new();
    for schedule in frontier {
        if is_complete(&schedule, class_spots, &required) {
            valid.push(schedule);
            if valid.len() >= limit {
                break;
            }
        }
    }
    Ok(valid)
}

/// Expand the frontier through one spot, in parallel when it pays off.
fn expand_level(frontier: &[Schedule], options: &SpotOptions, limit: usize) -> Vec<Schedule> {
    let threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(frontier.len() / 1000 + 1);

    if threads <= 1 || frontier.len() <= PARALLEL_THRESHOLD {
        return extend_schedules(frontier, options, limit);
    }

    let chunk_size = frontier.len().div_ceil(threads);
    let per_worker_limit = (limit / threads).max(1);

    let partials: Vec<Vec<Schedule>> = thread::scope(|scope| {
        let handles: Vec<_> = frontier
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || extend_schedules(chunk, options, per_worker_limit)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("expansion worker panicked"))
            .collect()
    });

    let mut next = Vec::new();
    for partial in partials {
        next.extend(partial);
        if next.len() >= limit {
            next.truncate(limit);
            break;
        }
    }
    next
}

/// Sequentially extend each schedule with every compatible option.
fn extend_schedules(frontier: &[Schedule], options: &SpotOptions, limit: usize) -> Vec<Schedule> {
    let matrix = compatibility_matrix(frontier, options);

    let mut next = Vec::new();
    for (i, schedule) in frontier.iter().enumerate() {
        if next.len() >= limit {
            break;
        }
        for (j, option) in options.iter().enumerate() {
            if !matrix[i][j] {
                continue;
            }
            let mut extended = schedule.clone();
            extended.push(option.clone());
            next.push(extended);
            if next.len() >= limit {
                break;
            }
        }
    }
    next
}

/// `matrix[s][o]` is true iff option `o` can extend schedule `s`: the
/// course is not already taken and no package in the schedule conflicts.
fn compatibility_matrix(frontier: &[Schedule], options: &SpotOptions) -> Vec<Vec<bool>> {
    frontier
        .iter()
        .map(|schedule| {
            options
                .iter()
                .map(|option| {
                    !schedule.iter().any(|item| {
                        item.class_code == option.class_code
                            || packages_conflict(&item.sections, &option.sections)
                    })
                })
                .collect()
        })
        .collect()
}

/// Fetch the required section-type set once per distinct course.
fn required_types_by_course<C: Catalog>(
    catalog: &mut C,
    class_spots: &[Vec<String>],
) -> CatalogResult<HashMap<String, BTreeSet<String>>> {
    let mut required = HashMap::new();
    for spot in class_spots {
        for raw_code in spot {
            let code = raw_code.trim();
            if !required.contains_key(code) {
                let types = catalog.fetch_required_types(code)?;
                required.insert(code.to_string(), types);
            }
        }
    }
    Ok(required)
}

fn is_complete(
    schedule: &Schedule,
    class_spots: &[Vec<String>],
    required: &HashMap<String, BTreeSet<String>>,
) -> bool {
    if schedule.len() != class_spots.len() {
        return false;
    }
    for (spot_idx, item) in schedule.iter().enumerate() {
        if !class_spots[spot_idx]
            .iter()
            .any(|code| code.trim() == item.class_code)
        {
            return false;
        }
        let Some(required_types) = required.get(item.class_code.as_str()) else {
            return false;
        };
        let present: BTreeSet<&str> = item.sections.iter().map(|s| s.section_type.as_str()).collect();
        if present.len() != required_types.len()
            || !required_types.iter().all(|t| present.contains(t.as_str()))
        {
            return false;
        }
    }
    true
}
