//! Greedy max-min diversification of the scored top schedules.
//!
//! Returning the raw top-K usually yields near-duplicates (same lectures,
//! one swapped discussion). Starting from the best schedule, each round
//! picks the candidate farthest from everything already chosen, nudged by
//! a bonus for professors not seen yet.

use std::collections::HashMap;

use crate::db::catalog::{canonicalize, strip_name_wrapping};
use crate::models::Schedule;

/// Fraction of section positions of `a` that reappear in `b` under the
/// same course.
fn similarity(a: &Schedule, b: &Schedule) -> f64 {
    let total: usize = a.iter().map(|item| item.sections.len()).sum();
    if total == 0 {
        return 1.0;
    }

    let mut matches = 0usize;
    for item in a {
        let Some(other) = b.iter().find(|o| o.class_code == item.class_code) else {
            continue;
        };
        for section in &item.sections {
            if other
                .sections
                .iter()
                .any(|s| s.section_number == section.section_number)
            {
                matches += 1;
            }
        }
    }
    matches as f64 / total as f64
}

/// Canonicalized instructors appearing in a schedule.
fn schedule_professors(schedule: &Schedule) -> Vec<String> {
    schedule
        .iter()
        .flat_map(|item| &item.sections)
        .filter_map(|section| {
            let raw = section.instructor.trim();
            if raw.is_empty() || raw == "{}" || raw == "TBA" {
                return None;
            }
            let name = canonicalize(&strip_name_wrapping(raw));
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

/// Bonus rewarding professors the chosen set has not saturated yet.
fn professor_bonus(candidate: &Schedule, seen: &HashMap<String, usize>) -> f64 {
    schedule_professors(candidate)
        .iter()
        .map(|p| match seen.get(p) {
            Some(freq) => 0.1 / (*freq as f64 + 1.0),
            None => 0.1,
        })
        .sum()
}

/// Pick up to `count` schedules from a score-descending candidate list,
/// maximizing the minimum distance to the already-chosen set.
///
/// The input must already be filtered to complete schedules and sorted by
/// score descending; ties on the selection criterion resolve to the
/// earlier (higher-scored) candidate.
pub fn diversify_schedules(
    scored: &[(Schedule, f64)],
    count: usize,
) -> Vec<(Schedule, f64)> {
    if scored.is_empty() || count == 0 {
        return Vec::new();
    }

    let mut chosen_idx: Vec<usize> = vec![0];
    let mut seen: HashMap<String, usize> = HashMap::new();
    for professor in schedule_professors(&scored[0].0) {
        *seen.entry(professor).or_default() += 1;
    }

    while chosen_idx.len() < count && chosen_idx.len() < scored.len() {
        let mut best: Option<(usize, f64)> = None;
        for (idx, (candidate, _)) in scored.iter().enumerate() {
            if chosen_idx.contains(&idx) {
                continue;
            }
            let min_distance = chosen_idx
                .iter()
                .map(|&c| 1.0 - similarity(candidate, &scored[c].0))
                .fold(f64::INFINITY, f64::min);
            let criterion = min_distance + professor_bonus(candidate, &seen);
            if best.map_or(true, |(_, b)| criterion > b) {
                best = Some((idx, criterion));
            }
        }
        let Some((idx, _)) = best else {
            break;
        };
        chosen_idx.push(idx);
        for professor in schedule_professors(&scored[idx].0) {
            *seen.entry(professor).or_default() += 1;
        }
    }

    chosen_idx
        .into_iter()
        .map(|idx| scored[idx].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScheduleItem, Section};

    fn schedule(course_sections: &[(&str, &[&str])]) -> Schedule {
        schedule_with_instructor(course_sections, "")
    }

    fn schedule_with_instructor(
        course_sections: &[(&str, &[&str])],
        instructor: &str,
    ) -> Schedule {
        course_sections
            .iter()
            .enumerate()
            .map(|(spot_idx, (code, numbers))| ScheduleItem {
                spot_idx,
                class_code: code.to_string(),
                pkg_idx: 0,
                sections: numbers
                    .iter()
                    .map(|n| {
                        Section::new(
                            "Lecture",
                            &["Mon".to_string()],
                            "10:00 am",
                            "11:00 am",
                            "",
                            instructor,
                            0,
                            30,
                            *n,
                            "",
                        )
                    })
                    .collect(),
            })
            .collect()
    }

    #[test]
    fn test_similarity_identical_and_disjoint() {
        let a = schedule(&[("CSCI 103", &["1", "2"])]);
        let b = schedule(&[("CSCI 103", &["1", "2"])]);
        let c = schedule(&[("CSCI 103", &["3", "4"])]);
        assert_eq!(similarity(&a, &b), 1.0);
        assert_eq!(similarity(&a, &c), 0.0);
    }

    #[test]
    fn test_prefers_distant_candidate_over_duplicate() {
        // Candidates 2 and 3 duplicate candidate 1's sections; candidate 4
        // shares nothing with it. K = 2 must pick {1, 4}.
        let top = schedule(&[("CSCI 103", &["1"]), ("WRIT 150", &["2"])]);
        let dup_a = schedule(&[("CSCI 103", &["1"]), ("WRIT 150", &["2"])]);
        let dup_b = schedule(&[("CSCI 103", &["1"]), ("WRIT 150", &["2"])]);
        let different = schedule(&[("CSCI 103", &["9"]), ("WRIT 150", &["8"])]);
        let fifth = schedule(&[("CSCI 103", &["1"]), ("WRIT 150", &["8"])]);

        let scored: Vec<(Schedule, f64)> = vec![
            (top, 9.0),
            (dup_a, 8.9),
            (dup_b, 8.8),
            (different.clone(), 8.7),
            (fifth, 8.6),
        ];
        let picked = diversify_schedules(&scored, 2);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].1, 9.0);
        assert_eq!(picked[1].0, different);
    }

    #[test]
    fn test_returns_at_most_k_without_repeats() {
        let scored: Vec<(Schedule, f64)> = ["1", "2", "3", "4"]
            .iter()
            .enumerate()
            .map(|(i, n)| (schedule(&[("CSCI 103", &[*n])]), 9.0 - i as f64))
            .collect();
        let picked = diversify_schedules(&scored, 10);
        assert_eq!(picked.len(), 4);
        for i in 0..picked.len() {
            for j in (i + 1)..picked.len() {
                assert_ne!(picked[i].0, picked[j].0);
            }
        }
    }

    #[test]
    fn test_professor_bonus_favors_unseen_names() {
        let top = schedule_with_instructor(&[("CSCI 103", &["1"])], "Jane Doe");
        // Same sections, different professor vs same professor.
        let same_prof = schedule_with_instructor(&[("CSCI 103", &["1"])], "Jane Doe");
        let new_prof = schedule_with_instructor(&[("CSCI 103", &["1"])], "John Roe");

        let scored = vec![(top, 9.0), (same_prof, 8.9), (new_prof.clone(), 8.8)];
        let picked = diversify_schedules(&scored, 2);
        assert_eq!(picked[1].0, new_prof);
    }

    #[test]
    fn test_empty_input() {
        assert!(diversify_schedules(&[], 3).is_empty());
    }
}
