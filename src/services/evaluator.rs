//! Schedule scoring.
//!
//! A schedule is scored on four bundles (professor quality, day-off
//! satisfaction, time-of-day alignment, lecture-length and section-type
//! avoidance) summed into a raw 0-100 total, then mapped through a
//! generous piecewise curve onto 0-10. Professor ratings are memoized in
//! a per-worker cache keyed by `(professor, course)`.

use std::collections::HashMap;

use crate::db::catalog::strip_name_wrapping;
use crate::db::{Catalog, CatalogResult, ProfessorRating};
use crate::models::section::day_bit;
use crate::models::time::parse_clock_time;
use crate::models::{schedule_day_bits, Schedule, Section, TimeOfDay, UserPreferences};

/// Raw score assigned to an empty schedule.
pub const EMPTY_SCHEDULE_SCORE: f64 = -999.0;

/// Per-worker professor-rating memo, keyed by `(professor, course_code)`.
pub type RatingCache = HashMap<(String, String), ProfessorRating>;

/// The four bundle values of one scored schedule.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    /// 0-40
    pub professor: f64,
    /// 0-20
    pub days: f64,
    /// 0-20
    pub times: f64,
    /// 0-20
    pub misc: f64,
}

impl ScoreBreakdown {
    /// Raw 0-100 total.
    pub fn raw_total(&self) -> f64 {
        self.professor + self.days + self.times + self.misc
    }
}

/// Start hour, end hour, and duration of a section, when its times parse.
fn section_time_info(section: &Section) -> Option<(f64, f64, f64)> {
    let start = parse_clock_time(&section.start_time)?;
    let end = parse_clock_time(&section.end_time)?;
    let mut duration = end - start;
    if duration < 0.0 {
        duration += 24.0;
    }
    Some((start, end, duration))
}

/// Whether the instructor field names someone worth looking up.
fn usable_instructor(section: &Section) -> Option<String> {
    let raw = section.instructor.trim();
    if raw.is_empty() || raw == "{}" || raw == "TBA" {
        return None;
    }
    let name = strip_name_wrapping(raw);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn professor_bundle<C: Catalog>(
    catalog: &mut C,
    schedule: &Schedule,
    cache: &mut RatingCache,
) -> CatalogResult<f64> {
    let mut sum_overall = 0.0;
    let mut sum_course = 0.0;
    let mut sum_wta = 0.0;
    let mut sum_diff = 0.0;
    let mut count = 0u32;

    for item in schedule {
        for section in &item.sections {
            let Some(professor) = usable_instructor(section) else {
                continue;
            };

            let key = (professor.clone(), item.class_code.clone());
            let rating = match cache.get(&key) {
                Some(r) => *r,
                None => {
                    let r = catalog.fetch_professor_rating(&professor, &item.class_code)?;
                    cache.insert(key, r);
                    r
                }
            };
            if rating.quality <= 0.0 && rating.course_specific_quality <= 0.0 {
                continue;
            }

            sum_overall += rating.quality;
            sum_course += if rating.course_specific_quality > 0.0 {
                rating.course_specific_quality
            } else {
                rating.quality
            };
            // RMP percent compressed into the 0-5 scale.
            sum_wta += rating.would_take_again / 20.0;
            sum_diff += rating.difficulty;
            count += 1;
        }
    }

    if count == 0 {
        return Ok(0.0);
    }
    let count = count as f64;
    let avg_overall = sum_overall / count;
    let avg_course = sum_course / count;
    let avg_wta = sum_wta / count;
    let avg_diff = sum_diff / count;

    // Low difficulty is better; invert it.
    let inv_diff = 5.0 - avg_diff.clamp(0.0, 5.0);

    // 0-20 stretched into the bundle's 0-40 weight.
    Ok((avg_overall + avg_course + avg_wta + inv_diff) * 2.0)
}

fn day_bundle(schedule: &Schedule, prefs: &UserPreferences) -> f64 {
    if prefs.days_off.is_empty() {
        return 0.0;
    }
    let used = schedule_day_bits(schedule);
    let mut score: f64 = 20.0;
    for day in &prefs.days_off {
        if used & day_bit(day) != 0 {
            score -= 5.0;
        }
    }
    score.max(0.0)
}

fn time_bundle(schedule: &Schedule, prefs: &UserPreferences) -> f64 {
    if prefs.time_of_day == TimeOfDay::None {
        return 0.0;
    }

    let starts: Vec<f64> = schedule
        .iter()
        .flat_map(|item| &item.sections)
        .filter_map(|s| section_time_info(s).map(|(start, _, _)| start))
        .collect();
    if starts.is_empty() {
        return 0.0;
    }

    let mut score: f64 = 20.0;
    for start in starts {
        if !prefs.time_of_day.contains(start) {
            score -= 5.0;
        }
    }
    score.max(0.0)
}

fn misc_bundle(schedule: &Schedule, prefs: &UserPreferences) -> f64 {
    use crate::models::LectureLength;

    let mut score = 0.0;

    // Lecture length half-bundle (0-10), pivoting on 1.5 hours.
    if prefs.lecture_length != LectureLength::None {
        let durations: Vec<f64> = schedule
            .iter()
            .flat_map(|item| &item.sections)
            .filter(|s| s.section_type == "Lecture")
            .filter_map(|s| section_time_info(s).map(|(_, _, d)| d))
            .filter(|d| *d > 0.0)
            .collect();
        if !durations.is_empty() {
            let avg = durations.iter().sum::<f64>() / durations.len() as f64;
            score += match prefs.lecture_length {
                LectureLength::Shorter => (1.5 - avg).clamp(0.0, 1.5) / 1.5 * 10.0,
                LectureLength::Longer => (avg - 1.5).clamp(0.0, 1.5) / 1.5 * 10.0,
                LectureLength::None => 0.0,
            };
        }
    }

    // Lab/discussion avoidance half-bundle (0-10).
    if prefs.avoid_labs || prefs.avoid_discussions {
        let mut bad = 0i32;
        for section in schedule.iter().flat_map(|item| &item.sections) {
            let is_lab = section.section_type == "Lab";
            let is_discussion =
                section.section_type == "Discussion" || section.section_type == "Quiz";
            if (is_lab && prefs.avoid_labs) || (is_discussion && prefs.avoid_discussions) {
                bad += 1;
            }
        }
        score += (2 - bad).max(0) as f64 * 5.0;
    }

    score
}

/// Score every bundle of a schedule.
pub fn score_breakdown<C: Catalog>(
    catalog: &mut C,
    schedule: &Schedule,
    prefs: &UserPreferences,
    cache: &mut RatingCache,
) -> CatalogResult<ScoreBreakdown> {
    Ok(ScoreBreakdown {
        professor: professor_bundle(catalog, schedule, cache)?,
        days: day_bundle(schedule, prefs),
        times: time_bundle(schedule, prefs),
        misc: misc_bundle(schedule, prefs),
    })
}

/// Raw 0-100 score of a schedule; empty schedules get the sentinel.
pub fn evaluate_schedule<C: Catalog>(
    catalog: &mut C,
    schedule: &Schedule,
    prefs: &UserPreferences,
    cache: &mut RatingCache,
) -> CatalogResult<f64> {
    if schedule.is_empty() {
        return Ok(EMPTY_SCHEDULE_SCORE);
    }
    Ok(score_breakdown(catalog, schedule, prefs, cache)?.raw_total())
}

/// Map a raw 0-100 total onto the 0-10 display scale.
///
/// The curve is deliberately generous: the floor sits at 6.0 and the
/// brackets widen toward the top so strong schedules spread over 8.5-10.
pub fn normalized_score(raw: f64) -> f64 {
    let normalized = if raw >= 60.0 {
        8.5 + (raw - 60.0) * 1.5 / 40.0
    } else if raw >= 45.0 {
        7.5 + (raw - 45.0) / 15.0
    } else {
        6.0 + (raw / 45.0) * 1.5
    };
    normalized.clamp(0.0, 10.0)
}
