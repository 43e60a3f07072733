//! Report rendering.
//!
//! The JSON shape is the contract consumed by the web frontend; the text
//! rendering is the human-readable fallback. Both are built from the same
//! DTOs so they cannot drift apart.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::{Catalog, CatalogResult};
use crate::models::{Schedule, Section, UserPreferences};
use crate::services::evaluator::{score_breakdown, RatingCache, ScoreBreakdown};

/// Top-level JSON report.
#[derive(Debug, Serialize)]
pub struct ScheduleReport {
    pub schedules: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleEntry {
    pub id: usize,
    /// Normalized 0-10 score, one decimal.
    pub score: f64,
    #[serde(rename = "avgProfRating")]
    pub avg_prof_rating: f64,
    #[serde(rename = "avgDifficulty")]
    pub avg_difficulty: f64,
    pub classes: Vec<ClassEntry>,
    /// Bundle values backing the readable listing; not part of the JSON
    /// contract.
    #[serde(skip)]
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Serialize)]
pub struct ClassEntry {
    pub code: String,
    pub sections: Vec<SectionEntry>,
}

#[derive(Debug, Serialize)]
pub struct SectionEntry {
    #[serde(rename = "type")]
    pub section_type: String,
    pub days: String,
    pub time: String,
    pub instructor: String,
    pub section_number: String,
    pub location: String,
    pub seats_registered: i32,
    pub seats_total: i32,
    pub ratings: RatingsEntry,
}

#[derive(Debug, Default, Serialize)]
pub struct RatingsEntry {
    pub quality: f64,
    pub difficulty: f64,
    pub would_take_again: f64,
    pub course_quality: f64,
    pub course_difficulty: f64,
}

/// Fatal-error JSON shape.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Instructor string as shown to users: wrapping braces, quotes, and
/// escapes stripped; placeholder values collapse to empty.
fn display_instructor(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != '{' && c != '}' && c != '"' && c != '\\')
        .collect();
    cleaned.trim().to_string()
}

fn display_days(section: &Section) -> String {
    if section.meeting_days.is_empty() {
        "TBA".to_string()
    } else {
        section.meeting_days.join(", ")
    }
}

fn display_time(section: &Section) -> String {
    if section.start_time.is_empty() || section.end_time.is_empty() {
        "TBA".to_string()
    } else {
        format!("{}-{}", section.start_time, section.end_time)
    }
}

/// Assemble the report for the final `(schedule, score)` list.
///
/// Ratings are re-fetched through `catalog` (memoized in one cache for
/// the whole report) so every section entry carries its five rating
/// fields, and each schedule its lecture-averaged quality/difficulty.
pub fn build_report<C: Catalog>(
    catalog: &mut C,
    results: &[(Schedule, f64)],
    prefs: &UserPreferences,
) -> CatalogResult<ScheduleReport> {
    let mut cache = RatingCache::new();
    let mut schedules = Vec::with_capacity(results.len());

    for (idx, (schedule, score)) in results.iter().enumerate() {
        let breakdown = score_breakdown(catalog, schedule, prefs, &mut cache)?;
        // Group sections by course for display.
        let mut classes: BTreeMap<&str, Vec<&Section>> = BTreeMap::new();
        for item in schedule {
            classes
                .entry(item.class_code.as_str())
                .or_default()
                .extend(item.sections.iter());
        }

        let mut total_quality = 0.0;
        let mut total_difficulty = 0.0;
        let mut rated_lectures = 0u32;
        let mut class_entries = Vec::with_capacity(classes.len());

        for (code, sections) in classes {
            let mut section_entries = Vec::with_capacity(sections.len());
            for section in sections {
                let instructor = display_instructor(&section.instructor);
                let rating = if instructor.is_empty() {
                    Default::default()
                } else {
                    let key = (instructor.clone(), code.to_string());
                    match cache.get(&key) {
                        Some(r) => *r,
                        None => {
                            let r = catalog.fetch_professor_rating(&instructor, code)?;
                            cache.insert(key, r);
                            r
                        }
                    }
                };

                if section.section_type == "Lecture" && !instructor.is_empty() && rating.quality > 0.0
                {
                    total_quality += rating.quality;
                    total_difficulty += rating.difficulty;
                    rated_lectures += 1;
                }

                section_entries.push(SectionEntry {
                    section_type: section.section_type.clone(),
                    days: display_days(section),
                    time: display_time(section),
                    instructor,
                    section_number: section.section_number.clone(),
                    location: if section.location.is_empty() {
                        "TBA".to_string()
                    } else {
                        section.location.clone()
                    },
                    seats_registered: section.num_registered,
                    seats_total: section.num_seats,
                    ratings: RatingsEntry {
                        quality: rating.quality,
                        difficulty: rating.difficulty,
                        would_take_again: rating.would_take_again,
                        course_quality: rating.course_specific_quality,
                        course_difficulty: rating.course_specific_difficulty,
                    },
                });
            }
            class_entries.push(ClassEntry {
                code: code.to_string(),
                sections: section_entries,
            });
        }

        let (avg_quality, avg_difficulty) = if rated_lectures > 0 {
            (
                total_quality / rated_lectures as f64,
                total_difficulty / rated_lectures as f64,
            )
        } else {
            (0.0, 0.0)
        };

        schedules.push(ScheduleEntry {
            id: idx + 1,
            score: round1(*score),
            avg_prof_rating: round2(avg_quality),
            avg_difficulty: round2(avg_difficulty),
            classes: class_entries,
            breakdown,
        });
    }

    Ok(ScheduleReport { schedules })
}

/// Human-readable rendering of a report.
pub fn render_text(report: &ScheduleReport) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if report.schedules.is_empty() {
        out.push_str("No valid schedules found.\n");
        return out;
    }

    let _ = writeln!(out, "Found {} optimal schedules:", report.schedules.len());
    for entry in &report.schedules {
        let _ = writeln!(out, "\nSchedule #{} (score {:.1}):", entry.id, entry.score);
        for class in &entry.classes {
            let _ = writeln!(out, "  {}:", class.code);
            for section in &class.sections {
                let _ = write!(
                    out,
                    "    {} ({}): {} {}",
                    section.section_type, section.section_number, section.days, section.time
                );
                if !section.instructor.is_empty() {
                    let _ = write!(out, " with {}", section.instructor);
                }
                out.push('\n');
            }
        }
        let b = &entry.breakdown;
        let _ = writeln!(
            out,
            "  breakdown: professor {:.2}, days {:.2}, times {:.2}, misc {:.2} (raw {:.2})",
            b.professor,
            b.days,
            b.times,
            b.misc,
            b.raw_total()
        );
    }
    out
}
