//! Schedule value types.
//!
//! A *package* is one course instantiated as a vector of sections, one per
//! required type, anchored on its lecture. A [`ScheduleItem`] pins a package
//! to a spot, and a [`Schedule`] is one item per spot, in spot order.

use crate::models::section::Section;

/// One spot filled with a concrete package of one course.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleItem {
    /// Index of the spot this item fills.
    pub spot_idx: usize,
    /// Course code the package belongs to.
    pub class_code: String,
    /// Dense 0-based package index within the spot's option list.
    pub pkg_idx: usize,
    /// Anchor section first, then one section per remaining required type.
    pub sections: Vec<Section>,
}

/// A partial or complete weekly schedule, one item per expanded spot.
pub type Schedule = Vec<ScheduleItem>;

/// The materialized option list for one spot.
pub type SpotOptions = Vec<ScheduleItem>;

/// Whether any section of one package collides with any section of another.
///
/// The packages' combined day masks are compared first so disjoint weeks
/// skip the pairwise scan entirely.
pub fn packages_conflict(pkg1: &[Section], pkg2: &[Section]) -> bool {
    if pkg1.is_empty() || pkg2.is_empty() {
        return false;
    }

    let days1 = pkg1.iter().fold(0u8, |acc, s| acc | s.day_bits);
    let days2 = pkg2.iter().fold(0u8, |acc, s| acc | s.day_bits);
    if days1 & days2 == 0 {
        return false;
    }

    for sec1 in pkg1 {
        if sec1.day_bits == 0 {
            continue;
        }
        for sec2 in pkg2 {
            if sec2.day_bits & sec1.day_bits == 0 {
                continue;
            }
            if sec1.conflicts_with(sec2) {
                return true;
            }
        }
    }
    false
}

/// Union of the day masks of every section in a schedule.
pub fn schedule_day_bits(schedule: &Schedule) -> u8 {
    schedule
        .iter()
        .flat_map(|item| &item.sections)
        .fold(0, |acc, s| acc | s.day_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(days: &[&str], start: &str, end: &str, number: &str) -> Section {
        let raw: Vec<String> = days.iter().map(|d| d.to_string()).collect();
        Section::new("Lecture", &raw, start, end, "", "", 0, 30, number, "")
    }

    #[test]
    fn test_empty_packages_never_conflict() {
        let pkg = vec![lecture(&["Mon"], "10:00 am", "11:00 am", "1")];
        assert!(!packages_conflict(&pkg, &[]));
        assert!(!packages_conflict(&[], &pkg));
    }

    #[test]
    fn test_disjoint_days_short_circuit() {
        let a = vec![lecture(&["Mon", "Wed"], "10:00 am", "11:00 am", "1")];
        let b = vec![lecture(&["Tue", "Thu"], "10:00 am", "11:00 am", "2")];
        assert!(!packages_conflict(&a, &b));
    }

    #[test]
    fn test_overlapping_sections_conflict() {
        let a = vec![
            lecture(&["Mon"], "10:00 am", "11:00 am", "1"),
            lecture(&["Fri"], "2:00 pm", "3:00 pm", "2"),
        ];
        let b = vec![lecture(&["Fri"], "2:30 pm", "3:30 pm", "3")];
        assert!(packages_conflict(&a, &b));
    }

    #[test]
    fn test_schedule_day_bits_union() {
        use crate::models::section::{FRI, MON};
        let schedule: Schedule = vec![
            ScheduleItem {
                spot_idx: 0,
                class_code: "CSCI 103".into(),
                pkg_idx: 0,
                sections: vec![lecture(&["Mon"], "10:00 am", "11:00 am", "1")],
            },
            ScheduleItem {
                spot_idx: 1,
                class_code: "WRIT 150".into(),
                pkg_idx: 0,
                sections: vec![lecture(&["Fri"], "1:00 pm", "2:00 pm", "2")],
            },
        ];
        assert_eq!(schedule_day_bits(&schedule), MON | FRI);
    }
}
