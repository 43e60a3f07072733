//! End-to-end pipeline tests over the in-memory catalog.

use usc_scheduler::db::{MemoryCatalog, ProfessorRating};
use usc_scheduler::models::{Section, TimeOfDay, UserPreferences};
use usc_scheduler::output;
use usc_scheduler::services::{Scheduler, DEFAULT_TOP_N};

fn section(
    ty: &str,
    days: &[&str],
    start: &str,
    end: &str,
    instructor: &str,
    number: &str,
    parent: &str,
) -> Section {
    let raw: Vec<String> = days.iter().map(|d| d.to_string()).collect();
    Section::new(ty, &raw, start, end, "", instructor, 1, 30, number, parent)
}

fn spots(groups: &[&[&str]]) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|g| g.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn trivial_single_course_schedule() {
    // One course, one lecture, no instructor: raw 0, normalized 6.0.
    let mut catalog = MemoryCatalog::new();
    catalog.add_section(
        "CSCI 103",
        section("Lecture", &["Mon"], "10:00 am", "11:00 am", "", "L1", ""),
    );

    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["CSCI 103"]]),
            &UserPreferences::default(),
            DEFAULT_TOP_N,
        )
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0.len(), 1);
    assert_eq!(results[0].0[0].class_code, "CSCI 103");
    assert_eq!(results[0].1, 6.0);
}

#[test]
fn conflicting_cross_pair_is_pruned() {
    // 2x2 lecture grid with one colliding cross pair: 3 schedules.
    let mut catalog = MemoryCatalog::new();
    catalog.add_section(
        "CSCI 103",
        section("Lecture", &["Mon"], "10:00 am", "11:00 am", "", "A1", ""),
    );
    catalog.add_section(
        "CSCI 103",
        section("Lecture", &["Tue"], "10:00 am", "11:00 am", "", "A2", ""),
    );
    catalog.add_section(
        "WRIT 150",
        section("Lecture", &["Mon"], "10:30 am", "11:30 am", "", "B1", ""),
    );
    catalog.add_section(
        "WRIT 150",
        section("Lecture", &["Thu"], "10:30 am", "11:30 am", "", "B2", ""),
    );

    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["CSCI 103"], &["WRIT 150"]]),
            &UserPreferences::default(),
            DEFAULT_TOP_N,
        )
        .unwrap();
    assert_eq!(results.len(), 3);

    // No produced schedule contains the conflicting A1/B1 pair.
    for (schedule, _) in &results {
        let numbers: Vec<&str> = schedule
            .iter()
            .flat_map(|item| &item.sections)
            .map(|s| s.section_number.as_str())
            .collect();
        assert!(!(numbers.contains(&"A1") && numbers.contains(&"B1")));
    }
}

#[test]
fn parent_locked_discussions_stay_with_their_lecture() {
    let mut catalog = MemoryCatalog::new();
    catalog.add_section(
        "CSCI 104",
        section("Lecture", &["Mon"], "10:00 am", "11:00 am", "", "L1", ""),
    );
    catalog.add_section(
        "CSCI 104",
        section("Lecture", &["Tue"], "10:00 am", "11:00 am", "", "L2", ""),
    );
    catalog.add_section(
        "CSCI 104",
        section("Discussion", &["Wed"], "9:00 am", "10:00 am", "", "D1", "L1"),
    );
    catalog.add_section(
        "CSCI 104",
        section("Discussion", &["Thu"], "9:00 am", "10:00 am", "", "D2", "L2"),
    );

    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["CSCI 104"]]),
            &UserPreferences::default(),
            DEFAULT_TOP_N,
        )
        .unwrap();
    assert_eq!(results.len(), 2);

    for (schedule, _) in &results {
        let numbers: Vec<&str> = schedule[0]
            .sections
            .iter()
            .map(|s| s.section_number.as_str())
            .collect();
        assert!(numbers == ["L1", "D1"] || numbers == ["L2", "D2"]);
    }
}

#[test]
fn every_result_is_conflict_free_and_complete() {
    let mut catalog = MemoryCatalog::new();
    catalog.add_section(
        "CSCI 104",
        section("Lecture", &["Mon", "Wed"], "10:00 am", "11:20 am", "", "L1", ""),
    );
    catalog.add_section(
        "CSCI 104",
        section("Lab", &["Fri"], "2:00 pm", "4:00 pm", "", "B1", ""),
    );
    catalog.add_section(
        "MATH 126",
        section("Lecture", &["Tue", "Thu"], "9:00 am", "10:20 am", "", "M1", ""),
    );

    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["CSCI 104"], &["MATH 126"]]),
            &UserPreferences::default(),
            DEFAULT_TOP_N,
        )
        .unwrap();
    assert_eq!(results.len(), 1);

    let (schedule, score) = &results[0];
    assert_eq!(schedule.len(), 2);
    assert!((0.0..=10.0).contains(score));

    // Pairwise: disjoint days or disjoint times.
    let sections: Vec<&Section> = schedule.iter().flat_map(|i| &i.sections).collect();
    for (i, a) in sections.iter().enumerate() {
        for b in sections.iter().skip(i + 1) {
            assert!(!a.conflicts_with(b));
        }
    }

    // CSCI 104 must carry both of its required types.
    let types: Vec<&str> = schedule[0]
        .sections
        .iter()
        .map(|s| s.section_type.as_str())
        .collect();
    assert!(types.contains(&"Lecture") && types.contains(&"Lab"));
}

#[test]
fn days_off_preference_penalizes_friday_meeting() {
    let mut catalog = MemoryCatalog::new();
    catalog.add_section(
        "CSCI 103",
        section("Lecture", &["Fri"], "10:00 am", "11:00 am", "", "L1", ""),
    );
    catalog.add_section(
        "WRIT 150",
        section("Lecture", &["Tue"], "10:00 am", "11:00 am", "", "W1", ""),
    );

    let prefs = UserPreferences {
        days_off: vec!["Fri".to_string()],
        ..Default::default()
    };
    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["CSCI 103"], &["WRIT 150"]]),
            &prefs,
            DEFAULT_TOP_N,
        )
        .unwrap();
    assert_eq!(results.len(), 1);

    // Days bundle 15 -> raw 15 -> 6.0 + 15/45 * 1.5 = 6.5.
    assert!((results[0].1 - 6.5).abs() < 1e-9);
}

#[test]
fn morning_preference_penalizes_afternoon_starts() {
    let mut catalog = MemoryCatalog::new();
    catalog.add_section(
        "A 100",
        section("Lecture", &["Mon"], "9:00 am", "10:00 am", "", "1", ""),
    );
    catalog.add_section(
        "B 100",
        section("Lecture", &["Tue"], "10:00 am", "11:00 am", "", "2", ""),
    );
    catalog.add_section(
        "C 100",
        section("Lecture", &["Wed"], "1:00 pm", "2:00 pm", "", "3", ""),
    );
    catalog.add_section(
        "D 100",
        section("Lecture", &["Thu"], "2:00 pm", "3:00 pm", "", "4", ""),
    );

    let prefs = UserPreferences {
        time_of_day: TimeOfDay::Morning,
        ..Default::default()
    };
    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["A 100"], &["B 100"], &["C 100"], &["D 100"]]),
            &prefs,
            DEFAULT_TOP_N,
        )
        .unwrap();
    assert_eq!(results.len(), 1);

    // Time bundle 20 - 5 - 5 = 10 -> raw 10 -> 6.0 + 10/45 * 1.5.
    let expected = ((6.0_f64 + 10.0 / 45.0 * 1.5) * 10.0).round() / 10.0;
    let got = (results[0].1 * 10.0).round() / 10.0;
    assert_eq!(got, expected);
}

#[test]
fn diversifier_picks_the_distant_candidate_second() {
    // A 2x2 grid yields four equally-scored schedules; whichever seeds
    // the diverse set, the second pick must be its fully-disjoint
    // complement rather than a near duplicate sharing a lecture.
    let mut catalog = MemoryCatalog::new();
    for (number, day) in [("A1", "Mon"), ("A2", "Tue")] {
        catalog.add_section(
            "CSCI 103",
            section("Lecture", &[day], "10:00 am", "11:00 am", "", number, ""),
        );
    }
    for (number, day) in [("B1", "Wed"), ("B2", "Thu")] {
        catalog.add_section(
            "WRIT 150",
            section("Lecture", &[day], "10:00 am", "11:00 am", "", number, ""),
        );
    }

    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["CSCI 103"], &["WRIT 150"]]),
            &UserPreferences::default(),
            4,
        )
        .unwrap();
    assert_eq!(results.len(), 4);

    let numbers = |idx: usize| -> Vec<String> {
        results[idx]
            .0
            .iter()
            .flat_map(|item| &item.sections)
            .map(|s| s.section_number.clone())
            .collect()
    };
    let first = numbers(0);
    let second = numbers(1);
    // Maximally different: no shared section at all.
    assert!(first.iter().all(|n| !second.contains(n)));
}

#[test]
fn full_sections_yield_no_schedules_by_default() {
    let mut catalog = MemoryCatalog::new();
    let mut full = section("Lecture", &["Mon"], "10:00 am", "11:00 am", "", "L1", "");
    full.num_registered = 30;
    catalog.add_section("CSCI 103", full);

    let results = Scheduler::new(catalog)
        .build(
            &spots(&[&["CSCI 103"]]),
            &UserPreferences::default(),
            DEFAULT_TOP_N,
        )
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn professor_ratings_flow_into_report() {
    let mut catalog = MemoryCatalog::new();
    catalog.add_course_rating(
        "Jane Doe",
        "CSCI 103",
        ProfessorRating {
            quality: 4.2,
            difficulty: 3.1,
            would_take_again: 88.0,
            course_specific_quality: 4.3,
            course_specific_difficulty: 3.0,
        },
    );
    catalog.add_section(
        "CSCI 103",
        section(
            "Lecture",
            &["Mon", "Wed"],
            "10:00 am",
            "11:20 am",
            "{\"Jane Doe\"}",
            "29905",
            "",
        ),
    );

    let scheduler = Scheduler::new(catalog.clone());
    let results = scheduler
        .build(
            &spots(&[&["CSCI 103"]]),
            &UserPreferences::default(),
            DEFAULT_TOP_N,
        )
        .unwrap();
    assert_eq!(results.len(), 1);
    // Professor bundle (4.2 + 4.3 + 4.4 + 1.9) * 2 = 29.6 -> inside 0-40.
    assert!(results[0].1 > 6.0);

    let report =
        output::build_report(&mut catalog.clone(), &results, &UserPreferences::default())
            .unwrap();
    let value = serde_json::to_value(&report).unwrap();
    let entry = &value["schedules"][0];
    assert_eq!(entry["avgProfRating"], 4.2);
    assert_eq!(entry["avgDifficulty"], 3.1);
    let ratings = &entry["classes"][0]["sections"][0]["ratings"];
    assert_eq!(ratings["would_take_again"], 88.0);
    assert_eq!(ratings["course_quality"], 4.3);
}

#[test]
fn all_tba_schedule_scores_consistently() {
    let mut catalog = MemoryCatalog::new();
    catalog.add_section("CSCI 103", section("Lecture", &[], "TBA", "TBA", "", "L1", ""));

    let prefs = UserPreferences {
        time_of_day: TimeOfDay::Morning,
        days_off: vec!["Fri".to_string()],
        ..Default::default()
    };
    let results = Scheduler::new(catalog)
        .build(&spots(&[&["CSCI 103"]]), &prefs, DEFAULT_TOP_N)
        .unwrap();
    assert_eq!(results.len(), 1);

    // No days used -> full days bundle (20); no valid starts -> time 0.
    // Raw 20 -> 6.0 + 20/45 * 1.5 = 6.67 (one decimal: 6.7).
    let got = (results[0].1 * 10.0).round() / 10.0;
    assert_eq!(got, 6.7);
}
