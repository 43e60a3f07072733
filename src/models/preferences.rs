//! Typed user preferences steering the evaluator.

/// Preferred time-of-day zone for section start hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOfDay {
    #[default]
    None,
    /// [08:00, 11:30)
    Morning,
    /// [11:30, 16:00)
    Afternoon,
    /// [16:00, 21:00]
    Evening,
}

impl TimeOfDay {
    /// Whether a decimal start hour falls inside the preferred zone.
    pub fn contains(self, hour: f64) -> bool {
        match self {
            TimeOfDay::None => false,
            TimeOfDay::Morning => (8.0..11.5).contains(&hour),
            TimeOfDay::Afternoon => (11.5..16.0).contains(&hour),
            TimeOfDay::Evening => (16.0..=21.0).contains(&hour),
        }
    }
}

/// Preferred lecture duration relative to the 1.5-hour pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LectureLength {
    #[default]
    None,
    Shorter,
    Longer,
}

/// The full preference set accepted by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPreferences {
    pub time_of_day: TimeOfDay,
    /// Weekday names the student wants free (Mon-Fri).
    pub days_off: Vec<String>,
    pub lecture_length: LectureLength,
    pub avoid_labs: bool,
    pub avoid_discussions: bool,
    /// Drop sections at enrollment capacity during materialization.
    pub exclude_full_sections: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            time_of_day: TimeOfDay::None,
            days_off: Vec::new(),
            lecture_length: LectureLength::None,
            avoid_labs: false,
            avoid_discussions: false,
            exclude_full_sections: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries() {
        assert!(TimeOfDay::Morning.contains(8.0));
        assert!(TimeOfDay::Morning.contains(11.0));
        assert!(!TimeOfDay::Morning.contains(11.5));

        assert!(TimeOfDay::Afternoon.contains(11.5));
        assert!(!TimeOfDay::Afternoon.contains(16.0));

        assert!(TimeOfDay::Evening.contains(16.0));
        assert!(TimeOfDay::Evening.contains(21.0));
        assert!(!TimeOfDay::Evening.contains(21.5));
    }

    #[test]
    fn test_no_preference_contains_nothing() {
        assert!(!TimeOfDay::None.contains(10.0));
    }

    #[test]
    fn test_defaults() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.time_of_day, TimeOfDay::None);
        assert!(prefs.days_off.is_empty());
        assert!(prefs.exclude_full_sections);
        assert!(!prefs.avoid_labs);
    }
}
