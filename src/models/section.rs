//! Section entity and pairwise conflict testing.
//!
//! A [`Section`] is one scheduled meeting of a course as delivered by the
//! catalog. Day strings arrive in assorted shapes (`"Mon"`, `"{Mon,Wed}"`,
//! `" Tu "`) and are normalized at construction; the 7-bit day mask is
//! precomputed so the enumerator's conflict checks stay cheap.

use crate::models::time::times_overlap;

/// Bit assigned to each weekday in a section's day mask.
pub const MON: u8 = 0x01;
pub const TUE: u8 = 0x02;
pub const WED: u8 = 0x04;
pub const THU: u8 = 0x08;
pub const FRI: u8 = 0x10;
pub const SAT: u8 = 0x20;
pub const SUN: u8 = 0x40;

/// Map a single day token to its bit. Accepts the catalog's common
/// abbreviations with surrounding whitespace; unknown tokens map to 0.
pub fn day_bit(token: &str) -> u8 {
    match token.trim() {
        "Mon" | "Monday" => MON,
        "Tue" | "Tues" | "Tu" | "Tuesday" => TUE,
        "Wed" | "Wednesday" => WED,
        "Thu" | "Thur" | "Thurs" | "Th" | "Thursday" => THU,
        "Fri" | "Friday" => FRI,
        "Sat" | "Saturday" => SAT,
        "Sun" | "Sunday" => SUN,
        _ => 0,
    }
}

/// Canonical day names for a mask, Monday first.
pub fn day_names(bits: u8) -> Vec<&'static str> {
    const ORDER: [(u8, &str); 7] = [
        (MON, "Mon"),
        (TUE, "Tue"),
        (WED, "Wed"),
        (THU, "Thu"),
        (FRI, "Fri"),
        (SAT, "Sat"),
        (SUN, "Sun"),
    ];
    ORDER
        .iter()
        .filter(|(bit, _)| bits & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// One scheduled meeting of a course.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Section type string as stored in the catalog ("Lecture", "Lab", …).
    pub section_type: String,
    /// Normalized day names.
    pub meeting_days: Vec<String>,
    /// 7-bit day mask derived from `meeting_days`.
    pub day_bits: u8,
    /// "h:mm am/pm", empty, or "TBA".
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    /// Raw instructor string; may arrive brace/quote-wrapped.
    pub instructor: String,
    pub num_registered: i32,
    pub num_seats: i32,
    /// Opaque identifier, unique per course.
    pub section_number: String,
    /// Empty, or the `section_number` of the lecture this child is locked to.
    pub parent_section_number: String,
}

impl Section {
    /// Build a section, normalizing the raw day strings.
    ///
    /// Each incoming day entry may be brace-wrapped and comma-separated
    /// ("{Mon, Wed}"); entries are split, trimmed, and kept verbatim while
    /// the day mask accumulates their bits.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        section_type: impl Into<String>,
        raw_days: &[String],
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        location: impl Into<String>,
        instructor: impl Into<String>,
        num_registered: i32,
        num_seats: i32,
        section_number: impl Into<String>,
        parent_section_number: impl Into<String>,
    ) -> Self {
        let mut meeting_days = Vec::new();
        for entry in raw_days {
            let stripped: String = entry.chars().filter(|&c| c != '{' && c != '}').collect();
            for token in stripped.split(',') {
                let token = token.trim();
                if !token.is_empty() {
                    meeting_days.push(token.to_string());
                }
            }
        }
        let day_bits = meeting_days.iter().map(|d| day_bit(d)).fold(0, |a, b| a | b);

        Self {
            section_type: section_type.into(),
            meeting_days,
            day_bits,
            start_time: start_time.into(),
            end_time: end_time.into(),
            location: location.into(),
            instructor: instructor.into(),
            num_registered,
            num_seats,
            section_number: section_number.into(),
            parent_section_number: parent_section_number.into(),
        }
    }

    /// Whether enrollment has reached capacity.
    pub fn is_full(&self) -> bool {
        self.num_registered >= self.num_seats
    }

    /// Whether this section meets at the same time as another on a shared
    /// day. Sections without days or with unknown times never conflict.
    pub fn conflicts_with(&self, other: &Section) -> bool {
        if self.day_bits & other.day_bits == 0 {
            return false;
        }
        times_overlap(
            &self.start_time,
            &self.end_time,
            &other.start_time,
            &other.end_time,
        )
    }
}
