//! Command-line surface.
//!
//! Flag values are parsed leniently: a malformed field is skipped with a
//! warning and its default is used, so one bad token never aborts a run.

use clap::Parser;
use tracing::warn;

use crate::db::DbConfig;
use crate::models::section::day_bit;
use crate::models::{LectureLength, TimeOfDay, UserPreferences};

/// Weekly schedule builder over the section catalog.
#[derive(Parser, Debug, Default)]
#[command(name = "usc-scheduler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Spots separated by '|'; alternative courses within a spot by ','.
    /// The literal NONE marks an empty spot.
    #[arg(long, value_name = "SPOTS")]
    pub class_spots: Option<String>,

    /// Six pipe-separated fields:
    /// time_of_day|days_off_csv|lecture_length|avoid_labs|avoid_discussions|exclude_full
    #[arg(long, value_name = "FIELDS")]
    pub preferences: Option<String>,

    /// Emit the JSON report on stdout instead of the readable listing
    #[arg(long)]
    pub json: bool,

    /// Catalog database name (also USC_DB_NAME)
    #[arg(long, value_name = "NAME")]
    pub db_name: Option<String>,

    /// Catalog login role (also USC_DB_USER)
    #[arg(long, value_name = "USER")]
    pub db_user: Option<String>,

    /// Catalog login password (also USC_DB_PASSWORD)
    #[arg(long, value_name = "PASSWORD")]
    pub db_password: Option<String>,

    /// Catalog host (also USC_DB_HOST)
    #[arg(long, value_name = "HOST")]
    pub db_host: Option<String>,

    /// Catalog port (also USC_DB_PORT)
    #[arg(long, value_name = "PORT")]
    pub db_port: Option<String>,

    /// Semester code to query, e.g. 20253
    #[arg(long, value_name = "CODE")]
    pub semester: Option<String>,
}

impl Cli {
    /// Store configuration: defaults, then environment, then flags.
    pub fn db_config(&self) -> DbConfig {
        let mut config = DbConfig::from_env();
        if let Some(name) = &self.db_name {
            config.name = name.clone();
        }
        if let Some(user) = &self.db_user {
            config.user = user.clone();
        }
        if let Some(password) = &self.db_password {
            config.password = password.clone();
        }
        if let Some(host) = &self.db_host {
            config.host = host.clone();
        }
        if let Some(port) = &self.db_port {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(port = %port, "ignoring non-numeric --db-port"),
            }
        }
        if let Some(semester) = &self.semester {
            config.semester = semester.clone();
        }
        config
    }

    /// The parsed spot list; empty when no spots were supplied.
    pub fn spots(&self) -> Vec<Vec<String>> {
        self.class_spots
            .as_deref()
            .map(parse_class_spots)
            .unwrap_or_default()
    }

    /// The parsed preference set; defaults when the flag is absent.
    pub fn preferences(&self) -> UserPreferences {
        self.preferences
            .as_deref()
            .map(parse_preferences)
            .unwrap_or_default()
    }
}

/// Parse the `--class-spots` grammar. `NONE` and empty groups are
/// dropped; course codes are trimmed.
pub fn parse_class_spots(raw: &str) -> Vec<Vec<String>> {
    raw.split('|')
        .filter_map(|group| {
            let group = group.trim();
            if group.is_empty() || group == "NONE" {
                return None;
            }
            let spot: Vec<String> = group
                .split(',')
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect();
            if spot.is_empty() {
                None
            } else {
                Some(spot)
            }
        })
        .collect()
}

/// Parse the six `--preferences` fields. Missing trailing fields keep
/// their defaults; unrecognized values warn and fall back.
pub fn parse_preferences(raw: &str) -> UserPreferences {
    let mut fields: Vec<&str> = raw.split('|').map(str::trim).collect();
    fields.resize(6, "");

    let mut prefs = UserPreferences::default();

    prefs.time_of_day = match fields[0] {
        "morning" => TimeOfDay::Morning,
        "afternoon" => TimeOfDay::Afternoon,
        "evening" => TimeOfDay::Evening,
        "" | "none" | "no-preference" => TimeOfDay::None,
        other => {
            warn!(value = other, "unknown time-of-day preference, ignoring");
            TimeOfDay::None
        }
    };

    if !fields[1].is_empty() && fields[1] != "none" {
        for day in fields[1].split(',') {
            let day = day.trim();
            if day.is_empty() {
                continue;
            }
            if day_bit(day) == 0 {
                warn!(value = day, "unknown day-off token, ignoring");
                continue;
            }
            prefs.days_off.push(day.to_string());
        }
    }

    prefs.lecture_length = match fields[2] {
        "shorter" => LectureLength::Shorter,
        "longer" => LectureLength::Longer,
        "" | "none" | "no-preference" => LectureLength::None,
        other => {
            warn!(value = other, "unknown lecture-length preference, ignoring");
            LectureLength::None
        }
    };

    prefs.avoid_labs = fields[3] == "1";
    prefs.avoid_discussions = fields[4] == "1";
    // Defaults to true; only an explicit 0 turns it off.
    match fields[5] {
        "1" | "" => {}
        "0" => prefs.exclude_full_sections = false,
        other => warn!(value = other, "unknown exclude-full flag, ignoring"),
    }

    prefs
}
