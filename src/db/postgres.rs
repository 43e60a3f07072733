//! Postgres catalog backend.
//!
//! Implements the store contract over the `courses` / `sections` /
//! `professors` / `prof_course_ratings` tables. The section query
//! resolves `parent_section_id` back to the parent's `section_number`
//! with a self-join; the rating lookup tries an exact canonical-name,
//! course-specific match first and falls back to a professor-wide
//! substring match.

use std::collections::BTreeSet;

use diesel::pg::PgConnection;
use diesel::sql_types::{Double, Integer, Nullable, Text};
use diesel::{sql_query, Connection, QueryableByName, RunQueryDsl};

use crate::db::catalog::{strip_name_wrapping, Catalog, CatalogProvider, ProfessorRating};
use crate::db::config::DbConfig;
use crate::db::error::CatalogResult;
use crate::models::Section;

const SECTIONS_QUERY: &str = "\
    SELECT s.type AS section_type, s.days_of_week, s.start_time, s.end_time, \
           s.location, s.num_students_enrolled, s.num_seats, s.instructors, \
           s.section_number, p.section_number AS parent_section_number \
    FROM sections s \
    LEFT JOIN sections p ON s.parent_section_id = p.id \
    JOIN courses c ON s.course_id = c.id \
    WHERE c.code = $1 AND c.semester = $2";

const REQUIRED_TYPES_QUERY: &str = "\
    SELECT DISTINCT s.type AS section_type \
    FROM sections s \
    JOIN courses c ON s.course_id = c.id \
    WHERE c.code = $1 AND c.semester = $2";

const COURSE_RATING_QUERY: &str = "\
    SELECT COALESCE(pcr.avg_quality, 0) AS course_quality, \
           COALESCE(pcr.avg_difficulty, 0) AS course_difficulty, \
           COALESCE(p.would_take_again_percent, 0) AS would_take_again, \
           COALESCE(p.avg_rating, 0) AS quality, \
           COALESCE(p.avg_difficulty, 0) AS difficulty \
    FROM professors p \
    JOIN prof_course_ratings pcr ON p.id = pcr.professor_id \
    WHERE lower(regexp_replace(p.name, '[^A-Za-z0-9]', '', 'g')) \
          = lower(regexp_replace($1, '[^A-Za-z0-9]', '', 'g')) \
      AND lower(regexp_replace(pcr.course_code, '[^A-Za-z0-9]', '', 'g')) \
          = lower(regexp_replace($2, '[^A-Za-z0-9]', '', 'g')) \
    ORDER BY pcr.num_reviews DESC \
    LIMIT 1";

const PROFESSOR_RATING_QUERY: &str = "\
    SELECT avg_rating, avg_difficulty, would_take_again_percent \
    FROM professors \
    WHERE name ILIKE $1 \
    LIMIT 1";

#[derive(QueryableByName)]
struct SectionRow {
    #[diesel(sql_type = Text)]
    section_type: String,
    #[diesel(sql_type = Nullable<Text>)]
    days_of_week: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    start_time: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    end_time: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    location: Option<String>,
    #[diesel(sql_type = Nullable<Integer>)]
    num_students_enrolled: Option<i32>,
    #[diesel(sql_type = Nullable<Integer>)]
    num_seats: Option<i32>,
    #[diesel(sql_type = Nullable<Text>)]
    instructors: Option<String>,
    #[diesel(sql_type = Text)]
    section_number: String,
    #[diesel(sql_type = Nullable<Text>)]
    parent_section_number: Option<String>,
}

#[derive(QueryableByName)]
struct SectionTypeRow {
    #[diesel(sql_type = Text)]
    section_type: String,
}

#[derive(QueryableByName)]
struct CourseRatingRow {
    #[diesel(sql_type = Double)]
    course_quality: f64,
    #[diesel(sql_type = Double)]
    course_difficulty: f64,
    #[diesel(sql_type = Double)]
    would_take_again: f64,
    #[diesel(sql_type = Double)]
    quality: f64,
    #[diesel(sql_type = Double)]
    difficulty: f64,
}

#[derive(QueryableByName)]
struct ProfessorRatingRow {
    #[diesel(sql_type = Nullable<Double>)]
    avg_rating: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    avg_difficulty: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    would_take_again_percent: Option<f64>,
}

impl From<SectionRow> for Section {
    fn from(row: SectionRow) -> Self {
        let raw_days: Vec<String> = row
            .days_of_week
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Section::new(
            row.section_type,
            &raw_days,
            row.start_time.unwrap_or_default(),
            row.end_time.unwrap_or_default(),
            row.location.unwrap_or_default(),
            row.instructors.unwrap_or_default(),
            row.num_students_enrolled.unwrap_or(0),
            row.num_seats.unwrap_or(0),
            row.section_number,
            row.parent_section_number.unwrap_or_default(),
        )
    }
}

/// Catalog backed by a single Postgres connection.
pub struct PgCatalog {
    conn: PgConnection,
    semester: String,
}

impl PgCatalog {
    /// Establish a connection for the configured store.
    pub fn connect(config: &DbConfig) -> CatalogResult<Self> {
        let conn = PgConnection::establish(&config.connection_string())?;
        Ok(Self {
            conn,
            semester: config.semester.clone(),
        })
    }
}

impl Catalog for PgCatalog {
    fn fetch_sections(&mut self, course_code: &str) -> CatalogResult<Vec<Section>> {
        let rows: Vec<SectionRow> = sql_query(SECTIONS_QUERY)
            .bind::<Text, _>(course_code)
            .bind::<Text, _>(&self.semester)
            .load(&mut self.conn)?;
        Ok(rows.into_iter().map(Section::from).collect())
    }

    fn fetch_required_types(&mut self, course_code: &str) -> CatalogResult<BTreeSet<String>> {
        let rows: Vec<SectionTypeRow> = sql_query(REQUIRED_TYPES_QUERY)
            .bind::<Text, _>(course_code)
            .bind::<Text, _>(&self.semester)
            .load(&mut self.conn)?;

        let mut types: BTreeSet<String> = rows
            .into_iter()
            .map(|r| r.section_type)
            .filter(|t| !t.is_empty())
            .collect();
        if types.is_empty() {
            types.insert("Lecture".to_string());
        }
        Ok(types)
    }

    fn fetch_professor_rating(
        &mut self,
        professor_name: &str,
        course_code: &str,
    ) -> CatalogResult<ProfessorRating> {
        let name = strip_name_wrapping(professor_name);
        if name.is_empty() {
            return Ok(ProfessorRating::default());
        }

        let course_rows: Vec<CourseRatingRow> = sql_query(COURSE_RATING_QUERY)
            .bind::<Text, _>(&name)
            .bind::<Text, _>(course_code)
            .load(&mut self.conn)?;
        if let Some(row) = course_rows.into_iter().next() {
            return Ok(ProfessorRating {
                quality: row.quality,
                difficulty: row.difficulty,
                would_take_again: row.would_take_again,
                course_specific_quality: row.course_quality,
                course_specific_difficulty: row.course_difficulty,
            });
        }

        let pattern = format!("%{}%", name);
        let prof_rows: Vec<ProfessorRatingRow> = sql_query(PROFESSOR_RATING_QUERY)
            .bind::<Text, _>(&pattern)
            .load(&mut self.conn)?;
        let mut rating = ProfessorRating::default();
        if let Some(row) = prof_rows.into_iter().next() {
            rating.quality = row.avg_rating.unwrap_or(0.0);
            rating.difficulty = row.avg_difficulty.unwrap_or(0.0);
            rating.would_take_again = row.would_take_again_percent.unwrap_or(0.0);
        }
        Ok(rating)
    }
}

/// Provider opening one [`PgCatalog`] connection per call.
#[derive(Debug, Clone)]
pub struct PgCatalogProvider {
    config: DbConfig,
}

impl PgCatalogProvider {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }
}

impl CatalogProvider for PgCatalogProvider {
    type Catalog = PgCatalog;

    fn open(&self) -> CatalogResult<PgCatalog> {
        PgCatalog::connect(&self.config)
    }
}
