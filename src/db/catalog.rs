//! Catalog access traits shared by the Postgres and in-memory backends.

use std::collections::BTreeSet;

use crate::db::error::CatalogResult;
use crate::models::Section;

/// Aggregated professor quality numbers for one (professor, course) pair.
///
/// Missing data is represented as zeros; the evaluator treats an
/// all-zero quality pair as "no rating".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProfessorRating {
    /// Professor-wide average quality (0-5).
    pub quality: f64,
    /// Professor-wide average difficulty (0-5).
    pub difficulty: f64,
    /// Would-take-again percentage (0-100).
    pub would_take_again: f64,
    /// Average quality for the specific course (0-5).
    pub course_specific_quality: f64,
    /// Average difficulty for the specific course (0-5).
    pub course_specific_difficulty: f64,
}

/// Read access to the section catalog and professor-rating store.
///
/// Methods take `&mut self` because backends may hold an exclusive
/// database connection.
pub trait Catalog {
    /// All sections of a course in the configured semester.
    fn fetch_sections(&mut self, course_code: &str) -> CatalogResult<Vec<Section>>;

    /// The set of section types the course offers this semester.
    /// Falls back to `{"Lecture"}` when the catalog lists none.
    fn fetch_required_types(&mut self, course_code: &str) -> CatalogResult<BTreeSet<String>>;

    /// Rating lookup for an instructor teaching a course. Unknown
    /// professors and empty names yield the all-zero rating.
    fn fetch_professor_rating(
        &mut self,
        professor_name: &str,
        course_code: &str,
    ) -> CatalogResult<ProfessorRating>;
}

/// Factory handing out independent catalog handles, one per worker.
pub trait CatalogProvider: Sync {
    type Catalog: Catalog;

    /// Open a fresh catalog handle (e.g. a new database connection).
    fn open(&self) -> CatalogResult<Self::Catalog>;
}

/// Strip the brace/quote wrapping that instructor names sometimes carry
/// in section records.
pub fn strip_name_wrapping(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c != '{' && c != '}' && c != '"')
        .collect()
}

/// Canonical form used for name and course-code comparison: lowercase
/// with every non-alphanumeric character removed.
pub fn canonicalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
