//! In-memory catalog backend.
//!
//! Mirrors the Postgres lookup rules over plain maps: canonical-name,
//! course-specific rating matches first, then a professor-wide substring
//! fallback. Used by the test suites and for offline experimentation.

use std::collections::{BTreeSet, HashMap};

use crate::db::catalog::{canonicalize, strip_name_wrapping, Catalog, CatalogProvider, ProfessorRating};
use crate::db::error::CatalogResult;
use crate::models::Section;

/// Catalog entirely held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    sections: HashMap<String, Vec<Section>>,
    /// Course-specific ratings keyed by (canonical professor, canonical course).
    course_ratings: HashMap<(String, String), ProfessorRating>,
    /// Professor-wide ratings keyed by the professor's display name.
    professor_ratings: HashMap<String, ProfessorRating>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section under a course code.
    pub fn add_section(&mut self, course_code: &str, section: Section) -> &mut Self {
        self.sections
            .entry(course_code.to_string())
            .or_default()
            .push(section);
        self
    }

    /// Register a course-specific rating for a professor.
    pub fn add_course_rating(
        &mut self,
        professor_name: &str,
        course_code: &str,
        rating: ProfessorRating,
    ) -> &mut Self {
        self.course_ratings.insert(
            (canonicalize(professor_name), canonicalize(course_code)),
            rating,
        );
        self
    }

    /// Register a professor-wide rating.
    pub fn add_professor_rating(
        &mut self,
        professor_name: &str,
        rating: ProfessorRating,
    ) -> &mut Self {
        self.professor_ratings
            .insert(professor_name.to_string(), rating);
        self
    }
}

impl Catalog for MemoryCatalog {
    fn fetch_sections(&mut self, course_code: &str) -> CatalogResult<Vec<Section>> {
        Ok(self.sections.get(course_code).cloned().unwrap_or_default())
    }

    fn fetch_required_types(&mut self, course_code: &str) -> CatalogResult<BTreeSet<String>> {
        let mut types: BTreeSet<String> = self
            .sections
            .get(course_code)
            .map(|sections| {
                sections
                    .iter()
                    .map(|s| s.section_type.clone())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();
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

        let key = (canonicalize(&name), canonicalize(course_code));
        if let Some(rating) = self.course_ratings.get(&key) {
            return Ok(*rating);
        }

        // Substring fallback, like the store's ILIKE %name% path.
        let needle = name.to_lowercase();
        let found = self
            .professor_ratings
            .iter()
            .find(|(stored, _)| stored.to_lowercase().contains(&needle))
            .map(|(_, rating)| *rating);
        Ok(found.unwrap_or_default())
    }
}

impl CatalogProvider for MemoryCatalog {
    type Catalog = MemoryCatalog;

    fn open(&self) -> CatalogResult<MemoryCatalog> {
        Ok(self.clone())
    }
}
