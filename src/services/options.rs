//! Spot-option materialization.
//!
//! For every course a spot offers, the catalog's sections are grouped by
//! type and combined into *packages*: one anchor lecture plus one
//! compatible section of every other required type. Children locked to a
//! different lecture (via `parent_section_number`) never pair with an
//! anchor they do not belong to.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::db::{Catalog, CatalogResult};
use crate::models::{ScheduleItem, Section, SpotOptions, UserPreferences};

/// Materialize the option list for every spot.
///
/// A course with no usable sections is skipped (its spot may still
/// succeed through an alternative course). A spot whose courses all
/// yield nothing produces an empty option list, which the enumerator
/// turns into an empty result.
pub fn prepare_spot_options<C: Catalog>(
    catalog: &mut C,
    class_spots: &[Vec<String>],
    prefs: &UserPreferences,
) -> CatalogResult<Vec<SpotOptions>> {
    let mut result = Vec::with_capacity(class_spots.len());

    for (spot_idx, spot) in class_spots.iter().enumerate() {
        let mut options: SpotOptions = Vec::new();

        for raw_code in spot {
            let code = raw_code.trim();
            let sections = catalog.fetch_sections(code)?;
            if sections.is_empty() {
                warn!(course = code, "course has no sections, skipping");
                continue;
            }
            materialize_course(code, sections, prefs, spot_idx, &mut options);
        }

        debug!(spot = spot_idx, packages = options.len(), "spot materialized");
        result.push(options);
    }

    Ok(result)
}

/// No two sections of one package may meet at the same time.
fn internally_conflict_free(sections: &[Section]) -> bool {
    for (i, a) in sections.iter().enumerate() {
        for b in &sections[i + 1..] {
            if a.conflicts_with(b) {
                return false;
            }
        }
    }
    true
}

/// Build every valid package of one course and append it to `options`.
fn materialize_course(
    code: &str,
    sections: Vec<Section>,
    prefs: &UserPreferences,
    spot_idx: usize,
    options: &mut SpotOptions,
) {
    // Group by section type; BTreeMap keeps group order deterministic.
    let mut by_type: BTreeMap<String, Vec<Section>> = BTreeMap::new();
    for section in sections {
        by_type.entry(section.section_type.clone()).or_default().push(section);
    }
    let mut groups: Vec<Vec<Section>> = by_type.into_values().collect();

    if prefs.exclude_full_sections {
        for group in &mut groups {
            group.retain(|s| !s.is_full());
        }
    }
    if groups.iter().all(|g| g.is_empty()) {
        warn!(course = code, "all sections filtered out, skipping course");
        return;
    }

    // Anchor group: the first containing "Lecture", otherwise the first
    // that survived filtering.
    let anchor_idx = groups
        .iter()
        .position(|g| !g.is_empty() && g[0].section_type.contains("Lecture"))
        .or_else(|| groups.iter().position(|g| !g.is_empty()));
    let Some(anchor_idx) = anchor_idx else {
        return;
    };

    for anchor in &groups[anchor_idx] {
        let mut partner_lists: Vec<Vec<&Section>> = Vec::new();
        let mut anchor_feasible = true;

        for (gi, group) in groups.iter().enumerate() {
            if gi == anchor_idx {
                continue;
            }
            let filtered: Vec<&Section> = group
                .iter()
                .filter(|s| {
                    s.parent_section_number.is_empty()
                        || anchor.section_number.is_empty()
                        || s.parent_section_number == anchor.section_number
                })
                .collect();
            if filtered.is_empty() {
                debug!(
                    course = code,
                    anchor = %anchor.section_number,
                    "anchor dropped, empty partner group"
                );
                anchor_feasible = false;
                break;
            }
            partner_lists.push(filtered);
        }
        if !anchor_feasible {
            continue;
        }

        if partner_lists.is_empty() {
            // The course only offers the anchor type.
            options.push(ScheduleItem {
                spot_idx,
                class_code: code.to_string(),
                pkg_idx: options.len(),
                sections: vec![anchor.clone()],
            });
            continue;
        }

        // Odometer over the partner lists: the first list spins fastest.
        let mut cursor = vec![0usize; partner_lists.len()];
        'odometer: loop {
            let mut sections = Vec::with_capacity(1 + partner_lists.len());
            sections.push(anchor.clone());
            for (k, list) in partner_lists.iter().enumerate() {
                sections.push(list[cursor[k]].clone());
            }
            if internally_conflict_free(&sections) {
                options.push(ScheduleItem {
                    spot_idx,
                    class_code: code.to_string(),
                    pkg_idx: options.len(),
                    sections,
                });
            }

            let mut k = 0;
            loop {
                if k == cursor.len() {
                    break 'odometer;
                }
                cursor[k] += 1;
                if cursor[k] < partner_lists[k].len() {
                    break;
                }
                cursor[k] = 0;
                k += 1;
            }
        }
    }
}
