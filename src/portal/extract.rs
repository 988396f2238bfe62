//! Vacancy extraction from one slot's listing markup.

use std::collections::BTreeMap;

use crate::html;
use crate::monitor::CourseCode;

/// Class of the badge element carrying the vacancy count inside a cell.
const VACANCY_BADGE_CLASS: &str = "badge badge-success";

/// Outcome of reading one course's vacancy from a listing.
///
/// `Unreadable` is not an error: the course was sighted but the badge was
/// absent or not an integer, which callers must treat distinctly from a
/// low numeric vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vacancy {
    Seats(u32),
    Unreadable,
}

/// Scan a slot listing for the pending courses and report, per course
/// sighted, its vacancy.
///
/// The listing is a table-like fragment; every `<td>` cell is flattened
/// to visible text and a pending course hits when its code appears as a
/// substring of that text. This loose match is intentional and carries a
/// known false-positive risk (a code that is a prefix of another code's
/// cell text also hits). Cells with no pending hit are skipped before any
/// badge lookup. The first sighting of a course in document order wins,
/// so each course gets exactly one outcome per listing.
pub fn extract(markup: &str, pending: &[CourseCode]) -> BTreeMap<CourseCode, Vacancy> {
    let mut sightings = BTreeMap::new();
    if pending.is_empty() {
        return sightings;
    }

    for cell in html::table_cells(markup) {
        let text = html::visible_text(cell);
        let hits: Vec<&CourseCode> = pending
            .iter()
            .filter(|code| !sightings.contains_key(*code) && text.contains(code.as_str()))
            .collect();
        if hits.is_empty() {
            continue;
        }

        let vacancy = html::element_with_class(cell, "span", VACANCY_BADGE_CLASS)
            .and_then(|inner| html::visible_text(inner).parse::<u32>().ok())
            .map_or(Vacancy::Unreadable, Vacancy::Seats);

        for code in hits {
            sightings.insert(code.clone(), vacancy);
        }
    }

    sightings
}
