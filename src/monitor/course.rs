use std::fmt;

/// Opaque, case-normalized course identifier.
///
/// Construction trims and ASCII-uppercases, so equality is exact string
/// match on the normalized form. A code appears at most once in the
/// tracked set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseCode(String);

impl CourseCode {
    /// Normalize a raw token into a course code.
    ///
    /// Returns `None` for tokens that are empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
