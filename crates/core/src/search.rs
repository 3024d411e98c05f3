//! Listing and filtering helpers shared by the repository and API layers.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows per page for recipe and ingredient listings.
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Name filters
// ---------------------------------------------------------------------------

/// Build a case-insensitive `ILIKE` substring pattern from free text.
///
/// Returns `None` for blank input so callers can skip the filter entirely.
/// `%`, `_` and `\` are escaped so user text never acts as a wildcard.
pub fn name_filter_pattern(query: Option<&str>) -> Option<String> {
    let trimmed = query?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(trimmed.len() + 2);
    escaped.push('%');
    for ch in trimmed.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
