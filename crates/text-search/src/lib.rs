//! Text search and replace for tabpad.
//!
//! Stateless operations over a [`TextBuffer`]: find next with wraparound,
//! replace the highlighted match, replace every occurrence. Matching is
//! literal and case-sensitive. Finding nothing is a normal outcome and is
//! reported through the return value, never as an error.

use tabpad_buffer::{SearchDirection, SearchMatch, TextBuffer};

/// Find the next occurrence of `query` from the cursor, wrapping once.
///
/// On a match the cursor moves to the match end and the match becomes the
/// buffer's highlight. Without a match the buffer is left untouched.
pub fn find_next(buffer: &mut TextBuffer, query: &str) -> Option<SearchMatch> {
    let found = buffer.search(query, buffer.cursor(), SearchDirection::Forward)?;
    buffer.set_cursor(found.end);
    buffer.set_highlight(found);
    Some(found)
}

/// Find the previous occurrence of `query` before the cursor, wrapping once.
///
/// The cursor moves to the match start so repeated calls keep walking back.
pub fn find_previous(buffer: &mut TextBuffer, query: &str) -> Option<SearchMatch> {
    let from = match buffer.highlight() {
        Some(current) => current.start,
        None => buffer.cursor(),
    };
    let found = buffer.search(query, from, SearchDirection::Backward)?;
    buffer.set_cursor(found.start);
    buffer.set_highlight(found);
    Some(found)
}

/// Replace the highlighted match with `replacement`.
///
/// Without a highlight holding `query` this first runs [`find_next`]; if
/// that finds nothing, nothing changes. Returns true iff a replacement
/// happened. The highlight is cleared afterwards.
pub fn replace_one(buffer: &mut TextBuffer, query: &str, replacement: &str) -> bool {
    if query.is_empty() {
        return false;
    }

    let current = buffer
        .highlight()
        .filter(|range| buffer.get_text(*range) == query);
    let target = match current {
        Some(range) => range,
        None => match find_next(buffer, query) {
            Some(found) => found,
            None => return false,
        },
    };

    buffer.replace_range(target, replacement);
    buffer.clear_highlight();
    true
}

/// Replace every non-overlapping occurrence of `query`, left to right.
///
/// Returns the number of replacements; 0 leaves the buffer unchanged.
/// An empty query is rejected and replaces nothing. The whole batch is a
/// single undo step.
pub fn replace_all(buffer: &mut TextBuffer, query: &str, replacement: &str) -> usize {
    let matches = buffer.find_all(query);
    if matches.is_empty() {
        return 0;
    }

    // Replace in reverse order so earlier match positions stay valid
    buffer.edit_group(|buf| {
        for found in matches.iter().rev() {
            buf.replace_range(*found, replacement);
        }
    });

    matches.len()
}

/// Number of occurrences of `query` in the buffer.
pub fn count_matches(buffer: &TextBuffer, query: &str) -> usize {
    buffer.find_all(query).len()
}
