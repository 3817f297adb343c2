//! Literal substring search over a [`TextBuffer`].

use regex::Regex;

use super::{Position, TextBuffer, TextRange};

/// A match location in the buffer, `[start, end)`.
pub type SearchMatch = TextRange;

/// Search direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// Build a matcher for `query` taken literally and case-sensitively.
/// An empty query matches nothing.
fn literal_regex(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    Regex::new(&regex::escape(query)).ok()
}

impl TextBuffer {
    /// All non-overlapping occurrences of `query`, left to right.
    pub fn find_all(&self, query: &str) -> Vec<SearchMatch> {
        let Some(regex) = literal_regex(query) else {
            return Vec::new();
        };
        let text = self.text();
        regex
            .find_iter(&text)
            .map(|m| self.byte_span_to_range(m.start(), m.end()))
            .collect()
    }

    /// Find `query` starting at `from`.
    ///
    /// Forward: the first match starting at or after `from`; when there is
    /// none before the end of the buffer, wraps to the start once and
    /// returns the first match anywhere. Backward mirrors this with the
    /// last match ending at or before `from`. `None` means the query never
    /// occurs.
    pub fn search(
        &self,
        query: &str,
        from: Position,
        direction: SearchDirection,
    ) -> Option<SearchMatch> {
        let regex = literal_regex(query)?;
        let text = self.text();
        let from_byte = self.rope_char_to_byte(self.pos_to_char(from));

        let found = match direction {
            SearchDirection::Forward => regex
                .find_at(&text, from_byte)
                .or_else(|| regex.find(&text)),
            SearchDirection::Backward => {
                let mut before = None;
                let mut last = None;
                for m in regex.find_iter(&text) {
                    if m.end() <= from_byte {
                        before = Some(m);
                    }
                    last = Some(m);
                }
                before.or(last)
            }
        }?;

        Some(self.byte_span_to_range(found.start(), found.end()))
    }

    fn byte_span_to_range(&self, start_byte: usize, end_byte: usize) -> TextRange {
        let start = self.char_to_pos(self.rope_byte_to_char(start_byte));
        let end = self.char_to_pos(self.rope_byte_to_char(end_byte));
        TextRange { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(l1: usize, c1: usize, l2: usize, c2: usize) -> SearchMatch {
        TextRange::new(Position::at(l1, c1), Position::at(l2, c2))
    }

    #[test]
    fn test_find_all_simple() {
        let buf = TextBuffer::from_text("hello world\nhello there");
        assert_eq!(buf.find_all("hello"), vec![m(1, 0, 1, 5), m(2, 0, 2, 5)]);
    }

    #[test]
    fn test_find_all_is_case_sensitive() {
        let buf = TextBuffer::from_text("Hello HELLO hello");
        assert_eq!(buf.find_all("hello"), vec![m(1, 12, 1, 17)]);
    }

    #[test]
    fn test_find_all_non_overlapping() {
        let buf = TextBuffer::from_text("aaaa");
        assert_eq!(buf.find_all("aa"), vec![m(1, 0, 1, 2), m(1, 2, 1, 4)]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let buf = TextBuffer::from_text("a.c abc (x)");
        assert_eq!(buf.find_all("a.c"), vec![m(1, 0, 1, 3)]);
        assert_eq!(buf.find_all("(x)"), vec![m(1, 8, 1, 11)]);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let buf = TextBuffer::from_text("abc");
        assert!(buf.find_all("").is_empty());
        assert!(buf
            .search("", Position::start(), SearchDirection::Forward)
            .is_none());
    }

    #[test]
    fn test_forward_search_from_cursor() {
        let buf = TextBuffer::from_text("abcXabc");
        let found = buf.search("abc", Position::at(1, 1), SearchDirection::Forward);
        assert_eq!(found, Some(m(1, 4, 1, 7)));
    }

    #[test]
    fn test_forward_search_wraps_around() {
        let buf = TextBuffer::from_text("abcXabc");
        let found = buf.search("abc", Position::at(1, 7), SearchDirection::Forward);
        assert_eq!(found, Some(m(1, 0, 1, 3)));
    }

    #[test]
    fn test_search_missing_query() {
        let buf = TextBuffer::from_text("abcXabc");
        assert!(buf
            .search("zzz", Position::start(), SearchDirection::Forward)
            .is_none());
    }

    #[test]
    fn test_multiline_query() {
        let buf = TextBuffer::from_text("one\ntwo\nthree");
        let found = buf.search("o\nth", Position::start(), SearchDirection::Forward);
        assert_eq!(found, Some(m(2, 2, 3, 2)));
    }

    #[test]
    fn test_backward_search_and_wrap() {
        let buf = TextBuffer::from_text("ab ab ab");
        assert_eq!(
            buf.search("ab", Position::at(1, 5), SearchDirection::Backward),
            Some(m(1, 3, 1, 5))
        );
        assert_eq!(
            buf.search("ab", Position::at(1, 1), SearchDirection::Backward),
            Some(m(1, 6, 1, 8))
        );
    }

    #[test]
    fn test_unicode_offsets() {
        let buf = TextBuffer::from_text("ünïcödé text\nmore ünïcödé");
        assert_eq!(buf.find_all("cödé"), vec![m(1, 3, 1, 7), m(2, 8, 2, 12)]);
    }
}
