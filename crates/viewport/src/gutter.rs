use super::Viewport;

/// Minimum gutter width in digits
const MIN_DIGITS: usize = 2;

/// Line numbers shown next to the text view.
///
/// A snapshot derived from the buffer's line count and the shared viewport;
/// it owns no state of its own. Derive a new one after every edit, scroll,
/// resize or tab switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumberGutter {
    total_lines: usize,
    offset: usize,
    height: usize,
}

impl LineNumberGutter {
    /// Derive the gutter for a document of `total_lines` shown in `viewport`
    pub fn derive(total_lines: usize, viewport: &Viewport) -> Self {
        Self {
            total_lines: total_lines.max(1),
            offset: viewport.offset(),
            height: viewport.height(),
        }
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Vertical offset, identical to the text view's
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Width of the number column in characters
    pub fn width(&self) -> usize {
        digits(self.total_lines).max(MIN_DIGITS)
    }

    /// Every label, "1" through "N"
    pub fn labels(&self) -> impl Iterator<Item = String> {
        (1..=self.total_lines).map(|n| n.to_string())
    }

    /// Labels of the lines currently on screen
    pub fn visible_labels(&self) -> Vec<String> {
        self.visible_range().map(|n| n.to_string()).collect()
    }

    /// Visible labels right-aligned to the gutter width
    pub fn render(&self) -> Vec<String> {
        let width = self.width();
        self.visible_range()
            .map(|n| format!("{:>width$}", n, width = width))
            .collect()
    }

    fn visible_range(&self) -> std::ops::RangeInclusive<usize> {
        let first = (self.offset + 1).min(self.total_lines);
        let last = (self.offset + self.height).min(self.total_lines);
        first..=last
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
