/// Raw wheel delta of one mouse-wheel notch
pub const WHEEL_DELTA_PER_NOTCH: i32 = 120;

/// A scroll coming from any view of a tab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// The text view scrolled itself to show `offset` lines above the top
    ToOffset(usize),
    /// A scrollbar was dragged to a fraction of the document (0.0 to 1.0)
    Fraction(f64),
    /// Scroll by whole lines (negative is up)
    Lines(isize),
    /// Scroll by pages of the current height (negative is up)
    Pages(isize),
    /// Raw wheel or trackpad delta; positive scrolls up.
    /// Partial notches accumulate until they add up to a whole one.
    Wheel(i32),
}

/// Viewport for virtual scrolling.
/// Tracks which part of document is visible on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// Lines scrolled off the top (0 shows line 1 first)
    offset: usize,
    /// Number of visible lines
    height: usize,
    /// Width of visible area in columns
    width: usize,
    /// Lines scrolled per wheel notch
    wheel_lines: usize,
    /// Wheel delta not yet turned into a whole notch
    wheel_remainder: i32,
}

impl Viewport {
    /// Create a new viewport
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            offset: 0,
            height: height.max(1),
            width,
            wheel_lines: 1,
            wheel_remainder: 0,
        }
    }

    /// Lines scrolled per wheel notch
    pub fn with_wheel_lines(mut self, lines: usize) -> Self {
        self.wheel_lines = lines.max(1);
        self
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// First visible line (1-based)
    pub fn first_visible_line(&self) -> usize {
        self.offset + 1
    }

    /// Last visible line (1-based, inclusive) for a document of `total_lines`
    pub fn last_visible_line(&self, total_lines: usize) -> usize {
        (self.offset + self.height).min(total_lines.max(1))
    }

    /// Check if a 1-based line is visible
    pub fn is_line_visible(&self, line: usize) -> bool {
        line > self.offset && line <= self.offset + self.height
    }

    /// Largest offset that still fills the view
    pub fn max_offset(&self, total_lines: usize) -> usize {
        total_lines.saturating_sub(self.height)
    }

    /// Update viewport dimensions, keeping the offset valid
    pub fn resize(&mut self, width: usize, height: usize, total_lines: usize) -> bool {
        self.width = width;
        self.height = height.max(1);
        self.set_offset(self.offset, total_lines)
    }

    /// Re-clamp after the document changed size
    pub fn clamp_to(&mut self, total_lines: usize) -> bool {
        self.set_offset(self.offset, total_lines)
    }

    /// Apply a scroll from any source.
    /// Returns true if viewport was changed.
    pub fn scroll(&mut self, request: ScrollRequest, total_lines: usize) -> bool {
        match request {
            ScrollRequest::ToOffset(offset) => self.set_offset(offset, total_lines),
            ScrollRequest::Fraction(fraction) => {
                let fraction = if fraction.is_finite() {
                    fraction.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let offset = (fraction * total_lines as f64).round() as usize;
                self.set_offset(offset, total_lines)
            }
            ScrollRequest::Lines(lines) => self.scroll_by(lines, total_lines),
            ScrollRequest::Pages(pages) => {
                self.scroll_by(pages.saturating_mul(self.height as isize), total_lines)
            }
            ScrollRequest::Wheel(delta) => {
                self.wheel_remainder = self.wheel_remainder.saturating_add(delta);
                let notches = self.wheel_remainder / WHEEL_DELTA_PER_NOTCH;
                self.wheel_remainder -= notches * WHEEL_DELTA_PER_NOTCH;
                let lines = -(notches as isize) * self.wheel_lines as isize;
                self.scroll_by(lines, total_lines)
            }
        }
    }

    /// Scroll viewport to make a 1-based line visible.
    /// Returns true if viewport was changed.
    pub fn ensure_line_visible(&mut self, line: usize, total_lines: usize) -> bool {
        let line = line.max(1);
        if line <= self.offset {
            self.set_offset(line - 1, total_lines)
        } else if line > self.offset + self.height {
            self.set_offset(line - self.height, total_lines)
        } else {
            false
        }
    }

    /// Center viewport on a 1-based line
    pub fn center_on_line(&mut self, line: usize, total_lines: usize) -> bool {
        let target = line.saturating_sub(1).saturating_sub(self.height / 2);
        self.set_offset(target, total_lines)
    }

    /// Visible portion as scrollbar fractions `(first, last)`
    pub fn fractions(&self, total_lines: usize) -> (f64, f64) {
        if total_lines == 0 {
            return (0.0, 1.0);
        }
        let total = total_lines as f64;
        let first = self.offset as f64 / total;
        let last = (self.offset + self.height).min(total_lines) as f64 / total;
        (first, last)
    }

    fn scroll_by(&mut self, lines: isize, total_lines: usize) -> bool {
        let offset = if lines < 0 {
            self.offset.saturating_sub(lines.unsigned_abs())
        } else {
            self.offset.saturating_add(lines as usize)
        };
        self.set_offset(offset, total_lines)
    }

    fn set_offset(&mut self, offset: usize, total_lines: usize) -> bool {
        let offset = offset.min(self.max_offset(total_lines));
        let changed = offset != self.offset;
        self.offset = offset;
        changed
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
