//! Text Measurement
//!
//! Text leaves are sized by the host through [`TextMeasure`]. The painter
//! implements it as well, so measurement and drawing agree on metrics.
//!
//! [`MonospaceMeasure`] is the fallback used by tests and terminal hosts:
//! every cell advances a fixed fraction of the font size. Widths come from
//! the Unicode East Asian Width tables and are summed per grapheme cluster,
//! so fullwidth text counts double and combining marks count nothing.

use taffy::geometry::Size;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Font attributes that influence text metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub weight: u16,
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { font_size: 14.0, weight: 400, italic: false }
    }
}

/// Host text metrics.
pub trait TextMeasure {
    /// Size of `text` rendered with `style`, in layout units.
    fn measure_text(&self, text: &str, style: &TextStyle) -> Size<f32>;
}

/// Fixed-advance metrics.
///
/// `advance` and `line_height` are multiples of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f32,
    pub line_height: f32,
}

impl MonospaceMeasure {
    /// One layout unit per terminal cell at font size 1.
    pub const TERMINAL: Self = Self { advance: 1.0, line_height: 1.0 };
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance: 0.6, line_height: 1.0 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure_text(&self, text: &str, style: &TextStyle) -> Size<f32> {
        if text.is_empty() {
            return Size { width: 0.0, height: 0.0 };
        }
        let size = style.font_size.max(0.0);
        let widest = text.split('\n').map(string_width).max().unwrap_or(0);
        Size {
            width: widest as f32 * self.advance * size,
            height: line_count(text) as f32 * self.line_height * size,
        }
    }
}

/// Display width of one character in cells. Control characters are zero.
#[inline]
pub fn char_width(c: char) -> u32 {
    c.width().unwrap_or(0) as u32
}

/// Display width of one grapheme cluster in cells.
///
/// Combining marks add nothing to their base. Emoji presentation
/// (`U+FE0F`), ZWJ sequences and regional-indicator flags take two cells.
pub fn grapheme_width(grapheme: &str) -> u32 {
    let Some(first) = grapheme.chars().next() else {
        return 0;
    };
    if REGIONAL_INDICATORS.contains(&first)
        || grapheme.contains(['\u{FE0F}', '\u{200D}'])
    {
        return 2;
    }
    grapheme.chars().map(char_width).max().unwrap_or(0)
}

const REGIONAL_INDICATORS: std::ops::RangeInclusive<char> = '\u{1F1E6}'..='\u{1F1FF}';

/// Display width of a single line in cells.
pub fn string_width(s: &str) -> u32 {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Number of lines in `text`. Empty text has none.
pub fn line_count(text: &str) -> u32 {
    if text.is_empty() {
        0
    } else {
        text.split('\n').count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(font_size: f32) -> TextStyle {
        TextStyle { font_size, ..TextStyle::default() }
    }

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a b c"), 5);
    }

    #[test]
    fn test_string_width_control_chars() {
        assert_eq!(string_width("\t"), 0);
        assert_eq!(string_width("a\tb"), 2);
    }

    #[test]
    fn test_string_width_fullwidth() {
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width("a日"), 3);
    }

    #[test]
    fn test_string_width_combining_marks() {
        assert_eq!(string_width("e\u{301}"), 1);
        assert_eq!(string_width("cafe\u{301}"), 4);
        assert_eq!(string_width("\u{301}"), 0);
    }

    #[test]
    fn test_string_width_emoji_sequences() {
        assert_eq!(string_width("👍"), 2);
        assert_eq!(string_width("👍🏽"), 2);
        assert_eq!(string_width("❤\u{FE0F}"), 2);
        assert_eq!(string_width("👨\u{200D}👩\u{200D}👧"), 2);
        assert_eq!(string_width("🇯🇵"), 2);
        assert_eq!(string_width("a🇯🇵b"), 4);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\nb\nc"), 3);
    }

    #[test]
    fn test_monospace_measure() {
        let measure = MonospaceMeasure::default();
        let size = measure.measure_text("hello", &style(10.0));
        assert_eq!(size.width, 5.0 * 0.6 * 10.0);
        assert_eq!(size.height, 10.0);

        let size = measure.measure_text("ab\nabcd", &style(10.0));
        assert_eq!(size.width, 4.0 * 0.6 * 10.0);
        assert_eq!(size.height, 20.0);

        let size = measure.measure_text("", &style(10.0));
        assert_eq!(size, Size { width: 0.0, height: 0.0 });
    }

    #[test]
    fn test_terminal_measure() {
        let size = MonospaceMeasure::TERMINAL.measure_text("hi 日", &style(1.0));
        assert_eq!(size, Size { width: 5.0, height: 1.0 });

        let size = MonospaceMeasure::TERMINAL.measure_text("re\u{301}sume\u{301}", &style(1.0));
        assert_eq!(size, Size { width: 6.0, height: 1.0 });
    }
}
