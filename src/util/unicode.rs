use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Horizontal alignment inside a fixed-width cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Display width in terminal cells. Control characters are not expected in
/// cell text and count as zero.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to fit within `max_cells` terminal cells, appending `…` if
/// truncated. Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Pad with spaces to exactly `cells` wide. Text that is already wider is
/// returned unchanged.
pub fn pad_to_width(s: &str, cells: usize, align: Align) -> String {
    let pad = cells.saturating_sub(display_width(s));
    match align {
        Align::Left => format!("{}{}", s, " ".repeat(pad)),
        Align::Right => format!("{}{}", " ".repeat(pad), s),
    }
}

/// Truncate then pad, so the result is exactly `cells` wide.
pub fn fit_cell(s: &str, cells: usize, align: Align) -> String {
    pad_to_width(&truncate_to_width(s, cells), cells, align)
}
