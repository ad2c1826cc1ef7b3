//! Terminal display width helpers.
//!
//! Labels and item screens may carry ANSI styling or wide glyphs, so every
//! padding and truncation decision goes through these instead of `len()`.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

const STYLE_RESET: &str = "\x1b[0m";

/// Cut `text` to at most `max_width` columns, marking the cut with an ellipsis.
///
/// Escape sequences are copied through without taking up columns. If any
/// styling was opened before the cut, a reset is appended so it cannot leak
/// into whatever is drawn next.
pub fn truncate_display(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let mut result = String::new();
    let mut width = 0usize;
    let mut styled = false;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            styled = true;
            result.push(ch);
            copy_escape(&mut chars, &mut result);
            continue;
        }
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w >= max_width {
            if width < max_width {
                result.push('…');
            }
            break;
        }
        width += w;
        result.push(ch);
    }
    if styled {
        result.push_str(STYLE_RESET);
    }
    result
}

/// Copy the remainder of an escape sequence whose ESC was already consumed.
fn copy_escape(chars: &mut std::str::Chars<'_>, out: &mut String) {
    match chars.next() {
        Some('[') => {
            out.push('[');
            // CSI: parameter and intermediate bytes up to a final byte in @..=~.
            for c in chars.by_ref() {
                out.push(c);
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
        Some(c) => out.push(c),
        None => {}
    }
}

/// Truncate then right-pad with spaces to exactly `width` columns.
pub fn fit_display(text: &str, width: usize) -> String {
    let mut fitted = truncate_display(text, width);
    let current = display_width(&fitted);
    if current < width {
        fitted.extend(std::iter::repeat_n(' ', width - current));
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_sequences_have_no_width() {
        assert_eq!(display_width("\x1b[1mMore\x1b[0m"), 4);
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(display_width("日程"), 4);
    }

    #[test]
    fn truncation_marks_the_cut() {
        assert_eq!(truncate_display("Calendar", 20), "Calendar");
        assert_eq!(truncate_display("Stripe Integration", 7), "Stripe…");
        assert_eq!(display_width(&truncate_display("Stripe Integration", 7)), 7);
    }

    #[test]
    fn styled_labels_cut_by_visible_columns() {
        let cut = truncate_display("\x1b[1mStripe Integration\x1b[0m", 7);
        assert_eq!(cut, "\x1b[1mStripe…\x1b[0m");
        assert_eq!(display_width(&cut), 7);

        let fitted = fit_display("\x1b[38;5;208mPersonal Website\x1b[0m", 8);
        assert_eq!(display_width(&fitted), 8);
        assert!(fitted.ends_with(STYLE_RESET));
    }

    #[test]
    fn plain_cut_adds_no_reset() {
        assert!(!truncate_display("Conferencing Tool", 5).contains('\x1b'));
    }

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(fit_display("Store", 8), "Store   ");
        assert_eq!(display_width(&fit_display("Personal Website", 8)), 8);
    }
}
