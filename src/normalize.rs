//! # Tab Normalizer
//!
//! Turns hand-written tab text into the canonical form every other stage
//! reads: one line per written line, single spaces between tabs, no comments,
//! no punctuation, and every `( ... ) xN` repeat written out in full.
//!
//! ## Pipeline
//! 1. Expand repeats: `(1 2) x2` becomes `1 2 1 2`. Groups may span lines;
//!    multi-line repetitions are separated by a blank line.
//! 2. Strip comments: everything from the first `#` on a line.
//! 3. Strip noise: `, - – — ( ) < >` become spaces.
//! 4. Collapse whitespace per line, keep blank lines, trim the buffer.
//!
//! ## Example
//! ```rust
//! use stylotab::normalize;
//!
//! assert_eq!(normalize("(1 2) x2 #comment\n3"), "1 2 1 2\n3");
//! ```

/// Characters that carry no musical meaning in a tab.
pub const NOISE_CHARS: &[char] = &[',', '-', '–', '—', '(', ')', '<', '>'];

/// Normalize raw tab text. Pure and idempotent.
pub fn normalize(raw: &str) -> String {
    let expanded = expand_repeats(raw);

    let lines: Vec<String> = expanded
        .split('\n')
        .map(|line| {
            let line = strip_comment(line);
            let cleaned: String = line
                .chars()
                .map(|c| if NOISE_CHARS.contains(&c) { ' ' } else { c })
                .collect();
            collapse_whitespace(&cleaned)
        })
        .collect();

    lines.join("\n").trim_matches('\n').to_string()
}

/// Truncate a line at its first `#`.
pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Expand every `( ... ) xN` group in `text`.
///
/// The group ends at the first `)` after its `(`; when that `)` is not
/// followed by optional whitespace and `x<digits>`, the parentheses are left
/// as they are. A group that itself contains `(` is skipped in favour of the
/// innermost one.
pub fn expand_repeats(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find(')') else {
            break;
        };
        let content = &after_open[..close];

        if content.contains('(') {
            out.push_str(&rest[..=open]);
            rest = after_open;
            continue;
        }

        match parse_repeat_count(&after_open[close + 1..]) {
            Some((count, consumed)) => {
                out.push_str(&rest[..open]);
                out.push_str(&repeat_group(content, count));
                rest = &after_open[close + 1 + consumed..];
            }
            None => {
                out.push_str(&rest[..=open]);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Read `\s*x<digits>` at the start of `text`, returning the count and the
/// number of bytes consumed.
fn parse_repeat_count(text: &str) -> Option<(usize, usize)> {
    let trimmed = text.trim_start();
    let skipped = text.len() - trimmed.len();
    let digits_start = trimmed.strip_prefix('x')?;
    let digits_len = digits_start
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }
    // Counts too large to fit are not a repeat the musician meant.
    let count = digits_start[..digits_len].parse().ok()?;
    Some((count, skipped + 1 + digits_len))
}

fn repeat_group(content: &str, count: usize) -> String {
    let content = content.trim();
    let separator = if content.contains('\n') { "\n\n" } else { " " };
    vec![content; count].join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_repeat_with_comment() {
        assert_eq!(normalize("(1 2) x2 #comment\n3"), "1 2 1 2\n3");
    }

    #[test]
    fn test_repeat_without_space_before_count() {
        assert_eq!(normalize("(4 5)x3"), "4 5 4 5 4 5");
    }

    #[test]
    fn test_text_around_group_stays_on_line() {
        assert_eq!(normalize("1 (2 3) x2 4"), "1 2 3 2 3 4");
    }

    #[test]
    fn test_text_around_multiline_group_keeps_order() {
        assert_eq!(normalize("1 (2\n3) x2 4"), "1 2\n3\n\n2\n3 4");
    }

    #[test]
    fn test_multiline_repeat() {
        let raw = "(1 2\n3 4) x2\n5";
        assert_eq!(normalize(raw), "1 2\n3 4\n\n1 2\n3 4\n5");
    }

    #[test]
    fn test_multiline_repeat_once_has_no_separator() {
        assert_eq!(normalize("(\n1 2\n3\n) x1"), "1 2\n3");
    }

    #[test]
    fn test_two_groups_on_one_line() {
        assert_eq!(normalize("(1) x2 (2) x2"), "1 1 2 2");
    }

    #[test]
    fn test_group_without_count_loses_parens() {
        assert_eq!(normalize("(1 2) 3"), "1 2 3");
        assert_eq!(normalize("(1 2"), "1 2");
    }

    #[test]
    fn test_nested_group_expands_innermost() {
        assert_eq!(normalize("((1) x2 2)"), "1 1 2");
    }

    #[test]
    fn test_zero_repeat_removes_group() {
        assert_eq!(normalize("1 (2) x0 3"), "1 3");
    }

    #[test]
    fn test_comment_only_lines_become_blank() {
        assert_eq!(normalize("1 2\n# verse\n3"), "1 2\n\n3");
    }

    #[test]
    fn test_noise_chars_split_tabs() {
        assert_eq!(normalize("1, 2 - 3–4—5 <6>"), "1 2 3 4 5 6");
    }

    #[test]
    fn test_whitespace_collapse_and_trim() {
        let raw = "\n\n  1\t 2   \r\n\n 3 \n\n";
        assert_eq!(normalize(raw), "1 2\n\n3");
    }

    #[test]
    fn test_default_text_normalizes_to_empty() {
        assert_eq!(normalize("# Write tabs here\n\n"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "(1 2) x2 #comment\n3",
            "(1 2\n3 4) x2\n5",
            "  8, 8.5 - 9 \n\n\n10 (11) # x\n",
            "x4 ( ) 12 E:3",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
