//! Character-count based truncation and word wrapping.

/// `text` unchanged when it has at most `max` characters, otherwise its
/// first `keep` characters followed by `...`.
pub fn truncate_with_ellipsis(text: &str, max: usize, keep: usize) -> String {
    if text.chars().count() > max {
        let mut out: String = text.chars().take(keep).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

/// First `n` characters of `text`.
pub fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Wrap at `width` characters. Tabs expand to 8-column stops and every other
/// whitespace character becomes one space; runs between words are kept.
/// Over-long words are split. Blank input yields no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let spaced = expand_whitespace(text);
    textwrap::wrap(&spaced, width.max(1))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

const TAB_WIDTH: usize = 8;

fn expand_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            '\x0b' | '\x0c' => {
                out.push(' ');
                column += 1;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Replace the last three characters of `line` with `...`.
pub fn ellipsize_tail(line: &str) -> String {
    let count = line.chars().count();
    let mut out: String = line.chars().take(count.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
