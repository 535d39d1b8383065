use unicode_width::UnicodeWidthStr;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Break `label` into lines no wider than `max_width` display columns,
/// splitting only at whitespace. Spacing between words that stay on the same
/// line is kept as written; the whitespace at a break is dropped. A single
/// word wider than the limit gets a line of its own rather than being cut.
pub fn wrap_label(label: &str, max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for (gap, word) in words_with_gaps(label.trim()) {
        if current.is_empty() {
            current.push_str(word);
        } else if display_width(&current) + display_width(gap) + display_width(word) <= max_width {
            current.push_str(gap);
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Each word paired with the whitespace run in front of it.
fn words_with_gaps(text: &str) -> Vec<(&str, &str)> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let gap_len = rest.len() - rest.trim_start().len();
        let (gap, after) = rest.split_at(gap_len);
        let word_len = after.find(char::is_whitespace).unwrap_or(after.len());
        let (word, tail) = after.split_at(word_len);
        pieces.push((gap, word));
        rest = tail;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn display_width_wide_chars() {
        assert_eq!(display_width("申請"), 4);
    }

    #[test]
    fn wrap_short_label_untouched() {
        assert_eq!(wrap_label("Offer admission", 20), vec!["Offer admission"]);
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_label("Notify applicant of rejection", 16),
            vec!["Notify applicant", "of rejection"]
        );
    }

    #[test]
    fn wrap_long_word_stays_whole() {
        assert_eq!(
            wrap_label("a supercalifragilistic b", 5),
            vec!["a", "supercalifragilistic", "b"]
        );
    }

    #[test]
    fn wrap_counts_wide_chars_as_two() {
        assert_eq!(wrap_label("申請 受付", 4), vec!["申請", "受付"]);
    }

    #[test]
    fn wrap_keeps_internal_spacing() {
        assert_eq!(wrap_label("Send   fee  reminder", 40), vec!["Send   fee  reminder"]);
        assert_eq!(wrap_label("Send   fee  reminder", 10), vec!["Send   fee", "reminder"]);
    }

    #[test]
    fn wrap_empty_label() {
        assert_eq!(wrap_label("", 10), vec![""]);
    }
}
