/// Clean decoded report text before field recognition.
///
/// Drops control characters (keeping tabs; CR, VT and FF become line breaks),
/// replaces non-breaking
/// spaces with plain spaces, trims every line and removes blank lines.
/// Label/value punctuation (`:` `/` `.` `%`) is preserved.
pub fn sanitize_report_text(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => Some(' '),
            '\n' | '\t' => Some(c),
            // Lone CR, vertical tab and form feed still separate lines
            '\r' | '\u{000B}' | '\u{000C}' | '\u{2028}' | '\u{2029}' => Some('\n'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect::<String>()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_control_characters() {
        let clean = sanitize_report_text("Age:\x00 63\x01\x02\nCD4 Count: 310");
        assert_eq!(clean, "Age: 63\nCD4 Count: 310");
    }

    #[test]
    fn carriage_returns_do_not_leak() {
        let clean = sanitize_report_text("Serum Creatinine: 1.4\r\nUrine Albumin: 2\r\n");
        assert_eq!(clean, "Serum Creatinine: 1.4\nUrine Albumin: 2");
    }

    #[test]
    fn lone_carriage_returns_split_lines() {
        let clean = sanitize_report_text("Age: 63\rCD4 Count: 200\rHypertension: Yes");
        assert_eq!(clean, "Age: 63\nCD4 Count: 200\nHypertension: Yes");
    }

    #[test]
    fn form_feed_and_vertical_tab_split_lines() {
        let clean = sanitize_report_text("Anaemia: Yes\x0CBacteria: Present\x0BPus Cells: Abnormal");
        assert_eq!(clean, "Anaemia: Yes\nBacteria: Present\nPus Cells: Abnormal");
    }

    #[test]
    fn preserves_label_punctuation() {
        let clean = sanitize_report_text("Blood Pressure: 140/90 mmHg (seated), 98%");
        assert_eq!(clean, "Blood Pressure: 140/90 mmHg (seated), 98%");
    }

    #[test]
    fn non_breaking_space_becomes_space() {
        let clean = sanitize_report_text("Age:\u{00A0}51");
        assert_eq!(clean, "Age: 51");
    }

    #[test]
    fn collapses_blank_lines_and_trims() {
        let clean = sanitize_report_text("  Line one  \n\n\n\tLine two\t\n   \n");
        assert_eq!(clean, "Line one\nLine two");
    }

    #[test]
    fn empty_and_control_only_inputs() {
        assert_eq!(sanitize_report_text(""), "");
        assert_eq!(sanitize_report_text("\x00\x01\x02"), "");
    }

    #[test]
    fn keeps_accented_text() {
        let clean = sanitize_report_text("Créatinine sérique: 1,2 µmol/L");
        assert_eq!(clean, "Créatinine sérique: 1,2 µmol/L");
    }
}
