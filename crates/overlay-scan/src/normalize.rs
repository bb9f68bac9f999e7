use overlay_scan_types::TextRole;

/// Clean a raw recognizer string into a canonical numeric or timestamp token.
///
/// Timestamp punctuation repair runs before the generic letter-to-digit
/// substitutions: recognizers often mis-render colon separators as periods,
/// and substituting first could corrupt a legitimate colon-adjacent letter.
/// The substitution table assumes the overlay charset only ever contains
/// digits, colons, and the letters o/i/s/a.
pub fn normalize_text(raw: &str, role: TextRole) -> String {
    let repaired = match role {
        TextRole::Timestamp => raw.replace('.', ":").replace("::", ":"),
        TextRole::Numeric => raw.to_string(),
    };

    let substituted: String = repaired
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'o' => Some('0'),
            'i' => Some('1'),
            's' => Some('5'),
            'a' => Some('4'),
            ',' => None,
            other => Some(other),
        })
        .collect();

    substituted
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ':' || *c == '.')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_normalized_timestamp_is_unchanged() {
        assert_eq!(
            normalize_text("12:34:56", TextRole::Timestamp),
            "12:34:56"
        );
    }

    #[test]
    fn letter_confusions_are_substituted() {
        assert_eq!(normalize_text("o1:2a:5s", TextRole::Timestamp), "01:24:55");
    }

    #[test]
    fn periods_become_colons_for_timestamps_only() {
        assert_eq!(
            normalize_text("12.34.56", TextRole::Timestamp),
            "12:34:56"
        );
        assert_eq!(normalize_text("12.34", TextRole::Numeric), "12.34");
    }

    #[test]
    fn doubled_colons_collapse() {
        assert_eq!(
            normalize_text("12::34:56", TextRole::Timestamp),
            "12:34:56"
        );
    }

    #[test]
    fn commas_and_stray_characters_are_dropped()  {
        assert_eq!(normalize_text("1,250 m", TextRole::Numeric), "1250");
        assert_eq!(normalize_text("x=42%", TextRole::Numeric), "42");
    }

    #[test]
    fn idempotent_on_clean_numbers() {
        let once = normalize_text("1075.5", TextRole::Numeric);
        assert_eq!(normalize_text(&once, TextRole::Numeric), once);
    }
}
