//! ICAO Doc 9303 check-digit arithmetic.
//!
//! Each character maps to a numeric value (`0`-`9` to itself, `A`-`Z` to
//! 10-35, `<` to 0), is multiplied by the repeating weight cycle
//! `[7, 3, 1]` aligned to its position within the checked field, and the
//! sum is reduced modulo 10. The scheme must match the standard exactly;
//! any deviation silently breaks validation.

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Numeric value of a single MRZ character, `None` for characters
/// outside the MRZ alphabet.
pub fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
        '<' => Some(0),
        _ => None,
    }
}

/// Weighted modulo-10 check digit of a field, `None` if the field
/// contains a character outside the MRZ alphabet.
pub fn check_digit(field: &str) -> Option<u32> {
    let mut sum = 0u32;
    for (i, c) in field.chars().enumerate() {
        sum += char_value(c)? * WEIGHTS[i % WEIGHTS.len()];
    }
    Some(sum % 10)
}

/// Whether a transcribed check character validates the field.
///
/// A `<` check character is accepted in place of `0` for an all-filler
/// optional field, as the standard permits for the personal number.
pub fn digit_matches(field: &str, check: char) -> bool {
    let Some(expected) = check_digit(field) else {
        return false;
    };
    match check {
        '<' => expected == 0 && field.chars().all(|c| c == '<'),
        '0'..='9' => check as u32 - '0' as u32 == expected,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_values() {
        assert_eq!(char_value('0'), Some(0));
        assert_eq!(char_value('9'), Some(9));
        assert_eq!(char_value('A'), Some(10));
        assert_eq!(char_value('Z'), Some(35));
        assert_eq!(char_value('<'), Some(0));
        assert_eq!(char_value('a'), None);
        assert_eq!(char_value('*'), None);
    }

    #[test]
    fn test_icao_specimen_fields() {
        // Fields from the Doc 9303 ERIKSSON specimen passport.
        assert_eq!(check_digit("L898902C3"), Some(6));
        assert_eq!(check_digit("740812"), Some(2));
        assert_eq!(check_digit("120415"), Some(9));
        assert_eq!(check_digit("ZE184226B<<<<<"), Some(1));
    }

    #[test]
    fn test_digit_matches() {
        assert!(digit_matches("L898902C3", '6'));
        assert!(!digit_matches("L898902C3", '7'));
        assert!(!digit_matches("L898902C3", '<'));
    }

    #[test]
    fn test_filler_check_digit_for_empty_optional_field() {
        assert!(digit_matches("<<<<<<<<<<<<<<", '<'));
        assert!(digit_matches("<<<<<<<<<<<<<<", '0'));
        // Filler is not a wildcard for populated fields.
        assert!(!digit_matches("ZE184226B<<<<<", '<'));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let field = "L898902C3";
        assert_eq!(check_digit(field), check_digit(field));
    }

    #[test]
    fn test_rejects_out_of_alphabet_characters() {
        assert_eq!(check_digit("L8989*2C3"), None);
        assert!(!digit_matches("L8989*2C3", '6'));
    }
}
