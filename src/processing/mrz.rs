use chrono::{Datelike, Local, NaiveDate};
use log::{debug, warn};

use crate::models::{CheckDigitStatus, CheckDigits, DocumentFormat, MrzLine, PassportFields, Sex};
use crate::processing::checksum;
use crate::utils::PassportError;

/// Lines within this many characters of the expected width are padded
/// with filler or truncated; OCR frequently eats or invents a character
/// at the line edges. Anything further off is rejected as malformed.
const LINE_LEN_TOLERANCE: usize = 2;

pub struct MrzParser;

impl MrzParser {
    /// Parse a raw OCR text blob into typed TD3 passport fields.
    ///
    /// Century disambiguation of two-digit years uses today's date; see
    /// [`MrzParser::parse_with_reference`] for the rule.
    pub fn parse(raw_text: &str) -> Result<PassportFields, PassportError> {
        Self::parse_with_reference(raw_text, Local::now().date_naive())
    }

    /// Same as [`MrzParser::parse`] with an explicit reference date.
    ///
    /// Century rule: a birth year above the reference date's two-digit
    /// year is taken as 1900s, otherwise 2000s; expiry years are always
    /// taken as 2000s. Both are documented design assumptions, applied
    /// uniformly rather than guessed per call site.
    pub fn parse_with_reference(
        raw_text: &str,
        reference: NaiveDate,
    ) -> Result<PassportFields, PassportError> {
        let (line1, line2) = Self::locate_mrz(raw_text)?;
        Self::parse_td3(line1, line2, reference)
    }

    /// Normalize an OCR line: drop all whitespace, uppercase.
    fn normalize_line(line: &str) -> String {
        line.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    fn is_mrz_charset(line: &str) -> bool {
        !line.is_empty() && line.chars().all(|c| matches!(c, 'A'..='Z' | '0'..='9' | '<'))
    }

    /// A line looks like MRZ when it is drawn entirely from the MRZ
    /// alphabet and carries at least one filler character.
    fn is_mrz_like(line: &str) -> bool {
        Self::is_mrz_charset(line) && line.contains('<')
    }

    fn near(len: usize, target: usize) -> bool {
        len.abs_diff(target) <= LINE_LEN_TOLERANCE
    }

    /// Pad with filler or truncate to exactly the TD3 width.
    fn fit_line(mut line: String) -> String {
        let width = DocumentFormat::TD3.mrz_chars_per_line();
        if line.len() > width {
            line.truncate(width);
        }
        while line.len() < width {
            line.push('<');
        }
        line
    }

    /// Scan the OCR text for a pair of consecutive TD3 lines.
    ///
    /// Recognized non-TD3 shapes (TD1, TD2, visa formats) are refused by
    /// name; MRZ-like lines that fit no supported shape are malformed;
    /// text with no MRZ-like line at all carries no MRZ.
    fn locate_mrz(raw_text: &str) -> Result<(MrzLine, MrzLine), PassportError> {
        let lines: Vec<String> = raw_text.lines().map(Self::normalize_line).collect();
        let td3_width = DocumentFormat::TD3.mrz_chars_per_line();

        for i in 0..lines.len().saturating_sub(1) {
            let (a, b) = (&lines[i], &lines[i + 1]);
            if Self::is_mrz_like(a)
                && Self::is_mrz_charset(b)
                && Self::near(a.len(), td3_width)
                && Self::near(b.len(), td3_width)
            {
                let l1 = Self::fit_line(a.clone());
                let l2 = Self::fit_line(b.clone());
                debug!("MRZ candidate pair found at lines {} and {}", i, i + 1);
                let leader = l1.as_bytes()[0] as char;
                if leader == 'V' {
                    return Err(PassportError::UnsupportedDocumentFormat(
                        "MRV visa layout is not supported".to_string(),
                    ));
                }
                if leader != 'P' {
                    return Err(PassportError::UnsupportedDocumentFormat(format!(
                        "44-column MRZ with document type '{}' is not a TD3 passport",
                        leader
                    )));
                }
                return Ok((MrzLine::new(l1), MrzLine::new(l2)));
            }
        }

        // Identity-card layouts: recognized so they can be refused by name.
        for format in [DocumentFormat::TD1, DocumentFormat::TD2] {
            let width = format.mrz_chars_per_line();
            for w in lines.windows(format.mrz_lines()) {
                if w.iter().all(|l| Self::is_mrz_like(l) && l.len() == width) {
                    return Err(PassportError::UnsupportedDocumentFormat(format!(
                        "{:?} identity card layout is not supported",
                        format
                    )));
                }
            }
        }

        if let Some(stray) = lines.iter().find(|l| Self::is_mrz_like(l)) {
            return Err(PassportError::MalformedMrzLine(format!(
                "MRZ-like line of {} characters does not fit the TD3 layout",
                stray.len()
            )));
        }

        Err(PassportError::NoMrzDetected)
    }

    /// Slice the two normalized 44-character lines into typed fields and
    /// validate every check digit independently.
    fn parse_td3(
        line1: MrzLine,
        line2: MrzLine,
        reference: NaiveDate,
    ) -> Result<PassportFields, PassportError> {
        let l1 = line1.as_str();
        let l2 = line2.as_str();

        let document_type = l1[0..2].trim_end_matches('<').to_string();
        let issuing_state = l1[2..5].to_string();
        let (surname, given_names) = Self::split_name(&l1[5..44]);

        let number_field = &l2[0..9];
        let birth_field = &l2[13..19];
        let expiry_field = &l2[21..27];
        let personal_field = &l2[28..42];

        let check_digits = CheckDigits {
            document_number_check: Self::char_at(l2, 9),
            date_of_birth_check: Self::char_at(l2, 19),
            date_of_expiry_check: Self::char_at(l2, 27),
            personal_number_check: Self::char_at(l2, 42),
            composite_check: Self::char_at(l2, 43),
        };

        // The composite digit covers number+check, birth+check and
        // expiry through personal number with their checks; nationality
        // and sex are outside it.
        let composite_field = format!("{}{}{}", &l2[0..10], &l2[13..20], &l2[21..43]);

        let check_status = CheckDigitStatus {
            document_number_ok: checksum::digit_matches(
                number_field,
                check_digits.document_number_check,
            ),
            date_of_birth_ok: checksum::digit_matches(
                birth_field,
                check_digits.date_of_birth_check,
            ),
            date_of_expiry_ok: checksum::digit_matches(
                expiry_field,
                check_digits.date_of_expiry_check,
            ),
            personal_number_ok: checksum::digit_matches(
                personal_field,
                check_digits.personal_number_check,
            ),
            composite_ok: checksum::digit_matches(&composite_field, check_digits.composite_check),
        };
        if !check_status.all_ok() {
            warn!("MRZ check digit mismatch: {:?}", check_status);
        }

        let date_of_birth = Self::decode_birth_date(birth_field, reference)?;
        let date_of_expiry = Self::decode_expiry_date(expiry_field)?;

        let personal_number = {
            let trimmed = personal_field.trim_end_matches('<');
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.replace('<', " "))
            }
        };

        Ok(PassportFields {
            document_type,
            issuing_state,
            surname,
            given_names,
            document_number: number_field.trim_end_matches('<').to_string(),
            nationality: l2[10..13].to_string(),
            date_of_birth,
            sex: Sex::from_mrz_char(Self::char_at(l2, 20)),
            date_of_expiry,
            personal_number,
            check_digits,
            is_fully_valid: check_status.all_ok(),
            check_status,
            raw_lines: vec![line1, line2],
        })
    }

    // Lines are ASCII after normalization, so byte indexing is exact.
    fn char_at(line: &str, idx: usize) -> char {
        line.as_bytes()[idx] as char
    }

    /// Split the 39-character name field: `<<` separates surname from
    /// given names, a single `<` is a space between name parts.
    fn split_name(field: &str) -> (String, String) {
        let field = field.trim_end_matches('<');
        match field.split_once("<<") {
            Some((surname, given)) => (Self::depad(surname), Self::depad(given)),
            None => (Self::depad(field), String::new()),
        }
    }

    fn depad(part: &str) -> String {
        part.trim_matches('<').replace('<', " ")
    }

    fn decode_birth_date(
        yymmdd: &str,
        reference: NaiveDate,
    ) -> Result<NaiveDate, PassportError> {
        let (yy, month, day) = Self::split_date(yymmdd)?;
        let pivot = (reference.year().rem_euclid(100)) as u32;
        let year = if yy > pivot { 1900 + yy } else { 2000 + yy };
        NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| PassportError::InvalidDateFormat(yymmdd.to_string()))
    }

    fn decode_expiry_date(yymmdd: &str) -> Result<NaiveDate, PassportError> {
        let (yy, month, day) = Self::split_date(yymmdd)?;
        NaiveDate::from_ymd_opt((2000 + yy) as i32, month, day)
            .ok_or_else(|| PassportError::InvalidDateFormat(yymmdd.to_string()))
    }

    fn split_date(yymmdd: &str) -> Result<(u32, u32, u32), PassportError> {
        if yymmdd.len() != 6 || !yymmdd.chars().all(|c| c.is_ascii_digit()) {
            return Err(PassportError::InvalidDateFormat(yymmdd.to_string()));
        }
        let num = |s: &str| {
            s.parse::<u32>()
                .map_err(|_| PassportError::InvalidDateFormat(yymmdd.to_string()))
        };
        Ok((num(&yymmdd[0..2])?, num(&yymmdd[2..4])?, num(&yymmdd[4..6])?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ICAO Doc 9303 ERIKSSON specimen passport.
    const SPECIMEN_L1: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<";
    const SPECIMEN_L2: &str = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn specimen_text() -> String {
        format!("REPUBLIC OF UTOPIA\n{}\n{}\n", SPECIMEN_L1, SPECIMEN_L2)
    }

    #[test]
    fn test_specimen_line_widths() {
        assert_eq!(SPECIMEN_L1.len(), 44);
        assert_eq!(SPECIMEN_L2.len(), 44);
    }

    #[test]
    fn test_parses_specimen_passport() {
        let fields = MrzParser::parse_with_reference(&specimen_text(), reference()).unwrap();

        assert_eq!(fields.document_type, "P");
        assert_eq!(fields.issuing_state, "UTO");
        assert_eq!(fields.surname, "ERIKSSON");
        assert_eq!(fields.given_names, "ANNA MARIA");
        assert_eq!(fields.document_number, "L898902C3");
        assert_eq!(fields.nationality, "UTO");
        assert_eq!(
            fields.date_of_birth,
            NaiveDate::from_ymd_opt(1974, 8, 12).unwrap()
        );
        assert_eq!(fields.sex, Sex::Female);
        assert_eq!(
            fields.date_of_expiry,
            NaiveDate::from_ymd_opt(2012, 4, 15).unwrap()
        );
        assert_eq!(fields.personal_number.as_deref(), Some("ZE184226B"));
        assert!(fields.check_status.all_ok());
        assert!(fields.is_fully_valid);
        assert_eq!(fields.raw_lines.len(), 2);
    }

    #[test]
    fn test_normalizes_case_and_interior_whitespace() {
        let noisy = format!(
            "p<utoeriksson<<anna<maria<<<<<<<<<<<<<<<<<<<\n{} ",
            "L898902C36UTO74 08122F1204159ZE184226B<<<<<10"
        );
        let fields = MrzParser::parse_with_reference(&noisy, reference()).unwrap();
        assert_eq!(fields.surname, "ERIKSSON");
        assert!(fields.is_fully_valid);
    }

    #[test]
    fn test_corrupted_document_number_flags_field_but_still_parses() {
        let corrupted = specimen_text().replace("L898902C3", "M898902C3");
        let fields = MrzParser::parse_with_reference(&corrupted, reference()).unwrap();

        assert!(!fields.is_fully_valid);
        assert!(!fields.check_status.document_number_ok);
        assert!(fields.check_status.date_of_birth_ok);
        assert!(fields.check_status.date_of_expiry_ok);
        assert!(fields.check_status.personal_number_ok);
        // The composite covers the corrupted span as well.
        assert!(!fields.check_status.composite_ok);
        assert_eq!(fields.document_number, "M898902C3");
    }

    #[test]
    fn test_corrupted_expiry_digit_flags_expiry_check() {
        let line2 = SPECIMEN_L2.replace("120415", "120416");
        let text = format!("{}\n{}", SPECIMEN_L1, line2);
        let fields = MrzParser::parse_with_reference(&text, reference()).unwrap();

        assert!(!fields.is_fully_valid);
        assert!(!fields.check_status.date_of_expiry_ok);
        assert!(fields.check_status.document_number_ok);
        assert!(fields.check_status.date_of_birth_ok);
        assert!(fields.check_status.personal_number_ok);
        assert_eq!(
            fields.date_of_expiry,
            NaiveDate::from_ymd_opt(2012, 4, 16).unwrap()
        );
    }

    #[test]
    fn test_tolerates_one_missing_trailing_character() {
        // OCR dropped the final composite digit; the line is padded back
        // to 44 with filler and only the composite check fails.
        let short = &SPECIMEN_L2[..43];
        let text = format!("{}\n{}", SPECIMEN_L1, short);
        let fields = MrzParser::parse_with_reference(&text, reference()).unwrap();
        assert!(fields.check_status.document_number_ok);
        assert!(!fields.check_status.composite_ok);
        assert!(!fields.is_fully_valid);
    }

    #[test]
    fn test_lone_short_mrz_line_is_malformed() {
        let text = "P<UTOERIKSSON<<ANNA<MARIA<<<<<\nsome other text";
        let err = MrzParser::parse_with_reference(text, reference()).unwrap_err();
        assert!(matches!(err, PassportError::MalformedMrzLine(_)));
    }

    #[test]
    fn test_plain_text_has_no_mrz() {
        let err =
            MrzParser::parse_with_reference("REPUBLIC OF UTOPIA\nPASSPORT\n", reference())
                .unwrap_err();
        assert_eq!(err, PassportError::NoMrzDetected);
    }

    #[test]
    fn test_td1_layout_is_unsupported() {
        let text = "I<UTOD231458907<<<<<<<<<<<<<<<\n\
                    7408122F1204159UTO<<<<<<<<<<<6\n\
                    ERIKSSON<<ANNA<MARIA<<<<<<<<<<";
        let err = MrzParser::parse_with_reference(text, reference()).unwrap_err();
        assert!(matches!(err, PassportError::UnsupportedDocumentFormat(_)));
    }

    #[test]
    fn test_visa_layout_is_unsupported() {
        let l1 = format!("V{}", &SPECIMEN_L1[1..]);
        let text = format!("{}\n{}", l1, SPECIMEN_L2);
        let err = MrzParser::parse_with_reference(&text, reference()).unwrap_err();
        assert!(matches!(err, PassportError::UnsupportedDocumentFormat(_)));
    }

    #[test]
    fn test_birth_century_rule_around_pivot() {
        // yy 25 <= reference yy 26: 2000s. yy 27 > 26: 1900s.
        let young = SPECIMEN_L2.replace("7408122", "2508122");
        let text = format!("{}\n{}", SPECIMEN_L1, young);
        let fields = MrzParser::parse_with_reference(&text, reference()).unwrap();
        assert_eq!(fields.date_of_birth.year(), 2025);

        let old = SPECIMEN_L2.replace("7408122", "2708122");
        let text = format!("{}\n{}", SPECIMEN_L1, old);
        let fields = MrzParser::parse_with_reference(&text, reference()).unwrap();
        assert_eq!(fields.date_of_birth.year(), 1927);
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        // Month 13 cannot be decoded into a calendar date.
        let bad = SPECIMEN_L2.replace("740812", "741312");
        let text = format!("{}\n{}", SPECIMEN_L1, bad);
        let err = MrzParser::parse_with_reference(&text, reference()).unwrap_err();
        assert!(matches!(err, PassportError::InvalidDateFormat(_)));
    }

    #[test]
    fn test_absent_personal_number_is_none() {
        // Blank out the personal number and fix up its check digit; the
        // composite no longer matches, which is expected here.
        let line2 = format!("{}{}{}", &SPECIMEN_L2[..28], "<<<<<<<<<<<<<<", "<0");
        assert_eq!(line2.len(), 44);
        let text = format!("{}\n{}", SPECIMEN_L1, line2);
        let fields = MrzParser::parse_with_reference(&text, reference()).unwrap();
        assert_eq!(fields.personal_number, None);
        assert!(fields.check_status.personal_number_ok);
    }

    #[test]
    fn test_surname_only_name_field() {
        let l1 = "P<UTOERIKSSON<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<";
        assert_eq!(l1.len(), 44);
        let text = format!("{}\n{}", l1, SPECIMEN_L2);
        let fields = MrzParser::parse_with_reference(&text, reference()).unwrap();
        assert_eq!(fields.surname, "ERIKSSON");
        assert_eq!(fields.given_names, "");
    }
}
