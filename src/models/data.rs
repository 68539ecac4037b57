use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// ICAO Doc 9303 machine-readable document layouts.
///
/// Only TD3 (the passport booklet layout) is parseable; the other
/// variants exist so the parser can name the layout it refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentFormat {
    TD1,
    TD2,
    TD3,
}

impl DocumentFormat {
    pub fn mrz_lines(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 3,
            DocumentFormat::TD2 => 2,
            DocumentFormat::TD3 => 2,
        }
    }

    pub fn mrz_chars_per_line(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 30,
            DocumentFormat::TD2 => 36,
            DocumentFormat::TD3 => 44,
        }
    }
}

/// A single normalized MRZ line: uppercase, no whitespace, exactly the
/// width of its layout (44 characters for TD3).
///
/// Immutable once captured. OCR confusions that survive normalization
/// (`O` vs `0`, `I` vs `1`) are deliberately left in place; the check
/// digits exist to catch them, and guessing a correction here would
/// corrupt fields silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MrzLine(String);

impl MrzLine {
    pub(crate) fn new(line: String) -> Self {
        MrzLine(line)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MrzLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sex marker from position 21 of MRZ line 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    /// The `X` marker: sex deliberately not specified on the document.
    #[serde(rename = "X")]
    Other,
    /// Filler (`<`) or an unreadable character.
    #[serde(rename = "unspecified")]
    Unspecified,
}

impl Sex {
    pub fn from_mrz_char(c: char) -> Self {
        match c {
            'M' => Sex::Male,
            'F' => Sex::Female,
            'X' => Sex::Other,
            _ => Sex::Unspecified,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Other => "X",
            Sex::Unspecified => "unspecified",
        };
        f.write_str(s)
    }
}

/// The five check characters transcribed from line 2 of a TD3 MRZ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckDigits {
    pub document_number_check: char,
    pub date_of_birth_check: char,
    pub date_of_expiry_check: char,
    pub personal_number_check: char,
    pub composite_check: char,
}

/// Outcome of validating each transcribed check digit against the digit
/// recomputed from its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckDigitStatus {
    pub document_number_ok: bool,
    pub date_of_birth_ok: bool,
    pub date_of_expiry_ok: bool,
    pub personal_number_ok: bool,
    pub composite_ok: bool,
}

impl CheckDigitStatus {
    pub fn all_ok(&self) -> bool {
        self.document_number_ok
            && self.date_of_birth_ok
            && self.date_of_expiry_ok
            && self.personal_number_ok
            && self.composite_ok
    }
}

/// Typed result of parsing a TD3 MRZ block.
///
/// A failing check digit does not abort the parse: the field value is
/// surfaced anyway and flagged in `check_status`, so the caller can
/// re-scan or route the document to manual review without losing data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassportFields {
    pub document_type: String,
    pub issuing_state: String,
    pub surname: String,
    pub given_names: String,
    pub document_number: String,
    pub nationality: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub date_of_expiry: NaiveDate,
    pub personal_number: Option<String>,
    pub check_digits: CheckDigits,
    pub check_status: CheckDigitStatus,
    /// True only when all five check digits, composite included, validate.
    pub is_fully_valid: bool,
    pub raw_lines: Vec<MrzLine>,
}

/// Expiry alert severity, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Green,
    Orange,
    Red,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertLevel::Green => "green",
            AlertLevel::Orange => "orange",
            AlertLevel::Red => "red",
        };
        f.write_str(s)
    }
}

/// Verdict of the expiry validator.
///
/// Both dates are rendered in ISO and display form from the same
/// `NaiveDate` value; neither form is ever re-parsed from the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub expiry_date_iso: String,
    pub expiry_date_display: String,
    pub verification_date_iso: String,
    pub verification_date_display: String,
    pub is_valid: bool,
    /// Whole days until expiry; 0 when the document is already expired.
    pub days_remaining: i64,
    pub is_expired: bool,
    pub message: String,
    pub alert_level: AlertLevel,
}

/// Fields recovered from the labeled visual-inspection zone when no MRZ
/// is present. Dates are kept as found; the expiry validator parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisualFields {
    pub document_number: Option<String>,
    pub surname: Option<String>,
    pub given_names: Option<String>,
    pub date_of_birth: Option<String>,
    pub place_of_birth: Option<String>,
    pub date_of_issue: Option<String>,
    pub date_of_expiry: Option<String>,
    pub authority: Option<String>,
}

/// How the reader obtained its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Mrz,
    VisualZone,
}

/// Combined output of [`crate::PassportReader`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassportScan {
    pub method: ExtractionMethod,
    pub mrz: Option<PassportFields>,
    pub visual: Option<VisualFields>,
    pub validation: Option<ValidationResult>,
}
