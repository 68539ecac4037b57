//! Fallback extraction from the labeled visual-inspection zone.
//!
//! When the OCR text carries no MRZ, passport fields can still sit next
//! to their printed labels ("Passport No", "Date of expiry", and their
//! French equivalents). Extraction is best-effort: a pattern that finds
//! nothing yields `None`, never an error.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::VisualFields;

lazy_static! {
    static ref DOCUMENT_NUMBER_RE: Regex = Regex::new(
        r"(?i)(?:Passport\s*No\.?|N[°o]\s*de\s*passeport|Passeport\s*N[°o])\s*:?\s*([A-Z0-9]{5,15})"
    )
    .unwrap();
    static ref SURNAME_RE: Regex =
        Regex::new(r"(?i)\b(?:Surname|Nom)\b\s*:?\s*([A-Z][A-Z' -]+)").unwrap();
    static ref GIVEN_NAMES_RE: Regex =
        Regex::new(r"(?i)\b(?:Given\s*names?|Pr[ée]noms?)\b\s*:?\s*([A-Z][A-Z' -]+)").unwrap();
    static ref DATE_OF_BIRTH_RE: Regex = Regex::new(
        r"(?i)(?:Date\s*of\s*birth|Date\s*de\s*naissance)\s*:?\s*(\d{2}[/\-.]\d{2}[/\-.]\d{4})"
    )
    .unwrap();
    static ref PLACE_OF_BIRTH_RE: Regex = Regex::new(
        r"(?i)(?:Place\s*of\s*birth|Lieu\s*de\s*naissance)\s*:?\s*([A-Z][A-Z' -]+)"
    )
    .unwrap();
    static ref DATE_OF_ISSUE_RE: Regex = Regex::new(
        r"(?i)(?:Date\s*of\s*issue|Date\s*de\s*d[ée]livrance)\s*:?\s*(\d{2}[/\-.]\d{2}[/\-.]\d{4})"
    )
    .unwrap();
    static ref DATE_OF_EXPIRY_RE: Regex = Regex::new(
        r"(?i)(?:Date\s*of\s*expiry|Date\s*d['’]expiration)\s*:?\s*(\d{2}[/\-.]\d{2}[/\-.]\d{4})"
    )
    .unwrap();
    static ref AUTHORITY_RE: Regex =
        Regex::new(r"(?i)(?:Authority|Autorit[ée])\s*:?\s*([A-Z][A-Z' -]+)").unwrap();
}

pub struct VisualExtractor;

impl VisualExtractor {
    pub fn extract(text: &str) -> VisualFields {
        VisualFields {
            document_number: Self::capture(&DOCUMENT_NUMBER_RE, text),
            surname: Self::capture(&SURNAME_RE, text),
            given_names: Self::capture(&GIVEN_NAMES_RE, text),
            date_of_birth: Self::capture(&DATE_OF_BIRTH_RE, text),
            place_of_birth: Self::capture(&PLACE_OF_BIRTH_RE, text),
            date_of_issue: Self::capture(&DATE_OF_ISSUE_RE, text),
            date_of_expiry: Self::capture(&DATE_OF_EXPIRY_RE, text),
            authority: Self::capture(&AUTHORITY_RE, text),
        }
    }

    fn capture(pattern: &Regex, text: &str) -> Option<String> {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|matched| matched.as_str().trim().to_uppercase())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
REPUBLIQUE FRANCAISE\n\
Passeport N° : 19AB45678\n\
Nom : DUPONT\n\
Prénoms : JEAN PIERRE\n\
Date de naissance : 12/03/1980\n\
Lieu de naissance : LYON\n\
Date de délivrance : 01/02/2019\n\
Date d'expiration : 01/02/2029\n\
Autorité : PREFECTURE DU RHONE\n";

    #[test]
    fn test_extracts_french_labels() {
        let fields = VisualExtractor::extract(SAMPLE);
        assert_eq!(fields.document_number.as_deref(), Some("19AB45678"));
        assert_eq!(fields.surname.as_deref(), Some("DUPONT"));
        assert_eq!(fields.given_names.as_deref(), Some("JEAN PIERRE"));
        assert_eq!(fields.date_of_birth.as_deref(), Some("12/03/1980"));
        assert_eq!(fields.place_of_birth.as_deref(), Some("LYON"));
        assert_eq!(fields.date_of_issue.as_deref(), Some("01/02/2019"));
        assert_eq!(fields.date_of_expiry.as_deref(), Some("01/02/2029"));
        assert_eq!(fields.authority.as_deref(), Some("PREFECTURE DU RHONE"));
    }

    #[test]
    fn test_extracts_english_labels() {
        let text = "Passport No: X1234567\nSurname: ERIKSSON\nGiven names: ANNA MARIA\n\
                    Date of expiry: 15.04.2032\n";
        let fields = VisualExtractor::extract(text);
        assert_eq!(fields.document_number.as_deref(), Some("X1234567"));
        assert_eq!(fields.surname.as_deref(), Some("ERIKSSON"));
        assert_eq!(fields.given_names.as_deref(), Some("ANNA MARIA"));
        assert_eq!(fields.date_of_expiry.as_deref(), Some("15.04.2032"));
        assert_eq!(fields.date_of_birth, None);
        assert_eq!(fields.authority, None);
    }

    #[test]
    fn test_unlabeled_text_yields_empty_fields() {
        let fields = VisualExtractor::extract("nothing useful in here");
        assert_eq!(fields, VisualFields::default());
    }
}
