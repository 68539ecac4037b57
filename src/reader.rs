use chrono::{Local, NaiveDate};
use log::debug;

use crate::models::{ExtractionMethod, PassportScan};
use crate::processing::{MrzParser, VisualExtractor};
use crate::utils::PassportError;
use crate::validation::ExpiryValidator;

/// Text-level orchestrator: MRZ first, labeled visual zone as fallback,
/// expiry verdict attached whenever an expiry date is available.
///
/// The OCR invocation itself stays outside this crate; the reader
/// consumes whatever text blob the OCR step produced.
pub struct PassportReader;

impl PassportReader {
    pub fn new() -> Self {
        PassportReader
    }

    pub fn read(&self, raw_text: &str) -> Result<PassportScan, PassportError> {
        self.read_with_reference(raw_text, Local::now().date_naive())
    }

    /// Read with an explicit verification date.
    ///
    /// Only `NoMrzDetected` triggers the visual-zone fallback; a
    /// malformed or unsupported MRZ propagates so the caller can decide
    /// to re-scan instead of silently degrading to weaker extraction.
    pub fn read_with_reference(
        &self,
        raw_text: &str,
        reference: NaiveDate,
    ) -> Result<PassportScan, PassportError> {
        match MrzParser::parse_with_reference(raw_text, reference) {
            Ok(fields) => {
                let validation = ExpiryValidator::validate(fields.date_of_expiry, reference);
                Ok(PassportScan {
                    method: ExtractionMethod::Mrz,
                    mrz: Some(fields),
                    visual: None,
                    validation: Some(validation),
                })
            }
            Err(PassportError::NoMrzDetected) => {
                debug!("no MRZ detected, falling back to visual zone extraction");
                let visual = VisualExtractor::extract(raw_text);
                let validation = visual
                    .date_of_expiry
                    .as_deref()
                    .and_then(|date| ExpiryValidator::validate_str(date, reference).ok());
                Ok(PassportScan {
                    method: ExtractionMethod::VisualZone,
                    mrz: None,
                    visual: Some(visual),
                    validation,
                })
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for PassportReader {
    fn default() -> Self {
        Self::new()
    }
}
