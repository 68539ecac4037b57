use chrono::{Local, NaiveDate};

use crate::models::{AlertLevel, ValidationResult};
use crate::utils::PassportError;

/// Days before expiry at which the verdict drops from green to orange.
/// Exactly this many days remaining is still orange; one more is green.
pub const WARNING_THRESHOLD_DAYS: i64 = 90;

pub struct ExpiryValidator;

impl ExpiryValidator {
    /// Validate against today's local date.
    pub fn validate_today(expiry: NaiveDate) -> ValidationResult {
        Self::validate(expiry, Local::now().date_naive())
    }

    /// Judge document validity from the expiry date alone.
    ///
    /// Pure and total: any pair of calendar dates yields a verdict, with
    /// no failure modes. A document expiring on the verification date is
    /// still valid, with zero days remaining and an orange alert.
    pub fn validate(expiry: NaiveDate, reference: NaiveDate) -> ValidationResult {
        let days = expiry.signed_duration_since(reference).num_days();
        let is_expired = days < 0;
        let days_remaining = days.max(0);

        let (alert_level, message) = if is_expired {
            (
                AlertLevel::Red,
                format!("Passport expired since {} days.", -days),
            )
        } else if days_remaining <= WARNING_THRESHOLD_DAYS {
            (
                AlertLevel::Orange,
                format!(
                    "Passport still valid but expires in {} days.",
                    days_remaining
                ),
            )
        } else {
            (
                AlertLevel::Green,
                format!("Passport valid. Expires in {} days.", days_remaining),
            )
        };

        ValidationResult {
            expiry_date_iso: expiry.format("%Y-%m-%d").to_string(),
            expiry_date_display: expiry.format("%d/%m/%Y").to_string(),
            verification_date_iso: reference.format("%Y-%m-%d").to_string(),
            verification_date_display: reference.format("%d/%m/%Y").to_string(),
            is_valid: !is_expired,
            days_remaining,
            is_expired,
            message,
            alert_level,
        }
    }

    /// Validate an expiry date supplied as free-form text.
    pub fn validate_str(
        expiry: &str,
        reference: NaiveDate,
    ) -> Result<ValidationResult, PassportError> {
        Ok(Self::validate(Self::parse_date(expiry)?, reference))
    }

    // ISO first, then the day-first forms found on visual zones.
    fn parse_date(text: &str) -> Result<NaiveDate, PassportError> {
        const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
        let text = text.trim();
        for format in FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Ok(date);
            }
        }
        Err(PassportError::InvalidDateFormat(text.to_string()))
    }
}
