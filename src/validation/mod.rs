pub mod expiry;

pub use expiry::{ExpiryValidator, WARNING_THRESHOLD_DAYS};
