pub mod data;

pub use data::{
    AlertLevel, CheckDigitStatus, CheckDigits, DocumentFormat, ExtractionMethod, MrzLine,
    PassportFields, PassportScan, Sex, ValidationResult, VisualFields,
};
