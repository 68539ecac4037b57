pub mod models;
pub mod processing;
pub mod reader;
pub mod utils;
pub mod validation;

pub use processing::MrzParser;
pub use reader::PassportReader;
pub use utils::PassportError;
pub use validation::ExpiryValidator;
