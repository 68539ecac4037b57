pub mod checksum;
pub mod mrz;
pub mod visual;

pub use mrz::MrzParser;
pub use visual::VisualExtractor;
