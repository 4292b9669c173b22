//! Boundary services: decoding, encoding, and output format rules

pub mod format;
pub mod io;

pub use format::OutputFormatHandler;
pub use io::ImageIOService;
