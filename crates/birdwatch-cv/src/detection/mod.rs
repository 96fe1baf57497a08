//! Detection decoding and filtering

pub mod classes;
pub mod config;
pub mod filter;
pub mod raw;

pub use classes::ClassNames;
pub use config::FilterConfig;
pub use filter::DetectionFilter;
pub use raw::RawCandidate;
