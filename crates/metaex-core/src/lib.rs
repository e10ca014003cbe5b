pub mod domain;
pub mod errors;
pub mod ports;

pub use errors::ExtractError;
