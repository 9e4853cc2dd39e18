//! Typed peripheral handles for an embedded board.
//!
//! Each handle owns one HAL resource for its whole lifetime and turns the
//! HAL's signed status codes into [`error::Result`] values.

// Layers, bottom up
pub mod hal; // HAL traits (+ mock)
pub mod peripheral; // CAN controller, digital output
pub mod status; // status code translation

// Re-exports for convenience
pub use peripheral::{can, gpio};
pub use peripheral::{Can, CanMessage, DigitalOut};

// Common types and traits
pub mod error;
pub mod types;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_valid() {
        assert!(!VERSION.is_empty());
    }
}
