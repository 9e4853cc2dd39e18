//! Owning peripheral handles.
//!
//! This module provides typed entry points for the board peripherals:
//! - CAN controller ([`can::Can`])
//! - Digital output pin ([`gpio::DigitalOut`])
//!
//! A handle opens its HAL resource on construction, keeps it for its whole
//! lifetime and releases it when dropped. CAN operations translate the HAL's
//! status codes into [`crate::error::Result`] and log every failure through
//! `tracing`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use boardio::peripheral::can::{Can, CanMessage};
//!
//! let mut can = Can::with_baud_rate(board_can, 0, 250_000);
//! can.write(&CanMessage::new(0x123, [1u8, 2, 3])?)?;
//!
//! if let Some(message) = can.read() {
//!     println!("{:#x}: {:?}", message.id(), message.data());
//! }
//! ```

pub mod can;
pub mod gpio;


pub use can::{Can, CanBitrate, CanConfig, CanMessage};
pub use gpio::{DigitalOut, OutputMode};
