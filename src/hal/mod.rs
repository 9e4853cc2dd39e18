//! The HAL seam.
//!
//! Peripheral handles never touch registers themselves. They drive one of the
//! traits below, which a board support package implements on top of its
//! vendor driver layer:
//! - [`CanHal`] - CAN controller open/close/configure/transfer primitives
//! - [`GpioHal`] - pin configuration and output writes
//!
//! All CAN primitives report a signed [`Status`]: zero or positive on
//! success, a negative POSIX error number on failure. Interpreting that code
//! is left to [`crate::status`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use boardio::hal::CanHal;
//!
//! struct BoardCan;
//!
//! impl CanHal for BoardCan {
//!     type Handle = *mut core::ffi::c_void;
//!     // forward each primitive to the vendor driver ...
//! }
//! ```

use bitflags::bitflags;

use crate::types::{ChannelId, PinId};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// Raw status code returned by HAL primitives
pub type Status = i32;

/// CAN controller primitives.
///
/// `Handle` is the opaque resource returned by [`CanHal::open`]. It is moved
/// into [`CanHal::close`], so a released handle can never be passed back to
/// the HAL.
pub trait CanHal {
    type Handle;

    /// Opens the controller for `channel`, `None` if it does not exist or
    /// cannot be used.
    fn open(&mut self, channel: ChannelId) -> Option<Self::Handle>;

    fn close(&mut self, handle: Self::Handle) -> Status;

    /// Sets the bus speed in bits per second.
    fn set_baud_rate(&mut self, handle: &mut Self::Handle, baud_rate: u32) -> Status;

    fn write(&mut self, handle: &mut Self::Handle, id: u32, data: &[u8]) -> Status;

    /// Receives one frame into `id` and `data`, returning the number of bytes
    /// actually stored in `data`.
    fn read(&mut self, handle: &mut Self::Handle, id: &mut u32, data: &mut [u8]) -> Status;
}

bitflags! {
    /// Pin configuration word passed to [`GpioHal::pin_config`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PinFlags: u32 {
        const INPUT = 1;
        const OUTPUT = 2;
        const OPEN_DRAIN = 4;
        const PULL_UP = 8;
        const PULL_DOWN = 16;
    }
}

/// GPIO primitives. Pin writes are a single register access with no error path.
pub trait GpioHal {
    fn pin_config(&mut self, pin: PinId, flags: PinFlags);

    fn pin_write(&mut self, pin: PinId, high: bool);
}
