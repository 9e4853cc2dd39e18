use tracing::{debug, error};

use crate::error::{Errno, Error, Peripheral, Result};
use crate::hal::{CanHal, Status};
use crate::status::{nothing_or_errno, validate_length, value_or_errno};
use crate::types::{ChannelId, Config};

/// Maximum payload of a classic CAN frame
pub const MAX_DATA_LEN: usize = 8;

/// Bus speed applied when none is given
pub const DEFAULT_BAUD_RATE: u32 = 500_000;

/// Standard classic CAN bitrates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanBitrate {
    Rate1M,
    Rate500K,
    Rate250K,
    Rate125K,
    Rate100K,
    Rate50K,
    Rate20K,
    Rate10K,
    Custom(u32),
}

impl CanBitrate {
    /// Bits per second
    pub fn bps(self) -> u32 {
        match self {
            CanBitrate::Rate1M => 1_000_000,
            CanBitrate::Rate500K => 500_000,
            CanBitrate::Rate250K => 250_000,
            CanBitrate::Rate125K => 125_000,
            CanBitrate::Rate100K => 100_000,
            CanBitrate::Rate50K => 50_000,
            CanBitrate::Rate20K => 20_000,
            CanBitrate::Rate10K => 10_000,
            CanBitrate::Custom(rate) => rate,
        }
    }
}

impl From<CanBitrate> for u32 {
    fn from(bitrate: CanBitrate) -> Self {
        bitrate.bps()
    }
}

/// CAN configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanConfig {
    pub baud_rate: u32,
}

impl CanConfig {
    pub fn with_bitrate(bitrate: CanBitrate) -> Self {
        Self {
            baud_rate: bitrate.bps(),
        }
    }
}

impl Default for CanConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

impl Config for CanConfig {
    fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(Error::InvalidConfig("baud rate must be non-zero"));
        }
        Ok(())
    }
}

/// A classic CAN frame: identifier plus at most [`MAX_DATA_LEN`] payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanMessage {
    id: u32,
    data: Vec<u8>,
}

impl CanMessage {
    /// Builds a message, rejecting payloads longer than [`MAX_DATA_LEN`]
    /// with `EINVAL`.
    pub fn new(id: u32, data: impl Into<Vec<u8>>) -> Result<Self> {
        let data = data.into();
        if data.len() > MAX_DATA_LEN {
            return Err(Errno::EINVAL.into());
        }
        Ok(Self { id, data })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// An open CAN controller.
///
/// Owns the HAL handle from construction until it is dropped (or passed to
/// [`Can::close`]); the handle is closed exactly once and never leaves this
/// type. Every operation is a single blocking HAL call.
///
/// `Can` has no internal locking. Operations take `&mut self`, so sharing one
/// controller between threads requires wrapping it in a `Mutex`.
pub struct Can<H: CanHal> {
    hal: H,
    handle: Option<H::Handle>,
    channel: ChannelId,
    baud_rate: u32,
}

impl<H: CanHal> Can<H> {
    /// Opens `channel` at [`DEFAULT_BAUD_RATE`].
    ///
    /// # Panics
    ///
    /// Panics if the HAL cannot open the channel. A missing controller is a
    /// board configuration error, not a runtime condition.
    pub fn new(hal: H, channel: impl Into<ChannelId>) -> Self {
        Self::with_baud_rate(hal, channel, DEFAULT_BAUD_RATE)
    }

    /// Opens `channel` and applies `baud_rate`.
    ///
    /// A failure to apply the rate is logged and leaves the controller open at
    /// the HAL's default speed.
    ///
    /// # Panics
    ///
    /// Panics if the HAL cannot open the channel.
    pub fn with_baud_rate(hal: H, channel: impl Into<ChannelId>, baud_rate: u32) -> Self {
        match Self::try_open(hal, channel, baud_rate) {
            Ok(can) => can,
            Err(err) => panic!("{err}"),
        }
    }

    /// Validates `config`, then opens `channel` without panicking.
    pub fn with_config(hal: H, channel: impl Into<ChannelId>, config: &CanConfig) -> Result<Self> {
        config.validate()?;
        Self::try_open(hal, channel, config.baud_rate)
    }

    /// Opens `channel` and applies `baud_rate`, returning
    /// [`Error::OpenFailed`] instead of panicking when no handle is produced.
    pub fn try_open(mut hal: H, channel: impl Into<ChannelId>, baud_rate: u32) -> Result<Self> {
        let channel = channel.into();
        let Some(handle) = hal.open(channel) else {
            let err = Error::OpenFailed {
                peripheral: Peripheral::Can,
                channel,
            };
            error!(%channel, error = %err, "CAN open failed");
            return Err(err);
        };
        debug!(%channel, "CAN opened");

        let mut can = Self {
            hal,
            handle: Some(handle),
            channel,
            baud_rate,
        };
        // already logged; open succeeds regardless
        let _ = can.set_baud_rate(baud_rate);
        Ok(can)
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// The most recently requested bus speed.
    ///
    /// Updated even when the HAL rejected the request, so it may differ from
    /// the speed the controller is actually running at. Check the result of
    /// [`Can::set_baud_rate`] to detect that.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Reconfigures the bus speed.
    pub fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()> {
        let status = self.hal_call(|hal, handle| hal.set_baud_rate(handle, baud_rate));
        self.baud_rate = baud_rate;

        let result = nothing_or_errno(status);
        match &result {
            Ok(()) => debug!(channel = %self.channel, baud_rate, "CAN baud rate set"),
            Err(err) => self.log_failure("set_baud_rate", err),
        }
        result
    }

    /// Sends one frame. Never retries.
    pub fn write(&mut self, message: &CanMessage) -> Result<()> {
        self.transmit("write", message.id, &message.data)
    }

    /// Sends the first `count` bytes of `data` (all of it when `None`) under
    /// `id`.
    ///
    /// A `count` past the end of `data`, or a resolved length over
    /// [`MAX_DATA_LEN`], fails with `EINVAL` before the HAL is called.
    pub fn write_bytes(&mut self, id: u32, data: &[u8], count: Option<usize>) -> Result<()> {
        let length = validate_length(data, count).and_then(|length| {
            if length > MAX_DATA_LEN {
                Err(Errno::EINVAL.into())
            } else {
                Ok(length)
            }
        });
        match length {
            Ok(length) => self.transmit("write_bytes", id, &data[..length]),
            Err(err) => {
                self.log_failure("write_bytes", &err);
                Err(err)
            }
        }
    }

    /// Receives one frame, or `None` on any HAL failure.
    ///
    /// The failure itself is only logged. Use [`Can::try_read`] to get it.
    pub fn read(&mut self) -> Option<CanMessage> {
        self.try_read().ok()
    }

    /// Receives one frame.
    ///
    /// The payload holds exactly the number of bytes the HAL reports as
    /// received; the rest of the receive buffer is discarded.
    pub fn try_read(&mut self) -> Result<CanMessage> {
        let mut id = 0u32;
        let mut buffer = [0u8; MAX_DATA_LEN];
        let status = self.hal_call(|hal, handle| hal.read(handle, &mut id, &mut buffer));

        let result = value_or_errno(status)
            .and_then(|count| validate_length(&buffer, Some(count)))
            .map(|length| CanMessage {
                id,
                data: buffer[..length].to_vec(),
            });
        if let Err(err) = &result {
            self.log_failure("read", err);
        }
        result
    }

    /// Closes the controller now and reports the HAL's close status.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let result = nothing_or_errno(self.hal.close(handle));
        match &result {
            Ok(()) => debug!(channel = %self.channel, "CAN closed"),
            Err(err) => self.log_failure("close", err),
        }
        result
    }

    fn transmit(&mut self, op: &'static str, id: u32, data: &[u8]) -> Result<()> {
        let status = self.hal_call(|hal, handle| hal.write(handle, id, data));
        let result = nothing_or_errno(status);
        if let Err(err) = &result {
            self.log_failure(op, err);
        }
        result
    }

    fn hal_call<F>(&mut self, f: F) -> Status
    where
        F: FnOnce(&mut H, &mut H::Handle) -> Status,
    {
        match self.handle.as_mut() {
            Some(handle) => f(&mut self.hal, handle),
            None => -Errno::EBADF.code(),
        }
    }

    fn log_failure(&self, op: &'static str, err: &Error) {
        error!(channel = %self.channel, op, error = %err, "CAN {op} failed");
    }
}

impl<H: CanHal> Drop for Can<H> {
    fn drop(&mut self) {
        // errors are logged by release
        let _ = self.release();
    }
}

impl<H: CanHal> std::fmt::Debug for Can<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Can")
            .field("channel", &self.channel)
            .field("baud_rate", &self.baud_rate)
            .field("open", &self.handle.is_some())
            .finish()
    }
}
