use std::fmt;
use thiserror::Error;

use crate::types::ChannelId;

/// POSIX-style error number reported by the HAL.
///
/// Always stored as a positive number; negative HAL statuses are folded into
/// their magnitude by [`Errno::from_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(i32);

impl Errno {
    pub const EPERM: Errno = Errno(1);
    pub const ENOENT: Errno = Errno(2);
    pub const EINTR: Errno = Errno(4);
    pub const EIO: Errno = Errno(5);
    pub const ENXIO: Errno = Errno(6);
    pub const EBADF: Errno = Errno(9);
    pub const EAGAIN: Errno = Errno(11);
    pub const ENOMEM: Errno = Errno(12);
    pub const EACCES: Errno = Errno(13);
    pub const EFAULT: Errno = Errno(14);
    pub const EBUSY: Errno = Errno(16);
    pub const ENODEV: Errno = Errno(19);
    pub const EINVAL: Errno = Errno(22);
    pub const ENOSPC: Errno = Errno(28);
    pub const ENOSYS: Errno = Errno(88);
    pub const ENETUNREACH: Errno = Errno(114);
    pub const ENETDOWN: Errno = Errno(115);
    pub const ETIMEDOUT: Errno = Errno(116);
    pub const EALREADY: Errno = Errno(120);
    pub const ENOTSUP: Errno = Errno(134);
    pub const ECANCELED: Errno = Errno(140);

    /// Creates an errno from a raw error number of either sign.
    pub const fn new(code: i32) -> Self {
        Errno(code.saturating_abs())
    }

    /// Folds a negative HAL status into its error number.
    pub const fn from_status(status: i32) -> Self {
        Errno::new(status)
    }

    /// The positive error number.
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Human-readable description of the error number.
    pub fn description(self) -> &'static str {
        match self {
            Errno::EPERM => "operation not permitted",
            Errno::ENOENT => "no such file or directory",
            Errno::EINTR => "interrupted system call",
            Errno::EIO => "I/O error",
            Errno::ENXIO => "no such device or address",
            Errno::EBADF => "bad file descriptor",
            Errno::EAGAIN => "resource temporarily unavailable",
            Errno::ENOMEM => "not enough memory",
            Errno::EACCES => "permission denied",
            Errno::EFAULT => "bad address",
            Errno::EBUSY => "device or resource busy",
            Errno::ENODEV => "no such device",
            Errno::EINVAL => "invalid argument",
            Errno::ENOSPC => "no space left on device",
            Errno::ENOSYS => "function not implemented",
            Errno::ENETUNREACH => "network is unreachable",
            Errno::ENETDOWN => "network is down",
            Errno::ETIMEDOUT => "operation timed out",
            Errno::EALREADY => "operation already in progress",
            Errno::ENOTSUP => "operation not supported",
            Errno::ECANCELED => "operation canceled",
            _ => "unknown error",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (errno {})", self.description(), self.0)
    }
}

impl std::error::Error for Errno {}

/// Peripheral kinds, used to name the failing resource in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    Can,
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Peripheral::Can => write!(f, "CAN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The HAL returned a negative status.
    #[error(transparent)]
    Errno(#[from] Errno),

    /// The HAL could not produce a handle for the channel.
    #[error("{peripheral} {channel} init failed")]
    OpenFailed {
        peripheral: Peripheral,
        channel: ChannelId,
    },

    /// Configuration rejected before reaching the HAL.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl Error {
    /// The error number this error corresponds to.
    pub fn errno(&self) -> Errno {
        match self {
            Error::Errno(errno) => *errno,
            Error::OpenFailed { .. } => Errno::ENODEV,
            Error::InvalidConfig(_) => Errno::EINVAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_status_folds_to_magnitude() {
        assert_eq!(Errno::from_status(-22), Errno::EINVAL);
        assert_eq!(Errno::from_status(-5).code(), 5);
        assert_eq!(Errno::from_status(i32::MIN).code(), i32::MAX);
    }

    #[test]
    fn display_includes_description_and_number() {
        assert_eq!(Errno::EBUSY.to_string(), "device or resource busy (errno 16)");
        assert_eq!(Errno::new(9999).to_string(), "unknown error (errno 9999)");
        assert_eq!(Error::from(Errno::EIO).to_string(), "I/O error (errno 5)");
    }

    #[test]
    fn open_failure_names_the_channel() {
        let err = Error::OpenFailed {
            peripheral: Peripheral::Can,
            channel: ChannelId(3),
        };
        assert_eq!(err.to_string(), "CAN 3 init failed");
        assert_eq!(err.errno(), Errno::ENODEV);
    }
}
