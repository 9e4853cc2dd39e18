//! Translation of raw HAL status codes into typed results.
//!
//! Every HAL primitive returns a signed status: zero or positive on success
//! (a positive value may carry a count), negative on failure with the
//! magnitude naming a POSIX error number. These helpers are the only place
//! that convention is interpreted; they never call into the HAL.

use crate::error::{Errno, Result};
use crate::hal::Status;

/// Succeeds with `value` when `status` is non-negative.
#[inline]
pub fn value_or_errno_with<T>(value: T, status: Status) -> Result<T> {
    if status < 0 {
        Err(Errno::from_status(status).into())
    } else {
        Ok(value)
    }
}

/// Succeeds with the status itself, e.g. a byte count.
#[inline]
pub fn value_or_errno(status: Status) -> Result<usize> {
    // non-negative i32 always fits
    value_or_errno_with(status as usize, status)
}

/// Succeeds with `()` when `status` is non-negative.
#[inline]
pub fn nothing_or_errno(status: Status) -> Result<()> {
    value_or_errno_with((), status)
}

/// Resolves how many bytes of `buffer` an operation should touch.
///
/// With no `count` the whole buffer is used. A `count` (in elements) larger
/// than the buffer fails with `EINVAL`.
#[inline]
pub fn validate_length<T>(buffer: &[T], count: Option<usize>) -> Result<usize> {
    let elements = match count {
        Some(count) if count > buffer.len() => return Err(Errno::EINVAL.into()),
        Some(count) => count,
        None => buffer.len(),
    };
    Ok(elements * std::mem::size_of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn zero_and_positive_status_succeed() {
        assert_eq!(nothing_or_errno(0), Ok(()));
        assert_eq!(nothing_or_errno(7), Ok(()));
        assert_eq!(value_or_errno(3), Ok(3));
    }

    #[test]
    fn negative_status_carries_errno() {
        assert_eq!(nothing_or_errno(-16), Err(Error::Errno(Errno::EBUSY)));
        assert_eq!(value_or_errno(-5), Err(Error::Errno(Errno::EIO)));
    }

    #[test]
    fn payload_is_returned_instead_of_status() {
        assert_eq!(value_or_errno_with("frame", 0), Ok("frame"));
        assert_eq!(value_or_errno_with(42u32, 8), Ok(42));
        assert_eq!(
            value_or_errno_with(42u32, -11),
            Err(Error::Errno(Errno::EAGAIN))
        );
    }

    #[test]
    fn length_defaults_to_full_buffer() {
        let buf = [0u8; 8];
        assert_eq!(validate_length(&buf, None), Ok(8));
        assert_eq!(validate_length(&buf, Some(3)), Ok(3));
        assert_eq!(validate_length(&buf, Some(8)), Ok(8));
        assert_eq!(validate_length(&buf, Some(0)), Ok(0));
    }

    #[test]
    fn length_scales_with_element_size() {
        let words = [0u16; 4];
        assert_eq!(validate_length(&words, None), Ok(8));
        assert_eq!(validate_length(&words, Some(2)), Ok(4));
    }

    #[test]
    fn length_past_capacity_is_invalid() {
        let buf = [0u8; 8];
        assert_eq!(
            validate_length(&buf, Some(9)),
            Err(Error::Errno(Errno::EINVAL))
        );
        let empty: [u8; 0] = [];
        assert_eq!(
            validate_length(&empty, Some(1)),
            Err(Error::Errno(Errno::EINVAL))
        );
    }
}
