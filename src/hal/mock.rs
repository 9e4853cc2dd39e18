use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{CanHal, GpioHal, PinFlags, Status};
use crate::error::Errno;
use crate::types::{ChannelId, PinId};

/// Calls observed by a [`MockCan`]
#[derive(Debug, Default, Clone)]
pub struct CanLog {
    pub opened: Vec<ChannelId>,
    pub closed: Vec<ChannelId>,
    pub baud_rates: Vec<u32>,
    pub written: Vec<(u32, Vec<u8>)>,
    pub reads: usize,
}

/// A scripted response for the next HAL read
#[derive(Debug, Clone)]
pub enum MockRead {
    /// Copy `buffer` into the caller's buffer (up to its length), set `id`
    /// and report `count` received bytes.
    Frame {
        id: u32,
        buffer: [u8; 8],
        count: Status,
    },
    /// Fail with the given status.
    Status(Status),
}

#[derive(Debug, Default)]
struct MockCanState {
    log: CanLog,
    missing: Vec<ChannelId>,
    baud_status: Status,
    write_status: Status,
    close_status: Status,
    echo: bool,
    loopback: VecDeque<(u32, Vec<u8>)>,
    script: VecDeque<MockRead>,
}

/// Handle issued by [`MockCan::open`]
#[derive(Debug)]
pub struct MockCanHandle {
    channel: ChannelId,
}

impl MockCanHandle {
    pub fn channel(&self) -> ChannelId {
        self.channel
    }
}

/// Mock CAN HAL for testing.
///
/// Clones share state, so a test can keep one clone to script responses and
/// inspect the call log after the peripheral owning the other clone is gone.
#[derive(Debug, Clone, Default)]
pub struct MockCan {
    state: Arc<Mutex<MockCanState>>,
}

impl MockCan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that loops every written frame back to the next read
    pub fn new_echo() -> Self {
        let mock = Self::new();
        mock.lock().echo = true;
        mock
    }

    fn lock(&self) -> MutexGuard<'_, MockCanState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes `open` return no handle for `channel`
    pub fn set_missing(&self, channel: ChannelId) {
        self.lock().missing.push(channel);
    }

    pub fn set_baud_status(&self, status: Status) {
        self.lock().baud_status = status;
    }

    pub fn set_write_status(&self, status: Status) {
        self.lock().write_status = status;
    }

    pub fn set_close_status(&self, status: Status) {
        self.lock().close_status = status;
    }

    /// Queues a response for a future read
    pub fn push_read(&self, read: MockRead) {
        self.lock().script.push_back(read);
    }

    /// Snapshot of every call made so far
    pub fn log(&self) -> CanLog {
        self.lock().log.clone()
    }
}

impl CanHal for MockCan {
    type Handle = MockCanHandle;

    fn open(&mut self, channel: ChannelId) -> Option<Self::Handle> {
        let mut state = self.lock();
        if state.missing.contains(&channel) {
            return None;
        }
        state.log.opened.push(channel);
        Some(MockCanHandle { channel })
    }

    fn close(&mut self, handle: Self::Handle) -> Status {
        let mut state = self.lock();
        state.log.closed.push(handle.channel);
        state.close_status
    }

    fn set_baud_rate(&mut self, _handle: &mut Self::Handle, baud_rate: u32) -> Status {
        let mut state = self.lock();
        state.log.baud_rates.push(baud_rate);
        state.baud_status
    }

    fn write(&mut self, _handle: &mut Self::Handle, id: u32, data: &[u8]) -> Status {
        let mut state = self.lock();
        state.log.written.push((id, data.to_vec()));
        if state.write_status < 0 {
            return state.write_status;
        }
        if state.echo {
            state.loopback.push_back((id, data.to_vec()));
        }
        state.write_status
    }

    fn read(&mut self, _handle: &mut Self::Handle, id: &mut u32, data: &mut [u8]) -> Status {
        let mut state = self.lock();
        state.log.reads += 1;

        if let Some(read) = state.script.pop_front() {
            return match read {
                MockRead::Frame {
                    id: frame_id,
                    buffer,
                    count,
                } => {
                    let n = data.len().min(buffer.len());
                    data[..n].copy_from_slice(&buffer[..n]);
                    *id = frame_id;
                    count
                }
                MockRead::Status(status) => status,
            };
        }

        match state.loopback.pop_front() {
            Some((frame_id, payload)) if payload.len() <= data.len() => {
                data[..payload.len()].copy_from_slice(&payload);
                *id = frame_id;
                payload.len() as Status
            }
            Some(_) => -Errno::ENOSPC.code(),
            None => -Errno::EAGAIN.code(),
        }
    }
}

/// Calls observed by a [`MockGpio`]
#[derive(Debug, Default, Clone)]
pub struct GpioLog {
    pub configs: Vec<(PinId, PinFlags)>,
    pub writes: Vec<(PinId, bool)>,
}

/// Mock GPIO HAL recording configuration and output writes
#[derive(Debug, Clone, Default)]
pub struct MockGpio {
    log: Arc<Mutex<GpioLog>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GpioLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn log(&self) -> GpioLog {
        self.lock().clone()
    }

    /// Last level written to `pin`, if any
    pub fn level(&self, pin: PinId) -> Option<bool> {
        self.lock()
            .writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, high)| *high)
    }
}

impl GpioHal for MockGpio {
    fn pin_config(&mut self, pin: PinId, flags: PinFlags) {
        self.lock().configs.push((pin, flags));
    }

    fn pin_write(&mut self, pin: PinId, high: bool) {
        self.lock().writes.push((pin, high));
    }
}
