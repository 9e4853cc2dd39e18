use std::sync::{Arc, Mutex};
use std::thread;

use boardio::can::{Can, CanConfig, CanMessage};
use boardio::error::{Errno, Error};
use boardio::gpio::DigitalOut;
use boardio::hal::mock::{MockCan, MockGpio, MockRead};
use boardio::types::{ChannelId, PinId};

#[test]
fn test_can_full_lifecycle() {
    let mock = MockCan::new_echo();

    {
        let mut can = Can::with_config(mock.clone(), 1, &CanConfig::default()).unwrap();

        // Reconfigure, transmit, loop back
        can.set_baud_rate(250_000).unwrap();
        for id in [0x100u32, 0x200, 0x300] {
            let message = CanMessage::new(id, id.to_be_bytes()).unwrap();
            can.write(&message).unwrap();
        }

        let received: Vec<CanMessage> = std::iter::from_fn(|| can.read()).collect();
        assert_eq!(received.len(), 3);
        assert_eq!(received[1].id(), 0x200);
        assert_eq!(received[1].data(), &[0x00, 0x00, 0x02, 0x00]);

        // Queue drained
        assert_eq!(can.try_read(), Err(Error::Errno(Errno::EAGAIN)));
    }

    let log = mock.log();
    assert_eq!(log.opened, vec![ChannelId(1)]);
    assert_eq!(log.baud_rates, vec![500_000, 250_000]);
    assert_eq!(log.written.len(), 3);
    assert_eq!(log.closed, vec![ChannelId(1)]);
}

#[test]
fn test_can_recovers_after_errors() {
    let mock = MockCan::new();
    let mut can = Can::new(mock.clone(), 0);

    mock.set_write_status(-16);
    let message = CanMessage::new(0x7E0, [0x02u8, 0x01, 0x0C]).unwrap();
    assert_eq!(can.write(&message).unwrap_err().errno(), Errno::EBUSY);

    mock.set_write_status(0);
    assert!(can.write(&message).is_ok());

    mock.push_read(MockRead::Status(-5));
    mock.push_read(MockRead::Frame {
        id: 0x7E8,
        buffer: [0x04, 0x41, 0x0C, 0x1A, 0xF8, 0x55, 0x55, 0x55],
        count: 5,
    });
    assert!(can.read().is_none());
    let reply = can.read().unwrap();
    assert_eq!(reply.id(), 0x7E8);
    assert_eq!(reply.data(), &[0x04, 0x41, 0x0C, 0x1A, 0xF8]);

    drop(can);
    assert_eq!(mock.log().closed.len(), 1);
}

#[test]
fn test_can_shared_behind_mutex() {
    let mock = MockCan::new();
    let can = Arc::new(Mutex::new(Can::new(mock.clone(), 0)));

    let handles: Vec<_> = (0..4u32)
        .map(|n| {
            let can = Arc::clone(&can);
            thread::spawn(move || {
                let message = CanMessage::new(n, [n as u8]).unwrap();
                can.lock().unwrap().write(&message).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(mock.log().written.len(), 4);
    drop(can);
    assert_eq!(mock.log().closed, vec![ChannelId(0)]);
}

#[test]
fn test_digital_out_blink() {
    let mock = MockGpio::new();
    let mut led = DigitalOut::new(mock.clone(), PinId(0));

    for _ in 0..4 {
        led.toggle();
    }

    let levels: Vec<bool> = mock.log().writes.iter().map(|(_, high)| *high).collect();
    assert_eq!(levels, vec![false, true, false, true, false]);
    assert!(!led.is_set_high());
}
