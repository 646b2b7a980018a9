use std::{
    collections::VecDeque,
    io::{self, Read, Write},
};

use adf4351_bridge::{
    command::{CommandSource, JsonCommands},
    config::SynthesizerConfig,
    constants::*,
    device::Adf4351,
    errors::*,
    frame::Frame,
    handshake::{Cycle, HandshakeLoop},
};
use embedded_hal::blocking::delay::DelayMs;

/// Bridge double: records every byte, answers from a fixed status script
#[derive(Default)]
struct Bridge {
    rx: Vec<u8>,
    status: VecDeque<u8>,
}

impl Write for Bridge {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // the bridge UART takes at most 3 bytes per call
        let n = buf.len().min(3);
        self.rx.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for Bridge {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.status.pop_front() {
            Some(b) => {
                buf[0] = b;
                Ok(1)
            }
            None => Err(io::ErrorKind::ConnectionReset.into()),
        }
    }
}

impl Bridge {
    fn registers(&self) -> Vec<(u8, u32)> {
        self.rx
            .chunks(FRAME_LEN)
            .map(|c| Frame::decode(c.try_into().unwrap()).unwrap())
            .collect()
    }
}

#[derive(Default)]
struct Delays(Vec<u16>);

impl DelayMs<u16> for Delays {
    fn delay_ms(&mut self, ms: u16) {
        self.0.push(ms);
    }
}

struct Queue(VecDeque<Vec<u8>>);

impl CommandSource for Queue {
    fn poll_command(&mut self) -> nb::Result<Vec<u8>, CommandError> {
        self.0.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

#[test]
fn reference_bring_up() -> anyhow::Result<()> {
    let mut dev = Adf4351::new(Bridge::default());
    let mut delays = Delays::default();

    dev.init(&mut delays, &SynthesizerConfig::default())?;

    let regs = dev.release().registers();
    let r0 = (43 << 15) | (400 << 3);
    let r1 = 1000 << 3;
    let r2 = (1 << 14) | (15 << 9) | (1 << 6);
    let r3 = 1 << 15;
    let r4 = (3 << 20) | (10 << 12) | (1 << 5) | (3 << 3);
    let r5 = 1 << 22;
    assert_eq!(
        vec![
            (5, r5),
            (4, r4),
            (3, r3),
            (2, r2),
            (1, r1),
            (0, r0),
            (5, r5),
            (4, r4),
            (3, r3),
            (2, r2),
            (1, r1 | (1 << 28)),
            (0, r0),
        ],
        regs
    );
    assert_eq!(vec![100], delays.0);
    Ok(())
}

#[test]
fn reconfigure_on_json_command_then_stop_on_link_loss() -> anyhow::Result<()> {
    let bridge = Bridge {
        rx: Vec::new(),
        status: [0, 17, 9, 17, 17].into_iter().collect(),
    };
    let commands = Queue(
        [br#"{"frac": 500}"#.to_vec(), br#"{"cp_current": 99}"#.to_vec()]
            .into_iter()
            .collect(),
    );
    let mut hl = HandshakeLoop::new(
        Adf4351::new(bridge),
        SynthesizerConfig::default(),
        commands,
        JsonCommands,
        Delays::default(),
    );

    assert_eq!(Cycle::Busy(0), hl.poll_once()?);
    assert_eq!(Cycle::Reconfigured, hl.poll_once()?);
    assert_eq!(Cycle::Busy(9), hl.poll_once()?);
    assert_eq!(Cycle::Rejected, hl.poll_once()?);
    assert_eq!(Cycle::Idle, hl.poll_once()?);

    assert_eq!(500, hl.config().frac);
    let regs = hl.device().link().registers();
    assert_eq!(12, regs.len());
    assert_eq!((0, (43 << 15) | (500 << 3)), regs[11]);

    match hl.run() {
        Ok(never) => match never {},
        Err(Error::Link(LinkError::ReadFailed(e))) => {
            assert_eq!(io::ErrorKind::ConnectionReset, e.kind())
        }
        Err(e) => panic!("unexpected {}", e),
    }
    assert_eq!(12, hl.device().link().registers().len());
    Ok(())
}
