//! In-memory bridge doubles for unit tests

use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, ErrorKind, Read, Write},
    rc::Rc,
};

use embedded_hal::blocking::delay::DelayMs;

/// Outcome of one `write` call
#[derive(Debug, Clone, Copy)]
pub enum WriteStep {
    Full,
    Partial(usize),
    Zero,
    Interrupted,
    Fail(ErrorKind),
}

/// Outcome of one `read` call
#[derive(Debug, Clone, Copy)]
pub enum StatusStep {
    Byte(u8),
    Interrupted,
    Fail(ErrorKind),
}

/// Scripted link. Writes beyond the script are accepted in full,
/// reads beyond the script report end of stream.
#[derive(Debug, Default)]
pub struct MockLink {
    written: Rc<RefCell<Vec<u8>>>,
    writes: VecDeque<WriteStep>,
    status: VecDeque<StatusStep>,
    pub flushes: usize,
}

impl MockLink {
    pub fn with_writes(mut self, steps: impl IntoIterator<Item = WriteStep>) -> Self {
        self.writes.extend(steps);
        self
    }

    pub fn with_status(mut self, steps: impl IntoIterator<Item = StatusStep>) -> Self {
        self.status.extend(steps);
        self
    }

    pub fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }
}

impl Write for MockLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match self.writes.pop_front().unwrap_or(WriteStep::Full) {
            WriteStep::Full => buf.len(),
            WriteStep::Partial(n) => n.min(buf.len()),
            WriteStep::Zero => 0,
            WriteStep::Interrupted => return Err(ErrorKind::Interrupted.into()),
            WriteStep::Fail(kind) => return Err(kind.into()),
        };
        self.written.borrow_mut().extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

impl Read for MockLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.status.pop_front() {
            Some(StatusStep::Byte(b)) => {
                buf[0] = b;
                Ok(1)
            }
            Some(StatusStep::Interrupted) => Err(ErrorKind::Interrupted.into()),
            Some(StatusStep::Fail(kind)) => Err(kind.into()),
            None => Ok(0),
        }
    }
}

/// Records each delay along with how many bytes the link had written by then
#[derive(Debug, Default)]
pub struct RecordingDelay {
    written: Rc<RefCell<Vec<u8>>>,
    pub calls: Vec<(usize, u16)>,
}

impl RecordingDelay {
    pub fn watching(link: &MockLink) -> Self {
        RecordingDelay {
            written: link.written.clone(),
            calls: Vec::new(),
        }
    }
}

impl DelayMs<u16> for RecordingDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.calls.push((self.written.borrow().len(), ms));
    }
}
