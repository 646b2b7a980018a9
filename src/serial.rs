//! Serial port to the bridge microcontroller

use std::{
    io::{self, ErrorKind, Read, Write},
    time::Duration,
};

use serialport::SerialPort;

/// Port timeout used while waiting for status with no deadline.
/// Read timeouts are retried, a write that stalls this long fails.
const PORT_TIMEOUT: Duration = Duration::from_secs(1);

/// Raw serial link to the bridge
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    status_timeout: Option<Duration>,
}

/// Opens the bridge port at `baud`, 8N1, no flow control.
///
/// `status_timeout` bounds each status read, `None` blocks until a byte
/// arrives.
pub fn open(
    path: &str,
    baud: u32,
    status_timeout: Option<Duration>,
) -> Result<SerialLink, serialport::Error> {
    let port = serialport::new(path, baud)
        .timeout(status_timeout.unwrap_or(PORT_TIMEOUT))
        .open()?;
    tracing::info!("opened {} at {} baud", path, baud);

    Ok(SerialLink {
        port,
        status_timeout,
    })
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.port.read(buf) {
                Err(e) if e.kind() == ErrorKind::TimedOut && self.status_timeout.is_none() => {
                    tracing::trace!("no status yet");
                }
                res => return res,
            }
        }
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}
