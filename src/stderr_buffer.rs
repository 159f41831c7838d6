use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn buffer() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Activate buffering. While active, warnings and log lines are stored
/// instead of printed to stderr.
pub fn activate() {
    *buffer() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    buffer().take().unwrap_or_default()
}

/// Write a warning message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn warn(msg: String) {
    let mut guard = buffer();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// stderr writer for the tracing subscriber that honors the buffer.
pub struct BufferedStderr;

impl Write for BufferedStderr {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let mut guard = buffer();
        if let Some(buf) = guard.as_mut() {
            let line = String::from_utf8_lossy(bytes);
            buf.push(line.trim_end_matches('\n').to_string());
            Ok(bytes.len())
        } else {
            drop(guard);
            io::stderr().write(bytes)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// `MakeWriter` target for `tracing_subscriber::fmt().with_writer(...)`.
pub fn writer() -> BufferedStderr {
    BufferedStderr
}

/// Convenience macro that works like `eprintln!` but routes through the
/// stderr buffer when it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}
