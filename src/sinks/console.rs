//! Console sinks for stdout and stderr
//!
//! Typical pairing: a stdout sink behind a band filter for informational
//! chatter and a stderr sink behind a threshold filter for warnings and up.

use crate::core::Result;
use crate::sinks::Sink;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleStream {
    Stdout,
    Stderr,
}

pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, line: &[u8]) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(line)?;
                out.write_all(b"\n")?;
            }
            ConsoleStream::Stderr => {
                let mut out = std::io::stderr().lock();
                out.write_all(line)?;
                out.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "console-stdout",
            ConsoleStream::Stderr => "console-stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(ConsoleSink::stdout().name(), "console-stdout");
        assert_eq!(ConsoleSink::stderr().name(), "console-stderr");
    }

    #[test]
    fn test_write_and_flush() {
        let mut sink = ConsoleSink::stdout();
        sink.write(b"{\"message\":\"console test\"}").unwrap();
        sink.flush().unwrap();
        sink.close().unwrap();
    }
}
