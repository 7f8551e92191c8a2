//! Sink trait and implementations
//!
//! A sink is a destination that receives rendered records. Sinks are owned
//! and written exclusively by the dispatcher thread, so implementations need
//! `Send` but no internal locking.

pub mod console;
pub mod rotating_file;

pub use console::ConsoleSink;
pub use rotating_file::RotatingFileSink;

use crate::core::Result;

pub trait Sink: Send {
    /// Write one rendered record; the newline framing is the sink's job
    fn write(&mut self, line: &[u8]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Release resources at shutdown; defaults to a final flush
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}
