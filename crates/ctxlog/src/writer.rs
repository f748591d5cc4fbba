//! In-memory destination for capturing emitted records.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

/// A shared, growable buffer usable as a logger destination
///
/// Clones share the same buffer, so a test can hand one clone to
/// [`Logger::with_writer`](crate::Logger::with_writer) and read the output
/// through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter
{
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter
{
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    #[must_use]
    pub fn contents(&self) -> String
    {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Written lines, without their terminators
    #[must_use]
    pub fn lines(&self) -> Vec<String>
    {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for MemoryWriter
{
    fn write(&mut self, data: &[u8]) -> io::Result<usize>
    {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()>
    {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter
{
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer
    {
        self.clone()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_clones_share_buffer()
    {
        let writer = MemoryWriter::new();
        let mut handle = writer.make_writer();
        handle.write_all(b"one\ntwo\n").unwrap();

        assert_eq!(writer.lines(), ["one", "two"]);
    }
}
