//! Log writer that masks registered secrets before output.
//!
//! [`RedactingMakeWriter`] wraps any [`MakeWriter`] used by a
//! `tracing_subscriber` fmt layer. Each writer buffers one formatted event and
//! passes it through [`SecretRegistry::redact`] when flushed or dropped, so a
//! secret is masked even when the formatter splits it across several writes.

use std::io::{self, Write};

use tracing_subscriber::fmt::MakeWriter;

use crate::secrets::SecretRegistry;

/// [`MakeWriter`] adapter that scrubs registered secrets.
///
/// ```
/// use std::io::Write;
/// use step_config::SecretRegistry;
/// use step_config::redact::RedactingMakeWriter;
/// use tracing_subscriber::fmt::MakeWriter;
///
/// let registry = SecretRegistry::new();
/// registry.register("s3cret");
/// let make = RedactingMakeWriter::new(registry, Vec::<u8>::new);
/// let mut writer = make.make_writer();
/// writer.write_all(b"password=s3cret\n").expect("buffered write");
/// ```
#[derive(Clone, Debug)]
pub struct RedactingMakeWriter<M> {
    registry: SecretRegistry,
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    /// Wraps `inner`, masking values registered in `registry`.
    #[must_use]
    pub const fn new(registry: SecretRegistry, inner: M) -> Self {
        Self { registry, inner }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            registry: self.registry.clone(),
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

/// Writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W: Write> {
    registry: SecretRegistry,
    inner: W,
    buffer: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
    fn drain(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.buffer);
        let text = String::from_utf8_lossy(&pending);
        self.inner.write_all(self.registry.redact(&text).as_bytes())
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.inner.flush()
    }
}

impl<W: Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        if self.drain().is_ok() {
            drop(self.inner.flush());
        }
    }
}

/// Redacting writer over standard error, ready for a fmt layer.
#[must_use]
pub fn redacting_stderr(registry: SecretRegistry) -> RedactingMakeWriter<fn() -> io::Stderr> {
    RedactingMakeWriter::new(registry, io::stderr)
}
