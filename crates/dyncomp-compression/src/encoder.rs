//! Stream encoder: applies a [`CompressionDecision`] to a body
//!
//! Gzip streams through the encoder. Brotli is a whole-buffer transform: the
//! body is materialized, compressed, and only then written out.

use crate::decision::{CompressionDecision, Encoding};
use brotli::CompressorWriter;
use dyncomp_config::{BROTLI_MAX_LEVEL, GZIP_MAX_LEVEL};
use dyncomp_core::{Error, HeaderSink, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use http::header::CONTENT_ENCODING;
use std::fmt;
use std::io::{self, Read, Write};
use tracing::{debug, warn};

const BROTLI_BUFFER_SIZE: usize = 4096;
const BROTLI_WINDOW_BITS: u32 = 22;

/// An encoder that must be finalized to produce a valid stream
pub trait Finalize: Write + Sized {
    /// What finalization hands back (usually the wrapped sink)
    type Output;

    /// Flush pending output, then close the stream
    fn finalize(self) -> io::Result<Self::Output>;
}

impl<W: Write> Finalize for GzEncoder<W> {
    type Output = W;

    fn finalize(mut self) -> io::Result<W> {
        self.flush()?;
        let mut inner = self.finish()?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Finalize for CompressorWriter<W> {
    type Output = W;

    fn finalize(self) -> io::Result<W> {
        // into_inner writes the final meta-block
        Ok(self.into_inner())
    }
}

/// Scoped ownership of an encoder
///
/// [`EncoderGuard::finish`] finalizes on the success path. If the guard is
/// dropped unfinished (early return, error, unwinding), `Drop` finalizes
/// instead and only logs a failure, so the original error stays visible.
/// Either way the encoder is finalized exactly once.
pub struct EncoderGuard<E: Finalize> {
    encoder: Option<E>,
    encoding: &'static str,
}

impl<E: Finalize> EncoderGuard<E> {
    /// Take ownership of an encoder
    pub fn new(encoder: E, encoding: &'static str) -> Self {
        Self {
            encoder: Some(encoder),
            encoding,
        }
    }

    /// Finalize the encoder and return its output
    pub fn finish(mut self) -> io::Result<E::Output> {
        match self.encoder.take() {
            Some(encoder) => encoder.finalize(),
            None => Err(finalized_error()),
        }
    }

    fn encoder_mut(&mut self) -> io::Result<&mut E> {
        self.encoder.as_mut().ok_or_else(finalized_error)
    }
}

fn finalized_error() -> io::Error {
    io::Error::other("encoder already finalized")
}

impl<E: Finalize> Write for EncoderGuard<E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder_mut()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder_mut()?.flush()
    }
}

impl<E: Finalize> Drop for EncoderGuard<E> {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            if let Err(e) = encoder.finalize() {
                warn!(
                    encoding = self.encoding,
                    error = %e,
                    "Encoder finalization failed after aborted write"
                );
            }
        }
    }
}

impl<E: Finalize> fmt::Debug for EncoderGuard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderGuard")
            .field("encoding", &self.encoding)
            .field("finalized", &self.encoder.is_none())
            .finish()
    }
}

/// Applies compression decisions to response bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamEncoder;

impl StreamEncoder {
    /// Create a new stream encoder
    pub fn new() -> Self {
        Self
    }

    /// Copy `source` into `destination`, encoded as `decision` says
    ///
    /// `Content-Encoding` is set on `headers` only when an encoding is
    /// applied, and always before the first body byte reaches `destination`.
    /// Failures are returned as is; there is no fallback to another encoding.
    pub fn apply<R, W, H>(
        &self,
        decision: CompressionDecision,
        source: &mut R,
        destination: &mut W,
        headers: &mut H,
    ) -> Result<()>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
        H: HeaderSink + ?Sized,
    {
        match decision {
            CompressionDecision::NoCompression => {
                let copied = io::copy(source, destination)
                    .and_then(|n| destination.flush().map(|_| n))
                    .map_err(|e| Error::encoding("identity", e))?;
                debug!(bytes = copied, "Body copied uncompressed");
                Ok(())
            }
            CompressionDecision::Gzip(level) => {
                self.apply_gzip(level, source, destination, headers)
            }
            CompressionDecision::Brotli(level) => {
                self.apply_brotli(level, source, destination, headers)
            }
        }
    }

    fn apply_gzip<R, W, H>(
        &self,
        level: u32,
        source: &mut R,
        destination: &mut W,
        headers: &mut H,
    ) -> Result<()>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
        H: HeaderSink + ?Sized,
    {
        let encoding = Encoding::Gzip.as_str();
        check_level(Encoding::Gzip, level)?;
        headers.set_header(CONTENT_ENCODING.as_str(), encoding)?;

        let mut encoder = EncoderGuard::new(
            GzEncoder::new(destination, Compression::new(level)),
            encoding,
        );

        let copied =
            io::copy(source, &mut encoder).map_err(|e| Error::encoding(encoding, e))?;
        encoder.finish().map_err(|e| Error::encoding(encoding, e))?;

        debug!(level, input_bytes = copied, "Body gzip encoded");
        Ok(())
    }

    fn apply_brotli<R, W, H>(
        &self,
        level: u32,
        source: &mut R,
        destination: &mut W,
        headers: &mut H,
    ) -> Result<()>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
        H: HeaderSink + ?Sized,
    {
        let encoding = Encoding::Brotli.as_str();
        check_level(Encoding::Brotli, level)?;

        let mut input = Vec::new();
        source
            .read_to_end(&mut input)
            .map_err(|e| Error::encoding(encoding, e))?;

        let mut encoder = EncoderGuard::new(
            CompressorWriter::new(
                Vec::with_capacity(input.len() / 2),
                BROTLI_BUFFER_SIZE,
                level,
                BROTLI_WINDOW_BITS,
            ),
            encoding,
        );
        encoder
            .write_all(&input)
            .map_err(|e| Error::encoding(encoding, e))?;
        let compressed = encoder.finish().map_err(|e| Error::encoding(encoding, e))?;

        headers.set_header(CONTENT_ENCODING.as_str(), encoding)?;
        destination
            .write_all(&compressed)
            .and_then(|_| destination.flush())
            .map_err(|e| Error::encoding(encoding, e))?;

        debug!(
            level,
            input_bytes = input.len(),
            output_bytes = compressed.len(),
            "Body brotli encoded"
        );
        Ok(())
    }
}

fn check_level(encoding: Encoding, level: u32) -> Result<()> {
    let max = match encoding {
        Encoding::Gzip => GZIP_MAX_LEVEL,
        Encoding::Brotli => BROTLI_MAX_LEVEL,
    };
    if level > max {
        return Err(Error::construction(
            encoding.as_str(),
            format!("level {level} out of range 0..={max}"),
        ));
    }
    Ok(())
}
