//! Scatter-gather write strategies
//!
//! A pending batch is written either with a single vectored call (`writev(2)`
//! on unix) or, where the platform has no usable vectored primitive, as one
//! ordinary write per descriptor. [`NativeGather`] names the strategy chosen
//! for the build target; both strategies are always compiled so either can be
//! used against any `Write` sink.
//!
//! Win32 does have `WriteFileGather`, but it demands page-aligned,
//! page-sized buffers, which rules it out for arbitrary descriptors.

use crate::error::{FsError, Result};
use std::io::{IoSlice, Write};
use tracing::error;

/// A way of writing a batch of buffers contiguously
pub trait GatherWrite {
    /// Write every buffer in `bufs`, in order, returning the total written
    ///
    /// # Errors
    ///
    /// `WriteFail` if the sink reports an error or accepts fewer bytes than
    /// requested.
    fn write_batch<W: Write + ?Sized>(out: &mut W, bufs: &[IoSlice<'_>]) -> Result<usize>;
}

/// One vectored write covering the whole batch
#[derive(Debug, Clone, Copy, Default)]
pub struct VectoredGather;

impl GatherWrite for VectoredGather {
    fn write_batch<W: Write + ?Sized>(out: &mut W, bufs: &[IoSlice<'_>]) -> Result<usize> {
        if bufs.is_empty() {
            return Ok(0);
        }

        let total: usize = bufs.iter().map(|buf| buf.len()).sum();
        match out.write_vectored(bufs) {
            Ok(written) if written == total => Ok(written),
            Ok(written) => {
                error!("writev: wrote {} of {} bytes", written, total);
                Err(FsError::WriteFail)
            }
            Err(e) => {
                error!("writev: {}", e);
                Err(FsError::WriteFail)
            }
        }
    }
}

/// One ordinary write per descriptor, stopping at the first short write
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialGather;

impl GatherWrite for SequentialGather {
    fn write_batch<W: Write + ?Sized>(out: &mut W, bufs: &[IoSlice<'_>]) -> Result<usize> {
        let mut total = 0;
        for (index, buf) in bufs.iter().enumerate() {
            match out.write(buf) {
                Ok(written) if written == buf.len() => total += written,
                Ok(written) => {
                    error!(
                        "write: descriptor {} wrote {} of {} bytes",
                        index,
                        written,
                        buf.len()
                    );
                    return Err(FsError::WriteFail);
                }
                Err(e) => {
                    error!("write: descriptor {}: {}", index, e);
                    return Err(FsError::WriteFail);
                }
            }
        }
        Ok(total)
    }
}

/// Strategy used by [`super::FileWriter::flush`] on this platform
#[cfg(unix)]
pub type NativeGather = VectoredGather;

/// Strategy used by [`super::FileWriter::flush`] on this platform
#[cfg(not(unix))]
pub type NativeGather = SequentialGather;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::io;

    /// Sink that records each call and accepts at most `limit` bytes per call
    struct Recorder {
        data: Vec<u8>,
        calls: usize,
        limit: usize,
        fail_on_call: Option<usize>,
    }

    impl Recorder {
        fn new(limit: usize) -> Self {
            Self {
                data: Vec::new(),
                calls: 0,
                limit,
                fail_on_call: None,
            }
        }
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.fail_on_call == Some(self.calls) {
                return Err(io::Error::other("injected"));
            }
            let n = buf.len().min(self.limit);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
            self.calls += 1;
            let mut budget = self.limit;
            let mut written = 0;
            for buf in bufs {
                let n = buf.len().min(budget);
                self.data.extend_from_slice(&buf[..n]);
                budget -= n;
                written += n;
            }
            Ok(written)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn batch<'a>(parts: &[&'a [u8]]) -> Vec<IoSlice<'a>> {
        parts.iter().map(|part| IoSlice::new(part)).collect()
    }

    #[test]
    fn test_vectored_is_one_call() {
        let mut sink = Recorder::new(usize::MAX);
        let bufs = batch(&[b"head", b"", b"body", b"tail"]);

        assert_eq!(VectoredGather::write_batch(&mut sink, &bufs), Ok(12));
        assert_eq!(sink.calls, 1);
        assert_eq!(sink.data, b"headbodytail");
    }

    #[test]
    fn test_vectored_short_write_fails() {
        let mut sink = Recorder::new(5);
        let bufs = batch(&[b"head", b"body"]);

        assert_eq!(
            VectoredGather::write_batch(&mut sink, &bufs),
            Err(FsError::WriteFail)
        );
    }

    #[test]
    fn test_sequential_writes_in_order() {
        let mut sink = Recorder::new(usize::MAX);
        let bufs = batch(&[b"a", b"bc", b"def"]);

        assert_eq!(SequentialGather::write_batch(&mut sink, &bufs), Ok(6));
        assert_eq!(sink.calls, 3);
        assert_eq!(sink.data, b"abcdef");
    }

    #[test]
    fn test_sequential_stops_at_first_failure() {
        let mut sink = Recorder::new(usize::MAX);
        sink.fail_on_call = Some(2);
        let bufs = batch(&[b"one", b"two", b"three"]);

        assert_eq!(
            SequentialGather::write_batch(&mut sink, &bufs),
            Err(FsError::WriteFail)
        );
        assert_eq!(sink.calls, 2);
        assert_eq!(sink.data, b"one");
    }

    #[test]
    fn test_sequential_stops_at_short_write() {
        let mut sink = Recorder::new(2);
        let bufs = batch(&[b"ab", b"cde", b"f"]);

        assert_eq!(
            SequentialGather::write_batch(&mut sink, &bufs),
            Err(FsError::WriteFail)
        );
        assert_eq!(sink.calls, 2);
        assert_eq!(sink.data, b"abcd");
    }

    #[test]
    fn test_empty_batch() {
        let mut sink = Recorder::new(usize::MAX);
        assert_eq!(VectoredGather::write_batch(&mut sink, &[]), Ok(0));
        assert_eq!(SequentialGather::write_batch(&mut sink, &[]), Ok(0));
        assert_eq!(sink.calls, 0);
    }
}
