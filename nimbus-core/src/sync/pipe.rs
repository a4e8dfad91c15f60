//! In-memory byte transport
//!
//! Two [`Pipe`]s, one per direction, make a full-duplex link between a
//! [`LinkChannel`](super::LinkChannel) and a [`LinkServer`](super::LinkServer)
//! running on the same executor.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::pipe::Pipe;
use embedded_io_async::{ErrorType, Read, Write};

/// One end of a duplex pipe link
pub struct PipeTransport<'a, M: RawMutex, const N: usize> {
    rx: &'a Pipe<M, N>,
    tx: &'a Pipe<M, N>,
}

impl<'a, M: RawMutex, const N: usize> PipeTransport<'a, M, N> {
    /// Read from `rx`, write to `tx`
    pub fn new(rx: &'a Pipe<M, N>, tx: &'a Pipe<M, N>) -> Self {
        Self { rx, tx }
    }
}

impl<M: RawMutex, const N: usize> ErrorType for PipeTransport<'_, M, N> {
    type Error = Infallible;
}

impl<M: RawMutex, const N: usize> Read for PipeTransport<'_, M, N> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(self.rx.read(buf).await)
    }
}

impl<M: RawMutex, const N: usize> Write for PipeTransport<'_, M, N> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(self.tx.write(buf).await)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
