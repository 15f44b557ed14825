//! Errors raised while reading primitive values out of a buffer.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// A read at `offset` of `requested` bytes ran past the end of a
    /// buffer of `available` bytes.
    #[snafu(display(
        "Truncated buffer: requested {} bytes at offset {}, but only {} bytes available",
        requested,
        offset,
        available
    ))]
    TruncatedBuffer {
        offset: usize,
        requested: usize,
        available: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
