//! Errors raised while decoding a data element, a sequence item, or a
//! pixel-data fragment.

use dicom_core::Tag;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not read the element header or its value at `offset`.
    #[snafu(display("Could not read element header at offset {}", offset))]
    DecodeHeader {
        offset: usize,
        #[snafu(source)]
        source: dicom_encoding::Error,
    },

    /// An element declared more value bytes than remain in the buffer.
    #[snafu(display(
        "Truncated element tagged {} at offset {}: declared {} bytes of value, \
         but the buffer does not have that many left",
        tag,
        offset,
        declared_len
    ))]
    TruncatedElement {
        tag: Tag,
        offset: usize,
        declared_len: u32,
        #[snafu(source)]
        source: dicom_encoding::Error,
    },

    /// A delimiter item (`FFFE,E00D` / `FFFE,E0DD`) was encountered
    /// where it was not expected, or recursion exceeded the configured
    /// depth limit.
    #[snafu(display("Malformed framing at offset {}: {}", offset, reason))]
    MalformedFraming { offset: usize, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
