//! Top-level errors for parsing a DICOM Part-10 file.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The buffer does not start with a 128-byte preamble followed by
    /// the `DICM` magic code.
    #[snafu(display("Not a DICOM Part-10 stream: missing preamble or \"DICM\" magic code"))]
    NotDicom,

    /// The File Meta Information group did not carry `(0002,0010)`.
    #[snafu(display("File Meta Information group is missing TransferSyntaxUID (0002,0010)"))]
    MissingTransferSyntax,

    /// The declared transfer syntax could not be classified.
    #[snafu(display("Could not resolve the declared transfer syntax"))]
    UnsupportedTransferSyntax {
        #[snafu(source)]
        source: dicom_transfer_syntax_registry::Error,
    },

    /// Decoding the File Meta Information group failed.
    #[snafu(display("Could not decode the File Meta Information group"))]
    DecodeMeta {
        #[snafu(source)]
        source: dicom_parser::Error,
    },

    /// Decoding the data set failed.
    #[snafu(display("Could not decode the data set"))]
    DecodeDataSet {
        #[snafu(source)]
        source: dicom_parser::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
