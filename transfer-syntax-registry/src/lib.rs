//! Classification of the DICOM Transfer Syntax UID: the convention,
//! declared inside the file itself at `(0002,0010)`, that governs how
//! the data set following the File Meta Information is encoded.
//!
//! Endianness and VR explicitness are the two facts the byte decoder
//! needs; "supported" / "rejected" is this crate's own judgement call
//! about which transfer syntaxes an all-in-memory, non-transcoding
//! parser can make sense of.

use snafu::Snafu;
use std::fmt;

/// Byte order of multi-byte values in the data set.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Endianness {
    Little,
    Big,
}

/// Whether the VR of each element is present on the wire, or must be
/// recovered from a data dictionary.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VrEncoding {
    Implicit,
    Explicit,
}

/// A classified Transfer Syntax.
#[derive(Debug, Clone, Copy)]
pub struct TransferSyntax {
    /// The transfer syntax UID, trimmed of trailing padding.
    pub uid: &'static str,
    /// A human-readable name, for diagnostics.
    pub name: &'static str,
    pub endianness: Endianness,
    pub vr_encoding: VrEncoding,
    /// Whether pixel data under this transfer syntax is encapsulated
    /// (compressed, fragment-framed) rather than native.
    pub encapsulated_pixel_data: bool,
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uid)
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The declared transfer syntax is recognized but this parser does
    /// not support it (e.g. it implies a codec this crate does not
    /// decode), or the UID is not recognized at all.
    #[snafu(display("Unsupported transfer syntax `{}` ({})", uid, name))]
    UnsupportedTransferSyntax { uid: String, name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

const fn ts(
    uid: &'static str,
    name: &'static str,
    endianness: Endianness,
    vr_encoding: VrEncoding,
    encapsulated_pixel_data: bool,
) -> TransferSyntax {
    TransferSyntax {
        uid,
        name,
        endianness,
        vr_encoding,
        encapsulated_pixel_data,
    }
}

/// The transfer syntaxes this parser is able to decode.
pub const SUPPORTED: &[TransferSyntax] = &[
    ts(
        "1.2.840.10008.1.2",
        "Implicit VR Little Endian",
        Endianness::Little,
        VrEncoding::Implicit,
        false,
    ),
    ts(
        "1.2.840.10008.1.2.1",
        "Explicit VR Little Endian",
        Endianness::Little,
        VrEncoding::Explicit,
        false,
    ),
    ts(
        "1.2.840.10008.1.2.2",
        "Explicit VR Big Endian",
        Endianness::Big,
        VrEncoding::Explicit,
        false,
    ),
    ts(
        "1.2.840.10008.1.2.4.50",
        "JPEG Baseline (Process 1)",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
    ts(
        "1.2.840.10008.1.2.4.51",
        "JPEG Extended (Process 2 & 4)",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
    ts(
        "1.2.840.10008.1.2.4.57",
        "JPEG Lossless, Non-Hierarchical (Process 14)",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
    ts(
        "1.2.840.10008.1.2.4.70",
        "JPEG Lossless, Non-Hierarchical, First-Order Prediction (Process 14, Selection Value 1)",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
    ts(
        "1.2.840.10008.1.2.4.90",
        "JPEG 2000 Image Compression (Lossless Only)",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
    ts(
        "1.2.840.10008.1.2.4.91",
        "JPEG 2000 Image Compression",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
    ts(
        "1.2.840.10008.1.2.4.92",
        "JPEG 2000 Part 2 Multi-component Image Compression (Lossless Only)",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
    ts(
        "1.2.840.10008.1.2.4.93",
        "JPEG 2000 Part 2 Multi-component Image Compression",
        Endianness::Little,
        VrEncoding::Explicit,
        true,
    ),
];

/// Transfer syntaxes this parser recognizes by name but deliberately
/// does not support, kept around only so that rejection can name them.
const REJECTED_NAMED: &[(&str, &str)] = &[
    (
        "1.2.840.10008.1.2.1.99",
        "Deflated Explicit VR Little Endian",
    ),
    ("1.2.840.10008.1.2.4.80", "JPEG-LS Lossless Image Compression"),
    (
        "1.2.840.10008.1.2.4.81",
        "JPEG-LS Lossy (Near-Lossless) Image Compression",
    ),
    ("1.2.840.10008.1.2.4.100", "MPEG2 Main Profile @ Main Level"),
    ("1.2.840.10008.1.2.5", "RLE Lossless"),
];

/// Strip the zero-width space codepoint and surrounding whitespace a
/// transfer syntax UID string may carry, notably the trailing NUL
/// padding used to make odd-length UID strings even on the wire.
fn normalize(uid: &str) -> &str {
    uid.trim_matches(|c: char| c.is_whitespace() || c == '\u{200B}' || c == '\0')
}

/// Does `uid` fall in the JPEG-LS family (`1.2.840.10008.1.2.4.8x`)?
///
/// Named after the intended semantics of the source's
/// `isJpegNonSupportedTransferSyntax` check, which called its two
/// helper predicates with no arguments and so always evaluated to
/// `false`; here the family membership test is applied for real.
fn is_jpeg_ls_family(uid: &str) -> bool {
    uid.starts_with("1.2.840.10008.1.2.4.8")
}

/// Classify a Transfer Syntax UID.
///
/// The UID is trimmed and stripped of a trailing zero-width space
/// before lookup, matching how it is typically found serialized on the
/// wire (odd-length UID strings are padded with a single NUL).
pub fn classify(uid: &str) -> Result<&'static TransferSyntax> {
    let uid = normalize(uid);

    if let Some(ts) = SUPPORTED.iter().find(|t| t.uid == uid) {
        return Ok(ts);
    }

    if let Some((_, name)) = REJECTED_NAMED.iter().find(|(u, _)| *u == uid) {
        return UnsupportedTransferSyntaxSnafu {
            uid: uid.to_string(),
            name: name.to_string(),
        }
        .fail();
    }

    if is_jpeg_ls_family(uid) {
        return UnsupportedTransferSyntaxSnafu {
            uid: uid.to_string(),
            name: "JPEG-LS".to_string(),
        }
        .fail();
    }

    UnsupportedTransferSyntaxSnafu {
        uid: uid.to_string(),
        name: "Unknown".to_string(),
    }
    .fail()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_le_supported() {
        let ts = classify("1.2.840.10008.1.2").unwrap();
        assert_eq!(ts.endianness, Endianness::Little);
        assert_eq!(ts.vr_encoding, VrEncoding::Implicit);
    }

    #[test]
    fn explicit_be_supported() {
        let ts = classify("1.2.840.10008.1.2.2").unwrap();
        assert_eq!(ts.endianness, Endianness::Big);
        assert_eq!(ts.vr_encoding, VrEncoding::Explicit);
    }

    #[test]
    fn strips_trailing_nul_padding() {
        let ts = classify("1.2.840.10008.1.2.1\0").unwrap();
        assert_eq!(ts.uid, "1.2.840.10008.1.2.1");
    }

    #[test]
    fn deflate_is_rejected() {
        let err = classify("1.2.840.10008.1.2.1.99").unwrap_err();
        assert!(matches!(err, Error::UnsupportedTransferSyntax { .. }));
    }

    #[test]
    fn jpeg_ls_family_is_rejected() {
        assert!(classify("1.2.840.10008.1.2.4.80").is_err());
        assert!(classify("1.2.840.10008.1.2.4.81").is_err());
    }

    #[test]
    fn jpeg_baseline_and_jpeg2000_are_supported_and_encapsulated() {
        let ts = classify("1.2.840.10008.1.2.4.50").unwrap();
        assert!(ts.encapsulated_pixel_data);
        let ts = classify("1.2.840.10008.1.2.4.91").unwrap();
        assert!(ts.encapsulated_pixel_data);
    }

    #[test]
    fn unknown_uid_is_rejected() {
        assert!(classify("1.2.3.4.5.6.7.8.9").is_err());
    }
}
