//! Value Representation (VR): the two-letter code that determines how a
//! data element's value is encoded and how the value-length field itself
//! is encoded.

use std::fmt;

/// A DICOM value representation.
///
/// Besides the 27 value representations defined by the standard, two
/// parser-internal markers are included:
///
/// - [`VR::OX`] stands in for an element whose concrete `OB`/`OW` choice
///   cannot be resolved until `BitsAllocated` has been seen, which can
///   only happen under implicit VR encoding. It must never be exposed to
///   a caller: [`ElementDecoder`](../../dicom_parser/index.html) resolves
///   it to a concrete VR before the element is returned.
/// - [`VR::PI`] and [`VR::NA`] are used only by the textual dumper to
///   render pixel-data fragments and structural pseudo-entries
///   (`Item`, `SequenceDelimitationItem`) that do not carry a real VR.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum VR {
    AE,
    AS,
    AT,
    CS,
    DA,
    DS,
    DT,
    FL,
    FD,
    IS,
    LO,
    LT,
    OB,
    OD,
    OF,
    OW,
    PN,
    SH,
    SL,
    SQ,
    SS,
    ST,
    TM,
    UI,
    UL,
    UN,
    US,
    UT,
    /// Parser-internal: ambiguous OB/OW pending `BitsAllocated`.
    OX,
    /// Dumper-internal: a pixel-data fragment item.
    PI,
    /// Dumper-internal: a structural pseudo-entry with no value.
    NA,
}

impl VR {
    /// Parse a two-character VR code as it appears on the wire.
    ///
    /// Unknown codes are not an error at this layer; the caller (the
    /// element decoder, in explicit VR mode) is responsible for falling
    /// back to [`VR::UN`] per the wire's failure policy.
    pub fn from_bytes(bytes: [u8; 2]) -> Option<VR> {
        Some(match &bytes {
            b"AE" => VR::AE,
            b"AS" => VR::AS,
            b"AT" => VR::AT,
            b"CS" => VR::CS,
            b"DA" => VR::DA,
            b"DS" => VR::DS,
            b"DT" => VR::DT,
            b"FL" => VR::FL,
            b"FD" => VR::FD,
            b"IS" => VR::IS,
            b"LO" => VR::LO,
            b"LT" => VR::LT,
            b"OB" => VR::OB,
            b"OD" => VR::OD,
            b"OF" => VR::OF,
            b"OW" => VR::OW,
            b"PN" => VR::PN,
            b"SH" => VR::SH,
            b"SL" => VR::SL,
            b"SQ" => VR::SQ,
            b"SS" => VR::SS,
            b"ST" => VR::ST,
            b"TM" => VR::TM,
            b"UI" => VR::UI,
            b"UL" => VR::UL,
            b"UN" => VR::UN,
            b"US" => VR::US,
            b"UT" => VR::UT,
            _ => return None,
        })
    }

    /// The two-letter mnemonic, as it would appear on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            VR::AE => "AE",
            VR::AS => "AS",
            VR::AT => "AT",
            VR::CS => "CS",
            VR::DA => "DA",
            VR::DS => "DS",
            VR::DT => "DT",
            VR::FL => "FL",
            VR::FD => "FD",
            VR::IS => "IS",
            VR::LO => "LO",
            VR::LT => "LT",
            VR::OB => "OB",
            VR::OD => "OD",
            VR::OF => "OF",
            VR::OW => "OW",
            VR::PN => "PN",
            VR::SH => "SH",
            VR::SL => "SL",
            VR::SQ => "SQ",
            VR::SS => "SS",
            VR::ST => "ST",
            VR::TM => "TM",
            VR::UI => "UI",
            VR::UL => "UL",
            VR::UN => "UN",
            VR::US => "US",
            VR::UT => "UT",
            VR::OX => "OX",
            VR::PI => "pi",
            VR::NA => "na",
        }
    }

    /// Whether this VR is encoded explicitly with a 32-bit value length
    /// (and two reserved bytes), rather than a 16-bit one.
    ///
    /// This is the set `{OB, OW, OF, SQ, UN, OX}` from the specification;
    /// `OX` is included because it only ever arises as the as-yet-unresolved
    /// form of `OB`/`OW`, both of which are themselves in this set.
    pub fn has_32_bit_length(&self) -> bool {
        matches!(self, VR::OB | VR::OW | VR::OF | VR::SQ | VR::UN | VR::OX)
    }

    /// Byte width of a single component of this VR's numeric array form,
    /// or `None` for VRs that are not fixed-width numeric arrays.
    pub fn element_byte_width(&self) -> Option<usize> {
        match self {
            VR::US | VR::SS => Some(2),
            VR::UL | VR::SL | VR::FL | VR::AT => Some(4),
            VR::FD => Some(8),
            VR::OB | VR::UN => Some(1),
            VR::OW => Some(2),
            VR::OF => Some(4),
            VR::OD => Some(8),
            _ => None,
        }
    }

    /// Whether this is a character-string VR whose value is split on the
    /// backslash component separator.
    pub fn is_string_like(&self) -> bool {
        !matches!(
            self,
            VR::OB
                | VR::OW
                | VR::OF
                | VR::OD
                | VR::OX
                | VR::UN
                | VR::SQ
                | VR::US
                | VR::SS
                | VR::UL
                | VR::SL
                | VR::FL
                | VR::FD
                | VR::AT
                | VR::PI
                | VR::NA
        )
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::VR;

    #[test]
    fn parses_known_codes() {
        assert_eq!(VR::from_bytes(*b"PN"), Some(VR::PN));
        assert_eq!(VR::from_bytes(*b"OB"), Some(VR::OB));
        assert_eq!(VR::from_bytes(*b"ZZ"), None);
    }

    #[test]
    fn thirty_two_bit_vl_set() {
        for vr in [VR::OB, VR::OW, VR::OF, VR::SQ, VR::UN, VR::OX] {
            assert!(vr.has_32_bit_length(), "{:?} should use a 32-bit VL", vr);
        }
        for vr in [VR::PN, VR::US, VR::UI, VR::AT] {
            assert!(!vr.has_32_bit_length(), "{:?} should use a 16-bit VL", vr);
        }
    }
}
