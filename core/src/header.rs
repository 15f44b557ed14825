//! The decoded data element: a `(tag, VR, VL, value)` tuple plus the
//! offset at which it ends in the source buffer.

use crate::length::Length;
use crate::tag::Tag;
use crate::value::Value;
use crate::vr::VR;
use std::collections::BTreeMap;

/// A trait for any data type that carries a DICOM tag and a value
/// length, independently of how its value is stored.
pub trait Header {
    /// The element's tag.
    fn tag(&self) -> Tag;

    /// The element's value length as read from the wire (may be the
    /// undefined-length sentinel).
    fn length(&self) -> Length;

    /// Whether this is the header of a sequence/pixel-data item.
    fn is_item(&self) -> bool {
        self.tag() == Tag::ITEM
    }

    /// Whether this is the header of an item delimiter.
    fn is_item_delimiter(&self) -> bool {
        self.tag() == Tag::ITEM_DELIMITATION
    }

    /// Whether this is the header of a sequence delimiter.
    fn is_sequence_delimiter(&self) -> bool {
        self.tag() == Tag::SEQUENCE_DELIMITATION
    }
}

/// An ordered mapping from tag key to nested data element, representing
/// one item of a sequence (`SQ`) value or of an item framing.
///
/// Keyed by [`Tag::key`] rather than by `Tag` directly so that an item's
/// children can be addressed the same way as the top-level element map.
/// `BTreeMap` orders by the numeric tag underneath the string key
/// representation is irrelevant to ordering here because keys compare
/// equal to wire order for any standards-conforming data set, whose
/// elements are required to appear in ascending tag order within a
/// container.
pub type Item = BTreeMap<String, DataElement>;

/// A fully decoded DICOM data element.
///
/// `end_offset` is the offset, in the originating buffer, of the first
/// byte past this element's value -- it is not re-derived from `vl`
/// because `vl` may be the undefined-length sentinel, in which case the
/// true extent is only known after the value has been read to its
/// terminating delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct DataElement {
    tag: Tag,
    vr: VR,
    vl: Length,
    value: Value,
    end_offset: usize,
}

impl DataElement {
    /// Build a new data element from its already-decoded parts.
    pub fn new(tag: Tag, vr: VR, vl: Length, value: Value, end_offset: usize) -> Self {
        DataElement {
            tag,
            vr,
            vl,
            value,
            end_offset,
        }
    }

    /// The value representation under which this element's value was
    /// decoded. Never [`VR::OX`]: the element decoder always resolves
    /// that marker to a concrete VR before constructing the element.
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// The literal value-length field, as read from the wire.
    pub fn vl(&self) -> Length {
        self.vl
    }

    /// The decoded value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the element, yielding its value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// The offset, in the source buffer, of the first byte past this
    /// element (header + value).
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }
}

impl Header for DataElement {
    fn tag(&self) -> Tag {
        self.tag
    }

    fn length(&self) -> Length {
        self.vl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn item_delimiter_detection() {
        let e = DataElement::new(
            Tag::ITEM_DELIMITATION,
            VR::NA,
            Length::defined(0),
            Value::Bytes(vec![]),
            150,
        );
        assert!(e.is_item_delimiter());
        assert!(!e.is_sequence_delimiter());
    }
}
