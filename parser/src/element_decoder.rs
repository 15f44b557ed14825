//! The element decoder: reads one DICOM data element per call, and
//! recurses into sequence items and pixel-data fragments.
//!
//! This is the component with the most surface area in the whole
//! parser: a single VR can dictate a different value-length encoding, a
//! different array width, or a wholly different recursive framing
//! (sequence items, pixel fragments). Everything here is bit-exact: a
//! wrong reserved-byte skip or endian flip corrupts every element after
//! it.

use dicom_core::dictionary::{DataDictionary, DictionaryEntry};
use dicom_core::{DataElement, Header, Item, Length, Tag, Value, VR};
use dicom_encoding::{ByteCursor, Endianness};
use snafu::{ensure, ResultExt};
use tracing::trace;

use crate::error::{DecodeHeaderSnafu, MalformedFramingSnafu, Result, TruncatedElementSnafu};

/// Sequences and items may nest arbitrarily deep in principle; this
/// bounds recursion so that a hostile or corrupt input cannot exhaust
/// the stack.
pub const MAX_NESTING_DEPTH: usize = 64;

const TAG_BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);

/// Decodes data elements out of a byte buffer under a fixed endianness
/// and VR explicitness, recovering VR from a data dictionary when the
/// transfer syntax is implicit.
///
/// A decoder is stateful in one respect: the element width chosen for
/// `OW`/`OF`/the ambiguous `ox` marker depends on the most recently
/// decoded value of `BitsAllocated` (`0028,0100`), which is only known
/// once that element has actually been walked past earlier in the same
/// data set.
#[derive(Debug)]
pub struct ElementDecoder<'a, D> {
    cursor: ByteCursor<'a>,
    dictionary: &'a D,
    implicit: bool,
    bits_allocated: Option<u16>,
}

/// The result of reading one item (`FFFE,E000`) as the content of a
/// sequence.
struct ItemRead {
    /// `None` when the item read was actually a sequence delimiter.
    item: Option<Item>,
    end_offset: usize,
    is_seq_delim: bool,
}

impl<'a, D> ElementDecoder<'a, D>
where
    D: DataDictionary,
{
    /// Build a decoder over `buffer`, reading under `endianness` and
    /// `implicit` VR encoding, resolving unrecorded VRs through
    /// `dictionary`.
    pub fn new(buffer: &'a [u8], endianness: Endianness, implicit: bool, dictionary: &'a D) -> Self {
        ElementDecoder {
            cursor: ByteCursor::new(buffer, endianness),
            dictionary,
            implicit,
            bits_allocated: None,
        }
    }

    /// Read one top-level data element starting at `offset`.
    ///
    /// Returns the decoded element and the offset of the first byte
    /// past it. This is not used to read item or delimiter headers
    /// nested inside a sequence or pixel-data fragment list -- those go
    /// through [`read_item`](Self::read_item) and
    /// [`read_pixel_items`](Self::read_pixel_items), which share the
    /// same header-acquisition logic but dispatch their framing
    /// differently.
    pub fn read_element(&mut self, offset: usize) -> Result<(DataElement, usize)> {
        self.read_element_at(offset, 0)
    }

    fn read_element_at(&mut self, offset: usize, depth: usize) -> Result<(DataElement, usize)> {
        let (tag, vr, vl, after_header) = self.read_header(offset)?;

        ensure!(
            !(tag == Tag::ITEM || tag == Tag::ITEM_DELIMITATION || tag == Tag::SEQUENCE_DELIMITATION),
            MalformedFramingSnafu {
                offset,
                reason: format!("delimiter tag {} encountered outside of item framing", tag),
            }
        );

        let (value, resolved_vr, end_offset) =
            self.decode_value(tag, vr, vl, after_header, depth)?;

        if tag == TAG_BITS_ALLOCATED {
            if let Value::U16Array(ref v) = value {
                if let Some(&bits) = v.first() {
                    trace!(bits, "observed BitsAllocated");
                    self.bits_allocated = Some(bits);
                }
            }
        }

        let element = DataElement::new(tag, resolved_vr, vl, value, end_offset);
        Ok((element, end_offset))
    }

    /// Read a tag, VR and value length at `offset`, returning the
    /// offset of the first byte of the value.
    ///
    /// Handles the three tag/VR special cases from the wire format:
    /// the no-VR item and delimiter tags (group `0xFFFE`), implicit VR
    /// recovery through the dictionary, and explicit VR's two length
    /// encodings (16-bit for most VRs, 32-bit + 2 reserved bytes for
    /// the set `{OB, OW, OF, SQ, UN}`).
    fn read_header(&self, offset: usize) -> Result<(Tag, VR, Length, usize)> {
        let group = self
            .cursor
            .read_u16(offset)
            .context(DecodeHeaderSnafu { offset })?;
        let element = self
            .cursor
            .read_u16(offset + 2)
            .context(DecodeHeaderSnafu { offset: offset + 2 })?;
        let tag = Tag(group, element);
        let mut pos = offset + 4;

        if tag.is_item_group() {
            let vl = self.read_vl32(pos)?;
            pos += 4;
            return Ok((tag, VR::UN, vl, pos));
        }

        if self.implicit {
            let vr = self
                .dictionary
                .by_tag(tag)
                .map(|e| e.vr())
                .unwrap_or(VR::UN);
            let vl = self.read_vl32(pos)?;
            pos += 4;
            return Ok((tag, vr, vl, pos));
        }

        let b0 = self.cursor.read_u8(pos).context(DecodeHeaderSnafu { offset: pos })?;
        let b1 = self
            .cursor
            .read_u8(pos + 1)
            .context(DecodeHeaderSnafu { offset: pos + 1 })?;
        pos += 2;
        // An unrecognized two-letter code is not an error here: the
        // decoder's own fallback is to treat it as UN, which implies
        // the 32-bit length encoding below.
        let vr = VR::from_bytes([b0, b1]).unwrap_or(VR::UN);

        let vl = if vr.has_32_bit_length() {
            pos += 2; // reserved
            let vl = self.read_vl32(pos)?;
            pos += 4;
            vl
        } else {
            let raw = self
                .cursor
                .read_u16(pos)
                .context(DecodeHeaderSnafu { offset: pos })?;
            pos += 2;
            Length::from(raw as u32)
        };

        Ok((tag, vr, vl, pos))
    }

    fn read_vl32(&self, offset: usize) -> Result<Length> {
        let raw = self
            .cursor
            .read_u32(offset)
            .context(DecodeHeaderSnafu { offset })?;
        Ok(Length::from(raw))
    }

    /// Dispatch on `(tag, vr, vl)` to decode the element's value.
    ///
    /// Returns the decoded value, the VR the element should be recorded
    /// under (resolving the `ox` ambiguity marker to a concrete `OB`/`OW`
    /// when applicable), and the offset of the first byte past the
    /// value.
    fn decode_value(
        &mut self,
        tag: Tag,
        vr: VR,
        vl: Length,
        offset: usize,
        depth: usize,
    ) -> Result<(Value, VR, usize)> {
        if tag == Tag::PIXEL_DATA && vl.is_undefined() {
            ensure!(
                depth < MAX_NESTING_DEPTH,
                MalformedFramingSnafu {
                    offset,
                    reason: "nesting depth exceeded while reading encapsulated pixel data",
                }
            );
            let (fragments, end) = self.read_pixel_items(offset, depth + 1)?;
            return Ok((fragments, vr, end));
        }

        // Undefined length is only meaningful for SQ and the two
        // delimiter-driven cases above; everywhere else, the decoder
        // works with an effective length of zero rather than erroring,
        // per the failure policy (only truncation and misplaced
        // delimiters are hard errors).
        let effective_len = vl.get().unwrap_or(0) as usize;

        match vr {
            VR::SQ => {
                ensure!(
                    depth < MAX_NESTING_DEPTH,
                    MalformedFramingSnafu {
                        offset,
                        reason: "nesting depth exceeded while reading a sequence",
                    }
                );
                let (items, end) = self.read_sequence(offset, vl, depth + 1)?;
                Ok((Value::Items(items), VR::SQ, end))
            }
            VR::OX => {
                if self.bits_allocated == Some(8) {
                    let bytes = self
                        .cursor
                        .read_u8_array(offset, effective_len)
                        .context(TruncatedElementSnafu {
                            tag,
                            offset,
                            declared_len: effective_len as u32,
                        })?
                        .to_vec();
                    Ok((Value::Bytes(bytes), VR::OB, offset + effective_len))
                } else {
                    let arr = self
                        .cursor
                        .read_u16_array(offset, effective_len)
                        .context(TruncatedElementSnafu {
                            tag,
                            offset,
                            declared_len: effective_len as u32,
                        })?;
                    Ok((
                        Value::U16Array(arr.into_owned()),
                        VR::OW,
                        offset + effective_len,
                    ))
                }
            }
            VR::OW => {
                if self.bits_allocated == Some(8) {
                    let bytes = self
                        .cursor
                        .read_u8_array(offset, effective_len)
                        .context(TruncatedElementSnafu {
                            tag,
                            offset,
                            declared_len: effective_len as u32,
                        })?
                        .to_vec();
                    Ok((Value::Bytes(bytes), vr, offset + effective_len))
                } else {
                    let arr = self
                        .cursor
                        .read_u16_array(offset, effective_len)
                        .context(TruncatedElementSnafu {
                            tag,
                            offset,
                            declared_len: effective_len as u32,
                        })?;
                    Ok((
                        Value::U16Array(arr.into_owned()),
                        vr,
                        offset + effective_len,
                    ))
                }
            }
            VR::OF => {
                let arr = self
                    .cursor
                    .read_f32_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::F32Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::OB | VR::UN => {
                let bytes = self
                    .cursor
                    .read_u8_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?
                    .to_vec();
                Ok((Value::Bytes(bytes), vr, offset + effective_len))
            }
            VR::US => {
                let arr = self
                    .cursor
                    .read_u16_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::U16Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::UL => {
                let arr = self
                    .cursor
                    .read_u32_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::U32Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::SS => {
                let arr = self
                    .cursor
                    .read_i16_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::I16Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::SL => {
                let arr = self
                    .cursor
                    .read_i32_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::I32Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::FL => {
                let arr = self
                    .cursor
                    .read_f32_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::F32Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::FD => {
                let arr = self
                    .cursor
                    .read_f64_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::F64Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::OD => {
                let arr = self
                    .cursor
                    .read_f64_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                Ok((
                    Value::F64Array(arr.into_owned()),
                    vr,
                    offset + effective_len,
                ))
            }
            VR::AT => {
                let arr = self
                    .cursor
                    .read_u16_array(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                let tags = arr
                    .chunks_exact(2)
                    .map(|pair| format!("({:04X},{:04X})", pair[0], pair[1]))
                    .collect();
                Ok((Value::Tags(tags), vr, offset + effective_len))
            }
            _ => {
                // Remaining, string-class VRs: read the raw bytes as
                // Latin-1 text and split on the backslash component
                // separator. Trimming of trailing space / zero-width
                // space is applied only at comparison/display time, not
                // here (see `dicom_core::value::trim_component`).
                let raw = self
                    .cursor
                    .read_string(offset, effective_len)
                    .context(TruncatedElementSnafu {
                        tag,
                        offset,
                        declared_len: effective_len as u32,
                    })?;
                let parts = raw.split('\\').map(String::from).collect();
                Ok((Value::Strings(parts), vr, offset + effective_len))
            }
        }
    }

    /// Read an `SQ` value: an ordered list of items, framed either by an
    /// explicit byte length or by a sequence delimiter.
    fn read_sequence(&mut self, offset: usize, vl: Length, depth: usize) -> Result<(Vec<Item>, usize)> {
        let mut items = Vec::new();
        let mut pos = offset;

        match vl.get() {
            Some(len) => {
                let end = offset + len as usize;
                while pos < end {
                    let read = self.read_item(pos, depth)?;
                    pos = read.end_offset;
                    ensure!(
                        !read.is_seq_delim,
                        MalformedFramingSnafu {
                            offset: pos,
                            reason: "unexpected sequence delimiter inside an explicit-length sequence",
                        }
                    );
                    if let Some(item) = read.item {
                        items.push(item);
                    }
                }
                Ok((items, pos))
            }
            None => loop {
                let read = self.read_item(pos, depth)?;
                pos = read.end_offset;
                if read.is_seq_delim {
                    return Ok((items, pos));
                }
                if let Some(item) = read.item {
                    items.push(item);
                }
            },
        }
    }

    /// Read one item of a sequence.
    ///
    /// The item's own header (tag `FFFE,E000`) is stored in the
    /// returned item map under its own key, alongside each decoded
    /// child element -- this is what lets the dumper later synthesize
    /// an `(Item with ... length #=N)` line without re-deriving the
    /// item's length or child count from scratch.
    fn read_item(&mut self, offset: usize, depth: usize) -> Result<ItemRead> {
        let (tag, _vr, vl, after_header) = self.read_header(offset)?;

        if tag == Tag::SEQUENCE_DELIMITATION {
            return Ok(ItemRead {
                item: None,
                end_offset: after_header,
                is_seq_delim: true,
            });
        }

        ensure!(
            tag == Tag::ITEM,
            MalformedFramingSnafu {
                offset,
                reason: format!("expected an item or sequence delimiter, found {}", tag),
            }
        );

        let mut data: Item = Item::new();
        let own_header = DataElement::new(tag, VR::UN, vl, Value::Bytes(Vec::new()), after_header);
        data.insert(tag.key(), own_header);

        let end_offset = match vl.get() {
            Some(len) => {
                let item_end = after_header + len as usize;
                let mut pos = after_header;
                while pos < item_end {
                    let (child, new_pos) = self.read_element_at(pos, depth)?;
                    data.insert(child.tag().key(), child);
                    pos = new_pos;
                }
                item_end
            }
            None => {
                let mut pos = after_header;
                loop {
                    let (child_tag, _child_vr, _child_vl, child_after_header) = self.read_header(pos)?;
                    if child_tag == Tag::ITEM_DELIMITATION {
                        pos = child_after_header;
                        break;
                    }
                    // Route through the same per-child path as the
                    // explicit-length branch above, so BitsAllocated
                    // (and any other state `read_element_at` latches)
                    // is observed the same way regardless of whether
                    // the enclosing item is explicit- or undefined-length.
                    let (child, new_pos) = self.read_element_at(pos, depth)?;
                    data.insert(child.tag().key(), child);
                    pos = new_pos;
                }
                pos
            }
        };

        Ok(ItemRead {
            item: Some(data),
            end_offset,
            is_seq_delim: false,
        })
    }

    /// Read the Basic Offset Table followed by fragments until a
    /// sequence delimiter, for encapsulated (undefined-length) pixel
    /// data.
    fn read_pixel_items(&mut self, offset: usize, depth: usize) -> Result<(Value, usize)> {
        let mut fragments = Vec::new();
        let mut pos = offset;

        loop {
            let (tag, _vr, vl, after_header) = self.read_header(pos)?;
            if tag == Tag::SEQUENCE_DELIMITATION {
                pos = after_header;
                break;
            }
            ensure!(
                tag == Tag::ITEM,
                MalformedFramingSnafu {
                    offset: pos,
                    reason: format!("expected a pixel-data item or sequence delimiter, found {}", tag),
                }
            );
            let len = vl.get().unwrap_or(0) as usize;
            let bytes = self
                .cursor
                .read_u8_array(after_header, len)
                .context(TruncatedElementSnafu {
                    tag,
                    offset: after_header,
                    declared_len: len as u32,
                })?
                .to_vec();
            let end = after_header + len;
            fragments.push(DataElement::new(tag, VR::OB, vl, Value::Bytes(bytes), end));
            pos = end;
            let _ = depth;
        }

        Ok((Value::Fragments(fragments), pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_dictionary_std::StandardDataDictionary;

    fn decoder(buf: &[u8], implicit: bool) -> ElementDecoder<'_, StandardDataDictionary> {
        static DICT: StandardDataDictionary = StandardDataDictionary;
        ElementDecoder::new(buf, Endianness::Little, implicit, &DICT)
    }

    fn explicit_short(tag: Tag, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&tag.group().to_le_bytes());
        buf.extend_from_slice(&tag.element().to_le_bytes());
        buf.extend_from_slice(vr);
        buf.extend_from_slice(&(value.len() as u16).to_le_bytes());
        buf.extend_from_slice(value);
        buf
    }

    fn explicit_long(tag: Tag, vr: &[u8; 2], len: u32, value: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&tag.group().to_le_bytes());
        buf.extend_from_slice(&tag.element().to_le_bytes());
        buf.extend_from_slice(vr);
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(value);
        buf
    }

    fn implicit_elem(tag: Tag, value: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&tag.group().to_le_bytes());
        buf.extend_from_slice(&tag.element().to_le_bytes());
        buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
        buf.extend_from_slice(value);
        buf
    }

    #[test]
    fn decodes_short_vr_string_element() {
        let buf = explicit_short(Tag(0x0010, 0x0010), b"PN", b"DOE^JOHN");
        let mut dec = decoder(&buf, false);
        let (elem, end) = dec.read_element(0).unwrap();
        assert_eq!(elem.tag(), Tag(0x0010, 0x0010));
        assert_eq!(elem.vr(), VR::PN);
        assert_eq!(elem.value().strings(), Some(&["DOE^JOHN".to_string()][..]));
        assert_eq!(end, buf.len());
    }

    #[test]
    fn decodes_us_array_with_multiple_components() {
        let mut value = Vec::new();
        value.extend_from_slice(&42u16.to_le_bytes());
        value.extend_from_slice(&7u16.to_le_bytes());
        let buf = explicit_short(Tag(0x0028, 0x0010), b"US", &value);
        let mut dec = decoder(&buf, false);
        let (elem, _) = dec.read_element(0).unwrap();
        assert_eq!(elem.value(), &Value::U16Array(vec![42, 7]));
    }

    #[test]
    fn implicit_vr_resolves_through_dictionary() {
        // PatientID (0010,0020) has no explicit VR on the wire here; the
        // dictionary says LO.
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0010u16.to_le_bytes());
        buf.extend_from_slice(&0x0020u16.to_le_bytes());
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(b"A123");
        let mut dec = decoder(&buf, true);
        let (elem, _) = dec.read_element(0).unwrap();
        assert_eq!(elem.vr(), VR::LO);
        assert_eq!(elem.value().strings(), Some(&["A123".to_string()][..]));
    }

    #[test]
    fn ox_resolves_to_ob_when_bits_allocated_is_eight() {
        // Under implicit VR, PixelData's dictionary entry is `OX`; whether
        // it ends up OB or OW depends on a BitsAllocated seen earlier.
        let bits_allocated = implicit_elem(Tag(0x0028, 0x0100), &8u16.to_le_bytes());
        let mut buf = bits_allocated;
        buf.extend_from_slice(&implicit_elem(Tag(0x7FE0, 0x0010), &[1, 2, 3, 4]));

        let mut dec = decoder(&buf, true);
        let (_, next) = dec.read_element(0).unwrap();
        let (elem, _) = dec.read_element(next).unwrap();
        assert_eq!(elem.vr(), VR::OB);
        assert_eq!(elem.value(), &Value::Bytes(vec![1, 2, 3, 4]));
    }

    #[test]
    fn ox_resolves_to_ow_by_default() {
        let buf = implicit_elem(Tag(0x7FE0, 0x0010), &[1, 0, 2, 0]);
        let mut dec = decoder(&buf, true);
        let (elem, _) = dec.read_element(0).unwrap();
        assert_eq!(elem.vr(), VR::OW);
        assert_eq!(elem.value(), &Value::U16Array(vec![1, 2]));
    }

    #[test]
    fn explicit_ow_reads_byte_width_when_bits_allocated_is_eight() {
        // An explicit OW element following a BitsAllocated of 8 must be
        // read one byte at a time, same as the ox-resolved case.
        let bits_allocated = implicit_elem(Tag(0x0028, 0x0100), &8u16.to_le_bytes());
        let mut buf = bits_allocated;
        buf.extend_from_slice(&explicit_short(Tag(0x7FE0, 0x0010), b"OW", &[1, 2, 3, 4]));

        let mut dec = decoder(&buf, true);
        let (_, next) = dec.read_element(0).unwrap();
        let (elem, _) = dec.read_element(next).unwrap();
        assert_eq!(elem.vr(), VR::OW);
        assert_eq!(elem.value(), &Value::Bytes(vec![1, 2, 3, 4]));
    }

    #[test]
    fn explicit_ow_reads_word_width_by_default() {
        let buf = explicit_short(Tag(0x7FE0, 0x0010), b"OW", &[1, 0, 2, 0]);
        let mut dec = decoder(&buf, false);
        let (elem, _) = dec.read_element(0).unwrap();
        assert_eq!(elem.vr(), VR::OW);
        assert_eq!(elem.value(), &Value::U16Array(vec![1, 2]));
    }

    #[test]
    fn bits_allocated_inside_undefined_length_item_is_latched() {
        // BitsAllocated appears as a child of an undefined-length item;
        // a later ox-ambiguous element in the same data set must still
        // resolve against it.
        // Every element here is implicit-VR framed (tag + u32 VL + value,
        // no VR bytes on the wire) to match the decoder's `implicit: true`
        // mode; group 0xFFFE items/delimiters use that same framing under
        // either VR encoding.
        let mut item_children = implicit_elem(Tag(0x0028, 0x0100), &8u16.to_le_bytes());
        item_children.extend_from_slice(&implicit_elem(Tag(0x0008, 0x0100), b"ZZ"));

        let mut item = Vec::new();
        item.extend_from_slice(&0xFFFEu16.to_le_bytes());
        item.extend_from_slice(&0xE000u16.to_le_bytes());
        item.extend_from_slice(&Length::UNDEFINED.0.to_le_bytes());
        item.extend_from_slice(&item_children);
        item.extend_from_slice(&0xFFFEu16.to_le_bytes());
        item.extend_from_slice(&0xE00Du16.to_le_bytes());
        item.extend_from_slice(&0u32.to_le_bytes());

        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0040u16.to_le_bytes());
        buf.extend_from_slice(&0xA043u16.to_le_bytes());
        buf.extend_from_slice(&Length::UNDEFINED.0.to_le_bytes());
        buf.extend_from_slice(&item);
        buf.extend_from_slice(&0xFFFEu16.to_le_bytes());
        buf.extend_from_slice(&0xE0DDu16.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());

        buf.extend_from_slice(&implicit_elem(Tag(0x7FE0, 0x0010), &[9, 9, 9, 9]));

        let mut dec = decoder(&buf, true);
        let (sq_elem, next) = dec.read_element(0).unwrap();
        assert_eq!(sq_elem.value().items().unwrap().len(), 1);

        let (pixel_elem, _) = dec.read_element(next).unwrap();
        assert_eq!(pixel_elem.vr(), VR::OB);
        assert_eq!(pixel_elem.value(), &Value::Bytes(vec![9, 9, 9, 9]));
    }

    #[test]
    fn decodes_nested_sequence_with_item_self_reference() {
        // one explicit-length item holding a single CodeValue (SH) child
        let child = explicit_short(Tag(0x0008, 0x0100), b"SH", b"ABC");
        let mut item = Vec::new();
        item.extend_from_slice(&0xFFFEu16.to_le_bytes());
        item.extend_from_slice(&0xE000u16.to_le_bytes());
        item.extend_from_slice(&(child.len() as u32).to_le_bytes());
        item.extend_from_slice(&child);

        let sq = explicit_long(Tag(0x0040, 0xA043), b"SQ", item.len() as u32, &item);

        let mut dec = decoder(&sq, false);
        let (elem, end) = dec.read_element(0).unwrap();
        assert_eq!(end, sq.len());
        let items = elem.value().items().expect("sequence value");
        assert_eq!(items.len(), 1);
        let first = &items[0];
        assert!(first.contains_key("xFFFEE000"));
        let code_value = &first["x00080100"];
        assert_eq!(code_value.value().strings(), Some(&["ABC".to_string()][..]));
    }

    #[test]
    fn decodes_undefined_length_sequence_terminated_by_delimiter() {
        let child = explicit_short(Tag(0x0008, 0x0100), b"SH", b"ZZ");
        let mut item = Vec::new();
        item.extend_from_slice(&0xFFFEu16.to_le_bytes());
        item.extend_from_slice(&0xE000u16.to_le_bytes());
        item.extend_from_slice(&(child.len() as u32).to_le_bytes());
        item.extend_from_slice(&child);

        let mut value = item.clone();
        // sequence delimitation item, zero length
        value.extend_from_slice(&0xFFFEu16.to_le_bytes());
        value.extend_from_slice(&0xE0DDu16.to_le_bytes());
        value.extend_from_slice(&0u32.to_le_bytes());

        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0040u16.to_le_bytes());
        buf.extend_from_slice(&0xA043u16.to_le_bytes());
        buf.extend_from_slice(b"SQ");
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&Length::UNDEFINED.0.to_le_bytes());
        buf.extend_from_slice(&value);

        let mut dec = decoder(&buf, false);
        let (elem, end) = dec.read_element(0).unwrap();
        assert_eq!(end, buf.len());
        assert_eq!(elem.value().items().unwrap().len(), 1);
    }

    #[test]
    fn decodes_encapsulated_pixel_data_fragments() {
        let bot = {
            let mut i = Vec::new();
            i.extend_from_slice(&0xFFFEu16.to_le_bytes());
            i.extend_from_slice(&0xE000u16.to_le_bytes());
            i.extend_from_slice(&0u32.to_le_bytes());
            i
        };
        let frag = {
            let mut i = Vec::new();
            i.extend_from_slice(&0xFFFEu16.to_le_bytes());
            i.extend_from_slice(&0xE000u16.to_le_bytes());
            i.extend_from_slice(&4u32.to_le_bytes());
            i.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
            i
        };
        let delim = {
            let mut i = Vec::new();
            i.extend_from_slice(&0xFFFEu16.to_le_bytes());
            i.extend_from_slice(&0xE0DDu16.to_le_bytes());
            i.extend_from_slice(&0u32.to_le_bytes());
            i
        };

        let mut buf = Vec::new();
        buf.extend_from_slice(&0x7FE0u16.to_le_bytes());
        buf.extend_from_slice(&0x0010u16.to_le_bytes());
        buf.extend_from_slice(b"OB");
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&Length::UNDEFINED.0.to_le_bytes());
        buf.extend_from_slice(&bot);
        buf.extend_from_slice(&frag);
        buf.extend_from_slice(&delim);

        let mut dec = decoder(&buf, false);
        let (elem, end) = dec.read_element(0).unwrap();
        assert_eq!(end, buf.len());
        let fragments = elem.value().fragments().expect("fragment list");
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].value(), &Value::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]));
    }

    #[test]
    fn truncated_value_is_an_error() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0010u16.to_le_bytes());
        buf.extend_from_slice(&0x0010u16.to_le_bytes());
        buf.extend_from_slice(b"PN");
        buf.extend_from_slice(&100u16.to_le_bytes());
        buf.extend_from_slice(b"short");

        let mut dec = decoder(&buf, false);
        assert!(dec.read_element(0).is_err());
    }

    #[test]
    fn stray_delimiter_at_top_level_is_malformed_framing() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0xFFFEu16.to_le_bytes());
        buf.extend_from_slice(&0xE0DDu16.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());

        let mut dec = decoder(&buf, false);
        assert!(dec.read_element(0).is_err());
    }
}
