//! The top-level entry point: turn a raw byte buffer into a
//! [`ParsedFile`], orchestrating the File Meta Information group, the
//! Transfer Syntax switch, and the Data Set walk.

use dicom_core::header::Item as ElementMap;
use dicom_core::{DataElement, Header, Tag, Value};
use dicom_dictionary_std::StandardDataDictionary;
use dicom_encoding::Endianness as EncodingEndianness;
use dicom_parser::ElementDecoder;
use dicom_transfer_syntax_registry::{Endianness as TsEndianness, VrEncoding};
use snafu::ResultExt;
use tracing::debug;

use crate::error::{DecodeDataSetSnafu, Result};
use crate::meta::read_file_meta;

/// The reconstructed pixel payload of a parsed file.
///
/// Mirrors the corrected design from the Open Questions: encapsulated
/// (undefined-length) pixel data is never concatenated into a single
/// numeric array; it is left as the ordered fragment list (Basic Offset
/// Table first). Native (defined-length) pixel data is passed through
/// unchanged, in whatever numeric width `BitsAllocated` resolved it to.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    /// No `(7FE0,0010)` element was present; not every SOP class
    /// carries pixel data.
    Absent,
    Bytes(Vec<u8>),
    U16(Vec<u16>),
    Fragments(Vec<DataElement>),
}

/// The result of parsing one DICOM Part-10 stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub elements: ElementMap,
    pub pixel_buffer: PixelBuffer,
}

/// Parse a complete DICOM Part-10 byte buffer.
///
/// The whole buffer is assumed to be present; there is no
/// streaming/partial-parse mode and no recovery from truncation
/// mid-element.
pub fn parse(buffer: &[u8]) -> Result<ParsedFile> {
    let meta = read_file_meta(buffer)?;
    debug!(
        transfer_syntax = meta.transfer_syntax.uid,
        data_set_offset = meta.data_set_offset,
        "decoded file meta information"
    );

    let endianness = match meta.transfer_syntax.endianness {
        TsEndianness::Little => EncodingEndianness::Little,
        TsEndianness::Big => EncodingEndianness::Big,
    };
    let implicit = meta.transfer_syntax.vr_encoding == VrEncoding::Implicit;

    let dictionary = StandardDataDictionary;
    let mut decoder = ElementDecoder::new(buffer, endianness, implicit, &dictionary);

    let mut elements: ElementMap = meta.elements;
    let mut pos = meta.data_set_offset;
    while pos < buffer.len() {
        let (elem, next) = decoder.read_element(pos).context(DecodeDataSetSnafu)?;
        elements.insert(elem.tag().key(), elem);
        pos = next;
    }

    let pixel_buffer = assemble_pixel_buffer(&elements);

    Ok(ParsedFile {
        elements,
        pixel_buffer,
    })
}

fn assemble_pixel_buffer(elements: &ElementMap) -> PixelBuffer {
    let pixel_data_key = Tag(0x7FE0, 0x0010).key();
    let Some(elem) = elements.get(&pixel_data_key) else {
        return PixelBuffer::Absent;
    };

    match elem.value() {
        Value::Fragments(fragments) => PixelBuffer::Fragments(fragments.clone()),
        Value::Bytes(bytes) => PixelBuffer::Bytes(bytes.clone()),
        Value::U16Array(words) => PixelBuffer::U16(words.clone()),
        _ => PixelBuffer::Absent,
    }
}
