//! Decoding of the File Meta Information group: the Explicit-VR
//! Little-Endian preamble of every Part-10 stream that, among other
//! things, declares the Transfer Syntax governing everything after it.

use dicom_core::header::Item as ElementMap;
use dicom_core::Header;
use dicom_dictionary_std::StandardDataDictionary;
use dicom_encoding::Endianness;
use dicom_parser::ElementDecoder;
use dicom_transfer_syntax_registry::{self as tsr, TransferSyntax};
use snafu::{ensure, OptionExt, ResultExt};

use crate::error::{
    DecodeMetaSnafu, MissingTransferSyntaxSnafu, NotDicomSnafu, Result, UnsupportedTransferSyntaxSnafu,
};

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";
const GROUP_LENGTH_KEY: &str = "x00020000";
const TRANSFER_SYNTAX_KEY: &str = "x00020010";

/// The decoded File Meta Information group, plus the offset at which
/// the data set begins and the transfer syntax it declared.
pub struct FileMetaTable {
    pub elements: ElementMap,
    pub data_set_offset: usize,
    pub transfer_syntax: &'static TransferSyntax,
}

/// Verify the preamble and magic code, then decode the File Meta
/// Information group (always Explicit VR Little Endian, regardless of
/// what the data set itself turns out to use).
pub fn read_file_meta(buffer: &[u8]) -> Result<FileMetaTable> {
    ensure!(buffer.len() >= PREAMBLE_LEN + 4, NotDicomSnafu);
    ensure!(&buffer[PREAMBLE_LEN..PREAMBLE_LEN + 4] == MAGIC, NotDicomSnafu);

    let dictionary = StandardDataDictionary;
    let mut decoder = ElementDecoder::new(buffer, Endianness::Little, false, &dictionary);

    let meta_start = PREAMBLE_LEN + 4;
    let (group_length_elem, after_group_length) = decoder
        .read_element(meta_start)
        .context(DecodeMetaSnafu)?;
    let meta_length = match group_length_elem.value() {
        dicom_core::Value::U32Array(v) => v.first().copied().unwrap_or(0),
        _ => 0,
    };

    let meta_end = after_group_length + meta_length as usize;

    let mut elements: ElementMap = ElementMap::new();
    elements.insert(GROUP_LENGTH_KEY.to_string(), group_length_elem);

    let mut pos = after_group_length;
    while pos < meta_end {
        let (elem, next) = decoder.read_element(pos).context(DecodeMetaSnafu)?;
        elements.insert(elem.tag().key(), elem);
        pos = next;
    }

    let ts_uid = elements
        .get(TRANSFER_SYNTAX_KEY)
        .context(MissingTransferSyntaxSnafu)?
        .value()
        .strings()
        .and_then(|s| s.first())
        .map(|s| dicom_core::value::trim_component(s))
        .context(MissingTransferSyntaxSnafu)?;

    let transfer_syntax = tsr::classify(ts_uid).context(UnsupportedTransferSyntaxSnafu)?;

    Ok(FileMetaTable {
        elements,
        data_set_offset: meta_end,
        transfer_syntax,
    })
}
