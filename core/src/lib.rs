#![crate_type = "lib"]
#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! Core data types for DICOM compliant systems: attribute tags, value
//! representations, value lengths and the tagged value variant produced
//! by decoding a data element.
//!
//! This crate has no notion of how bytes are read from a stream -- that
//! is the concern of `dicom-encoding` and `dicom-parser`. It only
//! describes the shape of a decoded DICOM data set.

pub mod dictionary;
pub mod header;
pub mod length;
pub mod tag;
pub mod value;
pub mod vr;

pub use dictionary::{DataDictionary, DictionaryEntry};
pub use header::{DataElement, Header, Item};
pub use length::Length;
pub use tag::Tag;
pub use value::Value;
pub use vr::VR;
