#![deny(trivial_casts, trivial_numeric_casts, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! A stateful decoder of DICOM data elements, sequence items and
//! pixel-data fragments, built directly on top of [`dicom_encoding`]'s
//! [`ByteCursor`](dicom_encoding::ByteCursor).
//!
//! This crate knows nothing about files: it has no notion of a
//! preamble, a File Meta group, or a Transfer Syntax UID. Those are the
//! concern of `dicom-object`, which constructs an [`ElementDecoder`]
//! once it has resolved the data set's endianness and VR encoding.

pub mod element_decoder;
pub mod error;

pub use element_decoder::{ElementDecoder, MAX_NESTING_DEPTH};
pub use error::Error;
