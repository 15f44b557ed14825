#![deny(trivial_casts, trivial_numeric_casts, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! Endian-aware byte-level decoding primitives for DICOM streams.
//!
//! This crate is intentionally unaware of DICOM semantics above the
//! primitive level (tags, VRs, sequences...); that is built on top of it
//! by `dicom-parser`.

pub mod byte_cursor;
pub mod error;

pub use byte_cursor::{ByteCursor, Endianness};
pub use error::Error;
