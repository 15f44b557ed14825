#![deny(trivial_casts, trivial_numeric_casts, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! A high-level API for reading DICOM Part-10 files: preamble and magic
//! code verification, File Meta Information decoding, Transfer Syntax
//! selection, and Data Set traversal, built on top of `dicom-parser`.

pub mod elements_view;
pub mod error;
pub mod file_parser;
pub mod meta;

pub use elements_view::{Component, DumpRow, ElementsView, Lookup};
pub use error::Error;
pub use file_parser::{parse, ParsedFile, PixelBuffer};
pub use meta::FileMetaTable;
