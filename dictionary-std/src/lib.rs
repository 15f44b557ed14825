#![deny(unsafe_code)]
//! The standard DICOM attribute dictionary (PS3.6).
//!
//! This is a singleton, process-lifetime, read-only dictionary: it has
//! no constructor arguments and no mutable state, so it is freely
//! shareable across threads. It is what resolves the value
//! representation of an element under implicit VR encoding, and what
//! powers [`ElementsView::get_by_name`](../dicom_object/struct.ElementsView.html)'s
//! keyword lookup.

mod entries;

use dicom_core::dictionary::{DataDictionary, DictionaryEntry};
use dicom_core::{Tag, VR};
use entries::{Entry, ENTRIES};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

impl DictionaryEntry for Entry {
    fn tag(&self) -> Tag {
        self.tag
    }

    fn keyword(&self) -> &str {
        self.keyword
    }

    fn vr(&self) -> VR {
        self.vr
    }

    fn vm(&self) -> &str {
        self.vm
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

static BY_TAG: Lazy<HashMap<Tag, &'static Entry>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.tag, e)).collect());

static BY_KEYWORD: Lazy<HashMap<&'static str, &'static Entry>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.keyword, e)).collect());

/// The standard DICOM attribute dictionary.
///
/// Construct with [`StandardDataDictionary::default`] (it carries no
/// state of its own; all entries live in the static [`ENTRIES`] table).
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    type Entry = Entry;

    fn by_tag(&self, tag: Tag) -> Option<&'static Entry> {
        BY_TAG.get(&tag).copied()
    }

    fn by_keyword(&self, keyword: &str) -> Option<&'static Entry> {
        BY_KEYWORD.get(keyword).copied()
    }
}

impl fmt::Display for StandardDataDictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Standard DICOM Data Dictionary")
    }
}

/// Retrieve a shared instance of the standard dictionary.
pub fn standard_dictionary() -> StandardDataDictionary {
    StandardDataDictionary
}
