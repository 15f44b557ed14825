//! The concept of a DICOM data dictionary: a read-only lookup from
//! `(group, element)` to the triple `(VR, VM, keyword)` (plus a retired
//! flag), and from keyword back to tag.
//!
//! This crate only defines the trait; [`dicom-dictionary-std`] provides
//! the concrete, process-lifetime standard dictionary that implements it.

use crate::tag::Tag;
use crate::vr::VR;
use std::fmt::Debug;

/// Type trait for a dictionary of DICOM attributes.
///
/// Implementors provide the means to resolve a tag to its typical VR,
/// value multiplicity and keyword, and to resolve a keyword back to a
/// tag. The methods take no generic parameters so that a dictionary can
/// be used as a trait object.
pub trait DataDictionary: Debug {
    /// The concrete entry type returned by this dictionary.
    type Entry: DictionaryEntry;

    /// Fetch an entry by its `(group, element)` tag.
    ///
    /// A miss is not an error: callers are expected to fall back to
    /// [`VR::UN`] and retain the element under an unresolved name.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;

    /// Fetch an entry by its keyword (e.g. `"PatientName"`).
    ///
    /// Keywords are case sensitive and contain no separators, matching
    /// the form used throughout the standard's data dictionary.
    fn by_keyword(&self, keyword: &str) -> Option<&Self::Entry>;
}

/// A single entry of a DICOM data dictionary.
pub trait DictionaryEntry {
    /// The attribute's tag.
    fn tag(&self) -> Tag;
    /// The attribute's keyword, with no spaces, in UpperCamelCase.
    fn keyword(&self) -> &str;
    /// The attribute's typical value representation.
    fn vr(&self) -> VR;
    /// The attribute's value multiplicity, as a free-form string (e.g.
    /// `"1"`, `"1-n"`, `"2-2n"`) following the standard's own notation.
    fn vm(&self) -> &str;
    /// Whether this attribute has been retired by the standard.
    fn is_retired(&self) -> bool;
}
