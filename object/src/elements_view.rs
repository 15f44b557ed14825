//! [`ElementsView`]: a read-only accessor over a decoded element map,
//! plus the textual dumper.

use std::fmt::Write as _;

use dicom_core::dictionary::{DataDictionary, DictionaryEntry};
use dicom_core::header::Item as ElementMap;
use dicom_core::value::trim_component;
use dicom_core::{DataElement, Header, Tag, Value, VR};

const PIXEL_DATA_KEY: &str = "x7FE00010";
const DUMP_HASH_COLUMN: usize = 55;

/// The result of a keyed lookup into an [`ElementsView`]: either the
/// value's single component, unwrapped, or the value's full component
/// list -- matching `get_by_key`'s `as_array` contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Scalar(Component<'a>),
    Many(&'a Value),
}

/// A single component of a multi-valued element, as returned by
/// [`Lookup::Scalar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component<'a> {
    Str(&'a str),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    F64(f64),
    Byte(u8),
}

fn first_component(value: &Value) -> Option<Component<'_>> {
    match value {
        Value::Strings(v) | Value::Tags(v) => v.first().map(|s| Component::Str(trim_component(s))),
        Value::Bytes(v) => v.first().map(|&b| Component::Byte(b)),
        Value::U16Array(v) => v.first().map(|&x| Component::U16(x)),
        Value::I16Array(v) => v.first().map(|&x| Component::I16(x)),
        Value::U32Array(v) => v.first().map(|&x| Component::U32(x)),
        Value::I32Array(v) => v.first().map(|&x| Component::I32(x)),
        Value::F32Array(v) => v.first().map(|&x| Component::F32(x)),
        Value::F64Array(v) => v.first().map(|&x| Component::F64(x)),
        Value::Items(_) | Value::Fragments(_) => None,
    }
}

/// One row of [`ElementsView::dump_to_table`].
#[derive(Debug, Clone, PartialEq)]
pub struct DumpRow {
    pub name: String,
    pub group: u16,
    pub element: u16,
    pub vr: String,
    pub vl: String,
    pub value: String,
}

/// A read-only view over a decoded element map, backed by a data
/// dictionary for keyword resolution.
#[derive(Debug)]
pub struct ElementsView<'a, D> {
    elements: &'a ElementMap,
    dictionary: &'a D,
}

impl<'a, D> ElementsView<'a, D>
where
    D: DataDictionary,
{
    pub fn new(elements: &'a ElementMap, dictionary: &'a D) -> Self {
        ElementsView {
            elements,
            dictionary,
        }
    }

    /// Look up an element by its canonical key (e.g. `x00100010`).
    ///
    /// If the value has exactly one component and `as_array` is
    /// `false`, the scalar is unwrapped; otherwise the full value is
    /// returned. A missing key yields `None` in both cases.
    pub fn get_by_key(&self, key: &str, as_array: bool) -> Option<Lookup<'a>> {
        let elem = self.elements.get(key)?;
        let value = elem.value();
        if !as_array && value.multiplicity() == 1 {
            first_component(value).map(Lookup::Scalar)
        } else {
            Some(Lookup::Many(value))
        }
    }

    /// Look up an element by its `(group, element)` tag.
    pub fn get_by_group_element(&self, group: u16, element: u16, as_array: bool) -> Option<Lookup<'a>> {
        self.get_by_key(&Tag(group, element).key(), as_array)
    }

    /// Resolve `keyword` through the dictionary, then look it up.
    pub fn get_by_name(&self, keyword: &str, as_array: bool) -> Option<Lookup<'a>> {
        let tag = self.dictionary.by_keyword(keyword)?.tag();
        self.get_by_key(&tag.key(), as_array)
    }

    /// One row per element, in the map's iteration order. The pixel
    /// data element's value is elided to `"..."`.
    pub fn dump_to_table(&self) -> Vec<DumpRow> {
        self.elements
            .iter()
            .map(|(key, elem)| self.row_for(key, elem))
            .collect()
    }

    fn row_for(&self, key: &str, elem: &DataElement) -> DumpRow {
        let name = self
            .dictionary
            .by_tag(elem.tag())
            .map(|e| e.keyword().to_string())
            .unwrap_or_default();
        let value = if key == PIXEL_DATA_KEY {
            "...".to_string()
        } else {
            summarize_value(elem.value())
        };
        DumpRow {
            name,
            group: elem.tag().group(),
            element: elem.tag().element(),
            vr: elem.vr().to_string(),
            vl: elem.vl().to_string(),
            value,
        }
    }

    /// A header-prefixed textual dump, one line per element.
    ///
    /// Sequences recurse with a two-space indent per nesting level,
    /// synthesizing `(Item with ... length #=N)` and
    /// `(SequenceDelimitationItem)` pseudo-entries around their
    /// contents; pixel-data fragment sequences do the same, with
    /// fragments rendered under VR `pi`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(out, "# Dataset ({} elements)", self.elements.len()).ok();
        self.dump_into(self.elements, 0, &mut out);
        out
    }

    fn dump_into(&self, elements: &ElementMap, depth: usize, out: &mut String) {
        for (key, elem) in elements.iter() {
            if elem.tag().is_item_group() {
                // The item's own self-referential header entry; the
                // `(Item with ...)` pseudo-line is synthesized by the
                // caller instead of printed from here.
                continue;
            }
            self.dump_element_line(key, elem, depth, out);
        }
    }

    fn dump_element_line(&self, key: &str, elem: &DataElement, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let name = self
            .dictionary
            .by_tag(elem.tag())
            .map(DictionaryEntry::keyword)
            .unwrap_or("");

        match elem.value() {
            Value::Items(items) => {
                let header = format!(
                    "{}({:04X},{:04X}) {} {}",
                    indent,
                    elem.tag().group(),
                    elem.tag().element(),
                    elem.vr(),
                    name
                );
                push_line(out, &header, &elem.vl().to_string(), items.len(), "");

                for item in items {
                    let item_indent = "  ".repeat(depth + 1);
                    let own_key = Tag::ITEM.key();
                    let own_vl = item.get(&own_key).map(|e| e.vl());
                    let length_desc = match own_vl {
                        Some(vl) if vl.is_undefined() => "undefined",
                        _ => "explicit",
                    };
                    let child_count = item.len().saturating_sub(1);
                    writeln!(
                        out,
                        "{}(Item with {} length #={})",
                        item_indent, length_desc, child_count
                    )
                    .ok();
                    self.dump_into(item, depth + 2, out);
                }

                let closing_indent = "  ".repeat(depth + 1);
                writeln!(out, "{}(SequenceDelimitationItem)", closing_indent).ok();
            }
            Value::Fragments(fragments) => {
                if key == PIXEL_DATA_KEY {
                    let header = format!(
                        "{}({:04X},{:04X}) {} {}",
                        indent,
                        elem.tag().group(),
                        elem.tag().element(),
                        elem.vr(),
                        name
                    );
                    push_line(out, &header, &elem.vl().to_string(), fragments.len(), "");
                }
                let frag_indent = "  ".repeat(depth + 1);
                for frag in fragments {
                    let header = format!(
                        "{}({:04X},{:04X}) {}",
                        frag_indent,
                        frag.tag().group(),
                        frag.tag().element(),
                        VR::PI
                    );
                    push_line(out, &header, &frag.vl().to_string(), 1, "");
                }
                writeln!(out, "{}(SequenceDelimitationItem)", frag_indent).ok();
            }
            _ => {
                let summary = if key == PIXEL_DATA_KEY {
                    "...".to_string()
                } else {
                    summarize_value(elem.value())
                };
                let header = format!(
                    "{}({:04X},{:04X}) {} {}",
                    indent,
                    elem.tag().group(),
                    elem.tag().element(),
                    elem.vr(),
                    summary
                );
                push_line(out, &header, &elem.vl().to_string(), elem.value().multiplicity(), name);
            }
        }
    }
}

fn push_line(out: &mut String, header: &str, vl: &str, count: usize, keyword: &str) {
    let mut line = header.to_string();
    if line.len() < DUMP_HASH_COLUMN {
        line.push_str(&" ".repeat(DUMP_HASH_COLUMN - line.len()));
    } else {
        line.push(' ');
    }
    let _ = write!(line, "#{:>3}, {} {}", vl, count, keyword);
    out.push_str(line.trim_end());
    out.push('\n');
}

fn summarize_value(value: &Value) -> String {
    match value {
        Value::Strings(v) | Value::Tags(v) => {
            v.iter().map(|s| trim_component(s)).collect::<Vec<_>>().join("\\")
        }
        Value::Bytes(v) => format!("array of {} bytes", v.len()),
        Value::U16Array(v) => format_numeric(v),
        Value::I16Array(v) => format_numeric(v),
        Value::U32Array(v) => format_numeric(v),
        Value::I32Array(v) => format_numeric(v),
        Value::F32Array(v) => format_numeric(v),
        Value::F64Array(v) => format_numeric(v),
        Value::Items(v) => format!("{} item(s)", v.len()),
        Value::Fragments(v) => format!("{} fragment(s)", v.len()),
    }
}

fn format_numeric<T: std::fmt::Display>(values: &[T]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, Length};
    use dicom_dictionary_std::StandardDataDictionary;

    fn sample_elements() -> ElementMap {
        let mut m = ElementMap::new();
        m.insert(
            "x00100010".to_string(),
            DataElement::new(
                Tag(0x0010, 0x0010),
                VR::PN,
                Length::defined(8),
                Value::Strings(vec!["DOE^JOHN".to_string()]),
                200,
            ),
        );
        m
    }

    #[test]
    fn get_by_key_unwraps_single_component() {
        let elements = sample_elements();
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);
        match view.get_by_key("x00100010", false) {
            Some(Lookup::Scalar(Component::Str(s))) => assert_eq!(s, "DOE^JOHN"),
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[test]
    fn get_by_key_as_array_keeps_the_full_value() {
        let elements = sample_elements();
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);
        match view.get_by_key("x00100010", true) {
            Some(Lookup::Many(Value::Strings(v))) => assert_eq!(v, &["DOE^JOHN".to_string()]),
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[test]
    fn get_by_key_strips_wire_padding_from_string_components() {
        let mut elements = sample_elements();
        elements.insert(
            "x00100020".to_string(),
            DataElement::new(
                Tag(0x0010, 0x0020),
                VR::LO,
                Length::defined(8),
                Value::Strings(vec!["ID0001\u{200B}".to_string()]),
                200,
            ),
        );
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);
        match view.get_by_key("x00100020", false) {
            Some(Lookup::Scalar(Component::Str(s))) => assert_eq!(s, "ID0001"),
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[test]
    fn dump_strips_trailing_space_padding_from_values() {
        let mut elements = sample_elements();
        elements.insert(
            "x00100010".to_string(),
            DataElement::new(
                Tag(0x0010, 0x0010),
                VR::PN,
                Length::defined(10),
                Value::Strings(vec!["DOE^JOHN ".to_string()]),
                200,
            ),
        );
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);

        let rows = view.dump_to_table();
        let row = rows.iter().find(|r| r.group == 0x0010 && r.element == 0x0010).unwrap();
        assert_eq!(row.value, "DOE^JOHN");

        let text = view.dump();
        assert!(text.contains("DOE^JOHN"));
        assert!(!text.contains("DOE^JOHN \n") && !text.contains("DOE^JOHN  "));
    }

    #[test]
    fn get_by_name_resolves_through_dictionary() {
        let elements = sample_elements();
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);
        assert_eq!(
            view.get_by_name("PatientName", false),
            view.get_by_group_element(0x0010, 0x0010, false)
        );
    }

    #[test]
    fn missing_key_is_none() {
        let elements = sample_elements();
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);
        assert!(view.get_by_key("x99990001", false).is_none());
    }

    #[test]
    fn dump_to_table_elides_pixel_data() {
        let mut elements = sample_elements();
        elements.insert(
            PIXEL_DATA_KEY.to_string(),
            DataElement::new(
                Tag(0x7FE0, 0x0010),
                VR::OW,
                Length::defined(4),
                Value::U16Array(vec![1, 2]),
                300,
            ),
        );
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);
        let rows = view.dump_to_table();
        let pixel_row = rows.iter().find(|r| r.group == 0x7FE0).unwrap();
        assert_eq!(pixel_row.value, "...");
    }

    #[test]
    fn dump_contains_patient_name_line() {
        let elements = sample_elements();
        let dict = StandardDataDictionary;
        let view = ElementsView::new(&elements, &dict);
        let text = view.dump();
        assert!(text.contains("DOE^JOHN"));
        assert!(text.contains("PatientName"));
    }
}
