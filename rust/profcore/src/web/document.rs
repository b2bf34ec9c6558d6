//! DomDocument: `HostDocument` over the live page

use std::cell::Cell;

use js_sys::{Object, WeakMap};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlCollection, HtmlElement, HtmlTableCellElement, HtmlTableElement, HtmlTableRowElement};

use crate::detect::{CellGrid, CellPos, HostDocument, LabelRole};

/// Lookup stamp. Identity itself lives in a `WeakMap`, since a cloned
/// element copies the attribute along with everything else.
pub const KEY_ATTR: &str = "data-profcore-key";
pub const DETECTED_ATTR: &str = "data-profcore-detected";
pub const NAME_ATTR: &str = "data-profcore-name";
pub const POPUP_CLASS: &str = "profcore-popup";

const STRUCTURAL_SELECTOR: &str =
    "th, td, div, [role='columnheader'], [role='cell'], [role='gridcell']";

pub struct DomDocument {
    document: Document,
    keys: WeakMap,
    next_key: Cell<u32>,
}

impl DomDocument {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            keys: WeakMap::new(),
            next_key: Cell::new(0),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn assigned_key(&self, node: &Element) -> Option<u32> {
        let object: &Object = node.as_ref();
        let key = self.keys.get(object).as_f64()?;
        Some(key as u32)
    }

    /// Look an element back up by its key. Clones of the element carry the
    /// same stamp, so candidates are checked against the identity map.
    pub fn element_for_key(&self, key: u32) -> Option<Element> {
        let list = self
            .document
            .query_selector_all(&format!("[{}=\"{}\"]", KEY_ATTR, key))
            .ok()?;
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .find(|element| self.assigned_key(element) == Some(key))
    }

    fn role_of(element: &Element) -> LabelRole {
        let tag = element.tag_name();
        if tag.eq_ignore_ascii_case("th") {
            return LabelRole::Header;
        }
        if tag.eq_ignore_ascii_case("td") {
            return LabelRole::DataCell;
        }
        match element.get_attribute("role").as_deref() {
            Some("columnheader") => LabelRole::Header,
            Some("cell") | Some("gridcell") => LabelRole::DataCell,
            _ => LabelRole::Container,
        }
    }

    fn inside_popup(element: &Element) -> bool {
        matches!(element.closest(&format!(".{}", POPUP_CLASS)), Ok(Some(_)))
    }
}

/// Rows of an `HTMLTableElement`, live
pub struct DomTableGrid {
    rows: HtmlCollection,
}

impl CellGrid for DomTableGrid {
    type Cell = Element;

    fn row_count(&self) -> usize {
        self.rows.length() as usize
    }

    fn cell_at(&self, pos: CellPos) -> Option<Element> {
        let row: HtmlTableRowElement = self.rows.item(pos.row as u32)?.dyn_into().ok()?;
        row.cells().item(pos.col as u32)
    }
}

impl HostDocument for DomDocument {
    type Node = Element;
    type Key = u32;
    type Grid = DomTableGrid;

    fn key(&self, node: &Element) -> u32 {
        if let Some(key) = self.assigned_key(node) {
            return key;
        }
        let key = self.next_key.get() + 1;
        self.next_key.set(key);
        let object: &Object = node.as_ref();
        self.keys.set(object, &JsValue::from(key));
        let _ = node.set_attribute(KEY_ATTR, &key.to_string());
        key
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn structural_elements(&self) -> Vec<(Element, LabelRole)> {
        let Ok(list) = self.document.query_selector_all(STRUCTURAL_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter(|element| !Self::inside_popup(element))
            .map(|element| {
                let role = Self::role_of(&element);
                (element, role)
            })
            .collect()
    }

    fn locate_cell(&self, cell: &Element) -> Option<(DomTableGrid, CellPos)> {
        let cell_el = cell.dyn_ref::<HtmlTableCellElement>()?;
        let col = usize::try_from(cell_el.cell_index()).ok()?;
        let row: HtmlTableRowElement = cell.parent_element()?.dyn_into().ok()?;
        let row_idx = usize::try_from(row.row_index()).ok()?;
        let table: HtmlTableElement = cell.closest("table").ok()??.dyn_into().ok()?;
        Some((DomTableGrid { rows: table.rows() }, CellPos::new(row_idx, col)))
    }

    fn following_siblings(&self, node: &Element, limit: usize) -> Vec<Element> {
        let mut siblings = Vec::with_capacity(limit);
        let mut next = node.next_element_sibling();
        while let Some(element) = next {
            if siblings.len() >= limit {
                break;
            }
            next = element.next_element_sibling();
            siblings.push(element);
        }
        siblings
    }

    fn mark_detected(&self, node: &Element, name: &str) {
        let _ = node.set_attribute(DETECTED_ATTR, "true");
        let _ = node.set_attribute(NAME_ATTR, name);
        let _ = node.set_attribute("title", &format!("Hover for reviews of {}", name));
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            let style = html.style();
            let _ = style.set_property("text-decoration", "underline dotted");
            let _ = style.set_property("cursor", "help");
        }
    }

    fn detected_name(&self, node: &Element) -> Option<String> {
        node.get_attribute(NAME_ATTR)
    }
}
