//! Edit panels
//!
//! Each domain panel holds the records being edited, renders its form as a
//! markup tree, accepts image uploads for image-bearing rows, and saves the
//! form back to storage. Row lists are tiny, so every structural change
//! re-renders the whole row container.

pub mod media;
pub mod publications;
pub mod team;
pub mod upload;

pub use media::{GalleryRowInput, MediaForm, MediaPanel, VideoRowInput};
pub use publications::{PublicationPanel, PublicationRowInput};
pub use team::{TeamPanel, TeamRowInput};
pub use upload::{check_image, encode_data_url, ingest_image};

use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::markup::{Element, Node};
use crate::render::stored_list;
use crate::store::{KeyValueStore, Storage};

/// Status shown beside an image row once it holds embedded data
pub const IMAGE_SET: &str = "Image set.";
/// Status shown beside a photo field once it holds embedded data
pub const PHOTO_SET: &str = "Photo set.";

/// Records to edit: what is stored, else the page's static content
pub fn seed_list<T, S, F>(storage: &Storage<S>, key: &str, import: F) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore,
    F: FnOnce() -> Vec<T>,
{
    match stored_list(storage, key) {
        Some(list) => list,
        None => {
            let list = import();
            log::info!("Seeded {} editor rows for {} from page markup", list.len(), key);
            list
        }
    }
}

/// Identifier a row keeps for as long as it stays in its panel
pub type RowId = u64;

/// Image-bearing records, each under a stable row id
///
/// A file read can finish after rows above it were removed, so uploads
/// address their row by id rather than by position. Ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct Rows<T> {
    rows: Vec<(RowId, T)>,
    next_id: RowId,
}

impl<T> Rows<T> {
    pub fn new(records: Vec<T>) -> Self {
        let mut rows = Self {
            rows: Vec::with_capacity(records.len()),
            next_id: 0,
        };
        for record in records {
            rows.push(record);
        }
        rows
    }

    /// Append a record, returning its new id
    pub fn push(&mut self, record: T) -> RowId {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push((id, record));
        id
    }

    /// Remove the row with `id`; unknown ids are ignored
    pub fn remove(&mut self, id: RowId) -> Option<T> {
        match self.rows.iter().position(|(row_id, _)| *row_id == id) {
            Some(position) => Some(self.rows.remove(position).1),
            None => {
                log::warn!("Ignoring remove of missing row id {}", id);
                None
            }
        }
    }

    pub fn get(&self, id: RowId) -> Option<&T> {
        self.rows
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, record)| record)
    }

    pub fn get_mut(&mut self, id: RowId) -> Option<&mut T> {
        self.rows
            .iter_mut()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, record)| record)
    }

    /// Id of the row currently at `position`
    pub fn id_at(&self, position: usize) -> Option<RowId> {
        self.rows.get(position).map(|(id, _)| *id)
    }

    /// Rows in display order
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &T)> {
        self.rows.iter().map(|(id, record)| (*id, record))
    }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Append a blank record
pub fn add_row<T: Default>(rows: &mut Vec<T>) {
    rows.push(T::default());
}

/// Remove the record at `index`; out-of-range indices are ignored
pub fn remove_row<T>(rows: &mut Vec<T>, index: usize) -> Option<T> {
    if index < rows.len() {
        Some(rows.remove(index))
    } else {
        log::warn!("Ignoring remove of missing row {}", index);
        None
    }
}

/// Result of a save: the write outcome plus the re-rendered page content
#[derive(Debug)]
pub struct Saved<R> {
    pub result: Result<(), StoreError>,
    pub render: R,
}

impl<R> Saved<R> {
    pub fn acknowledgment(&self, domain: &str) -> String {
        save_acknowledgment(domain, &self.result)
    }
}

/// Text shown to the user after a save attempt
pub fn save_acknowledgment(domain: &str, result: &Result<(), StoreError>) -> String {
    match result {
        Ok(()) => format!("{} saved.", domain),
        Err(e) => format!("{} could not be saved: {}", domain, e),
    }
}

/// Banner shown at the top of every page while edit mode is on
pub fn edit_banner() -> Node {
    Element::new("div")
        .class("lab-edit-banner")
        .child(
            Element::new("span").class("lab-edit-banner-text").text(
                "Edit mode: edit content below, then click Save. When done, click the button to exit.",
            ),
        )
        .child(
            Element::new("button")
                .attr("type", "button")
                .class("lab-edit-exit")
                .attr("title", "Click to leave edit mode")
                .text("Exit edit mode"),
        )
        .into()
}

/// Hidden file picker + visible button + status label for one image slot
pub(crate) fn upload_controls(
    file_class: &'static str,
    button_class: &'static str,
    status_class: &'static str,
    row_attr: &'static str,
    id: RowId,
    label: &str,
    status: &str,
) -> Vec<Node> {
    vec![
        Element::new("input")
            .attr("type", "file")
            .attr("accept", "image/*")
            .class(file_class)
            .attr(row_attr, id.to_string())
            .attr("style", "display:none")
            .into(),
        Element::new("button")
            .attr("type", "button")
            .class(format!("lab-edit-upload-btn {}", button_class))
            .attr(row_attr, id.to_string())
            .text(label)
            .into(),
        Element::new("span")
            .class(format!("lab-file-status {}", status_class))
            .attr(row_attr, id.to_string())
            .text(status)
            .into(),
    ]
}

/// Single-line text input bound to a row field
pub(crate) fn text_input(kind: &'static str, placeholder: &str, value: &str, field_attr: &'static str) -> Node {
    Element::new("input")
        .attr("type", kind)
        .attr("placeholder", placeholder)
        .attr("value", value)
        .attr(field_attr, "")
        .into()
}

/// Remove control; `key_attr` carries either a position or a row id
pub(crate) fn remove_button(
    remove_attr: &'static str,
    remove_value: &str,
    key_attr: &'static str,
    key: impl ToString,
) -> Node {
    Element::new("button")
        .attr("type", "button")
        .class("lab-edit-remove")
        .attr(remove_attr, remove_value)
        .attr(key_attr, key.to_string())
        .text("Remove")
        .into()
}

pub(crate) fn add_button(add: &str, label: &str) -> Node {
    Element::new("button")
        .attr("type", "button")
        .class("lab-edit-add")
        .attr("data-add", add)
        .text(label)
        .into()
}

pub(crate) fn save_button(save: &str) -> Node {
    Element::new("button")
        .attr("type", "button")
        .class("lab-edit-save")
        .attr("data-save", save)
        .text("Save")
        .into()
}
