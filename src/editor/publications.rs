//! Publications edit panel

use super::{Saved, add_button, add_row, remove_button, remove_row, save_button, seed_list};
use crate::config::EditorConfig;
use crate::consts::ARCHIVE_YEAR;
use crate::content::Publication;
use crate::markup::{Element, Node};
use crate::render::plan_publications;
use crate::snapshot::{self, StaticPublicationItem};
use crate::store::{KeyValueStore, Storage};

pub const PUB_FIELDS_ID: &str = "lab-pub-fields";

/// One publication row as read back from the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationRowInput {
    pub year: String,
    pub title: String,
}

impl PublicationRowInput {
    pub fn new(year: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PublicationPanel {
    pub list: Vec<Publication>,
}

impl PublicationPanel {
    pub fn open<S, F>(storage: &Storage<S>, config: &EditorConfig, scrape: F) -> Self
    where
        S: KeyValueStore,
        F: FnOnce() -> Vec<StaticPublicationItem>,
    {
        let list = seed_list(storage, &config.keys.publications, || {
            snapshot::import_publications(&scrape())
        });
        Self { list }
    }

    pub fn add_publication(&mut self) {
        add_row(&mut self.list);
    }

    pub fn remove_publication(&mut self, index: usize) {
        remove_row(&mut self.list, index);
    }

    pub fn sync_form(&mut self, rows: &[PublicationRowInput]) {
        for (publication, row) in self.list.iter_mut().zip(rows) {
            publication.year = row.year.clone();
            publication.title = row.title.clone();
        }
    }

    /// Records to persist: untitled rows are dropped and a blank year
    /// files the entry under the archive
    pub fn collect(rows: &[PublicationRowInput]) -> Vec<Publication> {
        rows.iter()
            .filter_map(|row| {
                let title = row.title.trim();
                if title.is_empty() {
                    return None;
                }
                let year = match row.year.trim() {
                    "" => ARCHIVE_YEAR,
                    year => year,
                };
                Some(Publication::new(year, title))
            })
            .collect()
    }

    /// Persist the form and re-render the timeline
    pub fn save<S: KeyValueStore>(
        &mut self,
        storage: &Storage<S>,
        config: &EditorConfig,
        rows: &[PublicationRowInput],
    ) -> Saved<Option<Vec<Node>>> {
        let list = Self::collect(rows);
        let result = storage.try_set(&config.keys.publications, &list);
        match &result {
            Ok(()) => log::info!("Publications saved ({} entries)", list.len()),
            Err(e) => log::warn!("Publications save failed: {}", e),
        }
        self.sync_form(rows);

        Saved {
            result,
            render: plan_publications(storage, &config.keys),
        }
    }

    pub fn panel(&self) -> Node {
        Element::new("div")
            .class("lab-edit-panel")
            .child(Element::new("h3").text("Edit Publications"))
            .child(Element::new("div").id(PUB_FIELDS_ID).children(self.rows()))
            .child(add_button("pub", "+ Add publication"))
            .child(save_button("pub"))
            .into()
    }

    pub fn rows(&self) -> Vec<Node> {
        self.list
            .iter()
            .enumerate()
            .map(|(i, publication)| -> Node {
                Element::new("div")
                    .class("lab-edit-row lab-edit-row-pub")
                    .child(
                        Element::new("input")
                            .attr("type", "text")
                            .attr("placeholder", "Year (e.g. 2025 or archive)")
                            .attr("value", &publication.year)
                            .attr("data-pub-year", "")
                            .attr("style", "width:80px"),
                    )
                    .child(
                        Element::new("input")
                            .attr("type", "text")
                            .attr("placeholder", "Title")
                            .attr("value", &publication.title)
                            .attr("data-pub-title", "")
                            .attr("style", "flex:1"),
                    )
                    .child(remove_button("data-remove-pub", "", "data-index", i))
                    .into()
            })
            .collect()
    }
}
