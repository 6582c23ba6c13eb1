//! Publication timeline, grouped by year
//!
//! Groups sort newest year first, then any non-numeric labels (reverse
//! lexicographic), with the archive group always last. The stored list is
//! never reordered; grouping happens on borrowed records.

use std::cmp::Ordering;

use super::stored_list;
use crate::config::StorageKeys;
use crate::consts::{ARCHIVE_LABEL, ARCHIVE_YEAR};
use crate::content::Publication;
use crate::markup::{Element, Node};
use crate::store::{KeyValueStore, Storage};

/// One year section of the timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationGroup<'a> {
    /// Trimmed year, or `"archive"`
    pub key: String,
    /// Entries in stored order
    pub items: Vec<&'a Publication>,
}

impl PublicationGroup<'_> {
    pub fn is_archive(&self) -> bool {
        self.key == ARCHIVE_YEAR
    }

    /// Heading text
    pub fn label(&self) -> &str {
        if self.is_archive() {
            ARCHIVE_LABEL
        } else {
            &self.key
        }
    }
}

/// Replacement timeline, or `None` to keep the static markup
pub fn plan_publications<S: KeyValueStore>(
    storage: &Storage<S>,
    keys: &StorageKeys,
) -> Option<Vec<Node>> {
    stored_list::<Publication, _>(storage, &keys.publications).map(|list| timeline(&list))
}

/// Group entries by year key and order the groups for display
pub fn group_publications(list: &[Publication]) -> Vec<PublicationGroup<'_>> {
    let mut groups: Vec<PublicationGroup<'_>> = Vec::new();
    for publication in list {
        let key = publication.group_key();
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.items.push(publication),
            None => groups.push(PublicationGroup {
                key,
                items: vec![publication],
            }),
        }
    }
    groups.sort_by(|a, b| compare_year_keys(&a.key, &b.key));
    groups
}

/// Numeric value of a year key; a blank key counts as year 0
fn numeric_year(key: &str) -> Option<f64> {
    if key.is_empty() {
        return Some(0.0);
    }
    key.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Display order of two group keys
fn compare_year_keys(a: &str, b: &str) -> Ordering {
    match (a == ARCHIVE_YEAR, b == ARCHIVE_YEAR) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    match (numeric_year(a), numeric_year(b)) {
        (Some(na), Some(nb)) => nb.total_cmp(&na).then_with(|| b.cmp(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

/// Timeline sections for a publication list
pub fn timeline(list: &[Publication]) -> Vec<Node> {
    group_publications(list).iter().map(year_section).collect()
}

fn year_section(group: &PublicationGroup<'_>) -> Node {
    let archive = group.is_archive();
    let (group_class, badge_class) = if archive {
        ("pub-year-group pub-year-group-archive", "pub-badge pub-badge-archive")
    } else {
        ("pub-year-group", "pub-badge")
    };

    let items = group.items.iter().map(|publication| -> Node {
        Element::new("li")
            .class("pub-item")
            .child(
                Element::new("span")
                    .class(badge_class)
                    .text(badge_text(group, publication)),
            )
            .child(Element::new("p").class("pub-title").text(&publication.title))
            .into()
    });

    Element::new("section")
        .class(group_class)
        .attr("data-year", &group.key)
        .child(Element::new("h2").class("pub-year").text(group.label()))
        .child(Element::new("ul").class("pub-list").children(items))
        .into()
}

/// Badge for one entry: the group year, except that archived entries keep
/// their own label (e.g. "Earlier Work") when they have one
fn badge_text(group: &PublicationGroup<'_>, publication: &Publication) -> String {
    if !group.is_archive() {
        return group.key.clone();
    }
    let year = publication.year.trim();
    if year.is_empty() || year == ARCHIVE_YEAR {
        ARCHIVE_LABEL.to_string()
    } else {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::select_class;
    use crate::store::MemoryStore;

    fn keys_of(groups: &[PublicationGroup<'_>]) -> Vec<String> {
        groups.iter().map(|g| g.key.clone()).collect()
    }

    #[test]
    fn test_grouping_with_earlier_work() {
        let list = vec![
            Publication::new("2024", "A"),
            Publication::new("2022", "B"),
            Publication::new("archive", "C"),
            Publication::new("2024", "D"),
            Publication::new("Earlier Work", "E"),
        ];
        let groups = group_publications(&list);
        assert_eq!(keys_of(&groups), vec!["2024", "2022", "archive"]);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].items[0].title, "A");
        assert_eq!(groups[0].items[1].title, "D");
        assert_eq!(groups[1].items.len(), 1);
        assert_eq!(groups[2].items.len(), 2);
        assert_eq!(groups[2].items[0].title, "C");
        assert_eq!(groups[2].items[1].title, "E");
        // Stored order untouched
        assert_eq!(list[2].title, "C");
    }

    #[test]
    fn test_non_numeric_labels_between_years_and_archive() {
        let list = vec![
            Publication::new("archive", "a"),
            Publication::new("In press", "b"),
            Publication::new("2019", "c"),
            Publication::new("Forthcoming", "d"),
            Publication::new("2023", "e"),
        ];
        let groups = group_publications(&list);
        assert_eq!(
            keys_of(&groups),
            vec!["2023", "2019", "In press", "Forthcoming", "archive"]
        );
    }

    #[test]
    fn test_blank_year_sorts_after_real_years() {
        let list = vec![
            Publication::new("  ", "undated"),
            Publication::new("Preprint", "p"),
            Publication::new("2021", "y"),
            Publication::new("archive", "old"),
        ];
        let groups = group_publications(&list);
        assert_eq!(keys_of(&groups), vec!["2021", "", "Preprint", "archive"]);
        assert_eq!(groups[1].items[0].title, "undated");
    }

    #[test]
    fn test_archive_badges() {
        let list = vec![
            Publication::new("archive", "Old"),
            Publication::new("Earlier Work", "Older"),
        ];
        let nodes = timeline(&list);
        let badges: Vec<String> = select_class(&nodes, "pub-badge")
            .into_iter()
            .map(|e| Node::from(e.clone()).text_content())
            .collect();
        assert_eq!(badges, vec!["Earlier work", "Earlier Work"]);
        assert_eq!(select_class(&nodes, "pub-badge-archive").len(), 2);
        assert_eq!(select_class(&nodes, "pub-year-group-archive").len(), 1);
    }

    #[test]
    fn test_section_markup() {
        let nodes = timeline(&[Publication::new("2024", "Deep <nets>")]);
        assert_eq!(
            nodes[0].to_html(),
            "<section class=\"pub-year-group\" data-year=\"2024\"><h2 class=\"pub-year\">2024</h2>\
             <ul class=\"pub-list\"><li class=\"pub-item\"><span class=\"pub-badge\">2024</span>\
             <p class=\"pub-title\">Deep &lt;nets&gt;</p></li></ul></section>"
        );
    }

    #[test]
    fn test_archive_heading_and_data_year() {
        let nodes = timeline(&[Publication::new("archive", "x")]);
        let html = nodes[0].to_html();
        assert!(html.starts_with(
            "<section class=\"pub-year-group pub-year-group-archive\" data-year=\"archive\"><h2 class=\"pub-year\">Earlier work</h2>"
        ));
    }

    #[test]
    fn test_plan_requires_stored_list() {
        let storage = Storage::new(MemoryStore::new());
        let keys = StorageKeys::default();
        assert_eq!(plan_publications(&storage, &keys), None);
        storage.set(&keys.publications, &vec![Publication::new("2020", "x")]);
        assert_eq!(plan_publications(&storage, &keys).map(|n| n.len()), Some(1));
    }
}
