//! Import from the page's static markup
//!
//! A never-edited page still has its hand-written cards. The platform layer
//! scrapes them into these plain structs once, when an edit panel opens with
//! nothing stored, and the functions here turn them into records.

use crate::consts::{ARCHIVE_LABEL, ARCHIVE_YEAR};
use crate::content::{MediaGalleryItem, MediaMain, Publication, StoredMediaMain, TeamMember};

/// Main photo and caption as found on the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMediaMain {
    pub src: Option<String>,
    pub caption: Option<String>,
}

/// A `.media-card` as found on the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticGalleryCard {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub desc: Option<String>,
}

/// A `.team-card` as found on the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticTeamCard {
    pub photo: Option<String>,
    pub name: Option<String>,
    pub degree: Option<String>,
    pub role: Option<String>,
    /// Card carries `team-card-featured`
    pub featured: bool,
}

/// A `.pub-item` as found on the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPublicationItem {
    /// Text of the `.pub-badge`
    pub badge: Option<String>,
    pub title: Option<String>,
}

pub fn import_gallery(cards: &[StaticGalleryCard]) -> Vec<MediaGalleryItem> {
    cards
        .iter()
        .map(|card| MediaGalleryItem {
            src: card.src.clone().unwrap_or_default(),
            alt: card.alt.clone().unwrap_or_default(),
            desc: card.desc.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn import_team(cards: &[StaticTeamCard]) -> Vec<TeamMember> {
    cards
        .iter()
        .map(|card| TeamMember {
            photo: card.photo.clone().unwrap_or_default(),
            name: card.name.clone().unwrap_or_default(),
            degree: card.degree.clone().unwrap_or_default(),
            role: card.role.clone().unwrap_or_default(),
            featured: card.featured,
        })
        .collect()
}

/// Badge and title are trimmed; the "Earlier work" badge becomes the
/// archive sentinel
pub fn import_publications(items: &[StaticPublicationItem]) -> Vec<Publication> {
    items
        .iter()
        .map(|item| {
            let badge = item.badge.as_deref().unwrap_or_default().trim();
            let year = if badge == ARCHIVE_LABEL { ARCHIVE_YEAR } else { badge };
            Publication::new(year, item.title.as_deref().unwrap_or_default().trim())
        })
        .collect()
}

/// Merge the stored main record with the page
///
/// The page photo fills in a missing `src`; the page caption is used only
/// when no caption was ever stored (an empty stored caption stays empty).
pub fn merge_media_main(stored: Option<StoredMediaMain>, page: &StaticMediaMain) -> MediaMain {
    let stored = stored.unwrap_or_default();
    let src = if stored.src.is_empty() {
        page.src.clone().unwrap_or_default()
    } else {
        stored.src
    };
    let caption = match stored.caption {
        Some(caption) => caption,
        None => page.caption.clone().unwrap_or_default(),
    };
    MediaMain { src, caption }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_import_gallery_missing_parts() {
        let items = import_gallery(&[
            StaticGalleryCard { src: some("a.jpg"), alt: some("A"), desc: some("Lab") },
            StaticGalleryCard { src: None, alt: None, desc: some("No photo") },
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].src, "a.jpg");
        assert_eq!(items[1].src, "");
        assert_eq!(items[1].desc, "No photo");
    }

    #[test]
    fn test_import_team_featured() {
        let members = import_team(&[StaticTeamCard {
            photo: some("p.jpg"),
            name: some("Grace"),
            degree: None,
            role: some("PI"),
            featured: true,
        }]);
        assert_eq!(members[0].name, "Grace");
        assert_eq!(members[0].degree, "");
        assert!(members[0].featured);
    }

    #[test]
    fn test_import_publications_trims_and_maps_archive() {
        let list = import_publications(&[
            StaticPublicationItem { badge: some(" 2021 \n"), title: some("  Title  ") },
            StaticPublicationItem { badge: some("Earlier work"), title: some("Old") },
            StaticPublicationItem { badge: None, title: None },
        ]);
        assert_eq!(list[0], Publication::new("2021", "Title"));
        assert_eq!(list[1], Publication::new("archive", "Old"));
        assert_eq!(list[2], Publication::new("", ""));
    }

    #[test]
    fn test_merge_main_prefers_stored() {
        let page = StaticMediaMain { src: some("page.jpg"), caption: some("Page caption") };
        let merged = merge_media_main(
            Some(StoredMediaMain { src: "data:image/png;base64,AA==".into(), caption: Some("".into()) }),
            &page,
        );
        assert_eq!(merged.src, "data:image/png;base64,AA==");
        assert_eq!(merged.caption, "");
    }

    #[test]
    fn test_merge_main_falls_back_to_page() {
        let page = StaticMediaMain { src: some("page.jpg"), caption: some("Page caption") };
        let merged = merge_media_main(None, &page);
        assert_eq!(merged, MediaMain { src: "page.jpg".into(), caption: "Page caption".into() });

        let merged = merge_media_main(Some(StoredMediaMain::default()), &page);
        assert_eq!(merged.src, "page.jpg");
        assert_eq!(merged.caption, "Page caption");
    }
}
