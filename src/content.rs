//! Stored content records
//!
//! Field names match the JSON already sitting in visitors' storage, and
//! every field defaults so partially-populated entries still load.

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::{ARCHIVE_LABEL, ARCHIVE_YEAR};

/// The single large photo at the top of the media page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaMain {
    /// URL or embedded `data:` image
    pub src: String,
    pub caption: String,
}

/// Stored form of `MediaMain`, where a missing caption differs from an
/// empty one (only a missing caption falls back to the page's text)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredMediaMain {
    pub src: String,
    pub caption: Option<String>,
}

/// One card in the media gallery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaGalleryItem {
    pub src: String,
    pub alt: String,
    pub desc: String,
}

/// An embedded video; entries without a URL are never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoItem {
    pub url: String,
    pub title: String,
}

/// One card on the team page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub photo: String,
    pub name: String,
    pub degree: String,
    pub role: String,
    /// Highlighted card styling
    pub featured: bool,
}

/// One publication entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publication {
    /// Four-digit year, or `"archive"`
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub title: String,
}

impl Publication {
    pub fn new(year: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            title: title.into(),
        }
    }

    /// Group this entry belongs to: the trimmed year, with the "Earlier work"
    /// label (any case) folded into the archive sentinel
    pub fn group_key(&self) -> String {
        let year = self.year.trim();
        if year.eq_ignore_ascii_case(ARCHIVE_LABEL) {
            ARCHIVE_YEAR.to_string()
        } else {
            year.to_string()
        }
    }
}

/// Accept `2024` as well as `"2024"` for hand-edited storage
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(serde_json::Number),
        Missing(()),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
        Year::Missing(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_records_load() {
        let member: TeamMember = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(member.name, "Ada");
        assert_eq!(member.photo, "");
        assert!(!member.featured);
    }

    #[test]
    fn test_stored_main_caption_presence() {
        let absent: StoredMediaMain = serde_json::from_str(r#"{"src": "a.jpg"}"#).unwrap();
        assert_eq!(absent.caption, None);
        let empty: StoredMediaMain = serde_json::from_str(r#"{"caption": ""}"#).unwrap();
        assert_eq!(empty.caption.as_deref(), Some(""));
    }

    #[test]
    fn test_numeric_and_null_year() {
        let list: Vec<Publication> =
            serde_json::from_str(r#"[{"year": 2023, "title": "A"}, {"year": null, "title": "B"}]"#)
                .unwrap();
        assert_eq!(list[0].year, "2023");
        assert_eq!(list[1].year, "");
    }

    #[test]
    fn test_group_key() {
        assert_eq!(Publication::new(" 2024 ", "t").group_key(), "2024");
        assert_eq!(Publication::new("Earlier Work", "t").group_key(), "archive");
        assert_eq!(Publication::new("EARLIER WORK", "t").group_key(), "archive");
        assert_eq!(Publication::new("archive", "t").group_key(), "archive");
        assert_eq!(Publication::new("In press", "t").group_key(), "In press");
    }
}
