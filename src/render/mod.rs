//! Pure renderers from stored records to markup
//!
//! Each domain produces `Node` trees only; committing them to the document
//! is the platform adapter's job. A domain with nothing stored renders
//! nothing, so the page keeps its static markup.

pub mod media;
pub mod publications;
pub mod team;

pub use media::{MediaRender, VideoRender, embed_video_url, plan_media};
pub use publications::{PublicationGroup, group_publications, plan_publications};
pub use team::plan_team;

use serde::de::DeserializeOwned;

use crate::store::{KeyValueStore, Storage};

/// Stored list under `key`, or `None` when absent, unreadable or empty
pub(crate) fn stored_list<T: DeserializeOwned, S: KeyValueStore>(
    storage: &Storage<S>,
    key: &str,
) -> Option<Vec<T>> {
    storage.get::<Vec<T>>(key).filter(|list| !list.is_empty())
}
