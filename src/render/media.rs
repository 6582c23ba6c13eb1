//! Media page: main photo, gallery and videos

use std::sync::OnceLock;

use regex::Regex;

use super::stored_list;
use crate::config::StorageKeys;
use crate::content::{MediaGalleryItem, StoredMediaMain, VideoItem};
use crate::markup::{Element, Node};
use crate::store::{KeyValueStore, Storage};

/// Id of the list inside the videos section
pub const VIDEOS_LIST_ID: &str = "lab-media-videos";

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";

/// What to do with the videos section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRender {
    /// Nothing stored and no section to clear
    Untouched,
    /// Empty the section's list (the section itself stays)
    Clear,
    /// Fill the list, creating the section after the gallery if missing
    Fill(Vec<Node>),
}

/// Everything the media page should change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRender {
    pub main_src: Option<String>,
    pub main_caption: Option<String>,
    /// Replacement gallery cards
    pub gallery: Option<Vec<Node>>,
    pub videos: VideoRender,
}

impl MediaRender {
    /// True when applying this changes nothing on the page
    pub fn is_noop(&self) -> bool {
        self.main_src.is_none()
            && self.main_caption.is_none()
            && self.gallery.is_none()
            && self.videos == VideoRender::Untouched
    }
}

/// Build the media changes from storage
///
/// `has_videos_section` reports whether the page already contains the videos
/// list, which decides between clearing it and leaving the page alone.
pub fn plan_media<S: KeyValueStore>(
    storage: &Storage<S>,
    keys: &StorageKeys,
    has_videos_section: bool,
) -> MediaRender {
    let main = storage.get::<StoredMediaMain>(&keys.media_main);
    let main_src = main
        .as_ref()
        .map(|m| m.src.clone())
        .filter(|s| !s.is_empty());
    let main_caption = main
        .and_then(|m| m.caption)
        .filter(|c| !c.is_empty());

    let gallery = stored_list::<MediaGalleryItem, _>(storage, &keys.media_gallery)
        .map(|items| gallery_cards(&items));

    let videos = match stored_list::<VideoItem, _>(storage, &keys.media_videos) {
        Some(videos) => VideoRender::Fill(video_items(&videos)),
        None if has_videos_section => VideoRender::Clear,
        None => VideoRender::Untouched,
    };

    MediaRender {
        main_src,
        main_caption,
        gallery,
        videos,
    }
}

/// Gallery cards, in stored order
pub fn gallery_cards(items: &[MediaGalleryItem]) -> Vec<Node> {
    items
        .iter()
        .map(|item| -> Node {
            Element::new("article")
                .class("media-card")
                .child(
                    Element::new("div").class("media-card-photo-wrap").child(
                        Element::new("img")
                            .attr("src", &item.src)
                            .attr("alt", &item.alt)
                            .class("media-card-photo")
                            .attr("width", "400")
                            .attr("height", "280")
                            .attr("loading", "lazy"),
                    ),
                )
                .child(Element::new("p").class("media-card-desc").text(&item.desc))
                .into()
        })
        .collect()
}

/// Embedded players, in stored order
pub fn video_items(videos: &[VideoItem]) -> Vec<Node> {
    videos
        .iter()
        .map(|video| -> Node {
            let title = if video.title.is_empty() {
                "Video"
            } else {
                video.title.as_str()
            };
            Element::new("div")
                .class("media-video-item")
                .child(
                    Element::new("iframe")
                        .attr("title", title)
                        .attr("src", embed_video_url(&video.url))
                        .flag("allowfullscreen"),
                )
                .child(Element::new("p").class("media-card-desc").text(&video.title))
                .into()
        })
        .collect()
}

/// The videos section inserted after the gallery when the page lacks one
pub fn videos_section() -> Element {
    Element::new("section")
        .class("media-gallery")
        .attr("aria-label", "Videos")
        .child(Element::new("h2").class("media-gallery-heading").text("Videos"))
        .child(Element::new("div").id(VIDEOS_LIST_ID).class("media-videos-list"))
}

/// Playable embed address for a pasted video link
///
/// `youtube.com/watch?...v=ID` and `youtu.be/ID` become
/// `https://www.youtube.com/embed/ID`; anything else is assumed embeddable.
pub fn embed_video_url(url: &str) -> String {
    static WATCH_ID: OnceLock<Regex> = OnceLock::new();

    if url.is_empty() {
        return String::new();
    }

    if url.contains("youtube.com/watch") {
        let re = WATCH_ID.get_or_init(|| Regex::new(r"[?&]v=([^&]+)").expect("valid regex"));
        return match re.captures(url).and_then(|c| c.get(1)) {
            Some(id) => format!("{}{}", YOUTUBE_EMBED, id.as_str()),
            None => url.to_string(),
        };
    }

    if let Some((_, rest)) = url.split_once("youtu.be/") {
        let id = rest.split('?').next().unwrap_or_default();
        if !id.is_empty() {
            return format!("{}{}", YOUTUBE_EMBED, id);
        }
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{fragment_html, select_class};
    use crate::store::MemoryStore;

    fn storage() -> Storage<MemoryStore> {
        Storage::new(MemoryStore::new())
    }

    #[test]
    fn test_embed_watch_url() {
        assert_eq!(
            embed_video_url("https://www.youtube.com/watch?v=abc123"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            embed_video_url("https://www.youtube.com/watch?feature=share&v=abc123&t=10"),
            "https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn test_embed_short_url() {
        assert_eq!(
            embed_video_url("https://youtu.be/abc123?t=5"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            embed_video_url("https://youtu.be/abc123"),
            "https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn test_embed_passthrough() {
        assert_eq!(
            embed_video_url("https://player.vimeo.com/video/42"),
            "https://player.vimeo.com/video/42"
        );
        // Watch page without an id, short link without an id
        assert_eq!(
            embed_video_url("https://www.youtube.com/watch?list=x"),
            "https://www.youtube.com/watch?list=x"
        );
        assert_eq!(embed_video_url("https://youtu.be/"), "https://youtu.be/");
        assert_eq!(embed_video_url(""), "");
    }

    #[test]
    fn test_nothing_stored_is_noop() {
        let plan = plan_media(&storage(), &StorageKeys::default(), false);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_empty_lists_leave_page_alone() {
        let storage = storage();
        let keys = StorageKeys::default();
        storage.set(&keys.media_gallery, &Vec::<MediaGalleryItem>::new());
        let plan = plan_media(&storage, &keys, false);
        assert_eq!(plan.gallery, None);
    }

    #[test]
    fn test_existing_videos_section_cleared() {
        let plan = plan_media(&storage(), &StorageKeys::default(), true);
        assert_eq!(plan.videos, VideoRender::Clear);
    }

    #[test]
    fn test_main_fields_applied_independently() {
        let storage = storage();
        let keys = StorageKeys::default();
        storage.set_raw(&keys.media_main, r#"{"src": "", "caption": "Field day"}"#).unwrap();
        let plan = plan_media(&storage, &keys, false);
        assert_eq!(plan.main_src, None);
        assert_eq!(plan.main_caption.as_deref(), Some("Field day"));
    }

    #[test]
    fn test_gallery_cards_escaped() {
        let cards = gallery_cards(&[MediaGalleryItem {
            src: "a.jpg".into(),
            alt: "".into(),
            desc: "<script>alert(1)</script>".into(),
        }]);
        let html = fragment_html(&cards);
        assert_eq!(
            html,
            "<article class=\"media-card\"><div class=\"media-card-photo-wrap\">\
             <img src=\"a.jpg\" alt=\"\" class=\"media-card-photo\" width=\"400\" height=\"280\" loading=\"lazy\">\
             </div><p class=\"media-card-desc\">&lt;script&gt;alert(1)&lt;/script&gt;</p></article>"
        );
    }

    #[test]
    fn test_video_items() {
        let storage = storage();
        let keys = StorageKeys::default();
        storage.set(
            &keys.media_videos,
            &vec![
                VideoItem { url: "https://youtu.be/xyz".into(), title: "".into() },
                VideoItem { url: "https://example.org/v".into(), title: "Talk".into() },
            ],
        );
        let VideoRender::Fill(nodes) = plan_media(&storage, &keys, false).videos else {
            panic!("expected videos");
        };
        assert_eq!(nodes.len(), 2);
        let html = fragment_html(&nodes);
        assert!(html.contains(r#"<iframe title="Video" src="https://www.youtube.com/embed/xyz" allowfullscreen></iframe>"#));
        assert!(html.contains(r#"<iframe title="Talk" src="https://example.org/v" allowfullscreen></iframe>"#));
        assert_eq!(select_class(&nodes, "media-card-desc").len(), 2);
    }

    #[test]
    fn test_videos_section_shape() {
        let html = Node::from(videos_section()).to_html();
        assert_eq!(
            html,
            "<section class=\"media-gallery\" aria-label=\"Videos\">\
             <h2 class=\"media-gallery-heading\">Videos</h2>\
             <div id=\"lab-media-videos\" class=\"media-videos-list\"></div></section>"
        );
    }
}
