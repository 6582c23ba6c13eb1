//! Media edit panel: main photo, gallery and videos

use super::{
    IMAGE_SET, PHOTO_SET, RowId, Rows, Saved, add_button, add_row, remove_button, remove_row,
    save_button, seed_list, text_input, upload_controls,
};
use crate::config::EditorConfig;
use crate::content::{MediaGalleryItem, MediaMain, StoredMediaMain, VideoItem};
use crate::editor::upload::{check_image, ingest_image};
use crate::error::{StoreError, UploadError};
use crate::is_embedded_image;
use crate::markup::{Element, Node};
use crate::render::{MediaRender, plan_media};
use crate::snapshot::{self, StaticGalleryCard, StaticMediaMain};
use crate::store::{KeyValueStore, Storage};

pub const GALLERY_FIELDS_ID: &str = "lab-gallery-fields";
pub const VIDEO_FIELDS_ID: &str = "lab-video-fields";
pub const MAIN_CAPTION_ID: &str = "lab-main-caption";

/// One gallery row as read back from the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryRowInput {
    /// The row's `data-row-id`
    pub id: RowId,
    pub desc: String,
}

/// One video row as read back from the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoRowInput {
    pub url: String,
    pub title: String,
}

/// Current values of the media form, rows in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaForm {
    pub main_caption: String,
    pub gallery: Vec<GalleryRowInput>,
    pub videos: Vec<VideoRowInput>,
}

/// Records being edited on the media page
#[derive(Debug, Clone)]
pub struct MediaPanel {
    pub main: MediaMain,
    pub gallery: Rows<MediaGalleryItem>,
    pub videos: Vec<VideoItem>,
    max_image_bytes: u64,
}

impl MediaPanel {
    /// Seed from storage, importing the page's gallery when nothing is stored
    pub fn open<S, F>(
        storage: &Storage<S>,
        config: &EditorConfig,
        page_main: &StaticMediaMain,
        scrape_gallery: F,
    ) -> Self
    where
        S: KeyValueStore,
        F: FnOnce() -> Vec<StaticGalleryCard>,
    {
        let keys = &config.keys;
        let gallery = seed_list(storage, &keys.media_gallery, || {
            snapshot::import_gallery(&scrape_gallery())
        });
        let main = snapshot::merge_media_main(
            storage.get::<StoredMediaMain>(&keys.media_main),
            page_main,
        );
        let videos = storage
            .get::<Vec<VideoItem>>(&keys.media_videos)
            .unwrap_or_default();

        Self {
            main,
            gallery: Rows::new(gallery),
            videos,
            max_image_bytes: config.max_image_bytes,
        }
    }

    pub fn add_gallery(&mut self) -> RowId {
        self.gallery.push(MediaGalleryItem::default())
    }

    pub fn remove_gallery(&mut self, id: RowId) {
        self.gallery.remove(id);
    }

    pub fn add_video(&mut self) {
        add_row(&mut self.videos);
    }

    pub fn remove_video(&mut self, index: usize) {
        remove_row(&mut self.videos, index);
    }

    /// Early check on a picked file's reported type and size, before reading it
    pub fn check_upload(&self, mime: &str, size: u64) -> Result<(), UploadError> {
        check_image(mime, size, self.max_image_bytes)
    }

    /// Install the bytes of a read file as the main photo; returns the
    /// status label text. Rejected files leave the photo as it was.
    pub fn upload_main_image(&mut self, mime: &str, bytes: &[u8]) -> Result<&'static str, UploadError> {
        self.main.src = ingest_image(mime, bytes, self.max_image_bytes)?;
        Ok(PHOTO_SET)
    }

    /// Install the bytes of a read file into gallery row `id`
    ///
    /// `Ok(None)` when the row was removed while the file was being read.
    pub fn upload_gallery_image(
        &mut self,
        id: RowId,
        mime: &str,
        bytes: &[u8],
    ) -> Result<Option<&'static str>, UploadError> {
        let data_url = ingest_image(mime, bytes, self.max_image_bytes)?;
        let Some(item) = self.gallery.get_mut(id) else {
            log::warn!("Gallery row {} removed before its image finished loading", id);
            return Ok(None);
        };
        item.src = data_url;
        Ok(Some(IMAGE_SET))
    }

    /// Copy typed values into the records so a re-render keeps them
    pub fn sync_form(&mut self, form: &MediaForm) {
        self.main.caption = form.main_caption.clone();
        for row in &form.gallery {
            if let Some(item) = self.gallery.get_mut(row.id) {
                item.desc = row.desc.clone();
            }
        }
        for (video, row) in self.videos.iter_mut().zip(&form.videos) {
            video.url = row.url.clone();
            video.title = row.title.clone();
        }
    }

    /// Records to persist for the current form
    ///
    /// Image data comes from the panel (file inputs never hold it), text from
    /// the form. Videos without a URL are dropped.
    pub fn collect(&self, form: &MediaForm) -> (MediaMain, Vec<MediaGalleryItem>, Vec<VideoItem>) {
        let main = MediaMain {
            src: self.main.src.clone(),
            caption: form.main_caption.trim().to_string(),
        };
        let gallery = form
            .gallery
            .iter()
            .map(|row| MediaGalleryItem {
                src: self
                    .gallery
                    .get(row.id)
                    .map(|item| item.src.clone())
                    .unwrap_or_default(),
                alt: String::new(),
                desc: row.desc.trim().to_string(),
            })
            .collect();
        let videos = form
            .videos
            .iter()
            .map(|row| VideoItem {
                url: row.url.trim().to_string(),
                title: row.title.trim().to_string(),
            })
            .filter(|video| !video.url.is_empty())
            .collect();
        (main, gallery, videos)
    }

    /// Persist the form and re-render the media page
    pub fn save<S: KeyValueStore>(
        &mut self,
        storage: &Storage<S>,
        config: &EditorConfig,
        form: &MediaForm,
        has_videos_section: bool,
    ) -> Saved<MediaRender> {
        let keys = &config.keys;
        let (main, gallery, videos) = self.collect(form);
        let result = (|| -> Result<(), StoreError> {
            storage.try_set(&keys.media_main, &main)?;
            storage.try_set(&keys.media_gallery, &gallery)?;
            storage.try_set(&keys.media_videos, &videos)?;
            Ok(())
        })();
        match &result {
            Ok(()) => log::info!(
                "Media saved ({} images, {} videos)",
                gallery.len(),
                videos.len()
            ),
            Err(e) => log::warn!("Media save failed: {}", e),
        }
        self.sync_form(form);

        Saved {
            result,
            render: plan_media(storage, keys, has_videos_section),
        }
    }

    /// The whole panel, rows included
    pub fn panel(&self) -> Node {
        let main_status = if is_embedded_image(&self.main.src) { PHOTO_SET } else { "" };
        Element::new("div")
            .class("lab-edit-panel")
            .child(Element::new("h3").text("Edit Media"))
            .child(
                Element::new("div")
                    .class("lab-edit-field")
                    .child(Element::new("label").text("Main photo"))
                    .child(
                        Element::new("input")
                            .attr("type", "file")
                            .id("lab-main-file")
                            .attr("accept", "image/*")
                            .attr("style", "display:none"),
                    )
                    .child(
                        Element::new("button")
                            .attr("type", "button")
                            .class("lab-edit-upload-btn")
                            .id("lab-main-upload-btn")
                            .text("Upload photo from PC"),
                    )
                    .child(
                        Element::new("span")
                            .id("lab-main-file-status")
                            .class("lab-file-status")
                            .text(main_status),
                    ),
            )
            .child(
                Element::new("div")
                    .class("lab-edit-field")
                    .child(Element::new("label").text("Main caption"))
                    .child(
                        Element::new("input")
                            .attr("type", "text")
                            .id(MAIN_CAPTION_ID)
                            .attr("value", &self.main.caption)
                            .attr("placeholder", "Caption"),
                    ),
            )
            .child(Element::new("h4").text("Gallery images"))
            .child(
                Element::new("div")
                    .id(GALLERY_FIELDS_ID)
                    .children(self.gallery_rows()),
            )
            .child(add_button("gallery", "+ Add image"))
            .child(Element::new("h4").text("Videos (paste YouTube link)"))
            .child(Element::new("div").id(VIDEO_FIELDS_ID).children(self.video_rows()))
            .child(add_button("video", "+ Add video"))
            .child(save_button("media"))
            .into()
    }

    pub fn gallery_rows(&self) -> Vec<Node> {
        self.gallery
            .iter()
            .map(|(id, item)| -> Node {
                let status = if is_embedded_image(&item.src) { IMAGE_SET } else { "" };
                Element::new("div")
                    .class("lab-edit-row")
                    .attr("data-row-id", id.to_string())
                    .children(upload_controls(
                        "lab-gallery-file",
                        "lab-gallery-upload",
                        "lab-gallery-status",
                        "data-gallery-row",
                        id,
                        "Upload image",
                        status,
                    ))
                    .child(text_input("text", "Description", &item.desc, "data-gallery-desc"))
                    .child(remove_button("data-remove", "gallery", "data-row-id", id))
                    .into()
            })
            .collect()
    }

    pub fn video_rows(&self) -> Vec<Node> {
        self.videos
            .iter()
            .enumerate()
            .map(|(i, video)| -> Node {
                Element::new("div")
                    .class("lab-edit-row")
                    .child(text_input("url", "Video URL (YouTube)", &video.url, "data-video-url"))
                    .child(text_input("text", "Title", &video.title, "data-video-title"))
                    .child(remove_button("data-remove-video", "", "data-index", i))
                    .into()
            })
            .collect()
    }
}
