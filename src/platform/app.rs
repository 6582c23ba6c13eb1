//! Page start-up: apply stored content, wire the unlock gesture, and build
//! the edit panels when edit mode is on

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use super::dom::{self, query, query_all_in, query_in};
use super::storage::BrowserStore;
use crate::config::EditorConfig;
use crate::editor::{
    GalleryRowInput, MediaForm, MediaPanel, PublicationPanel, PublicationRowInput, RowId,
    TeamPanel, TeamRowInput, VideoRowInput, edit_banner,
};
use crate::error::UploadError;
use crate::gesture::{ClickOutcome, EditMode, UnlockGesture};
use crate::markup::Node;
use crate::page::{ActiveDomains, site_name};
use crate::render::media::{VIDEOS_LIST_ID, videos_section};
use crate::render::{MediaRender, VideoRender, plan_media, plan_publications, plan_team};
use crate::store::Storage;

const CONFIG_ELEMENT_ID: &str = "lab-edit-config";
const EDIT_STYLESHEET: &str = "css/edit-mode.css";

/// Shared page context
struct Ctx {
    doc: Document,
    config: EditorConfig,
    local: Storage<BrowserStore>,
}

impl Ctx {
    fn edit_mode(&self) -> EditMode<BrowserStore> {
        EditMode::new(Storage::new(BrowserStore::session()), self.config.keys.edit_mode.clone())
    }
}

/// Entry point, run once per page load
pub fn start() {
    let Some(doc) = dom::document() else {
        log::warn!("No document - nothing to do");
        return;
    };

    let config = doc
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .map(|json| EditorConfig::from_json(&json))
        .unwrap_or_default();

    let ctx = Rc::new(Ctx {
        doc,
        config,
        local: Storage::new(BrowserStore::local()),
    });

    setup_brand(&ctx);

    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    let domains = ActiveDomains::from_path(&path);

    // Stored edits are shown to every visitor
    if domains.media {
        apply_media(&ctx.doc, &plan_media(&ctx.local, &ctx.config.keys, has_videos_section(&ctx.doc)));
    }
    if domains.team {
        apply_team(&ctx.doc, plan_team(&ctx.local, &ctx.config.keys));
    }
    if domains.publications {
        apply_publications(&ctx.doc, plan_publications(&ctx.local, &ctx.config.keys));
    }

    if !ctx.edit_mode().is_enabled() {
        return;
    }

    log::info!("Edit mode on");
    install_edit_chrome(&ctx);

    if domains.media {
        open_media_panel(&ctx);
    }
    if domains.team {
        open_team_panel(&ctx);
    }
    if domains.publications {
        open_publication_panel(&ctx);
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn has_videos_section(doc: &Document) -> bool {
    doc.get_element_by_id(VIDEOS_LIST_ID).is_some()
}

fn apply_media(doc: &Document, plan: &MediaRender) {
    if let Some(src) = &plan.main_src {
        if let Some(img) = query(doc, ".media-main-photo") {
            let _ = img.set_attribute("src", src);
        }
    }
    if let Some(caption) = &plan.main_caption {
        if let Some(el) = query(doc, ".media-main-caption") {
            dom::set_text(&el, caption);
        }
    }
    if let Some(cards) = &plan.gallery {
        if let Some(grid) = query(doc, ".media-grid") {
            dom::commit(&grid, cards);
        }
    }

    match &plan.videos {
        VideoRender::Untouched => {}
        VideoRender::Clear => {
            if let Some(list) = doc.get_element_by_id(VIDEOS_LIST_ID) {
                list.set_inner_html("");
            }
        }
        VideoRender::Fill(items) => {
            if doc.get_element_by_id(VIDEOS_LIST_ID).is_none() {
                let gallery = query(doc, ".media-gallery");
                let section = dom::build(doc, &Node::from(videos_section()));
                if let (Some(gallery), Some(section)) = (gallery, section) {
                    let _ = gallery.after_with_node_1(&section);
                }
            }
            if let Some(list) = doc.get_element_by_id(VIDEOS_LIST_ID) {
                dom::commit(&list, items);
            }
        }
    }
    log::debug!("Media content applied");
}

fn apply_team(doc: &Document, cards: Option<Vec<Node>>) {
    if let (Some(cards), Some(grid)) = (cards, query(doc, ".team-grid")) {
        dom::commit(&grid, &cards);
        log::debug!("Team content applied");
    }
}

fn apply_publications(doc: &Document, sections: Option<Vec<Node>>) {
    if let (Some(sections), Some(timeline)) = (sections, query(doc, ".pub-timeline")) {
        dom::commit(&timeline, &sections);
        log::debug!("Publications applied");
    }
}

// ============================================================================
// Brand: site name and unlock gesture
// ============================================================================

fn setup_brand(ctx: &Rc<Ctx>) {
    let Some(brand) = query(&ctx.doc, ".brand") else {
        return;
    };

    if let Some(name) = site_name(&ctx.local, &ctx.config.keys) {
        dom::set_text(&brand, &name);
    }

    if let Some(el) = brand.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property("cursor", "pointer");
    }

    let gesture = Rc::new(RefCell::new(UnlockGesture::from_config(&ctx.config)));
    let _ = brand.set_attribute("title", &gesture.borrow().hint());
    let timer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let ctx = ctx.clone();
    let brand_el = brand.clone();
    dom::on_click(&brand, move |event| {
        event.prevent_default();
        event.stop_propagation();

        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(handle) = timer.take() {
            window.clear_timeout_with_handle(handle);
        }

        let outcome = gesture.borrow_mut().click(js_sys::Date::now());
        match outcome {
            ClickOutcome::Unlocked => match ctx.edit_mode().enable() {
                Ok(()) => dom::reload(),
                Err(e) => log::warn!("Could not enter edit mode: {}", e),
            },
            ClickOutcome::Counting { .. } => {
                let _ = brand_el.set_attribute("title", &gesture.borrow().hint());

                let gesture = gesture.clone();
                let brand_el = brand_el.clone();
                let expire = Closure::once_into_js(move || {
                    gesture.borrow_mut().expire();
                    let _ = brand_el.set_attribute("title", &gesture.borrow().hint());
                });
                let window_ms = gesture_window(&ctx.config);
                match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    expire.unchecked_ref(),
                    window_ms,
                ) {
                    Ok(handle) => timer.set(Some(handle)),
                    Err(e) => log::warn!("Could not schedule gesture reset: {:?}", e),
                }
            }
        }
    });
}

fn gesture_window(config: &EditorConfig) -> i32 {
    config.unlock_window_ms.round().clamp(0.0, i32::MAX as f64) as i32
}

// ============================================================================
// Edit mode chrome
// ============================================================================

fn install_edit_chrome(ctx: &Rc<Ctx>) {
    let doc = &ctx.doc;

    if let (Some(head), Ok(link)) = (doc.head(), doc.create_element("link")) {
        let _ = link.set_attribute("rel", "stylesheet");
        let _ = link.set_attribute("href", EDIT_STYLESHEET);
        let _ = head.append_child(&link);
    }

    let (Some(body), Some(banner)) = (doc.body(), dom::build(doc, &edit_banner())) else {
        return;
    };
    let _ = body.insert_before(&banner, body.first_child().as_ref());

    if let Some(exit) = query_in(&banner, ".lab-edit-exit") {
        let ctx = ctx.clone();
        dom::on_click(&exit, move |_| {
            ctx.edit_mode().disable();
            dom::reload();
        });
    }
}

/// Validate and read a picked image, then hand its bytes to `install`.
///
/// The status label is looked up under `scope` when the read lands, so it
/// is found even if the rows were re-rendered meanwhile. Reads complete in
/// any order; the last one to land wins.
fn handle_image_pick<C, I>(
    input: &Element,
    scope: &Element,
    status_selector: String,
    check: C,
    reject_text: fn(&UploadError) -> String,
    install: I,
) where
    C: FnOnce(&str, u64) -> Result<(), UploadError>,
    I: FnOnce(&str, &[u8]) -> Result<Option<&'static str>, UploadError> + 'static,
{
    let Some(file) = input
        .dyn_ref::<HtmlInputElement>()
        .and_then(|i| i.files())
        .and_then(|files| files.get(0))
    else {
        return;
    };

    let mime = file.type_();
    if let Err(e) = check(&mime, file.size() as u64) {
        log::info!("Rejected upload {}: {:?}", file.name(), e);
        if let Some(status) = query_in(scope, &status_selector) {
            dom::set_text(&status, &reject_text(&e));
        }
        return;
    }

    let scope = scope.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let buffer = match JsFuture::from(file.array_buffer()).await {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("Could not read {}: {:?}", file.name(), e);
                return;
            }
        };
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        let text = match install(&mime, &bytes) {
            Ok(Some(text)) => text.to_string(),
            Ok(None) => return,
            Err(e) => reject_text(&e),
        };
        if let Some(status) = query_in(&scope, &status_selector) {
            dom::set_text(&status, &text);
        }
    });
}

fn full_status(e: &UploadError) -> String {
    e.to_string()
}

fn row_status(e: &UploadError) -> String {
    e.row_status().to_string()
}

/// `.class[attr="id"]`
fn row_selector(class: &str, attr: &str, id: RowId) -> String {
    format!(r#"{}[{}="{}"]"#, class, attr, id)
}

// ============================================================================
// Media panel
// ============================================================================

type Shared<T> = Rc<RefCell<T>>;

fn open_media_panel(ctx: &Rc<Ctx>) {
    let doc = &ctx.doc;
    let Some(main_container) = query(doc, ".media-main-container") else {
        return;
    };

    let page_main = dom::scrape_media_main(doc);
    let panel = MediaPanel::open(&ctx.local, &ctx.config, &page_main, || dom::scrape_gallery(doc));
    let Some(root) = dom::build(doc, &panel.panel()) else {
        return;
    };
    let panel: Shared<MediaPanel> = Rc::new(RefCell::new(panel));

    // Main photo
    if let (Some(button), Some(input)) = (
        query_in(&root, "#lab-main-upload-btn"),
        query_in(&root, "#lab-main-file"),
    ) {
        let picker = input.clone();
        dom::on_click(&button, move |_| dom::open_picker(&picker));

        let (panel, root_el, input_el) = (panel.clone(), root.clone(), input.clone());
        dom::on_change(&input, move |_| {
            let check_panel = panel.clone();
            let install_panel = panel.clone();
            handle_image_pick(
                &input_el,
                &root_el,
                "#lab-main-file-status".to_string(),
                move |mime, size| check_panel.borrow().check_upload(mime, size),
                full_status,
                move |mime, bytes| install_panel.borrow_mut().upload_main_image(mime, bytes).map(Some),
            );
        });
    }

    if let Some(rows) = query_in(&root, "#lab-gallery-fields") {
        delegate_gallery_rows(&panel, &root, &rows);
        if let Some(add) = query_in(&root, r#"[data-add="gallery"]"#) {
            let (panel, root_el) = (panel.clone(), root.clone());
            dom::on_click(&add, move |_| {
                {
                    let mut p = panel.borrow_mut();
                    p.sync_form(&read_media_form(&root_el));
                    p.add_gallery();
                }
                dom::commit(&rows, &panel.borrow().gallery_rows());
            });
        }
    }
    if let Some(rows) = query_in(&root, "#lab-video-fields") {
        delegate_video_rows(&panel, &root, &rows);
        if let Some(add) = query_in(&root, r#"[data-add="video"]"#) {
            let (panel, root_el) = (panel.clone(), root.clone());
            dom::on_click(&add, move |_| {
                {
                    let mut p = panel.borrow_mut();
                    p.sync_form(&read_media_form(&root_el));
                    p.add_video();
                }
                dom::commit(&rows, &panel.borrow().video_rows());
            });
        }
    }
    if let Some(save) = query_in(&root, r#"[data-save="media"]"#) {
        let (ctx, panel, root_el) = (ctx.clone(), panel.clone(), root.clone());
        dom::on_click(&save, move |_| {
            let form = read_media_form(&root_el);
            let has_section = has_videos_section(&ctx.doc);
            let saved = panel
                .borrow_mut()
                .save(&ctx.local, &ctx.config, &form, has_section);
            apply_media(&ctx.doc, &saved.render);
            dom::alert(&saved.acknowledgment("Media"));
        });
    }

    let _ = main_container.append_child(&root);
}

fn read_media_form(root: &Element) -> MediaForm {
    let gallery = query_all_in(root, "#lab-gallery-fields .lab-edit-row")
        .iter()
        .filter_map(|row| {
            Some(GalleryRowInput {
                id: dom::numeric_attr(row, "data-row-id")?,
                desc: dom::input_value(row, "input[data-gallery-desc]"),
            })
        })
        .collect();
    let videos = query_all_in(root, "#lab-video-fields .lab-edit-row")
        .iter()
        .map(|row| VideoRowInput {
            url: dom::input_value(row, "[data-video-url]"),
            title: dom::input_value(row, "[data-video-title]"),
        })
        .collect();
    MediaForm {
        main_caption: dom::input_value(root, "#lab-main-caption"),
        gallery,
        videos,
    }
}

/// One click and one change listener on the gallery row container, serving
/// every row it will ever hold
fn delegate_gallery_rows(panel: &Shared<MediaPanel>, root: &Element, rows: &Element) {
    let (panel_el, root_el, rows_el) = (panel.clone(), root.clone(), rows.clone());
    dom::on_click(rows, move |event| {
        if let Some(button) = dom::closest_target(&event, ".lab-gallery-upload") {
            let input = dom::numeric_attr(&button, "data-gallery-row").and_then(|id| {
                query_in(&rows_el, &row_selector(".lab-gallery-file", "data-gallery-row", id))
            });
            if let Some(input) = input {
                dom::open_picker(&input);
            }
            return;
        }
        let Some(button) = dom::closest_target(&event, r#"[data-remove="gallery"]"#) else {
            return;
        };
        let Some(id) = dom::numeric_attr::<RowId>(&button, "data-row-id") else {
            return;
        };
        {
            let mut p = panel_el.borrow_mut();
            p.sync_form(&read_media_form(&root_el));
            p.remove_gallery(id);
        }
        dom::commit(&rows_el, &panel_el.borrow().gallery_rows());
    });

    let (panel, rows_el) = (panel.clone(), rows.clone());
    dom::on_change(rows, move |event| {
        let Some(input) = dom::closest_target(&event, ".lab-gallery-file") else {
            return;
        };
        let Some(id) = dom::numeric_attr::<RowId>(&input, "data-gallery-row") else {
            return;
        };
        let check_panel = panel.clone();
        let install_panel = panel.clone();
        handle_image_pick(
            &input,
            &rows_el,
            row_selector(".lab-gallery-status", "data-gallery-row", id),
            move |mime, size| check_panel.borrow().check_upload(mime, size),
            row_status,
            move |mime, bytes| install_panel.borrow_mut().upload_gallery_image(id, mime, bytes),
        );
    });
}

fn delegate_video_rows(panel: &Shared<MediaPanel>, root: &Element, rows: &Element) {
    let (panel, root_el, rows_el) = (panel.clone(), root.clone(), rows.clone());
    dom::on_click(rows, move |event| {
        let Some(button) = dom::closest_target(&event, "[data-remove-video]") else {
            return;
        };
        let Some(index) = dom::numeric_attr::<usize>(&button, "data-index") else {
            return;
        };
        {
            let mut p = panel.borrow_mut();
            p.sync_form(&read_media_form(&root_el));
            p.remove_video(index);
        }
        dom::commit(&rows_el, &panel.borrow().video_rows());
    });
}

// ============================================================================
// Team panel
// ============================================================================

fn open_team_panel(ctx: &Rc<Ctx>) {
    let doc = &ctx.doc;
    let Some(grid) = query(doc, ".team-grid") else {
        return;
    };

    let panel = TeamPanel::open(&ctx.local, &ctx.config, || dom::scrape_team(&grid));
    let Some(root) = dom::build(doc, &panel.panel()) else {
        return;
    };
    let panel: Shared<TeamPanel> = Rc::new(RefCell::new(panel));

    if let Some(rows) = query_in(&root, "#lab-team-fields") {
        delegate_team_rows(&panel, &root, &rows);
        if let Some(add) = query_in(&root, r#"[data-add="member"]"#) {
            let (panel, root_el) = (panel.clone(), root.clone());
            dom::on_click(&add, move |_| {
                {
                    let mut p = panel.borrow_mut();
                    p.sync_form(&read_team_rows(&root_el));
                    p.add_member();
                }
                dom::commit(&rows, &panel.borrow().rows());
            });
        }
    }
    if let Some(save) = query_in(&root, r#"[data-save="team"]"#) {
        let (ctx, panel, root_el) = (ctx.clone(), panel.clone(), root.clone());
        dom::on_click(&save, move |_| {
            let rows = read_team_rows(&root_el);
            let saved = panel.borrow_mut().save(&ctx.local, &ctx.config, &rows);
            let message = saved.acknowledgment("Team");
            apply_team(&ctx.doc, saved.render);
            dom::alert(&message);
        });
    }

    if let Some(parent) = grid.parent_node() {
        let _ = parent.append_child(&root);
    }
}

fn read_team_rows(root: &Element) -> Vec<TeamRowInput> {
    query_all_in(root, "#lab-team-fields .lab-edit-row-team")
        .iter()
        .filter_map(|row| {
            Some(TeamRowInput {
                id: dom::numeric_attr(row, "data-row-id")?,
                name: dom::input_value(row, "[data-member-name]"),
                degree: dom::input_value(row, "[data-member-degree]"),
                role: dom::input_value(row, "[data-member-role]"),
                featured: dom::input_checked(row, "[data-member-featured]"),
            })
        })
        .collect()
}

fn delegate_team_rows(panel: &Shared<TeamPanel>, root: &Element, rows: &Element) {
    let (panel_el, root_el, rows_el) = (panel.clone(), root.clone(), rows.clone());
    dom::on_click(rows, move |event| {
        if let Some(button) = dom::closest_target(&event, ".lab-team-upload") {
            let input = dom::numeric_attr(&button, "data-member-row").and_then(|id| {
                query_in(&rows_el, &row_selector(".lab-team-file", "data-member-row", id))
            });
            if let Some(input) = input {
                dom::open_picker(&input);
            }
            return;
        }
        let Some(button) = dom::closest_target(&event, "[data-remove-member]") else {
            return;
        };
        let Some(id) = dom::numeric_attr::<RowId>(&button, "data-row-id") else {
            return;
        };
        {
            let mut p = panel_el.borrow_mut();
            p.sync_form(&read_team_rows(&root_el));
            p.remove_member(id);
        }
        dom::commit(&rows_el, &panel_el.borrow().rows());
    });

    let (panel, rows_el) = (panel.clone(), rows.clone());
    dom::on_change(rows, move |event| {
        let Some(input) = dom::closest_target(&event, ".lab-team-file") else {
            return;
        };
        let Some(id) = dom::numeric_attr::<RowId>(&input, "data-member-row") else {
            return;
        };
        let check_panel = panel.clone();
        let install_panel = panel.clone();
        handle_image_pick(
            &input,
            &rows_el,
            row_selector(".lab-team-status", "data-member-row", id),
            move |mime, size| check_panel.borrow().check_upload(mime, size),
            row_status,
            move |mime, bytes| install_panel.borrow_mut().upload_photo(id, mime, bytes),
        );
    });
}

// ============================================================================
// Publications panel
// ============================================================================

fn open_publication_panel(ctx: &Rc<Ctx>) {
    let doc = &ctx.doc;
    let Some(timeline) = query(doc, ".pub-timeline") else {
        return;
    };

    let panel = PublicationPanel::open(&ctx.local, &ctx.config, || {
        dom::scrape_publications(&timeline)
    });
    let Some(root) = dom::build(doc, &panel.panel()) else {
        return;
    };
    let panel: Shared<PublicationPanel> = Rc::new(RefCell::new(panel));

    if let Some(rows) = query_in(&root, "#lab-pub-fields") {
        let (panel_el, root_el, rows_el) = (panel.clone(), root.clone(), rows.clone());
        dom::on_click(&rows, move |event| {
            let Some(button) = dom::closest_target(&event, "[data-remove-pub]") else {
                return;
            };
            let Some(index) = dom::numeric_attr::<usize>(&button, "data-index") else {
                return;
            };
            {
                let mut p = panel_el.borrow_mut();
                p.sync_form(&read_publication_rows(&root_el));
                p.remove_publication(index);
            }
            dom::commit(&rows_el, &panel_el.borrow().rows());
        });

        if let Some(add) = query_in(&root, r#"[data-add="pub"]"#) {
            let (panel, root_el) = (panel.clone(), root.clone());
            dom::on_click(&add, move |_| {
                {
                    let mut p = panel.borrow_mut();
                    p.sync_form(&read_publication_rows(&root_el));
                    p.add_publication();
                }
                dom::commit(&rows, &panel.borrow().rows());
            });
        }
    }
    if let Some(save) = query_in(&root, r#"[data-save="pub"]"#) {
        let (ctx, panel, root_el) = (ctx.clone(), panel.clone(), root.clone());
        dom::on_click(&save, move |_| {
            let rows = read_publication_rows(&root_el);
            let saved = panel.borrow_mut().save(&ctx.local, &ctx.config, &rows);
            let message = saved.acknowledgment("Publications");
            apply_publications(&ctx.doc, saved.render);
            dom::alert(&message);
        });
    }

    if let Some(parent) = timeline.parent_node() {
        let _ = parent.append_child(&root);
    }
}

fn read_publication_rows(root: &Element) -> Vec<PublicationRowInput> {
    query_all_in(root, "#lab-pub-fields .lab-edit-row-pub")
        .iter()
        .map(|row| PublicationRowInput {
            year: dom::input_value(row, "[data-pub-year]"),
            title: dom::input_value(row, "[data-pub-title]"),
        })
        .collect()
}
