//! DOM helpers: lookups, commits, form reads and page scraping
//!
//! Missing anchors are never an error; lookups return `None` / empty and the
//! caller skips that feature.

use std::str::FromStr;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlImageElement, HtmlInputElement, MouseEvent};

use crate::markup::{Node, fragment_html};
use crate::snapshot::{StaticGalleryCard, StaticMediaMain, StaticPublicationItem, StaticTeamCard};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn query(doc: &Document, selector: &str) -> Option<Element> {
    doc.query_selector(selector).ok().flatten()
}

pub fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = doc.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Replace a container's contents with a fragment
pub fn commit(container: &Element, nodes: &[Node]) {
    container.set_inner_html(&fragment_html(nodes));
}

/// Materialize a single markup node as a detached element
pub fn build(doc: &Document, node: &Node) -> Option<Element> {
    let holder = doc.create_element("div").ok()?;
    holder.set_inner_html(&node.to_html());
    holder.first_element_child()
}

pub fn text_of(root: &Element, selector: &str) -> Option<String> {
    query_in(root, selector).and_then(|el| el.text_content())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

/// Value of an `<input>` matched under `root` (empty when absent)
pub fn input_value(root: &Element, selector: &str) -> String {
    query_in(root, selector)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

pub fn input_checked(root: &Element, selector: &str) -> bool {
    query_in(root, selector)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.checked())
        .unwrap_or(false)
}

/// Numeric attribute such as `data-index` or `data-row-id`
pub fn numeric_attr<T: FromStr>(el: &Element, name: &str) -> Option<T> {
    el.get_attribute(name)?.parse().ok()
}

/// Nearest element matching `selector` from the event target upward
pub fn closest_target(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

fn image(root: &Element, selector: &str) -> Option<HtmlImageElement> {
    query_in(root, selector).and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
}

/// Run `handler` on every click of `el`
pub fn on_click<F>(el: &Element, mut handler: F)
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| handler(event));
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Run `handler` on every `change` inside `el`
pub fn on_change<F>(el: &Element, mut handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| handler(event));
    let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Open the file picker behind an upload button
pub fn open_picker(input: &Element) {
    if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
        input.click();
    }
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn reload() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

// ============================================================================
// Static content scraping
// ============================================================================

pub fn scrape_media_main(doc: &Document) -> StaticMediaMain {
    StaticMediaMain {
        src: query(doc, ".media-main-photo")
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
            .map(|img| img.src()),
        caption: query(doc, ".media-main-caption").and_then(|el| el.text_content()),
    }
}

pub fn scrape_gallery(doc: &Document) -> Vec<StaticGalleryCard> {
    query_all(doc, ".media-card")
        .iter()
        .map(|card| {
            let img = image(card, ".media-card-photo");
            StaticGalleryCard {
                src: img.as_ref().map(|i| i.src()),
                alt: img.as_ref().map(|i| i.alt()),
                desc: text_of(card, ".media-card-desc"),
            }
        })
        .collect()
}

pub fn scrape_team(grid: &Element) -> Vec<StaticTeamCard> {
    query_all_in(grid, ".team-card")
        .iter()
        .map(|card| StaticTeamCard {
            photo: image(card, ".team-card-photo").map(|i| i.src()),
            name: text_of(card, ".team-card-name"),
            degree: text_of(card, ".team-card-degree"),
            role: text_of(card, ".team-card-role"),
            featured: card.class_list().contains("team-card-featured"),
        })
        .collect()
}

pub fn scrape_publications(timeline: &Element) -> Vec<StaticPublicationItem> {
    query_all_in(timeline, ".pub-item")
        .iter()
        .map(|item| StaticPublicationItem {
            badge: text_of(item, ".pub-badge"),
            title: text_of(item, ".pub-title"),
        })
        .collect()
}
