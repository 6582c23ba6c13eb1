//! lab-edit entry point
//!
//! In the browser this applies stored content and wires edit mode. Natively
//! it renders a storage dump to stdout, which is handy for checking what a
//! visitor would see.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }

    log::info!("lab-edit starting...");
    lab_edit::platform::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: lab-edit <storage-dump.json>");
        eprintln!("  renders the stored media, team and publications as HTML");
        std::process::exit(2);
    };

    if let Err(e) = preview::run(&path) {
        eprintln!("lab-edit: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use lab_edit::markup::fragment_html;
    use lab_edit::page::site_name;
    use lab_edit::render::{VideoRender, plan_media, plan_publications, plan_team};
    use lab_edit::{EditorConfig, MemoryStore, Storage};

    /// Render every domain stored in the dump at `path`
    pub fn run(path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let storage = Storage::new(MemoryStore::from_json_dump(&json)?);
        let config = EditorConfig::default();
        let keys = &config.keys;
        log::info!("Loaded {} stored keys from {}", storage.backend().len(), path);

        if let Some(name) = site_name(&storage, keys) {
            println!("<!-- site name: {} -->", name);
        }

        let media = plan_media(&storage, keys, true);
        if media.is_noop() {
            println!("<!-- media: nothing stored -->");
        } else {
            if let Some(src) = &media.main_src {
                println!("<!-- media main photo: {} bytes of src -->", src.len());
            }
            if let Some(caption) = &media.main_caption {
                println!("<!-- media main caption: {} -->", caption);
            }
            if let Some(cards) = &media.gallery {
                println!("<!-- media gallery -->\n{}", fragment_html(cards));
            }
            match &media.videos {
                VideoRender::Untouched => {}
                VideoRender::Clear => println!("<!-- media videos: cleared -->"),
                VideoRender::Fill(items) => {
                    println!("<!-- media videos -->\n{}", fragment_html(items))
                }
            }
        }

        match plan_team(&storage, keys) {
            Some(cards) => println!("<!-- team -->\n{}", fragment_html(&cards)),
            None => println!("<!-- team: nothing stored -->"),
        }

        match plan_publications(&storage, keys) {
            Some(sections) => println!("<!-- publications -->\n{}", fragment_html(&sections)),
            None => println!("<!-- publications: nothing stored -->"),
        }

        Ok(())
    }
}
