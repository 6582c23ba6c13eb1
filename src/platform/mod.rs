//! Platform abstraction layer
//!
//! Everything that touches the browser lives here, behind
//! `cfg(target_arch = "wasm32")`:
//! - Storage (localStorage / sessionStorage as `KeyValueStore`)
//! - Committing markup trees into DOM anchors
//! - Scraping the page's static cards for the first edit
//! - Click/change wiring, timers, async file reads and reloads

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
pub use app::start;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStore;
