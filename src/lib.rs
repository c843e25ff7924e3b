//! GapCore: Gap Scanner + Feedback Settings Store
//!
//! A Rust/WASM implementation of the gap-annotation pipeline for rich-text
//! editors: delimiter-marked "gap" tokens (e.g. `[answer]`) are extracted
//! from editable HTML content, given stable collision-aware identities, and
//! reconciled against a persisted per-gap feedback collection.
//!
//! # Architecture
//!
//! - `content` - ContentNode: tolerant HTML fragment tree (parse + render)
//! - `scanner` - GapScanner: delimiter splitting, tree walk, identity assignment
//! - `settings` - GapSettingsStore: text-keyed feedback records, JSON round-trip
//! - `annotator` - GapAnnotator: **unified WASM facade** - one boundary call per UI event
//! - `error` - GapError: configuration / parse error kinds
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { GapAnnotator } from 'gapcore';
//!
//! await init();
//!
//! // Delimiters come from editor config, settings blob from the saved form field
//! const annotator = new GapAnnotator('[', ']', savedSettingsJson);
//!
//! // Scan current editor content
//! const result = annotator.scan(editor.getContent());
//! console.log(result.occurrences); // [{ raw, text, index, instance, itemId }, ...]
//!
//! // Rewrite content with marker spans for the overlay
//! editor.setContent(annotator.annotate(editor.getContent()));
//!
//! // Dialog accepted: attach feedback, then persist
//! annotator.upsertFeedback('answer', 'id1_0', questionId, correctHtml, incorrectHtml);
//! settingsField.value = annotator.serializeSettings();
//! ```

pub mod annotator;
pub mod content;
pub mod error;
pub mod scanner;
pub mod settings;

pub use annotator::*;
pub use content::*;
pub use error::*;
pub use scanner::*;
pub use settings::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("gapcore v{}", env!("CARGO_PKG_VERSION"))
}
