//! GapAnnotator: unified gap-annotation facade
//!
//! Single entry point for the editor integration, one boundary call per UI
//! event:
//! - `scan(html)` - extract gap occurrences from current content
//! - `annotate(html)` - rewrite content with marker spans for the overlay
//! - `feedbackFor` / `upsertFeedback` - dialog round-trip against the store
//! - `serializeSettings()` - persisted blob for the save hook
//!
//! The facade owns the scanner configuration and the settings store for the
//! editing session; the document itself stays on the JS side and crosses the
//! boundary as an HTML string.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::content::{parse_fragment, render};
use crate::error::GapError;
use crate::scanner::{GapScanner, ScanResult};
use crate::settings::{GapRecord, GapSettingsStore};

// =============================================================================
// Types
// =============================================================================

/// Facade status snapshot for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorStatus {
    pub left_delimiter: String,
    pub right_delimiter: String,
    pub record_count: usize,
    pub settings_recovered: bool,
}

// =============================================================================
// GapAnnotator
// =============================================================================

/// Unified gap annotator: scanner + settings store for one editing session
#[wasm_bindgen]
pub struct GapAnnotator {
    scanner: GapScanner,
    store: GapSettingsStore,
    settings_recovered: bool,
}

#[wasm_bindgen]
impl GapAnnotator {
    /// Create an annotator from delimiter configuration and the persisted
    /// settings blob.
    ///
    /// Invalid delimiters are fatal (no scan can be performed). A malformed
    /// settings blob is recovered: a warning goes to the console and editing
    /// continues with an empty store.
    #[wasm_bindgen(constructor)]
    pub fn js_new(left: &str, right: &str, settings_json: &str) -> Result<GapAnnotator, JsValue> {
        let scanner = GapScanner::new(left, right).map_err(JsValue::from)?;
        let (store, settings_recovered) = match GapSettingsStore::deserialize(settings_json) {
            Ok(store) => (store, false),
            Err(e) => {
                web_sys::console::warn_1(
                    &format!("[GapAnnotator] Discarding saved settings: {}", e).into(),
                );
                (GapSettingsStore::new(), true)
            }
        };
        Ok(Self {
            scanner,
            store,
            settings_recovered,
        })
    }

    /// Scan current editor content for gaps (JS binding)
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, html: &str) -> JsValue {
        let result = self.scan(html);
        match serde_wasm_bindgen::to_value(&result) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[GapAnnotator] Serialization failed: {:?}", e).into(),
                );
                JsValue::NULL
            }
        }
    }

    /// Rewrite content with gap marker spans (JS binding)
    #[wasm_bindgen(js_name = annotate)]
    pub fn js_annotate(&self, html: &str) -> String {
        self.annotate(html)
    }

    /// Feedback record for a gap text, or null (JS binding)
    #[wasm_bindgen(js_name = feedbackFor)]
    pub fn js_feedback_for(&self, gap_text: &str) -> JsValue {
        match self.feedback_for(gap_text) {
            Some(record) => serde_wasm_bindgen::to_value(record).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Attach dialog-accepted feedback to a gap (JS binding)
    #[wasm_bindgen(js_name = upsertFeedback)]
    pub fn js_upsert_feedback(
        &mut self,
        gap_text: &str,
        item_id: &str,
        question_id: Option<String>,
        correct: &str,
        incorrect: &str,
    ) {
        self.store
            .upsert_feedback(gap_text, item_id, question_id.as_deref(), correct, incorrect);
    }

    /// Serialize the settings store for persistence (JS binding)
    #[wasm_bindgen(js_name = serializeSettings)]
    pub fn js_serialize_settings(&self) -> Result<String, JsValue> {
        self.store.serialize().map_err(JsValue::from)
    }

    /// Number of stored feedback records
    #[wasm_bindgen(js_name = recordCount)]
    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    /// Get annotator status
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> JsValue {
        let (left, right) = self.scanner.delimiters();
        let status = serde_json::json!({
            "left_delimiter": left.to_string(),
            "right_delimiter": right.to_string(),
            "record_count": self.store.len(),
            "settings_recovered": self.settings_recovered,
        });
        JsValue::from_str(&status.to_string())
    }
}

impl GapAnnotator {
    /// Native constructor; `load` recovery is the caller's concern here
    pub fn with_store(scanner: GapScanner, store: GapSettingsStore) -> Self {
        Self {
            scanner,
            store,
            settings_recovered: false,
        }
    }

    /// Build from delimiter configuration and a persisted blob, propagating
    /// both error kinds
    pub fn load(left: &str, right: &str, settings_json: &str) -> Result<Self, GapError> {
        let scanner = GapScanner::new(left, right)?;
        let store = GapSettingsStore::deserialize(settings_json)?;
        Ok(Self::with_store(scanner, store))
    }

    /// Parse and scan an HTML fragment
    pub fn scan(&self, html: &str) -> ScanResult {
        let start = instant::Instant::now();
        let nodes = parse_fragment(html);
        let mut result = self.scanner.scan(&nodes);
        result.stats.total_us = start.elapsed().as_micros() as u64;
        result
    }

    /// Parse an HTML fragment, wrap gaps, render back to HTML
    pub fn annotate(&self, html: &str) -> String {
        let nodes = parse_fragment(html);
        render(&self.scanner.apply(&nodes, &self.store))
    }

    /// Feedback record for a gap text
    pub fn feedback_for(&self, gap_text: &str) -> Option<&GapRecord> {
        self.store.find_by_text(gap_text)
    }

    /// The owned settings store
    pub fn store(&self) -> &GapSettingsStore {
        &self.store
    }

    /// Mutable access for native callers driving dialogs themselves
    pub fn store_mut(&mut self) -> &mut GapSettingsStore {
        &mut self.store
    }

    /// Status snapshot
    pub fn status(&self) -> AnnotatorStatus {
        let (left, right) = self.scanner.delimiters();
        AnnotatorStatus {
            left_delimiter: left.to_string(),
            right_delimiter: right.to_string(),
            record_count: self.store.len(),
            settings_recovered: self.settings_recovered,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
