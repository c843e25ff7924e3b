//! GapSettingsStore - persisted per-gap feedback records
//!
//! An insertion-ordered collection of `GapRecord` keyed by gap text. The key
//! choice is load-bearing: `item_id` is regenerated on every scan and shifts
//! whenever a gap is inserted or deleted earlier in the document, so keying
//! persisted feedback by it would silently lose feedback on unrelated edits.
//! Gap text is the only value stable enough to survive re-edits.
//!
//! Records serialize to a JSON array using the legacy lowercase keys
//! (`itemid`, `questionid`, `gaptext`, `correctfeedback`,
//! `incorrectfeedback`) so previously persisted blobs keep loading.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use crate::error::GapError;

// =============================================================================
// Types
// =============================================================================

/// One persisted feedback record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
    /// Presentation identity from the most recent scan, `"id{N}_{instance}"`
    #[serde(rename = "itemid")]
    pub item_id: String,
    /// Owning document/question identifier, `None` when unset
    #[serde(rename = "questionid")]
    pub question_id: Option<String>,
    /// Delimiter-stripped gap text, the lookup key
    #[serde(rename = "gaptext")]
    pub gap_text: String,
    /// Rich-text HTML, empty string when unset
    #[serde(rename = "correctfeedback", default)]
    pub correct_feedback: String,
    /// Rich-text HTML, empty string when unset
    #[serde(rename = "incorrectfeedback", default)]
    pub incorrect_feedback: String,
}

// =============================================================================
// GapSettingsStore
// =============================================================================

/// Ordered, text-keyed feedback collection
///
/// Records live in a `Vec` (insertion order is the serialization order) with
/// a gap-text index beside it for O(1) lookup instead of a linear scan.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct GapSettingsStore {
    records: Vec<GapRecord>,
    index: HashMap<String, usize>,
}

#[wasm_bindgen]
impl GapSettingsStore {
    /// Deserialize a persisted settings blob (JS binding).
    /// Blank input yields an empty store; malformed JSON is an error.
    #[wasm_bindgen(constructor)]
    pub fn js_new(raw: &str) -> Result<GapSettingsStore, JsValue> {
        GapSettingsStore::deserialize(raw).map_err(JsValue::from)
    }

    /// Exact-match lookup by gap text (JS binding); null when absent
    #[wasm_bindgen(js_name = findByText)]
    pub fn js_find_by_text(&self, gap_text: &str) -> JsValue {
        match self.find_by_text(gap_text) {
            Some(record) => serde_wasm_bindgen::to_value(record).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Insert or update feedback for a gap text (JS binding)
    #[wasm_bindgen(js_name = upsertFeedback)]
    pub fn js_upsert_feedback(
        &mut self,
        gap_text: &str,
        item_id: &str,
        question_id: Option<String>,
        correct: &str,
        incorrect: &str,
    ) {
        self.upsert_feedback(gap_text, item_id, question_id.as_deref(), correct, incorrect);
    }

    /// Serialize the full collection back to a string (JS binding)
    #[wasm_bindgen(js_name = serialize)]
    pub fn js_serialize(&self) -> Result<String, JsValue> {
        self.serialize().map_err(JsValue::from)
    }

    /// All records in insertion order (JS binding)
    #[wasm_bindgen(js_name = all)]
    pub fn js_all(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.records).unwrap_or(JsValue::NULL)
    }

    /// Number of records
    #[wasm_bindgen(js_name = recordCount)]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl GapSettingsStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted settings blob.
    ///
    /// Empty or blank input yields an empty store. Anything else must be a
    /// JSON array of records; malformed input is a `Parse` error rather than
    /// silently dropped data. Duplicate gap texts collapse last-write-wins
    /// into the first position, restoring the store invariant.
    pub fn deserialize(raw: &str) -> Result<Self, GapError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::new());
        }
        let records: Vec<GapRecord> = serde_json::from_str(raw)
            .map_err(|e| GapError::Parse(format!("invalid settings data: {}", e)))?;

        let mut store = Self::new();
        for record in records {
            store.insert_record(record);
        }
        Ok(store)
    }

    /// Serialize to the persisted JSON form; `deserialize` reads it back
    /// losslessly
    pub fn serialize(&self) -> Result<String, GapError> {
        serde_json::to_string(&self.records)
            .map_err(|e| GapError::Parse(format!("settings serialization failed: {}", e)))
    }

    /// Exact-match lookup by gap text
    pub fn find_by_text(&self, gap_text: &str) -> Option<&GapRecord> {
        self.index.get(gap_text).map(|&i| &self.records[i])
    }

    /// Overwrite the record matching `gap_text` in place, or append a new
    /// one. Never fails on a fresh gap text.
    pub fn upsert_feedback(
        &mut self,
        gap_text: &str,
        item_id: &str,
        question_id: Option<&str>,
        correct: &str,
        incorrect: &str,
    ) {
        self.insert_record(GapRecord {
            item_id: item_id.to_string(),
            question_id: question_id.map(str::to_string),
            gap_text: gap_text.to_string(),
            correct_feedback: correct.to_string(),
            incorrect_feedback: incorrect.to_string(),
        });
    }

    fn insert_record(&mut self, record: GapRecord) {
        match self.index.get(&record.gap_text) {
            Some(&i) => self.records[i] = record,
            None => {
                self.index.insert(record.gap_text.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// All records in insertion order
    pub fn all(&self) -> &[GapRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, &str, &str, &str)]) -> GapSettingsStore {
        let mut store = GapSettingsStore::new();
        for (text, id, correct, incorrect) in entries {
            store.upsert_feedback(text, id, Some("q1"), correct, incorrect);
        }
        store
    }

    // -------------------------------------------------------------------------
    // Round-trip law
    // -------------------------------------------------------------------------
    #[test]
    fn test_round_trip_preserves_records_and_order() {
        let store = store_with(&[
            ("Paris", "id1_0", "<p>Oui</p>", "<p>Non</p>"),
            ("cat", "id2_0", "", "meow"),
            ("dog", "id3_0", "woof", ""),
        ]);

        let raw = store.serialize().unwrap();
        let restored = GapSettingsStore::deserialize(&raw).unwrap();
        assert_eq!(restored.all(), store.all());
    }

    #[test]
    fn test_empty_and_blank_input_yield_empty_store() {
        assert!(GapSettingsStore::deserialize("").unwrap().is_empty());
        assert!(GapSettingsStore::deserialize("   \n ").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_input_is_parse_error() {
        assert!(matches!(
            GapSettingsStore::deserialize("not json"),
            Err(GapError::Parse(_))
        ));
        assert!(matches!(
            GapSettingsStore::deserialize(r#"{"itemid": "id1_0"}"#),
            Err(GapError::Parse(_))
        ));
    }

    #[test]
    fn test_legacy_lowercase_keys() {
        let raw = r#"[{"itemid":"id1_0","questionid":null,"gaptext":"Paris","correctfeedback":"<p>Oui</p>","incorrectfeedback":""}]"#;
        let store = GapSettingsStore::deserialize(raw).unwrap();
        let record = store.find_by_text("Paris").unwrap();
        assert_eq!(record.item_id, "id1_0");
        assert_eq!(record.question_id, None);
        assert_eq!(record.correct_feedback, "<p>Oui</p>");
    }

    #[test]
    fn test_missing_feedback_fields_default_to_empty() {
        let raw = r#"[{"itemid":"id1_0","questionid":"q1","gaptext":"Paris"}]"#;
        let store = GapSettingsStore::deserialize(raw).unwrap();
        let record = store.find_by_text("Paris").unwrap();
        assert_eq!(record.correct_feedback, "");
        assert_eq!(record.incorrect_feedback, "");
    }

    // -------------------------------------------------------------------------
    // Store invariant: gap text is unique
    // -------------------------------------------------------------------------
    #[test]
    fn test_duplicate_gap_texts_collapse_last_write_wins() {
        let raw = r#"[
            {"itemid":"id1_0","questionid":null,"gaptext":"cat","correctfeedback":"old","incorrectfeedback":""},
            {"itemid":"id2_0","questionid":null,"gaptext":"dog","correctfeedback":"","incorrectfeedback":""},
            {"itemid":"id3_1","questionid":null,"gaptext":"cat","correctfeedback":"new","incorrectfeedback":""}
        ]"#;
        let store = GapSettingsStore::deserialize(raw).unwrap();
        assert_eq!(store.len(), 2);
        // Last write wins, first position kept
        assert_eq!(store.all()[0].gap_text, "cat");
        assert_eq!(store.all()[0].correct_feedback, "new");
        assert_eq!(store.all()[1].gap_text, "dog");
    }

    // -------------------------------------------------------------------------
    // Upsert semantics
    // -------------------------------------------------------------------------
    #[test]
    fn test_upsert_updates_in_place_preserving_order() {
        let mut store = store_with(&[
            ("a", "id1_0", "", ""),
            ("b", "id2_0", "", ""),
            ("c", "id3_0", "", ""),
        ]);
        store.upsert_feedback("b", "id9_0", Some("q2"), "right", "wrong");

        let texts: Vec<&str> = store.all().iter().map(|r| r.gap_text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);

        let b = store.find_by_text("b").unwrap();
        assert_eq!(b.item_id, "id9_0");
        assert_eq!(b.question_id.as_deref(), Some("q2"));
        assert_eq!(b.correct_feedback, "right");
        assert_eq!(b.incorrect_feedback, "wrong");
    }

    #[test]
    fn test_upsert_appends_fresh_gap_text() {
        let mut store = store_with(&[("a", "id1_0", "", "")]);
        store.upsert_feedback("z", "id2_0", None, "", "");
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[1].gap_text, "z");
    }

    // -------------------------------------------------------------------------
    // Keying by text, not item_id
    // -------------------------------------------------------------------------
    #[test]
    fn test_lookup_survives_item_id_churn() {
        let mut store = GapSettingsStore::new();
        store.upsert_feedback("Paris", "id3_0", Some("q1"), "<p>Oui</p>", "<p>Non</p>");

        // A later scan re-assigns the id after upstream edits; lookup is by
        // text and still resolves to the same feedback
        let record = store.find_by_text("Paris").unwrap();
        assert_eq!(record.correct_feedback, "<p>Oui</p>");

        store.upsert_feedback("Paris", "id7_0", Some("q1"), "<p>Oui</p>", "<p>Non</p>");
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_text("Paris").unwrap().item_id, "id7_0");
    }

    #[test]
    fn test_find_by_text_is_exact_match() {
        let store = store_with(&[("Paris", "id1_0", "", "")]);
        assert!(store.find_by_text("paris").is_none());
        assert!(store.find_by_text("Paris ").is_none());
        assert!(store.find_by_text("Paris").is_some());
    }
}
