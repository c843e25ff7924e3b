//! WASM boundary smoke tests
//!
//! The native core is covered by inline unit tests; these only verify that
//! the exported surface crosses the wasm-bindgen boundary.

#![cfg(target_arch = "wasm32")]

use gapcore::GapAnnotator;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn annotator_flow_across_boundary() {
    let mut annotator = GapAnnotator::js_new("[", "]", "").unwrap();

    let result = annotator.js_scan("<p>[cat] and [dog]</p>");
    assert!(!result.is_null());

    annotator.js_upsert_feedback("cat", "id1_0", None, "<p>yes</p>", "");
    let annotated = annotator.js_annotate("<p>[cat] and [dog]</p>");
    assert!(annotated.contains("gap-marker gap-has-correct"));

    let blob = annotator.js_serialize_settings().unwrap();
    assert!(blob.contains("\"gaptext\":\"cat\""));
    assert_eq!(annotator.record_count(), 1);
}

#[wasm_bindgen_test]
fn bad_delimiters_reject_at_boundary() {
    assert!(GapAnnotator::js_new("", "]", "").is_err());
}

#[wasm_bindgen_test]
fn corrupt_settings_recover_at_boundary() {
    let annotator = GapAnnotator::js_new("[", "]", "{corrupt").unwrap();
    assert_eq!(annotator.record_count(), 0);
}
