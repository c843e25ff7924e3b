//! GapScanner - delimiter-bound gap extraction
//!
//! Walks a content tree depth-first, splits each text node on a compiled
//! gap pattern (left delimiter, non-greedy run of non-right-delimiter
//! characters, right delimiter), and emits an ordered occurrence per gap:
//! - `index`: 1-based extraction counter for the whole scan
//! - `instance`: 0-based count of prior occurrences with the same stripped text
//! - `item_id`: `"id{index}_{instance}"` presentation identity
//!
//! The split is capturing: separator text is preserved verbatim, so
//! concatenating all chunks (with delimiters re-added to gap chunks)
//! reproduces the original text node exactly.
//!
//! Scan state lives in an explicit `ScanContext` created per `scan` call;
//! the scanner itself is immutable and re-entrant.

use regex::Regex;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::content::{parse_fragment, ContentNode};
use crate::error::GapError;

// =============================================================================
// Types
// =============================================================================

/// Element kinds whose subtrees are never scanned for gaps: form controls,
/// scripts and embedded/interactive widgets.
pub fn is_skipped_element(tag: &str) -> bool {
    matches!(
        tag,
        "audio"
            | "button"
            | "iframe"
            | "input"
            | "object"
            | "option"
            | "script"
            | "select"
            | "style"
            | "textarea"
            | "video"
    )
}

/// One chunk of a capturing text split
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub is_gap: bool,
}

/// A single extracted gap occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapOccurrence {
    /// Delimited text as it appears in the document, e.g. `[answer]`
    pub raw: String,
    /// Delimiter-stripped text, the settings lookup key
    pub text: String,
    /// 1-based extraction counter within this scan
    pub index: usize,
    /// 0-based count of prior occurrences with identical stripped text
    pub instance: usize,
    /// Presentation identity, `"id{index}_{instance}"`
    #[serde(rename = "itemId")]
    pub item_id: String,
}

/// Aggregate statistics for one scan
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanStats {
    pub total_us: u64,
    pub text_nodes_scanned: usize,
    pub elements_skipped: usize,
    pub gaps_found: usize,
}

/// Ordered scan output, recomputed fresh on every scan
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanResult {
    pub occurrences: Vec<GapOccurrence>,
    pub stats: ScanStats,
}

/// Per-scan mutable state, reset only at the true root of a scan
#[derive(Debug, Default)]
pub struct ScanContext {
    counter: usize,
    seen: Vec<String>,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one gap occurrence and return its (index, instance) pair
    pub fn record(&mut self, stripped: &str) -> (usize, usize) {
        self.counter += 1;
        let instance = self.seen.iter().filter(|t| *t == stripped).count();
        self.seen.push(stripped.to_string());
        (self.counter, instance)
    }
}

// =============================================================================
// GapScanner
// =============================================================================

/// Delimiter-configured gap extractor
#[wasm_bindgen]
pub struct GapScanner {
    left: char,
    right: char,
    gap_re: Regex,
}

#[wasm_bindgen]
impl GapScanner {
    #[wasm_bindgen(constructor)]
    pub fn js_new(left: &str, right: &str) -> Result<GapScanner, JsValue> {
        GapScanner::new(left, right).map_err(JsValue::from)
    }

    /// Parse an HTML fragment and scan it (JS binding)
    #[wasm_bindgen(js_name = scanHtml)]
    pub fn js_scan_html(&self, html: &str) -> JsValue {
        let nodes = parse_fragment(html);
        let result = self.scan(&nodes);
        match serde_wasm_bindgen::to_value(&result) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[GapScanner] Serialization failed: {:?}", e).into(),
                );
                JsValue::NULL
            }
        }
    }
}

impl GapScanner {
    /// Build a scanner for one delimiter pair.
    ///
    /// Each delimiter must be exactly one character; anything else is a
    /// configuration error, surfaced before any scan happens. A permissive
    /// default here would silently match everything.
    ///
    /// Matching policy: a gap holds at least one character, so `[]` is not
    /// a gap, and nested delimiters resolve to the first non-greedy match
    /// (`[a[b]c]` extracts `a[b`).
    pub fn new(left: &str, right: &str) -> Result<Self, GapError> {
        let left = Self::single_char(left, "left")?;
        let right = Self::single_char(right, "right")?;

        // Non-greedy run of at least one non-right-delimiter character, so
        // adjacent pairs never merge and empty gaps are not extracted.
        // Nested delimiters: first match wins, "[a[b]c]" extracts "a[b".
        let pattern = format!(
            "{}[^{}]+?{}",
            regex::escape(&left.to_string()),
            regex::escape(&right.to_string()),
            regex::escape(&right.to_string()),
        );
        let gap_re = Regex::new(&pattern)
            .map_err(|e| GapError::Configuration(format!("invalid delimiter pattern: {}", e)))?;

        Ok(Self { left, right, gap_re })
    }

    fn single_char(value: &str, side: &str) -> Result<char, GapError> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            (None, _) => Err(GapError::Configuration(format!(
                "{} delimiter is empty",
                side
            ))),
            _ => Err(GapError::Configuration(format!(
                "{} delimiter must be a single character, got {:?}",
                side, value
            ))),
        }
    }

    /// Configured delimiter pair
    pub fn delimiters(&self) -> (char, char) {
        (self.left, self.right)
    }

    /// Scan a content forest, extracting gap occurrences in document order
    pub fn scan(&self, nodes: &[ContentNode]) -> ScanResult {
        let mut result = ScanResult::default();
        let mut cx = ScanContext::new();
        self.walk(nodes, &mut cx, &mut result);
        result.stats.gaps_found = result.occurrences.len();
        result
    }

    fn walk(&self, nodes: &[ContentNode], cx: &mut ScanContext, result: &mut ScanResult) {
        for node in nodes {
            match node {
                ContentNode::Element { tag, children, .. } => {
                    if is_skipped_element(tag) {
                        result.stats.elements_skipped += 1;
                        continue;
                    }
                    self.walk(children, cx, result);
                }
                ContentNode::Text(text) => {
                    result.stats.text_nodes_scanned += 1;
                    for chunk in self.split_text(text) {
                        if !chunk.is_gap {
                            continue;
                        }
                        let stripped = self.strip(&chunk.text).to_string();
                        let (index, instance) = cx.record(&stripped);
                        result.occurrences.push(GapOccurrence {
                            raw: chunk.text,
                            item_id: format!("id{}_{}", index, instance),
                            text: stripped,
                            index,
                            instance,
                        });
                    }
                }
                ContentNode::Comment(_) => {}
            }
        }
    }

    /// Capturing split of one text node into alternating non-gap / gap
    /// chunks. Separator text is preserved verbatim; empty split artifacts
    /// are discarded.
    pub fn split_text(&self, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut last = 0;
        for m in self.gap_re.find_iter(text) {
            if m.start() > last {
                chunks.push(TextChunk {
                    text: text[last..m.start()].to_string(),
                    is_gap: false,
                });
            }
            chunks.push(TextChunk {
                text: m.as_str().to_string(),
                is_gap: true,
            });
            last = m.end();
        }
        if last < text.len() {
            chunks.push(TextChunk {
                text: text[last..].to_string(),
                is_gap: false,
            });
        }
        chunks
    }

    /// Strip exactly one leading left delimiter and one trailing right
    /// delimiter from a raw gap chunk
    pub fn strip<'a>(&self, raw: &'a str) -> &'a str {
        let start = self.left.len_utf8();
        let end = raw.len() - self.right.len_utf8();
        &raw[start..end]
    }
}

// =============================================================================
// Tests
// =============================================================================
