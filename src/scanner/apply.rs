//! Presentational gap wrapping
//!
//! The companion to pure extraction: rebuild a content tree so every gap
//! chunk becomes a wrapper element carrying the scan-assigned identity and
//! marker classes, while non-gap chunks stay literal text. Wrapper classes
//! also encode whether the settings record matched by gap text has correct /
//! incorrect feedback configured, so presentation needs no further store
//! lookup.
//!
//! Identity assignment here uses the same `ScanContext` rules as `scan`, so
//! the ids of an applied tree and the occurrences of a plain scan over the
//! same content always agree.

use crate::content::ContentNode;
use crate::scanner::core::{is_skipped_element, GapScanner, ScanContext};
use crate::settings::GapSettingsStore;

/// Class carried by every gap wrapper element
pub const MARKER_CLASS: &str = "gap-marker";
/// Secondary class: matched record has non-empty correct feedback
pub const HAS_CORRECT_CLASS: &str = "gap-has-correct";
/// Secondary class: matched record has non-empty incorrect feedback
pub const HAS_INCORRECT_CLASS: &str = "gap-has-incorrect";

impl GapScanner {
    /// Rewrite a content forest, wrapping each gap in a marker `<span>`.
    ///
    /// Non-mutating: the input forest is untouched and a new forest is
    /// returned. Denylisted subtrees are cloned as-is.
    pub fn apply(&self, nodes: &[ContentNode], store: &GapSettingsStore) -> Vec<ContentNode> {
        let mut cx = ScanContext::new();
        self.apply_nodes(nodes, store, &mut cx)
    }

    fn apply_nodes(
        &self,
        nodes: &[ContentNode],
        store: &GapSettingsStore,
        cx: &mut ScanContext,
    ) -> Vec<ContentNode> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                ContentNode::Element { tag, attrs, children } => {
                    let children = if is_skipped_element(tag) {
                        children.clone()
                    } else {
                        self.apply_nodes(children, store, cx)
                    };
                    out.push(ContentNode::Element {
                        tag: tag.clone(),
                        attrs: attrs.clone(),
                        children,
                    });
                }
                ContentNode::Text(text) => {
                    for chunk in self.split_text(text) {
                        if chunk.is_gap {
                            let stripped = self.strip(&chunk.text);
                            let (index, instance) = cx.record(stripped);
                            let item_id = format!("id{}_{}", index, instance);
                            out.push(self.wrapper(stripped, item_id, store));
                        } else {
                            out.push(ContentNode::Text(chunk.text));
                        }
                    }
                }
                ContentNode::Comment(text) => out.push(ContentNode::Comment(text.clone())),
            }
        }
        out
    }

    fn wrapper(&self, stripped: &str, item_id: String, store: &GapSettingsStore) -> ContentNode {
        let mut classes = vec![MARKER_CLASS];
        if let Some(record) = store.find_by_text(stripped) {
            if !record.correct_feedback.is_empty() {
                classes.push(HAS_CORRECT_CLASS);
            }
            if !record.incorrect_feedback.is_empty() {
                classes.push(HAS_INCORRECT_CLASS);
            }
        }
        ContentNode::Element {
            tag: "span".to_string(),
            attrs: vec![
                ("id".to_string(), Some(item_id)),
                ("class".to_string(), Some(classes.join(" "))),
            ],
            children: vec![ContentNode::Text(stripped.to_string())],
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
