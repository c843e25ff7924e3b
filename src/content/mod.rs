//! ContentNode - minimal HTML content tree
//!
//! The gap scanner walks editor content as a tree of elements, text nodes and
//! comments. Editor HTML arrives as a string across the WASM boundary, so
//! this module provides a tolerant fragment parser (`parse_fragment`) and the
//! inverse renderer (`render`).
//!
//! Text and attribute values pass through verbatim (no entity decoding);
//! re-rendering a parsed tree reproduces text content byte-for-byte, which
//! the scanner's lossless-reconstruction guarantee builds on.

pub mod parse;

pub use parse::parse_fragment;

use serde::{Deserialize, Serialize};

/// A single node in the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentNode {
    Element {
        /// Lowercased tag name
        tag: String,
        /// Attributes in source order; `None` value renders as a bare name
        attrs: Vec<(String, Option<String>)>,
        children: Vec<ContentNode>,
    },
    Text(String),
    Comment(String),
}

/// Void elements never carry children and render without a close tag
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

impl ContentNode {
    /// Shorthand element constructor
    pub fn element(tag: &str, attrs: Vec<(String, Option<String>)>, children: Vec<ContentNode>) -> Self {
        ContentNode::Element {
            tag: tag.to_string(),
            attrs,
            children,
        }
    }

    /// Shorthand text constructor
    pub fn text(content: &str) -> Self {
        ContentNode::Text(content.to_string())
    }

    /// Tag name for elements, `None` otherwise
    pub fn tag(&self) -> Option<&str> {
        match self {
            ContentNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Children for elements, empty slice otherwise
    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Element { children, .. } => children,
            _ => &[],
        }
    }
}

/// Render a forest of nodes back to an HTML string
pub fn render(nodes: &[ContentNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, &mut out);
    }
    out
}

fn render_node(node: &ContentNode, out: &mut String) {
    match node {
        ContentNode::Text(text) => out.push_str(text),
        ContentNode::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        ContentNode::Element { tag, attrs, children } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                if let Some(value) = value {
                    out.push_str("=\"");
                    out.push_str(&value.replace('"', "&quot;"));
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(tag) {
                return;
            }
            for child in children {
                render_node(child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
