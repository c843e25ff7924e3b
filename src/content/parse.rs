//! Tolerant HTML fragment parser for editor content
//!
//! Editor bodies are fragments, not documents: no doctype handling beyond
//! skipping one, unmatched close tags are ignored, and unclosed elements are
//! closed implicitly at end of input. Tag and attribute names are restricted
//! to ASCII `[A-Za-z0-9:_-]`, which covers everything a rich-text editor
//! emits. Rawtext elements (`script`, `style`, `textarea`) swallow their
//! content into a single text child so their bodies survive round-trips
//! without being re-tokenized.

use super::{is_void_element, ContentNode};

/// Elements whose content is raw text up to the matching close tag
fn is_rawtext_element(name: &str) -> bool {
    matches!(name, "script" | "style" | "textarea")
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b':' || b == b'_' || b == b'-'
}

/// An element whose close tag has not been seen yet
struct OpenElement {
    tag: String,
    attrs: Vec<(String, Option<String>)>,
    children: Vec<ContentNode>,
}

impl OpenElement {
    fn into_node(self) -> ContentNode {
        ContentNode::Element {
            tag: self.tag,
            attrs: self.attrs,
            children: self.children,
        }
    }
}

/// Append a node at the current insertion point, merging adjacent text nodes
fn append(stack: &mut Vec<OpenElement>, roots: &mut Vec<ContentNode>, node: ContentNode) {
    let children = match stack.last_mut() {
        Some(open) => &mut open.children,
        None => roots,
    };
    if let ContentNode::Text(new_text) = &node {
        if let Some(ContentNode::Text(prev)) = children.last_mut() {
            prev.push_str(new_text);
            return;
        }
    }
    children.push(node);
}

/// Find `</name`, optional ASCII whitespace, `>` at or after `from`.
/// Returns (content_end, position_after_close_tag).
fn find_rawtext_close(input: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = input.as_bytes();
    let name_bytes = name.as_bytes();
    let len = bytes.len();
    let mut i = from;
    while i + 2 + name_bytes.len() <= len {
        if bytes[i] == b'<'
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + 2 + name_bytes.len()].eq_ignore_ascii_case(name_bytes)
        {
            let mut k = i + 2 + name_bytes.len();
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Parse an HTML fragment into a forest of content nodes
pub fn parse_fragment(input: &str) -> Vec<ContentNode> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut roots: Vec<ContentNode> = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' {
            // Text run until the next '<'. '<' is ASCII, so the slice ends on
            // a UTF-8 boundary.
            let start = i;
            while i < len && bytes[i] != b'<' {
                i += 1;
            }
            append(&mut stack, &mut roots, ContentNode::Text(input[start..i].to_string()));
            continue;
        }

        if input[i..].starts_with("<!--") {
            let body_start = i + 4;
            match input[body_start..].find("-->") {
                Some(end) => {
                    let comment = input[body_start..body_start + end].to_string();
                    append(&mut stack, &mut roots, ContentNode::Comment(comment));
                    i = body_start + end + 3;
                }
                None => {
                    // Unterminated comment swallows the rest of the input
                    append(&mut stack, &mut roots, ContentNode::Comment(input[body_start..].to_string()));
                    i = len;
                }
            }
            continue;
        }

        if input[i..].starts_with("<!") {
            // Doctype or other declaration: fragments don't carry these, skip
            match input[i..].find('>') {
                Some(end) => i += end + 1,
                None => i = len,
            }
            continue;
        }

        if i + 1 < len && bytes[i + 1] == b'/' {
            let mut j = i + 2;
            while j < len && is_name_byte(bytes[j]) {
                j += 1;
            }
            let name = input[i + 2..j].to_ascii_lowercase();
            while j < len && bytes[j] != b'>' {
                j += 1;
            }
            if j < len {
                j += 1;
            }
            // Close the matching open element if there is one; pop anything
            // opened after it as implicitly closed. Stray close tags are
            // ignored.
            if let Some(pos) = stack.iter().rposition(|open| open.tag == name) {
                while stack.len() > pos {
                    let Some(open) = stack.pop() else { break };
                    append(&mut stack, &mut roots, open.into_node());
                }
            }
            i = j;
            continue;
        }

        if i + 1 < len && bytes[i + 1].is_ascii_alphabetic() {
            i = parse_tag(input, i, &mut stack, &mut roots);
            continue;
        }

        // Stray '<' that opens no tag: literal text
        append(&mut stack, &mut roots, ContentNode::Text("<".to_string()));
        i += 1;
    }

    // Unclosed elements are closed implicitly at end of input
    while let Some(open) = stack.pop() {
        append(&mut stack, &mut roots, open.into_node());
    }

    roots
}

/// Parse one open tag starting at `i` (which points at '<').
/// Returns the position after the tag and its rawtext content, if any.
fn parse_tag(
    input: &str,
    i: usize,
    stack: &mut Vec<OpenElement>,
    roots: &mut Vec<ContentNode>,
) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();

    let mut j = i + 1;
    while j < len && is_name_byte(bytes[j]) {
        j += 1;
    }
    let name = input[i + 1..j].to_ascii_lowercase();

    let mut attrs: Vec<(String, Option<String>)> = Vec::new();
    let mut self_closing = false;
    loop {
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= len {
            break;
        }
        if bytes[j] == b'>' {
            j += 1;
            break;
        }
        if bytes[j] == b'/' {
            j += 1;
            if j < len && bytes[j] == b'>' {
                self_closing = true;
                j += 1;
                break;
            }
            continue;
        }

        let name_start = j;
        while j < len
            && !bytes[j].is_ascii_whitespace()
            && bytes[j] != b'='
            && bytes[j] != b'/'
            && bytes[j] != b'>'
        {
            j += 1;
        }
        if j == name_start {
            j += 1;
            continue;
        }
        let attr_name = input[name_start..j].to_ascii_lowercase();

        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let value = if j < len && bytes[j] == b'=' {
            j += 1;
            while j < len && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < len && (bytes[j] == b'"' || bytes[j] == b'\'') {
                let quote = bytes[j];
                j += 1;
                let value_start = j;
                while j < len && bytes[j] != quote {
                    j += 1;
                }
                let value = input[value_start..j].to_string();
                if j < len {
                    j += 1;
                }
                Some(value)
            } else {
                let value_start = j;
                while j < len && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                    j += 1;
                }
                Some(input[value_start..j].to_string())
            }
        } else {
            None
        };
        attrs.push((attr_name, value));
    }

    if is_void_element(&name) || self_closing {
        append(
            stack,
            roots,
            ContentNode::Element {
                tag: name,
                attrs,
                children: Vec::new(),
            },
        );
        return j;
    }

    if is_rawtext_element(&name) {
        let (content_end, after) = match find_rawtext_close(input, j, &name) {
            Some(found) => found,
            None => (len, len),
        };
        let mut children = Vec::new();
        if content_end > j {
            children.push(ContentNode::Text(input[j..content_end].to_string()));
        }
        append(
            stack,
            roots,
            ContentNode::Element {
                tag: name,
                attrs,
                children,
            },
        );
        return after;
    }

    stack.push(OpenElement {
        tag: name,
        attrs,
        children: Vec::new(),
    });
    j
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::render;
    use super::*;

    #[test]
    fn test_plain_text() {
        let nodes = parse_fragment("just text");
        assert_eq!(nodes, vec![ContentNode::text("just text")]);
    }

    #[test]
    fn test_nested_elements() {
        let nodes = parse_fragment("<p>a <strong>b</strong> c</p>");
        assert_eq!(nodes.len(), 1);
        let p = &nodes[0];
        assert_eq!(p.tag(), Some("p"));
        assert_eq!(p.children().len(), 3);
        assert_eq!(p.children()[0], ContentNode::text("a "));
        assert_eq!(p.children()[1].tag(), Some("strong"));
        assert_eq!(p.children()[2], ContentNode::text(" c"));
    }

    #[test]
    fn test_attributes_quoted_and_bare() {
        let nodes = parse_fragment(r#"<input type="text" disabled value='x'>"#);
        match &nodes[0] {
            ContentNode::Element { tag, attrs, .. } => {
                assert_eq!(tag, "input");
                assert_eq!(
                    attrs,
                    &vec![
                        ("type".to_string(), Some("text".to_string())),
                        ("disabled".to_string(), None),
                        ("value".to_string(), Some("x".to_string())),
                    ]
                );
            }
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_names_lowercased() {
        let nodes = parse_fragment("<P>x</P>");
        assert_eq!(nodes[0].tag(), Some("p"));
    }

    #[test]
    fn test_void_element_does_not_nest() {
        let nodes = parse_fragment("<p>a<br>b</p>");
        let p = &nodes[0];
        assert_eq!(p.children().len(), 3);
        assert_eq!(p.children()[1].tag(), Some("br"));
        assert_eq!(p.children()[2], ContentNode::text("b"));
    }

    #[test]
    fn test_rawtext_textarea_content_stays_one_text_node() {
        let nodes = parse_fragment("<textarea>[not a gap] <b>literal</b></textarea>");
        let textarea = &nodes[0];
        assert_eq!(textarea.tag(), Some("textarea"));
        assert_eq!(
            textarea.children(),
            &[ContentNode::text("[not a gap] <b>literal</b>")]
        );
    }

    #[test]
    fn test_unmatched_close_tag_ignored() {
        let nodes = parse_fragment("a</div>b");
        assert_eq!(nodes, vec![ContentNode::text("ab")]);
    }

    #[test]
    fn test_unclosed_element_closed_at_end() {
        let nodes = parse_fragment("<p>dangling");
        assert_eq!(nodes[0].tag(), Some("p"));
        assert_eq!(nodes[0].children(), &[ContentNode::text("dangling")]);
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let nodes = parse_fragment("3 < 5 and <em>ok</em>");
        assert_eq!(nodes[0], ContentNode::text("3 < 5 and "));
        assert_eq!(nodes[1].tag(), Some("em"));
    }

    #[test]
    fn test_comment_preserved() {
        let nodes = parse_fragment("a<!-- note -->b");
        assert_eq!(
            nodes,
            vec![
                ContentNode::text("a"),
                ContentNode::Comment(" note ".to_string()),
                ContentNode::text("b"),
            ]
        );
    }

    #[test]
    fn test_close_tag_pops_inner_elements() {
        // </div> implicitly closes the unclosed <em>
        let nodes = parse_fragment("<div><em>x</div>y");
        let div = &nodes[0];
        assert_eq!(div.tag(), Some("div"));
        assert_eq!(div.children()[0].tag(), Some("em"));
        assert_eq!(nodes[1], ContentNode::text("y"));
    }

    #[test]
    fn test_round_trip_well_formed_fragment() {
        let html = r#"<p class="intro">The capital is [Paris], not <em>[Rome]</em>.</p>"#;
        assert_eq!(render(&parse_fragment(html)), html);
    }

    #[test]
    fn test_utf8_text_survives() {
        let html = "<p>caf\u{e9} [r\u{e9}ponse] \u{4f60}\u{597d}</p>";
        assert_eq!(render(&parse_fragment(html)), html);
    }
}
