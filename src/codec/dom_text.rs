//! Bidirectional mapping between the plain-string cell model (newlines as
//! `\n`) and the contenteditable fragment shown while a cell is edited.
//!
//! Browsers render literal `\n` inconsistently inside contenteditable
//! regions, so line breaks travel as `<br>` elements. A trailing `<br>` with
//! nothing after it collapses and becomes invisible and un-deletable, so the
//! encoder anchors it with a zero-width space: the caret has somewhere to
//! land and Backspace has a final grapheme to target.

/// Zero-width space used as the caret anchor after a trailing line break.
pub const ZWS: char = '\u{200B}';

/// A parsed contenteditable fragment node. Only `<br>` carries meaning for
/// the text model; any other element is transparent and contributes just its
/// children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Br,
    Element(Vec<Node>),
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Encode a cell value as markup used to seed the editing surface.
///
/// Newlines become `<br>`; if the result ends with a break, one zero-width
/// space is appended after it as a caret anchor.
pub fn encode(value: &str) -> String {
    let mut out = String::new();
    for (i, line) in value.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        out.push_str(&escape_html(line));
    }
    if out.ends_with("<br>") {
        out.push(ZWS);
    }
    out
}

/// Parse markup read back from the editing surface into a fragment.
///
/// Lenient by design: `<br>`, `<br/>` and attribute-carrying breaks are
/// breaks; any other tag opens a transparent element; unclosed elements are
/// closed at end of input; unknown entities stay literal.
pub fn parse_fragment(markup: &str) -> Vec<Node> {
    let mut stack: Vec<Vec<Node>> = vec![Vec::new()];
    let mut text = String::new();
    let mut chars = markup.chars().peekable();

    fn flush(text: &mut String, stack: &mut [Vec<Node>]) {
        if !text.is_empty() {
            stack
                .last_mut()
                .expect("parse stack never empty")
                .push(Node::Text(std::mem::take(text)));
        }
    }

    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                let mut tag = String::new();
                for c in chars.by_ref() {
                    if c == '>' {
                        break;
                    }
                    tag.push(c);
                }
                flush(&mut text, &mut stack);
                let tag = tag.trim().to_ascii_lowercase();
                if let Some(_closed) = tag.strip_prefix('/') {
                    if stack.len() > 1 {
                        let children = stack.pop().expect("checked len above");
                        stack
                            .last_mut()
                            .expect("parse stack never empty")
                            .push(Node::Element(children));
                    }
                } else {
                    let name = tag
                        .split(|c: char| c.is_whitespace() || c == '/')
                        .next()
                        .unwrap_or("");
                    let top = stack.last_mut().expect("parse stack never empty");
                    if name == "br" {
                        top.push(Node::Br);
                    } else if tag.ends_with('/') {
                        top.push(Node::Element(Vec::new()));
                    } else {
                        stack.push(Vec::new());
                    }
                }
            }
            '&' => {
                let mut entity = String::new();
                let mut terminated = false;
                while let Some(&c) = chars.peek() {
                    if c == ';' {
                        chars.next();
                        terminated = true;
                        break;
                    }
                    if entity.len() >= 8 || c == '&' || c == '<' {
                        break;
                    }
                    entity.push(c);
                    chars.next();
                }
                match (terminated, entity.as_str()) {
                    (true, "amp") => text.push('&'),
                    (true, "lt") => text.push('<'),
                    (true, "gt") => text.push('>'),
                    (true, "quot") => text.push('"'),
                    (true, "#39") | (true, "#x27") | (true, "apos") => text.push('\''),
                    (true, "nbsp") => text.push(' '),
                    _ => {
                        text.push('&');
                        text.push_str(&entity);
                        if terminated {
                            text.push(';');
                        }
                    }
                }
            }
            _ => text.push(ch),
        }
    }
    flush(&mut text, &mut stack);

    while stack.len() > 1 {
        let children = stack.pop().expect("checked len above");
        stack
            .last_mut()
            .expect("parse stack never empty")
            .push(Node::Element(children));
    }
    stack.pop().expect("parse stack never empty")
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Br => out.push('\n'),
            Node::Element(children) => collect_text(children, out),
        }
    }
}

/// Decode a fragment back into the plain-string cell model.
///
/// The trailing-break rule: a fragment whose last contributing node is a bare
/// `<br>` (no caret anchor after it) carries a padding break the browser
/// inserted, not a newline the user typed, so exactly one trailing `\n` is
/// stripped. Encoded content always ends in either text or the zero-width
/// anchor, so a pristine encode/decode cycle never loses a newline. The strip
/// happens before anchors are removed, and at most once per decode.
pub fn decode_nodes(nodes: &[Node]) -> String {
    let mut raw = String::new();
    collect_text(nodes, &mut raw);
    if raw.ends_with('\n') {
        raw.pop();
    }
    raw.chars().filter(|&c| c != ZWS).collect()
}

/// Convenience: parse then decode in one step, as the commit path does.
pub fn decode(markup: &str) -> String {
    decode_nodes(&parse_fragment(markup))
}

/// Caret position inside a flat fragment: `node` indexes the top-level node
/// list (`nodes.len()` means end of fragment), `offset` is a char offset
/// within a text node and 0 for any other node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    pub node: usize,
    pub offset: usize,
}

impl Caret {
    pub fn start() -> Self {
        Caret { node: 0, offset: 0 }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Caret at the very end of the fragment's content.
pub fn caret_end(nodes: &[Node]) -> Caret {
    match nodes.last() {
        Some(Node::Text(t)) => Caret {
            node: nodes.len() - 1,
            offset: char_len(t),
        },
        _ => Caret {
            node: nodes.len(),
            offset: 0,
        },
    }
}

fn is_zws_node(node: &Node) -> bool {
    matches!(node, Node::Text(t) if t.chars().eq(std::iter::once(ZWS)))
}

fn at_end(nodes: &[Node], caret: Caret) -> bool {
    caret == caret_end(nodes)
}

/// Alt/Option+Enter: insert a soft line break at the caret.
///
/// When the break lands at the end of content, the old trailing anchor (if
/// any) is dropped and a fresh zero-width space is appended after the new
/// break, so the final break stays visible and deletable. Returns the caret
/// placed immediately after the inserted break.
pub fn insert_soft_break(nodes: &mut Vec<Node>, caret: Caret) -> Caret {
    if at_end(nodes, caret) {
        if nodes.last().is_some_and(is_zws_node) {
            nodes.pop();
        }
        nodes.push(Node::Br);
        nodes.push(Node::Text(ZWS.to_string()));
        return Caret {
            node: nodes.len() - 1,
            offset: 0,
        };
    }

    if caret.node >= nodes.len() {
        nodes.push(Node::Br);
        return caret_end(nodes);
    }

    match &mut nodes[caret.node] {
        Node::Text(t) => {
            let split = byte_offset(t, caret.offset);
            let tail = t.split_off(split);
            let mut insert_at = caret.node + 1;
            if t.is_empty() {
                nodes.remove(caret.node);
                insert_at = caret.node;
            }
            nodes.insert(insert_at, Node::Br);
            if !tail.is_empty() {
                nodes.insert(insert_at + 1, Node::Text(tail));
            }
            Caret {
                node: insert_at + 1,
                offset: 0,
            }
        }
        _ => {
            nodes.insert(caret.node, Node::Br);
            Caret {
                node: caret.node + 1,
                offset: 0,
            }
        }
    }
}

/// Backspace at the caret, with the zero-width-anchor special case.
///
/// When the caret sits just past a lone zero-width space whose neighbour to
/// the left is a `<br>`, one keystroke must remove both: otherwise the user
/// deletes an invisible character first and needs a second press to remove
/// the visible line break. Returns the new caret.
pub fn backspace(nodes: &mut Vec<Node>, caret: Caret) -> Caret {
    // Anchor case: caret after the lone zero-width space of a trailing break.
    if caret.node < nodes.len()
        && caret.offset == 1
        && is_zws_node(&nodes[caret.node])
        && caret.node > 0
        && nodes[caret.node - 1] == Node::Br
    {
        nodes.remove(caret.node);
        nodes.remove(caret.node - 1);
        return caret_end(nodes);
    }

    if caret.node < nodes.len() && caret.offset > 0 {
        if let Node::Text(t) = &mut nodes[caret.node] {
            let end = byte_offset(t, caret.offset);
            let start = byte_offset(t, caret.offset - 1);
            t.replace_range(start..end, "");
            if t.is_empty() {
                nodes.remove(caret.node);
                return Caret {
                    node: caret.node,
                    offset: 0,
                };
            }
            return Caret {
                node: caret.node,
                offset: caret.offset - 1,
            };
        }
    }

    // Caret at a node boundary: delete into the previous node.
    if caret.node == 0 {
        return caret;
    }
    let prev = caret.node - 1;
    match &mut nodes[prev] {
        Node::Text(t) => {
            let len = char_len(t);
            let end = t.len();
            let start = byte_offset(t, len - 1);
            t.replace_range(start..end, "");
            if t.is_empty() {
                nodes.remove(prev);
                Caret {
                    node: prev,
                    offset: 0,
                }
            } else {
                Caret {
                    node: prev,
                    offset: len - 1,
                }
            }
        }
        Node::Br | Node::Element(_) => {
            nodes.remove(prev);
            Caret {
                node: prev,
                offset: 0,
            }
        }
    }
}
