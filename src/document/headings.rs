//! Hierarchical heading numbering.
//!
//! `h2`..`h6` are logical levels 1..5 (`h1` is left alone). Each numbered
//! heading gets a prefix such as `2.1`, an anchor id such as `h2-1`, and its
//! text rewritten to `2.1. Text`.

use super::tree::{Element, Node, Rewrite, rewrite};
use super::types::Heading;

/// Number of numbered heading levels.
pub const LEVELS: usize = 5;

/// Leading marker that opts a heading out of numbering.
pub const ESCAPE_MARKER: &str = "[!]";

/// Per-level heading counters for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingCounters {
    counts: [u32; LEVELS],
}

impl HeadingCounters {
    pub const fn counts(&self) -> [u32; LEVELS] {
        self.counts
    }

    /// Count a heading at `level` (1-based) and return its display prefix.
    ///
    /// Deeper levels reset to zero. Zero counters shallower than `level` are
    /// displayed as 1 but keep their stored value.
    pub fn advance(&mut self, level: usize) -> String {
        debug_assert!((1..=LEVELS).contains(&level), "heading level {level}");
        let level = level.clamp(1, LEVELS);
        self.counts[level - 1] = self.counts[level - 1].saturating_add(1);
        for count in &mut self.counts[level..] {
            *count = 0;
        }
        self.counts[..level]
            .iter()
            .map(|count| (*count).max(1).to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Logical level of a heading element (`h2` is 1, `h6` is 5).
pub fn heading_level(element: &Element) -> Option<usize> {
    let name = element.name.as_bytes();
    if name.len() != 2 || !name[0].eq_ignore_ascii_case(&b'h') {
        return None;
    }
    match name[1] {
        digit @ b'2'..=b'6' => Some(usize::from(digit - b'1')),
        _ => None,
    }
}

/// Anchor id for a numbered heading (`2.1` -> `h2-1`).
pub fn anchor_id(prefix: &str) -> String {
    format!("h{}", prefix.replace('.', "-"))
}

/// Number every heading in document order.
pub fn number_headings(
    nodes: Vec<Node>,
    counters: &mut HeadingCounters,
) -> (Vec<Node>, Vec<Heading>) {
    let mut headings = Vec::new();
    let nodes = rewrite(nodes, &mut |mut element: Element| {
        let Some(level) = heading_level(&element) else {
            return Rewrite::Keep(element);
        };

        if element.inner_html().starts_with(ESCAPE_MARKER) {
            strip_marker(&mut element);
            let id: String = element
                .inner_html()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            element.set_attr("id", id);
            return Rewrite::Skip(element);
        }

        let prefix = counters.advance(level);
        let id = anchor_id(&prefix);
        prepend_text(&mut element, &format!("{prefix}. "));
        element.set_attr("id", id.clone());
        headings.push(Heading {
            id,
            level: u8::try_from(level).unwrap_or(u8::MAX),
            text: element.inner_html(),
            prefix,
        });
        Rewrite::Skip(element)
    });
    (nodes, headings)
}

fn strip_marker(element: &mut Element) {
    if let Some(Node::Text(text)) = element.children.first_mut()
        && let Some(rest) = text.strip_prefix(ESCAPE_MARKER)
    {
        *text = rest.to_string();
        return;
    }
    // The marker spans several nodes; fall back to rewriting the markup.
    let inner = element.inner_html();
    if let Some(rest) = inner.strip_prefix(ESCAPE_MARKER) {
        element.set_inner_html(rest);
    }
}

fn prepend_text(element: &mut Element, text: &str) {
    if let Some(Node::Text(first)) = element.children.first_mut() {
        first.insert_str(0, text);
    } else {
        element.children.insert(0, Node::text(text));
    }
}
