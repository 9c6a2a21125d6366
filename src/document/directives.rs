//! Extraction of the custom `md*` directives.
//!
//! Each pass consumes the node list and returns a rebuilt one together with
//! the records it found, in document order. Config, citation and footnote
//! directives are removed from the tree; captions stay where they are so
//! they can be rendered next to their figure or table.
//!
//! Attributes never fail: anything missing or malformed falls back to a
//! default.

use std::collections::HashMap;

use super::tree::{Element, Node, Rewrite, elements, rewrite};
use super::types::{Caption, Citation, Footnote, PaperConfig, TextAlign};

pub const CONFIG_TAG: &str = "mdConfig";
pub const CITATION_TAG: &str = "mdCitation";
pub const CAPTION_TAG: &str = "mdCaption";
pub const FOOTNOTE_TAG: &str = "mdFootnote";

/// Caption type used when a caption does not name one.
pub const DEFAULT_CAPTION_TYPE: &str = "figure";

/// Numbering state for auto-generated directive keys.
///
/// Scoped to one document: create a fresh value per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveCounters {
    citations: u32,
    captions: HashMap<String, u32>,
}

impl DirectiveCounters {
    fn next_citation(&mut self) -> u32 {
        self.citations += 1;
        self.citations
    }

    fn next_caption(&mut self, kind: &str) -> u32 {
        let count = self.captions.entry(kind.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Auto citation keys handed out so far.
    pub const fn citation_count(&self) -> u32 {
        self.citations
    }

    /// Auto caption keys handed out so far for `kind`.
    pub fn caption_count(&self, kind: &str) -> u32 {
        self.captions.get(kind).copied().unwrap_or(0)
    }
}

/// Read the first `mdConfig` directive and remove it.
///
/// Returns the default config when the document has none. Only the first
/// directive is honored; later ones are left alone.
pub fn extract_config(nodes: Vec<Node>) -> (Vec<Node>, PaperConfig) {
    let mut config = None;
    let nodes = rewrite(nodes, &mut |element: Element| {
        if config.is_none() && element.is(CONFIG_TAG) {
            config = Some(read_config(&element));
            return Rewrite::Remove;
        }
        Rewrite::Keep(element)
    });
    (nodes, config.unwrap_or_default())
}

fn read_config(element: &Element) -> PaperConfig {
    let defaults = PaperConfig::default();
    let text = |name: &str, default: String| {
        element
            .non_empty_attr(name)
            .map_or(default, std::borrow::Cow::into_owned)
    };

    PaperConfig {
        columns: element
            .non_empty_attr("columns")
            .and_then(|value| parse_leading_int(&value))
            .filter(|&columns| columns > 0)
            .unwrap_or(defaults.columns),
        padding: text("padding", defaults.padding),
        hyphens: match element.attr("hyphens").as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => defaults.hyphens,
        },
        cornell_size: text("cornellSize", defaults.cornell_size),
        font_size: text("fontSize", defaults.font_size),
        font_family: element
            .non_empty_attr("fontFamily")
            .map(|value| split_font_family(&value))
            .filter(|families| !families.is_empty())
            .unwrap_or(defaults.font_family),
        text_align: element
            .non_empty_attr("textAlign")
            .and_then(|value| TextAlign::parse(&value))
            .unwrap_or(defaults.text_align),
    }
}

/// Integer prefix of `value` after leading whitespace (`"3col"` is 3).
fn parse_leading_int(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

fn split_font_family(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|family| !family.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Lift every `mdCitation` out of the tree.
///
/// Citations without a `key` are numbered `1, 2, 3...`; explicit keys do not
/// advance the counter. Keys are always bracketed. A citation nested inside
/// another one gets its own record right after the outer one, while also
/// staying in the outer one's content.
pub fn process_citations(
    nodes: Vec<Node>,
    counters: &mut DirectiveCounters,
) -> (Vec<Node>, Vec<Citation>) {
    let mut citations = Vec::new();
    let nodes = rewrite(nodes, &mut |element: Element| {
        if !element.is(CITATION_TAG) {
            return Rewrite::Keep(element);
        }
        citations.push(read_citation(&element, counters));
        for nested in elements(&element.children).filter(|e| e.is(CITATION_TAG)) {
            citations.push(read_citation(nested, counters));
        }
        Rewrite::Remove
    });
    (nodes, citations)
}

fn read_citation(element: &Element, counters: &mut DirectiveCounters) -> Citation {
    let key = element
        .non_empty_attr("key")
        .map_or_else(|| counters.next_citation().to_string(), |key| key.into_owned());
    Citation {
        id: attr_or_empty(element, "id"),
        key: format!("[{key}]"),
        content: element.inner_html(),
    }
}

/// Collect every `mdCaption`, leaving the directives in place.
///
/// Captions without a `key` get `"{Type} {n}"`, counted per type.
pub fn process_captions(
    nodes: Vec<Node>,
    counters: &mut DirectiveCounters,
) -> (Vec<Node>, Vec<Caption>) {
    let mut captions = Vec::new();
    let nodes = rewrite(nodes, &mut |element: Element| {
        if element.is(CAPTION_TAG) {
            let kind = element
                .non_empty_attr("type")
                .map_or_else(|| DEFAULT_CAPTION_TYPE.to_string(), |kind| kind.into_owned());
            let key = element.non_empty_attr("key").map_or_else(
                || format!("{} {}", capitalize(&kind), counters.next_caption(&kind)),
                |key| key.into_owned(),
            );
            captions.push(Caption {
                id: attr_or_empty(&element, "id"),
                kind,
                key,
                content: element.inner_html(),
            });
        }
        Rewrite::Keep(element)
    });
    (nodes, captions)
}

/// Lift every `mdFootnote` out of the tree. Keys are never generated.
///
/// Nested footnotes are recorded after their outer footnote, like citations.
pub fn process_footnotes(nodes: Vec<Node>) -> (Vec<Node>, Vec<Footnote>) {
    let mut footnotes = Vec::new();
    let nodes = rewrite(nodes, &mut |element: Element| {
        if !element.is(FOOTNOTE_TAG) {
            return Rewrite::Keep(element);
        }
        footnotes.push(read_footnote(&element));
        footnotes.extend(
            elements(&element.children)
                .filter(|e| e.is(FOOTNOTE_TAG))
                .map(read_footnote),
        );
        Rewrite::Remove
    });
    (nodes, footnotes)
}

fn read_footnote(element: &Element) -> Footnote {
    Footnote {
        id: attr_or_empty(element, "id"),
        key: attr_or_empty(element, "key"),
        content: element.inner_html(),
    }
}

fn attr_or_empty(element: &Element, name: &str) -> String {
    element
        .attr(name)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default()
}

/// Upper-case the first character only (`"table"` -> `"Table"`).
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
