//! Markdown parsing with comrak.
//!
//! comrak renders the markdown to HTML with raw HTML passed through, so the
//! `md*` directives survive as elements. Before rendering, heading levels
//! are shifted and code blocks are swapped for highlighted markup.

use comrak::nodes::{NodeCodeBlock, NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options, format_html, parse_document};

use super::error::PipelineError;
use super::html::parse_fragment;
use super::tree::Node;
use crate::highlight::Highlighter;

/// Highest heading level HTML supports.
const MAX_HEADING_LEVEL: u8 = 6;

/// Options for the markdown stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Added to every markdown heading level (`# Title` renders as `<h2>`
    /// with the default of 1). Raw HTML headings are not shifted.
    pub heading_offset: u8,
    /// Enable GitHub-flavored extensions (tables, strikethrough, ...)
    pub gfm: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            heading_offset: 1,
            gfm: true,
        }
    }
}

/// Parse markdown source into a node list.
pub fn parse(
    source: &str,
    options: &ParseOptions,
    highlighter: &dyn Highlighter,
) -> Result<Vec<Node>, PipelineError> {
    let html = render_html(source, options, highlighter)?;
    Ok(parse_fragment(&html))
}

/// Render markdown source to HTML.
pub fn render_html(
    source: &str,
    options: &ParseOptions,
    highlighter: &dyn Highlighter,
) -> Result<String, PipelineError> {
    let arena = Arena::new();
    let comrak_options = create_options(options);
    let root = parse_document(&arena, source, &comrak_options);

    for node in root.descendants() {
        let mut ast = node.data.borrow_mut();
        let replacement = match &mut ast.value {
            NodeValue::Heading(heading) => {
                heading.level = shift_level(heading.level, options.heading_offset);
                None
            }
            NodeValue::CodeBlock(block) => Some(code_block_html(block, highlighter)),
            _ => None,
        };
        if let Some(literal) = replacement {
            ast.value = NodeValue::HtmlBlock(NodeHtmlBlock {
                block_type: 0,
                literal,
            });
        }
    }

    let mut html = Vec::new();
    format_html(root, &comrak_options, &mut html)?;
    Ok(String::from_utf8(html)?)
}

fn create_options(options: &ParseOptions) -> Options<'static> {
    let mut comrak_options = Options::default();

    if options.gfm {
        comrak_options.extension.strikethrough = true;
        comrak_options.extension.table = true;
        comrak_options.extension.autolink = true;
        comrak_options.extension.tasklist = true;
        comrak_options.extension.footnotes = true;
        comrak_options.extension.superscript = true;
        comrak_options.extension.shortcodes = true;
    }

    // Directives are raw HTML; keep them.
    comrak_options.render.unsafe_ = true;

    comrak_options
}

fn shift_level(level: u8, offset: u8) -> u8 {
    level.saturating_add(offset).min(MAX_HEADING_LEVEL)
}

fn code_block_html(block: &NodeCodeBlock, highlighter: &dyn Highlighter) -> String {
    let language = block.info.split_whitespace().next();
    let highlighted = highlighter.highlight(&block.literal, language);
    format!(
        "<pre><code class=\"hl-code language-{}\">{}</code></pre>\n",
        quick_xml::escape::escape(highlighted.language.as_str()),
        highlighted.html
    )
}
