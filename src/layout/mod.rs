//! Page layout and the standalone HTML page shell.
//!
//! Pagination is a single page for now: the whole body goes into
//! `page-1` and the browser's multi-column layout does the rest.

use std::fmt::Write as _;

use quick_xml::escape::escape;
use serde::Serialize;

use crate::document::{Paper, PaperConfig};

/// One printed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Element id (`page-1`)
    pub id: String,
    pub number: u32,
    /// Markup shown above the columns
    pub header: String,
    /// Markup shown below the columns
    pub footer: String,
    /// Body markup
    pub content: String,
}

/// Split a paper into pages.
pub fn paginate(paper: &Paper) -> Vec<Page> {
    let _scope = crate::perf::scope("layout.paginate");
    vec![Page {
        id: "page-1".to_string(),
        number: 1,
        header: String::new(),
        footer: String::new(),
        content: paper.to_html(),
    }]
}

/// Options for [`render_document`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// `<title>` of the page
    pub title: Option<String>,
    /// Stylesheet for highlighted code
    pub code_css: String,
}

/// CSS custom properties derived from the paper config.
pub fn config_css(config: &PaperConfig) -> String {
    let hyphens = if config.hyphens { "auto" } else { "manual" };
    let mut css = String::from(":root {\n");
    let vars = [
        ("columns", config.columns.to_string()),
        ("padding", config.padding.clone()),
        ("hyphens", hyphens.to_string()),
        ("font-size", config.font_size.clone()),
        ("font-family", config.font_family_css()),
        ("text-align", config.text_align.as_css().to_string()),
        ("cornell-size", config.cornell_size.clone()),
    ];
    for (name, value) in vars {
        let _ = writeln!(css, "  --paper-{name}: {};", sanitize_css_value(&value));
    }
    css.push_str("}\n");
    css
}

/// Keep config values from closing the declaration or the `<style>` block.
fn sanitize_css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

/// Render the complete HTML document for `paper`.
pub fn render_document(paper: &Paper, pages: &[Page], options: &RenderOptions) -> String {
    let _scope = crate::perf::scope("layout.render_document");
    let title = options.title.as_deref().unwrap_or("Paper");

    let mut doc = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>",
    );
    doc.push_str(&escape(title));
    doc.push_str("</title>\n<style>\n");
    doc.push_str(&config_css(&paper.config));
    doc.push_str(&options.code_css);
    doc.push_str("</style>\n</head>\n<body>\n<div class=\"paper-pages\">\n");

    for page in pages {
        render_page(&mut doc, page);
    }

    if !paper.citations.is_empty() {
        doc.push_str("<section class=\"paper-references\">\n<h2>References</h2>\n<ol>\n");
        for citation in &paper.citations {
            list_item(&mut doc, &citation.id, &citation.key, &citation.content);
        }
        doc.push_str("</ol>\n</section>\n");
    }

    if !paper.footnotes.is_empty() {
        doc.push_str("<section class=\"paper-notes\">\n<h2>Notes</h2>\n<ol>\n");
        for footnote in &paper.footnotes {
            list_item(&mut doc, &footnote.id, &footnote.key, &footnote.content);
        }
        doc.push_str("</ol>\n</section>\n");
    }

    doc.push_str("</div>\n</body>\n</html>\n");
    doc
}

fn render_page(doc: &mut String, page: &Page) {
    let _ = writeln!(doc, "<div id=\"{}\" class=\"paper-page\">", escape(page.id.as_str()));
    let _ = writeln!(
        doc,
        "<div class=\"paper-page-header\">{}<p class=\"paper-page-no\">{}</p></div>",
        page.header, page.number
    );
    doc.push_str("<div class=\"paper-page-content\">\n<div class=\"paper-page-columns\">\n");
    doc.push_str(&page.content);
    doc.push_str("</div>\n</div>\n");
    let _ = writeln!(
        doc,
        "<div class=\"paper-page-footer\"><p class=\"paper-page-no\">{}</p>{}</div>",
        page.number, page.footer
    );
    doc.push_str("</div>\n");
}

/// `<li>` for a citation or footnote. Content is markup and goes in as is.
fn list_item(doc: &mut String, id: &str, key: &str, content: &str) {
    doc.push_str("<li");
    if !id.is_empty() {
        let _ = write!(doc, " id=\"{}\"", escape(id));
    }
    doc.push('>');
    if !key.is_empty() {
        let _ = write!(doc, "{} ", escape(key));
    }
    doc.push_str(content);
    doc.push_str("</li>\n");
}
