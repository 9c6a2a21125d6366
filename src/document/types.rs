//! Core document types.

use serde::Serialize;

use super::tree::{self, Node};

/// Horizontal alignment of body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
    Center,
    #[default]
    Justify,
}

impl TextAlign {
    /// Parse a CSS `text-align` keyword (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        [Self::Left, Self::Right, Self::Center, Self::Justify]
            .into_iter()
            .find(|align| align.as_css().eq_ignore_ascii_case(value))
    }

    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Justify => "justify",
        }
    }
}

/// Rendering parameters taken from the document's `mdConfig` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperConfig {
    /// Number of text columns per page
    pub columns: u32,
    /// Page padding as a CSS length
    pub padding: String,
    /// Automatic hyphenation
    pub hyphens: bool,
    /// Reserved sizing field for a Cornell-style notes margin
    pub cornell_size: String,
    /// Body font size as a CSS length
    pub font_size: String,
    /// Font fallback list, most preferred first
    pub font_family: Vec<String>,
    pub text_align: TextAlign,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            padding: "20mm".to_string(),
            hyphens: true,
            cornell_size: "0".to_string(),
            font_size: "9pt".to_string(),
            font_family: vec![
                "'CMU Serif'".to_string(),
                "Georgia".to_string(),
                "serif".to_string(),
            ],
            text_align: TextAlign::Justify,
        }
    }
}

impl PaperConfig {
    /// The fallback list as a CSS `font-family` value.
    pub fn font_family_css(&self) -> String {
        self.font_family.join(", ")
    }
}

/// A citation lifted out of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    /// Source anchor (may be empty)
    pub id: String,
    /// Display label, always bracketed (`[3]`)
    pub key: String,
    /// Inner markup of the directive, verbatim
    pub content: String,
}

/// A figure/table caption. Captions stay in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caption {
    pub id: String,
    /// Caption kind, `figure` unless given
    #[serde(rename = "type")]
    pub kind: String,
    /// Display label (`Figure 2`)
    pub key: String,
    pub content: String,
}

/// A footnote lifted out of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footnote {
    pub id: String,
    /// Display label; empty when the directive has none
    pub key: String,
    pub content: String,
}

/// A numbered heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Anchor id (`h2-1`)
    pub id: String,
    /// Logical level, 1 for `h2` through 5 for `h6`
    pub level: u8,
    /// Heading markup including the prefix (`2.1. Methods`)
    pub text: String,
    /// Dot-separated number (`2.1`)
    pub prefix: String,
}

/// Result of running the pipeline over one markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paper {
    /// Body tree with directives resolved
    pub nodes: Vec<Node>,
    pub config: PaperConfig,
    pub citations: Vec<Citation>,
    pub captions: Vec<Caption>,
    pub footnotes: Vec<Footnote>,
    pub headings: Vec<Heading>,
}

impl Paper {
    /// Body markup.
    pub fn to_html(&self) -> String {
        tree::to_html(&self.nodes)
    }

    /// Serializable view of the paper for JSON output.
    pub fn summary(&self) -> PaperSummary<'_> {
        PaperSummary {
            config: &self.config,
            citations: &self.citations,
            captions: &self.captions,
            footnotes: &self.footnotes,
            headings: &self.headings,
            body: self.to_html(),
        }
    }
}

/// Config, side-tables and body markup of a [`Paper`].
#[derive(Debug, Serialize)]
pub struct PaperSummary<'a> {
    pub config: &'a PaperConfig,
    pub citations: &'a [Citation],
    pub captions: &'a [Caption],
    pub footnotes: &'a [Footnote],
    pub headings: &'a [Heading],
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_align_parses_case_insensitively() {
        assert_eq!(TextAlign::parse("Center"), Some(TextAlign::Center));
        assert_eq!(TextAlign::parse(" left "), Some(TextAlign::Left));
        assert_eq!(TextAlign::parse("start"), None);
    }

    #[test]
    fn test_default_font_family_css() {
        assert_eq!(
            PaperConfig::default().font_family_css(),
            "'CMU Serif', Georgia, serif"
        );
    }

    #[test]
    fn test_summary_serializes_caption_type_and_camel_case_config() {
        let paper = Paper {
            captions: vec![Caption {
                id: "c".to_string(),
                kind: "table".to_string(),
                key: "Table 1".to_string(),
                content: "x".to_string(),
            }],
            ..Paper::default()
        };
        let json = serde_json::to_value(paper.summary()).unwrap();
        assert_eq!(json["captions"][0]["type"], "table");
        assert_eq!(json["config"]["fontSize"], "9pt");
        assert_eq!(json["config"]["textAlign"], "justify");
        assert_eq!(json["body"], "");
    }
}
