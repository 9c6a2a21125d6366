use pretty_assertions::assert_eq;
use proptest::prelude::*;

use paperset::document::directives::extract_config;
use paperset::document::html::parse_fragment;
use paperset::document::tree::elements;
use paperset::document::{Citation, Heading, Paper, PaperConfig, Pipeline, TextAlign};
use paperset::highlight::{PlainHighlighter, SyntectHighlighter};
use paperset::layout::{RenderOptions, paginate, render_document};

const PAPER: &str = include_str!("fixtures/paper.md");

fn run(markdown: &str) -> Paper {
    Pipeline::new(Box::new(PlainHighlighter)).run(markdown).unwrap()
}

fn has_element(paper: &Paper, name: &str) -> bool {
    elements(&paper.nodes).any(|e| e.is(name))
}

#[test]
fn test_title_and_citation_end_to_end() {
    let paper = run("# Title\n\n<mdCitation key=\"a\">Ref</mdCitation>");

    assert_eq!(
        paper.headings,
        vec![Heading {
            id: "h1".to_string(),
            level: 1,
            text: "1. Title".to_string(),
            prefix: "1".to_string(),
        }]
    );
    assert_eq!(
        paper.citations,
        vec![Citation {
            id: String::new(),
            key: "[a]".to_string(),
            content: "Ref".to_string(),
        }]
    );
    assert!(!has_element(&paper, "mdCitation"));
}

#[test]
fn test_fixture_config() {
    let paper = run(PAPER);
    assert_eq!(
        paper.config,
        PaperConfig {
            padding: "18mm".to_string(),
            font_size: "10pt".to_string(),
            font_family: vec!["Palatino".to_string(), "serif".to_string()],
            text_align: TextAlign::Left,
            ..PaperConfig::default()
        }
    );
    assert!(!has_element(&paper, "mdConfig"));
}

#[test]
fn test_fixture_citations() {
    let paper = run(PAPER);
    let keys: Vec<_> = paper.citations.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["[Ifrah]", "[1]", "[2]"]);
    assert_eq!(
        paper.citations[0].content,
        "G. Ifrah, <em>The Universal History of Numbers</em>"
    );
    assert_eq!(paper.citations[2].id, "knuth");
}

#[test]
fn test_fixture_captions_stay_inline() {
    let paper = run(PAPER);
    let keys: Vec<_> = paper.captions.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["Table 1", "Figure 1", "Figure 2"]);
    assert_eq!(paper.captions[0].kind, "table");
    assert_eq!(elements(&paper.nodes).filter(|e| e.is("mdCaption")).count(), 3);
}

#[test]
fn test_fixture_footnotes() {
    let paper = run(PAPER);
    assert_eq!(paper.footnotes.len(), 2);
    assert_eq!(paper.footnotes[0].id, "note-parts");
    assert_eq!(paper.footnotes[0].key, "");
    assert_eq!(paper.footnotes[1].key, "*");
    assert!(!has_element(&paper, "mdFootnote"));
}

#[test]
fn test_fixture_headings() {
    let paper = run(PAPER);
    let numbered: Vec<_> = paper
        .headings
        .iter()
        .map(|h| (h.prefix.as_str(), h.text.as_str()))
        .collect();
    assert_eq!(
        numbered,
        vec![
            ("1", "1. Introduction"),
            ("1.1", "1.1. Scope"),
            ("1.2", "1.2. Method"),
            ("2", "2. Results"),
        ]
    );

    let ids: Vec<_> = elements(&paper.nodes)
        .filter(|e| e.is("h2"))
        .filter_map(|e| e.attr("id").map(|id| id.into_owned()))
        .collect();
    assert_eq!(
        ids,
        vec!["AStudyofNumberedThings", "Abstract", "h1", "h2"]
    );
}

#[test]
fn test_fixture_renders_with_syntect() {
    let paper = Pipeline::new(Box::new(SyntectHighlighter)).run(PAPER).unwrap();
    let html = paper.to_html();
    assert!(html.contains("class=\"hl-code language-rust\""));
    assert!(!html.contains("<mdCitation"));
}

#[test]
fn test_fixture_page_shell() {
    let paper = run(PAPER);
    let html = render_document(&paper, &paginate(&paper), &RenderOptions::default());
    assert!(html.contains("--paper-text-align: left;"));
    assert!(html.contains("--paper-font-family: Palatino, serif;"));
    assert!(html.contains("<li id=\"knuth\">[2] D. Knuth, <em>The TeXbook</em></li>"));
    assert!(html.contains("<li id=\"note-parts\">Sections, figures and references.</li>"));
}

#[test]
fn test_config_extraction_is_idempotent_on_stripped_tree() {
    let nodes = parse_fragment("<p>No config here</p>");
    let (nodes, first) = extract_config(nodes);
    let (_, second) = extract_config(nodes);
    assert_eq!(first, PaperConfig::default());
    assert_eq!(second, PaperConfig::default());
}

#[test]
fn test_partial_config_defaults_the_rest() {
    let paper = run("<mdConfig hyphens=\"false\" columns=\"3col\" />\n\nBody");
    assert_eq!(
        paper.config,
        PaperConfig {
            columns: 3,
            hyphens: false,
            ..PaperConfig::default()
        }
    );

    let paper = run("<mdConfig hyphens=\"yes\" />\n\nBody");
    assert!(paper.config.hyphens);
}

fn caption_kind() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("figure"), Just("table"), Just("listing")]
}

proptest! {
    #[test]
    fn prop_auto_citation_keys_are_sequential(explicit in prop::collection::vec(any::<bool>(), 0..24)) {
        let markdown: String = explicit
            .iter()
            .enumerate()
            .map(|(i, &explicit)| {
                if explicit {
                    format!("P{i}<mdCitation key=\"k{i}\">c</mdCitation>\n\n")
                } else {
                    format!("P{i}<mdCitation>c</mdCitation>\n\n")
                }
            })
            .collect();
        let paper = run(&markdown);

        prop_assert_eq!(paper.citations.len(), explicit.len());
        let mut next_auto = 1;
        for (i, (citation, &explicit)) in paper.citations.iter().zip(&explicit).enumerate() {
            if explicit {
                prop_assert_eq!(&citation.key, &format!("[k{i}]"));
            } else {
                prop_assert_eq!(&citation.key, &format!("[{next_auto}]"));
                next_auto += 1;
            }
        }
    }

    #[test]
    fn prop_caption_counters_are_per_type(kinds in prop::collection::vec(caption_kind(), 0..24)) {
        let markdown: String = kinds
            .iter()
            .map(|kind| format!("Text <mdCaption type=\"{kind}\">c</mdCaption>\n\n"))
            .collect();
        let paper = run(&markdown);

        prop_assert_eq!(paper.captions.len(), kinds.len());
        for (i, caption) in paper.captions.iter().enumerate() {
            let kind = kinds[i];
            let n = kinds[..=i].iter().filter(|k| **k == kind).count();
            let mut label = kind.to_string();
            label[..1].make_ascii_uppercase();
            prop_assert_eq!(&caption.key, &format!("{label} {n}"));
        }
    }

    #[test]
    fn prop_heading_prefix_depth_matches_level(levels in prop::collection::vec(1usize..=5, 0..32)) {
        let markdown: String = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| format!("{} Heading {i}\n\n", "#".repeat(level)))
            .collect();
        let paper = run(&markdown);

        prop_assert_eq!(paper.headings.len(), levels.len());
        for (heading, &level) in paper.headings.iter().zip(&levels) {
            prop_assert_eq!(usize::from(heading.level), level);
            let segments: Vec<u32> = heading
                .prefix
                .split('.')
                .map(|s| s.parse().unwrap())
                .collect();
            prop_assert_eq!(segments.len(), level);
            prop_assert!(segments.iter().all(|&n| n >= 1));
            prop_assert_eq!(&heading.id, &format!("h{}", heading.prefix.replace('.', "-")));
            let expected_prefix = format!("{}. ", heading.prefix);
            prop_assert!(heading.text.starts_with(&expected_prefix));
        }
    }
}
