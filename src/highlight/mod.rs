//! Syntax highlighting for code blocks.
//!
//! The markdown parser does not know how code is highlighted; it is handed a
//! [`Highlighter`]. [`SyntectHighlighter`] uses syntect with Sublime Text
//! syntax definitions and emits class-based spans, styled by [`theme_css`].

use std::sync::OnceLock;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Language reported when the requested one is missing or unknown.
pub const PLAINTEXT: &str = "plaintext";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Highlighted code ready to be placed inside `<pre><code>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// Language actually used (`plaintext` on fallback)
    pub language: String,
    /// Escaped, highlighted markup
    pub html: String,
}

/// Code highlighting strategy used for fenced code blocks.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, code: &str, language: Option<&str>) -> Highlighted;
}

/// Escapes code without any highlighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language: Option<&str>) -> Highlighted {
        plain(code)
    }
}

/// Highlights with syntect's bundled syntaxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectHighlighter;

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: Option<&str>) -> Highlighted {
        let syntax_set = syntax_set();
        let Some((language, syntax)) = language
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .and_then(|lang| find_syntax(syntax_set, lang).map(|syntax| (lang, syntax)))
        else {
            return plain(code);
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!(language, %err, "highlighting failed, using plain text");
                return plain(code);
            }
        }

        Highlighted {
            language: language.to_string(),
            html: generator.finalize(),
        }
    }
}

fn plain(code: &str) -> Highlighted {
    Highlighted {
        language: PLAINTEXT.to_string(),
        html: quick_xml::escape::escape(code).into_owned(),
    }
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, language: &str) -> Option<&'a SyntaxReference> {
    syntax_set
        .find_syntax_by_token(language)
        .or_else(|| syntax_set.find_syntax_by_name(language))
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.theme_set.load_defaults");
        ThemeSet::load_defaults()
    })
}

/// Page background the code theme is chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightBackground {
    #[default]
    Light,
    Dark,
}

fn theme(background: HighlightBackground) -> Option<&'static Theme> {
    let themes = &theme_set().themes;
    let preferred = match background {
        HighlightBackground::Light => {
            ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"].as_slice()
        }
        HighlightBackground::Dark => [
            "base16-ocean.dark",
            "Solarized (dark)",
            "base16-eighties.dark",
        ]
        .as_slice(),
    };

    preferred
        .iter()
        .find_map(|name| themes.get(*name))
        .or_else(|| themes.values().next())
}

/// Stylesheet for the spans emitted by [`SyntectHighlighter`].
pub fn theme_css(background: HighlightBackground) -> String {
    let Some(theme) = theme(background) else {
        return String::new();
    };
    css_for_theme_with_class_style(theme, CLASS_STYLE).unwrap_or_else(|err| {
        tracing::warn!(%err, "failed to generate highlight theme css");
        String::new()
    })
}

/// Guess the background from the `COLORFGBG` convention (`"fg;bg"`).
///
/// Printed papers are light, so anything unparseable is treated as light.
pub fn background_from_colorfgbg(colorfgbg: Option<&str>) -> HighlightBackground {
    let Some(value) = colorfgbg else {
        return HighlightBackground::Light;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return HighlightBackground::Light;
    };

    if bg >= 7 {
        HighlightBackground::Light
    } else {
        HighlightBackground::Dark
    }
}
