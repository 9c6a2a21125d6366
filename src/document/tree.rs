//! Owned document tree produced from rendered markdown.
//!
//! Nodes are plain owned values. Transforms consume a `Vec<Node>` and build
//! a new one through [`rewrite`], so nothing is removed while it is being
//! walked.

use std::borrow::Cow;
use std::fmt::Write as _;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with a tag name, attributes and children.
    Element(Element),
    /// Text as markup (already escaped).
    Text(String),
    /// Comments, verbatim.
    Raw(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name; lowercase when read from HTML
    pub name: String,
    /// Attributes in source order; values are raw (still escaped)
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
    /// Written without a closing tag (`<br>`, `<img ... />`)
    pub void: bool,
}

/// Decision returned by a [`rewrite`] visitor.
#[derive(Debug)]
pub enum Rewrite {
    /// Keep the (possibly modified) element and continue into its children.
    Keep(Element),
    /// Keep the element as-is and do not visit its children.
    Skip(Element),
    /// Drop the element and everything below it.
    Remove,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Serialize this node back to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_html(out),
            Self::Text(text) | Self::Raw(text) => out.push_str(text),
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            void: false,
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Tag name comparison with HTML (ASCII case-insensitive) semantics.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Raw (still escaped) value of the first attribute named `name`.
    pub fn raw_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Unescaped value of the first attribute named `name`.
    ///
    /// Values that contain unknown entity references are returned raw.
    pub fn attr(&self, name: &str) -> Option<Cow<'_, str>> {
        let raw = self.raw_attr(name)?;
        Some(quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw)))
    }

    /// Attribute value treated as absent when empty.
    pub fn non_empty_attr(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attr(name).filter(|value| !value.is_empty())
    }

    /// Set an attribute from an unescaped value, replacing an existing one.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value: String = value.into();
        let value = quick_xml::escape::escape(value).into_owned();
        if let Some(slot) = self
            .attrs
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Markup of the children, verbatim.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    /// Replace the children with a single raw text node holding `markup`.
    pub fn set_inner_html(&mut self, markup: impl Into<String>) {
        self.children = vec![Node::Text(markup.into())];
        self.void = false;
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {key}=\"{}\"", value.replace('"', "&quot;"));
        }
        if self.void && self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// Serialize a node list back to markup.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Rebuild `nodes`, asking `visit` what to do with every element.
///
/// Elements are visited in document order (pre-order). Text and raw nodes
/// are carried over unchanged.
pub fn rewrite<F>(nodes: Vec<Node>, visit: &mut F) -> Vec<Node>
where
    F: FnMut(Element) -> Rewrite,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(element) => match visit(element) {
                Rewrite::Keep(mut element) => {
                    let children = std::mem::take(&mut element.children);
                    element.children = rewrite(children, visit);
                    out.push(Node::Element(element));
                }
                Rewrite::Skip(element) => out.push(Node::Element(element)),
                Rewrite::Remove => {}
            },
            other => out.push(other),
        }
    }
    out
}

/// Iterate over every element in document order.
pub fn elements(nodes: &[Node]) -> impl Iterator<Item = &Element> {
    let mut stack: Vec<&Node> = nodes.iter().rev().collect();
    std::iter::from_fn(move || {
        while let Some(node) = stack.pop() {
            if let Node::Element(element) = node {
                stack.extend(element.children.iter().rev());
                return Some(element);
            }
        }
        None
    })
}
