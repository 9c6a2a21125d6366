//! Reader for the HTML emitted by the markdown parser.
//!
//! html5ever builds the tree with the browser algorithm, so raw HTML passed
//! through from the markdown (`<script>`, a bare `<` in text, unclosed tags)
//! lands where a browser would put it. The fragment is parsed as the body of
//! a document and the body's children are converted to owned [`Node`]s.

use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ParseOpts, QualName, local_name, ns, parse_document};

use super::tree::{Element, Node};

/// Directive that carries only attributes. It is usually written
/// self-closed, which HTML ignores, so whatever the parser nested inside it
/// is moved back out after it.
const ATTRIBUTE_ONLY_DIRECTIVE: &str = "mdconfig";

static NO_NAME: QualName = QualName {
    prefix: None,
    ns: ns!(),
    local: local_name!(""),
};

/// Parse an HTML fragment into a node list.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    // No closing tags: an unclosed comment or raw-text element would take them as content.
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}");
    let sink = parse_document(FragmentSink::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    sink.into_nodes()
}

type Handle = usize;

const DOCUMENT: Handle = 0;

#[derive(Debug)]
enum SinkData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct SinkNode {
    data: SinkData,
    parent: Option<Handle>,
    children: Vec<Handle>,
}

impl SinkNode {
    const fn new(data: SinkData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Tree sink collecting html5ever's output into a flat node table.
#[derive(Debug)]
struct FragmentSink {
    nodes: RefCell<Vec<SinkNode>>,
}

impl Default for FragmentSink {
    fn default() -> Self {
        Self {
            nodes: RefCell::new(vec![SinkNode::new(SinkData::Document)]),
        }
    }
}

impl FragmentSink {
    fn create(&self, data: SinkData) -> Handle {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(SinkNode::new(data));
        nodes.len() - 1
    }

    /// Child element of `parent` with the given local name.
    fn child_named(&self, parent: Handle, local: &str) -> Option<Handle> {
        let nodes = self.nodes.borrow();
        nodes.get(parent)?.children.iter().copied().find(|&child| {
            matches!(
                nodes.get(child).map(|node| &node.data),
                Some(SinkData::Element { name, .. }) if &*name.local == local
            )
        })
    }

    fn into_nodes(self) -> Vec<Node> {
        let Some(body) = self
            .child_named(DOCUMENT, "html")
            .and_then(|html| self.child_named(html, "body"))
        else {
            return Vec::new();
        };
        let nodes = self.nodes.into_inner();
        let mut out = Vec::new();
        if let Some(body) = nodes.get(body) {
            convert(&nodes, &body.children, false, &mut out);
        }
        out
    }
}

/// Insert `child` into `parent` at `index` (or at the end), merging text
/// with a neighbouring text node.
fn insert(
    nodes: &mut Vec<SinkNode>,
    parent: Handle,
    index: Option<usize>,
    child: NodeOrText<Handle>,
) {
    let Some(len) = nodes.get(parent).map(|node| node.children.len()) else {
        return;
    };
    let index = index.unwrap_or(len).min(len);
    match child {
        NodeOrText::AppendText(text) => {
            let previous = nodes
                .get(parent)
                .and_then(|node| node.children.get(index.checked_sub(1)?))
                .copied();
            if let Some(SinkData::Text(existing)) =
                previous.and_then(|i| nodes.get_mut(i)).map(|node| &mut node.data)
            {
                existing.push_str(&text);
                return;
            }
            nodes.push(SinkNode::new(SinkData::Text(text.to_string())));
            let id = nodes.len() - 1;
            attach(nodes, parent, index, id);
        }
        NodeOrText::AppendNode(id) => {
            detach(nodes, id);
            let len = nodes.get(parent).map_or(0, |node| node.children.len());
            attach(nodes, parent, index.min(len), id);
        }
    }
}

fn attach(nodes: &mut [SinkNode], parent: Handle, index: usize, child: Handle) {
    if let Some(node) = nodes.get_mut(child) {
        node.parent = Some(parent);
    }
    if let Some(node) = nodes.get_mut(parent) {
        node.children.insert(index, child);
    }
}

fn detach(nodes: &mut [SinkNode], child: Handle) {
    let Some(parent) = nodes.get_mut(child).and_then(|node| node.parent.take()) else {
        return;
    };
    if let Some(node) = nodes.get_mut(parent) {
        node.children.retain(|&id| id != child);
    }
}

impl TreeSink for FragmentSink {
    type Handle = Handle;
    type Output = Self;
    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        tracing::trace!(%msg, "html parse error");
    }

    fn get_document(&self) -> Handle {
        DOCUMENT
    }

    fn elem_name<'a>(&'a self, target: &'a Handle) -> Ref<'a, QualName> {
        Ref::map(self.nodes.borrow(), |nodes| match nodes.get(*target) {
            Some(SinkNode {
                data: SinkData::Element { name, .. },
                ..
            }) => name,
            _ => &NO_NAME,
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Handle {
        self.create(SinkData::Element { name, attrs })
    }

    fn create_comment(&self, text: StrTendril) -> Handle {
        self.create(SinkData::Comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Handle {
        self.create(SinkData::Comment(data.to_string()))
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        insert(&mut self.nodes.borrow_mut(), *parent, None, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        let has_parent = self
            .nodes
            .borrow()
            .get(*element)
            .is_some_and(|node| node.parent.is_some());
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        *target
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes.get(*sibling).and_then(|node| node.parent) else {
            return;
        };
        let index = nodes
            .get(parent)
            .and_then(|node| node.children.iter().position(|id| id == sibling));
        insert(&mut nodes, parent, index, new_node);
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<Attribute>) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(SinkNode {
            data: SinkData::Element {
                attrs: existing, ..
            },
            ..
        }) = nodes.get_mut(*target)
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Handle) {
        detach(&mut self.nodes.borrow_mut(), *target);
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        let mut nodes = self.nodes.borrow_mut();
        let children = nodes
            .get_mut(*node)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            if let Some(node) = nodes.get_mut(child) {
                node.parent = None;
            }
            let end = nodes.get(*new_parent).map_or(0, |node| node.children.len());
            attach(&mut nodes, *new_parent, end, child);
        }
    }
}

/// Elements whose text is not escaped when serialized.
fn is_raw_text(name: &QualName) -> bool {
    name.ns == ns!(html)
        && matches!(
            name.local,
            local_name!("script")
                | local_name!("style")
                | local_name!("xmp")
                | local_name!("iframe")
                | local_name!("noembed")
                | local_name!("noframes")
                | local_name!("noscript")
                | local_name!("plaintext")
        )
}

fn is_void(name: &QualName) -> bool {
    name.ns == ns!(html)
        && matches!(
            name.local,
            local_name!("area")
                | local_name!("base")
                | local_name!("br")
                | local_name!("col")
                | local_name!("embed")
                | local_name!("hr")
                | local_name!("img")
                | local_name!("input")
                | local_name!("link")
                | local_name!("meta")
                | local_name!("source")
                | local_name!("track")
                | local_name!("wbr")
        )
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

fn convert(nodes: &[SinkNode], ids: &[Handle], raw_text: bool, out: &mut Vec<Node>) {
    for node in ids.iter().filter_map(|&id| nodes.get(id)) {
        match &node.data {
            SinkData::Text(text) if raw_text => out.push(Node::text(text.as_str())),
            SinkData::Text(text) => {
                out.push(Node::text(quick_xml::escape::partial_escape(text.as_str())));
            }
            SinkData::Comment(text) => out.push(Node::Raw(format!("<!--{text}-->"))),
            SinkData::Element { name, attrs } => {
                let mut element = Element::new(&*name.local);
                element.void = is_void(name);
                element.attrs = attrs
                    .iter()
                    .map(|attr| {
                        (
                            attribute_name(&attr.name),
                            quick_xml::escape::escape(&*attr.value).into_owned(),
                        )
                    })
                    .collect();
                let mut children = Vec::new();
                convert(nodes, &node.children, is_raw_text(name), &mut children);
                if element.is(ATTRIBUTE_ONLY_DIRECTIVE) {
                    out.push(Node::Element(element));
                    out.extend(children);
                } else {
                    element.children = children;
                    out.push(Node::Element(element));
                }
            }
            SinkData::Document => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tree::{elements, to_html};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_fragment_round_trips_simple_markup() {
        let html = "<h2>Title</h2>\n<p>Some <em>text</em></p>\n";
        let nodes = parse_fragment(html);
        assert_eq!(to_html(&nodes), html);
    }

    #[test]
    fn test_parse_fragment_reads_directive_and_attributes() {
        let nodes = parse_fragment(r#"<p><mdCitation id="c1" key="a">Ref</mdCitation></p>"#);
        let p = nodes[0].as_element().unwrap();
        let citation = p.children[0].as_element().unwrap();
        assert!(citation.is("mdCitation"));
        assert_eq!(citation.attr("id").as_deref(), Some("c1"));
        assert_eq!(citation.attr("key").as_deref(), Some("a"));
        assert_eq!(citation.inner_html(), "Ref");
    }

    #[test]
    fn test_text_is_escaped_again() {
        let nodes = parse_fragment("<p>a &amp; b &lt;c&gt; &nbsp;</p>");
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.inner_html(), "a &amp; b &lt;c&gt; \u{a0}");
        assert_eq!(p.children.len(), 1);
    }

    #[test]
    fn test_bare_less_than_stays_text() {
        let nodes = parse_fragment("<div>1 < 2</div>\n<h3>After</h3>\n<p>x</p>\n");
        assert_eq!(
            to_html(&nodes),
            "<div>1 &lt; 2</div>\n<h3>After</h3>\n<p>x</p>\n"
        );
        let div = nodes[0].as_element().unwrap();
        assert_eq!(div.children, vec![Node::text("1 &lt; 2")]);
    }

    #[test]
    fn test_script_body_is_raw_text() {
        let html = "<script>if (a<b) {}</script>\n<h3>After</h3>\n";
        let nodes = parse_fragment(html);
        assert_eq!(to_html(&nodes), html);
        let script = nodes[0].as_element().unwrap();
        assert_eq!(script.children, vec![Node::text("if (a<b) {}")]);
        assert!(elements(&nodes).any(|e| e.is("h3")));
    }

    #[test]
    fn test_style_body_is_raw_text() {
        let html = "<style>p > em { color: red; }</style>";
        assert_eq!(to_html(&parse_fragment(html)), html);
    }

    #[test]
    fn test_void_elements_take_no_children() {
        let nodes = parse_fragment("<p>a<br>b</p>");
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.children.len(), 3);
        assert!(p.children[1].as_element().unwrap().void);
        assert_eq!(to_html(&nodes), "<p>a<br />b</p>");
    }

    #[test]
    fn test_self_closed_config_does_not_swallow_siblings() {
        let nodes = parse_fragment("<mdConfig columns=\"3\" />\n<h2>Title</h2>\n<p>x</p>");
        let config = nodes[0].as_element().unwrap();
        assert!(config.children.is_empty());
        assert_eq!(config.attr("columns").as_deref(), Some("3"));
        assert_eq!(to_html(&nodes[1..]), "\n<h2>Title</h2>\n<p>x</p>");
    }

    #[test]
    fn test_unclosed_element_is_closed_by_parent_end() {
        let nodes = parse_fragment("<div><span>x</div><p>y</p>");
        assert_eq!(to_html(&nodes), "<div><span>x</span></div><p>y</p>");
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let nodes = parse_fragment("<p>x</p></section>");
        assert_eq!(to_html(&nodes), "<p>x</p>");
    }

    #[test]
    fn test_valueless_attribute_is_kept() {
        let nodes = parse_fragment("<input type=\"checkbox\" disabled>");
        let input = nodes[0].as_element().unwrap();
        assert_eq!(input.attr("disabled").as_deref(), Some(""));
    }

    #[test]
    fn test_attribute_value_is_escaped_in_tree() {
        let nodes = parse_fragment(r#"<mdCitation key="R&amp;D &quot;x&quot;">c</mdCitation>"#);
        let citation = nodes[0].as_element().unwrap();
        assert_eq!(citation.raw_attr("key"), Some("R&amp;D &quot;x&quot;"));
        assert_eq!(citation.attr("key").as_deref(), Some("R&D \"x\""));
    }

    #[test]
    fn test_comments_are_kept_raw() {
        let nodes = parse_fragment("<!-- note --><p>x</p>");
        assert_eq!(nodes[0], Node::Raw("<!-- note -->".to_string()));
    }

    #[test]
    fn test_unterminated_comment_runs_to_the_end() {
        let nodes = parse_fragment("<p>x</p><!-- never closed");
        assert_eq!(nodes[0].to_html(), "<p>x</p>");
        assert_eq!(nodes[1], Node::Raw("<!-- never closed-->".to_string()));
    }
}
