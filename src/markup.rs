//! Structured markup tree
//!
//! Renderers build `Node` trees instead of concatenating strings. Every text
//! node and attribute value passes through `escape_html` exactly once, in
//! `Node::write_html`, so user content can never break out of its slot.

use std::fmt::Write;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["img", "input", "br", "hr", "link", "meta"];

/// Escape text for use in element content or a quoted attribute value
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A single attribute; `value: None` renders as a bare boolean attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: &'static str,
    pub value: Option<String>,
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

/// Markup tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push(Attr {
            name,
            value: Some(value.into()),
        });
        self
    }

    /// Bare boolean attribute (`allowfullscreen`, `checked`)
    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push(Attr { name, value: None });
        self
    }

    /// Boolean attribute present only when `on`
    pub fn flag_if(self, name: &'static str, on: bool) -> Self {
        if on { self.flag(name) } else { self }
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Value of the first attribute called `name`
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Serialize to HTML, escaping all text and attribute values
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Element(element) => {
                out.push('<');
                out.push_str(element.tag);
                for attr in &element.attrs {
                    match &attr.value {
                        Some(value) => {
                            let _ = write!(out, " {}=\"{}\"", attr.name, escape_html(value));
                        }
                        None => {
                            let _ = write!(out, " {}", attr.name);
                        }
                    }
                }
                out.push('>');
                if element.is_void() {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }

    /// Concatenated unescaped text of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Depth-first search for elements carrying `class`
    pub fn find_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if let Node::Element(element) = self {
            if element.has_class(class) {
                found.push(element);
            }
            for child in &element.children {
                child.find_by_class(class, found);
            }
        }
    }
}

/// Serialize a sibling list, as installed into a container's inner HTML
pub fn fragment_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// All elements in a fragment carrying `class`
pub fn select_class<'a>(nodes: &'a [Node], class: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    for node in nodes {
        node.find_by_class(class, &mut found);
    }
    found
}
