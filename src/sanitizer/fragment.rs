//! Markup fragment tree: building from tokens and serializing back
//!
//! A small tree builder. It understands void elements,
//! raw-text elements and end tags that close intervening elements, which is
//! enough to give filtering a well-formed tree to work on. The serializer
//! always emits well-formed, fully escaped markup, so parsing serialized
//! output yields the same tree.

use logos::Logos;

use super::entities::{decode, escape_attribute, escape_text};
use super::lexer::{raw_text_end, Tag, Token};
use super::policy;

/// Open elements deeper than this are ignored (their content is kept)
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn from_tag(tag: Tag) -> Self {
        Self {
            name: tag.name,
            attributes: tag.attributes,
            children: vec![],
        }
    }
}

/// A parsed markup fragment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    /// Parse untrusted markup. Never fails; unparseable input becomes text.
    pub fn parse(source: &str) -> Self {
        let mut builder = TreeBuilder::default();
        let mut lex = Token::lexer(source);

        while let Some(token) = lex.next() {
            match token {
                Ok(Token::StartTag(tag)) if policy::is_raw_text(&tag.name) => {
                    let (content_len, consumed) = raw_text_end(lex.remainder(), &tag.name);
                    let body = lex.remainder()[..content_len].to_string();
                    lex.bump(consumed);
                    builder.raw_text_element(tag, body);
                }
                Ok(Token::StartTag(tag)) => builder.start(tag),
                Ok(Token::EndTag(name)) => builder.end(&name),
                Ok(Token::Text(text)) => builder.text(&decode(&text)),
                Ok(Token::Lt) => builder.text("<"),
                Ok(Token::Comment) | Ok(Token::Declaration) => {}
                Err(()) => builder.text(lex.slice()),
            }
        }

        Fragment {
            nodes: builder.finish(),
        }
    }

    /// Serialize the fragment to markup
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, &mut out);
        out
    }

    /// Concatenated text of every text node, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn children(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        push_text(self.children(), text);
    }

    fn start(&mut self, tag: Tag) {
        if self.open.len() >= MAX_DEPTH {
            log::debug!("ignoring <{}> nested deeper than {}", tag.name, MAX_DEPTH);
            return;
        }
        let element = Element::from_tag(tag);
        if policy::is_void(&element.name) {
            self.children().push(Node::Element(element));
        } else {
            self.open.push(element);
        }
    }

    fn raw_text_element(&mut self, tag: Tag, body: String) {
        let mut element = Element::from_tag(tag);
        if !body.is_empty() {
            element.children.push(Node::Text(body));
        }
        self.children().push(Node::Element(element));
    }

    /// Close the innermost open element named `name`, and everything opened
    /// after it. Stray end tags are ignored.
    fn end(&mut self, name: &str) {
        let Some(pos) = self.open.iter().rposition(|e| e.name == name) else {
            return;
        };
        while self.open.len() > pos {
            self.close_innermost();
        }
    }

    fn close_innermost(&mut self) {
        if let Some(element) = self.open.pop() {
            self.children().push(Node::Element(element));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.close_innermost();
        }
        self.root
    }
}

/// Append text, merging with a preceding text node
pub(crate) fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(prev)) = nodes.last_mut() {
        prev.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (name, value) in &element.attributes {
                    out.push_str(&format!(r#" {}="{}""#, name, escape_attribute(value)));
                }
                out.push('>');
                if policy::is_void(&element.name) {
                    continue;
                }
                write_nodes(&element.children, out);
                out.push_str(&format!("</{}>", element.name));
            }
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}
