//! Markup rendering.
//!
//! A node renders as `<name attr="...">...</name>`. Array-like nodes render
//! each entry as a sibling sharing the tag name given by their parent, which
//! is the one place a tag name does not come from the entry's own key.

use std::fmt;

use crate::escape::escape;
use crate::node::MarkupNode;
use crate::options::{Options, OptionsOverride};
use crate::value::{Element, Scalar};

impl MarkupNode {
    /// Render with the node's stored options.
    pub fn render(&self) -> String {
        self.render_with(&OptionsOverride::default())
    }

    /// Render with `overrides` merged over the stored options.
    ///
    /// The declaration line, if any, is emitted once before the root tag.
    pub fn render_with(&self, overrides: &OptionsOverride) -> String {
        let mut options = self.options.merged(overrides);
        let declaration = std::mem::take(&mut options.declaration);

        let body = Renderer::new(&options).node(self, self.name(), 0);
        match declaration.text() {
            Some(line) => {
                log::trace!("emitting declaration line");
                format!("{line}{}{body}", options.new_line)
            }
            None => body,
        }
    }
}

impl fmt::Display for MarkupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

struct Renderer<'a> {
    options: &'a Options,
    indent: String,
    new_line: &'a str,
}

impl<'a> Renderer<'a> {
    fn new(options: &'a Options) -> Self {
        Self {
            options,
            indent: options.indent.as_text().into_owned(),
            new_line: &options.new_line,
        }
    }

    /// Same classification rules, no newlines or indentation.
    fn inline(&self) -> Renderer<'a> {
        Renderer {
            options: self.options,
            indent: String::new(),
            new_line: "",
        }
    }

    fn line_break(&self, depth: usize) -> String {
        format!("{}{}", self.new_line, self.indent.repeat(depth))
    }

    fn node(&self, node: &MarkupNode, name: Option<&str>, depth: usize) -> String {
        if node.is_array_like_under(self.options) {
            return self.group(node, name, depth);
        }
        let Some(name) = name else {
            return self.unnamed(node, depth);
        };

        let mut out = format!("<{name}");
        for (key, element) in node.attributes(self.options) {
            out.push_str(&format!(
                r#" {}="{}""#,
                self.options.attribute_name(key),
                escape(&self.text(element))
            ));
        }

        let direct = node.get(&self.options.value_sel);
        let mut children = node.children(self.options).peekable();

        if let Some(value) = direct {
            out.push('>');
            match value {
                Element::Scalar(scalar) => out.push_str(&escape(&scalar.to_text())),
                Element::Node(inner) => out.push_str(&self.inline().node(inner, None, 0)),
            }
            out.push_str(&format!("</{name}>"));
            return out;
        }

        if children.peek().is_none() {
            return self.close_empty(out, name);
        }

        out.push('>');
        for (key, element) in children {
            let rendered = self.element(key, element, depth + 1);
            if !rendered.is_empty() {
                out.push_str(&self.line_break(depth + 1));
                out.push_str(&rendered);
            }
        }
        out.push_str(&self.line_break(depth));
        out.push_str(&format!("</{name}>"));
        out
    }

    /// Child under a regular key; nodes keep their own name when they have one.
    fn element(&self, key: &str, element: &Element, depth: usize) -> String {
        match element {
            Element::Scalar(scalar) => self.scalar(Some(key), scalar),
            Element::Node(child) => self.node(child, Some(child.name().unwrap_or(key)), depth),
        }
    }

    /// Repeated siblings, each tagged with the parent-supplied `name`.
    ///
    /// Siblings are separated by the bare newline; only the first one picks
    /// up the indentation of the enclosing line.
    fn group(&self, node: &MarkupNode, name: Option<&str>, depth: usize) -> String {
        let parts: Vec<String> = node
            .children(self.options)
            .map(|(_, element)| match element {
                Element::Scalar(scalar) => self.scalar(name, scalar),
                Element::Node(child) if child.is_array_like_under(self.options) => {
                    let inner = self.inline().node(child, None, 0);
                    match name {
                        Some(name) => format!("<{name}>{inner}</{name}>"),
                        None => inner,
                    }
                }
                Element::Node(child) => self.node(child, name, depth),
            })
            .collect();
        parts.join(self.new_line)
    }

    /// A node without a tag of its own contributes only its content.
    fn unnamed(&self, node: &MarkupNode, depth: usize) -> String {
        if let Some(value) = node.get(&self.options.value_sel) {
            return escape(&self.text(value)).into_owned();
        }
        let parts: Vec<String> = node
            .children(self.options)
            .map(|(key, element)| self.element(key, element, depth))
            .filter(|rendered| !rendered.is_empty())
            .collect();
        parts.join(&self.line_break(depth))
    }

    fn scalar(&self, name: Option<&str>, scalar: &Scalar) -> String {
        match (name, scalar) {
            (None, scalar) => escape(&scalar.to_text()).into_owned(),
            (Some(name), Scalar::Null) => self.close_empty(format!("<{name}"), name),
            (Some(name), scalar) => format!("<{name}>{}</{name}>", escape(&scalar.to_text())),
        }
    }

    /// Finish an open tag that has no content.
    fn close_empty(&self, mut open: String, name: &str) -> String {
        if self.options.self_close {
            open.push_str("/>");
        } else {
            open.push_str(&format!("></{name}>"));
        }
        open
    }

    /// Text form of an attribute or direct value.
    fn text(&self, element: &Element) -> String {
        match element {
            Element::Scalar(scalar) => scalar.to_text().into_owned(),
            Element::Node(inner) => self.inline().node(inner, None, 0),
        }
    }
}
