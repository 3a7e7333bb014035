use indexmap::IndexMap;
use std::sync::Arc;

use crate::error::NodeError;
use crate::options::{Options, OptionsOverride};
use crate::value::{Element, Scalar, Value};

/// One markup element: its attributes, direct value and child elements.
///
/// Everything a node holds lives in a single ordered map, `elements`. A key
/// starting with the configured attribute prefix is an attribute, the
/// reserved value key is the node's own text, and every other key is a child
/// element. Insertion order is render order.
///
/// ```rust
/// # use markup_node_engine::{MarkupNode, OptionsOverride};
/// let mut root = MarkupNode::new("test");
/// root.set_path("a.b.c", 1);
/// root.set("_id", "x");
///
/// let xml = root.render_with(&OptionsOverride::new().indent("").new_line(""));
/// assert_eq!(xml, r#"<test id="x"><a><b><c>1</c></b></a></test>"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupNode {
    /// Tag name; absent for an unnamed root or an entry of an array group
    pub(crate) name: Option<String>,
    pub(crate) elements: IndexMap<String, Element>,
    /// Shared with every descendant created through this node
    pub(crate) options: Arc<Options>,
}

impl MarkupNode {
    /// Create an empty node with default options.
    pub fn new(name: impl Into<String>) -> Self {
        Self::empty(Some(name.into()), Arc::new(Options::default()))
    }

    /// Create a node and fill it from `elements` with default options.
    pub fn with_elements(name: impl Into<String>, elements: impl Into<Value>) -> Self {
        Self::build(
            Some(name.into()),
            elements.into(),
            Arc::new(Options::default()),
        )
    }

    /// Create a node whose options are the defaults merged with `options`.
    pub fn with_options(
        name: impl Into<String>,
        elements: impl Into<Value>,
        options: &OptionsOverride,
    ) -> Self {
        Self::build(
            Some(name.into()),
            elements.into(),
            Arc::new(Options::resolve(options)),
        )
    }

    /// Create a node from a single-root wrapper such as `{"test": {...}}`.
    ///
    /// A plain string is taken as the node name.
    pub fn from_root(root: impl Into<Value>) -> Result<Self, NodeError> {
        Self::from_root_with_options(root, &OptionsOverride::default())
    }

    pub fn from_root_with_options(
        root: impl Into<Value>,
        options: &OptionsOverride,
    ) -> Result<Self, NodeError> {
        let entries = match root.into() {
            Value::String(name) => return Ok(Self::with_options(name, Value::Undefined, options)),
            Value::Object(entries) => entries,
            _ => return Err(single_root_error()),
        };

        let mut entries = entries.into_iter();
        match (entries.next(), entries.next()) {
            (Some((name, elements)), None) => {
                log::trace!("unwrapping single-root object as <{name}>");
                Ok(Self::with_options(name, elements, options))
            }
            _ => Err(single_root_error()),
        }
    }

    pub(crate) fn empty(name: Option<String>, options: Arc<Options>) -> Self {
        Self {
            name,
            elements: IndexMap::new(),
            options,
        }
    }

    /// Recursively build a subtree from `elements`.
    ///
    /// Array entries are keyed by position and carry no name of their own;
    /// object entries holding structured values become children named after
    /// their key. Anything that is neither an array nor an object yields an
    /// empty node.
    pub(crate) fn build(name: Option<String>, elements: Value, options: Arc<Options>) -> Self {
        let mut node = Self::empty(name, options);
        match elements {
            Value::Array(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    let key = index.to_string();
                    if item.is_structured() {
                        let child = Self::build(None, item, Arc::clone(&node.options));
                        node.elements.insert(key, Element::Node(child));
                    } else {
                        node.assign(key, item);
                    }
                }
            }
            Value::Object(entries) => {
                for (key, value) in entries {
                    node.set(key, value);
                }
            }
            _ => {}
        }
        node
    }

    /// Store `value` under `key` following the assignment rule.
    fn assign(&mut self, key: String, value: Value) {
        if let Some(scalar) = value.into_scalar(&self.options.def_val) {
            self.elements.insert(key, Element::Scalar(scalar));
        }
    }

    /// Keys that may only hold scalars: attributes and the direct value.
    fn holds_scalar_only(&self, key: &str) -> bool {
        self.options.has_attr_prefix(key) || self.options.is_value_key(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Merge `overrides` over this node's options.
    ///
    /// Only this node and children created from now on see the change.
    pub fn set_options(&mut self, overrides: &OptionsOverride) {
        self.options = Arc::new(self.options.merged(overrides));
    }

    /// Assign `value` to `key`.
    ///
    /// Structured values replace the key with a freshly built child node.
    /// Scalars go through the assignment rule: `Undefined` is ignored,
    /// `Null` is stored, and empty text is replaced by the default value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if value.is_structured() && !self.holds_scalar_only(&key) {
            let child = Self::build(Some(key.clone()), value, Arc::clone(&self.options));
            self.elements.insert(key, Element::Node(child));
        } else {
            self.assign(key, value);
        }
    }

    /// Assign through a dotted path, creating missing intermediate nodes.
    ///
    /// A write whose path runs through a scalar or an attribute is dropped.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) {
        match path.rsplit_once('.') {
            Some((parent, key)) => match self.at(parent) {
                Some(node) => node.set(key, value),
                None => log::debug!("dropping write to {path}: path runs through a scalar"),
            },
            None => self.set(path, value),
        }
    }

    /// The child node under `key`, created empty if the key is absent.
    ///
    /// Returns `None` for attribute keys, which are never auto-created, and
    /// for keys that currently hold a scalar.
    pub fn child(&mut self, key: &str) -> Option<&mut MarkupNode> {
        if self.holds_scalar_only(key) {
            return None;
        }
        let options = Arc::clone(&self.options);
        self.elements
            .entry(key.to_string())
            .or_insert_with(|| Element::Node(Self::empty(Some(key.to_string()), options)))
            .as_node_mut()
    }

    /// Walk a dotted path with [`MarkupNode::child`] semantics.
    pub fn at(&mut self, path: &str) -> Option<&mut MarkupNode> {
        path.split('.').try_fold(self, |node, key| node.child(key))
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.elements.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Element> {
        self.elements.get_mut(key)
    }

    /// Remove `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Element> {
        self.elements.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.elements.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes(&self.options).map(|(k, _)| k)
    }

    pub fn element_keys(&self) -> impl Iterator<Item = &str> {
        self.children(&self.options).map(|(k, _)| k)
    }

    pub fn direct_value(&self) -> Option<&Element> {
        self.elements.get(&self.options.value_sel)
    }

    /// Whether this node's children are repeated siblings sharing one tag.
    ///
    /// True iff there is at least one child element key and every child
    /// element key parses as a number.
    pub fn is_array_like(&self) -> bool {
        self.is_array_like_under(&self.options)
    }

    pub(crate) fn attributes<'a>(
        &'a self,
        options: &'a Options,
    ) -> impl Iterator<Item = (&'a str, &'a Element)> {
        self.iter().filter(|(k, _)| options.is_attribute_key(k))
    }

    pub(crate) fn children<'a>(
        &'a self,
        options: &'a Options,
    ) -> impl Iterator<Item = (&'a str, &'a Element)> {
        self.iter().filter(|(k, _)| options.is_element_key(k))
    }

    pub(crate) fn is_array_like_under(&self, options: &Options) -> bool {
        let mut keys = self.children(options).map(|(k, _)| k).peekable();
        keys.peek().is_some() && keys.all(is_numeric_key)
    }
}

fn single_root_error() -> NodeError {
    NodeError::Validation("object root must have a single element".to_string())
}

/// A key that reads as a number. Infinity counts only when spelled
/// `Infinity`; shorter or differently cased spellings are plain names.
fn is_numeric_key(key: &str) -> bool {
    let key = key.trim();
    let unsigned = key.strip_prefix(['+', '-']).unwrap_or(key);
    if (unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity"))
        && unsigned != "Infinity"
    {
        return false;
    }
    key.parse::<f64>().is_ok_and(|n| !n.is_nan())
}

impl From<Scalar> for Element {
    fn from(scalar: Scalar) -> Self {
        Element::Scalar(scalar)
    }
}

impl From<MarkupNode> for Element {
    fn from(node: MarkupNode) -> Self {
        Element::Node(node)
    }
}
