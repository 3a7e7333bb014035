use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Declaration line emitted for `Declaration::Standard`.
pub const STANDARD_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Indentation unit, either literal text or a number of spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Indent {
    Width(usize),
    Text(String),
}

impl Indent {
    /// The literal text of one indentation level.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Indent::Width(n) => Cow::Owned(" ".repeat(*n)),
            Indent::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Text("\t".to_string())
    }
}

impl From<&str> for Indent {
    fn from(s: &str) -> Self {
        Indent::Text(s.to_string())
    }
}

impl From<String> for Indent {
    fn from(s: String) -> Self {
        Indent::Text(s)
    }
}

impl From<usize> for Indent {
    fn from(n: usize) -> Self {
        Indent::Width(n)
    }
}

/// Optional first line of a top-level render.
///
/// Serialized as `false` (omit), `true` (standard line) or a string that is
/// emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "DeclarationRepr", into = "DeclarationRepr")]
pub enum Declaration {
    #[default]
    Omit,
    Standard,
    Custom(String),
}

impl Declaration {
    pub fn text(&self) -> Option<&str> {
        match self {
            Declaration::Omit => None,
            Declaration::Standard => Some(STANDARD_DECLARATION),
            Declaration::Custom(s) => Some(s),
        }
    }
}

impl From<bool> for Declaration {
    fn from(enabled: bool) -> Self {
        if enabled {
            Declaration::Standard
        } else {
            Declaration::Omit
        }
    }
}

impl From<&str> for Declaration {
    fn from(s: &str) -> Self {
        Declaration::Custom(s.to_string())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DeclarationRepr {
    Flag(bool),
    Text(String),
}

impl From<DeclarationRepr> for Declaration {
    fn from(repr: DeclarationRepr) -> Self {
        match repr {
            DeclarationRepr::Flag(enabled) => Declaration::from(enabled),
            DeclarationRepr::Text(s) => Declaration::Custom(s),
        }
    }
}

impl From<Declaration> for DeclarationRepr {
    fn from(declaration: Declaration) -> Self {
        match declaration {
            Declaration::Omit => DeclarationRepr::Flag(false),
            Declaration::Standard => DeclarationRepr::Flag(true),
            Declaration::Custom(s) => DeclarationRepr::Text(s),
        }
    }
}

/// Fully resolved configuration shared by a tree of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub indent: Indent,
    pub new_line: String,
    /// Key prefix marking an attribute.
    pub attr_sel: String,
    /// When set, extraction groups attributes under this key.
    pub attr_key: Option<String>,
    /// Reserved key holding a node's own text.
    pub value_sel: String,
    /// Stored in place of values whose text form is empty.
    pub def_val: String,
    pub declaration: Declaration,
    pub self_close: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            new_line: "\r\n".to_string(),
            attr_sel: "_".to_string(),
            attr_key: None,
            value_sel: "_value".to_string(),
            def_val: String::new(),
            declaration: Declaration::Omit,
            self_close: true,
        }
    }
}

impl Options {
    /// Built-in defaults with `overrides` applied.
    pub fn resolve(overrides: &OptionsOverride) -> Self {
        Self::default().merged(overrides)
    }

    /// A copy of these options with every field set in `overrides` replaced.
    pub fn merged(&self, overrides: &OptionsOverride) -> Self {
        let o = overrides.clone();
        Self {
            indent: o.indent.unwrap_or_else(|| self.indent.clone()),
            new_line: o.new_line.unwrap_or_else(|| self.new_line.clone()),
            attr_sel: o.attr_sel.unwrap_or_else(|| self.attr_sel.clone()),
            attr_key: o.attr_key.or_else(|| self.attr_key.clone()),
            value_sel: o.value_sel.unwrap_or_else(|| self.value_sel.clone()),
            def_val: o.def_val.unwrap_or_else(|| self.def_val.clone()),
            declaration: o.declaration.unwrap_or_else(|| self.declaration.clone()),
            self_close: o.self_close.unwrap_or(self.self_close),
        }
    }

    pub(crate) fn has_attr_prefix(&self, key: &str) -> bool {
        key.starts_with(self.attr_sel.as_str())
    }

    pub fn is_value_key(&self, key: &str) -> bool {
        key == self.value_sel
    }

    pub fn is_attribute_key(&self, key: &str) -> bool {
        self.has_attr_prefix(key) && !self.is_value_key(key)
    }

    pub fn is_element_key(&self, key: &str) -> bool {
        !self.is_attribute_key(key) && !self.is_value_key(key)
    }

    /// Attribute name as written in markup, without the prefix.
    pub(crate) fn attribute_name<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.attr_sel.as_str()).unwrap_or(key)
    }
}

/// Per-field overrides for [`Options`]; unset fields keep the base value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<Indent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr_sel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_sel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def_val: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Declaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_close: Option<bool>,
}

impl OptionsOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(mut self, indent: impl Into<Indent>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    pub fn new_line(mut self, new_line: impl Into<String>) -> Self {
        self.new_line = Some(new_line.into());
        self
    }

    pub fn attr_sel(mut self, attr_sel: impl Into<String>) -> Self {
        self.attr_sel = Some(attr_sel.into());
        self
    }

    pub fn attr_key(mut self, attr_key: impl Into<String>) -> Self {
        self.attr_key = Some(attr_key.into());
        self
    }

    pub fn value_sel(mut self, value_sel: impl Into<String>) -> Self {
        self.value_sel = Some(value_sel.into());
        self
    }

    pub fn def_val(mut self, def_val: impl Into<String>) -> Self {
        self.def_val = Some(def_val.into());
        self
    }

    pub fn declaration(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }

    pub fn self_close(mut self, self_close: bool) -> Self {
        self.self_close = Some(self_close);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn overlay(self, other: &OptionsOverride) -> Self {
        let o = other.clone();
        Self {
            indent: o.indent.or(self.indent),
            new_line: o.new_line.or(self.new_line),
            attr_sel: o.attr_sel.or(self.attr_sel),
            attr_key: o.attr_key.or(self.attr_key),
            value_sel: o.value_sel.or(self.value_sel),
            def_val: o.def_val.or(self.def_val),
            declaration: o.declaration.or(self.declaration),
            self_close: o.self_close.or(self.self_close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.indent.as_text(), "\t");
        assert_eq!(options.new_line, "\r\n");
        assert_eq!(options.attr_sel, "_");
        assert_eq!(options.attr_key, None);
        assert_eq!(options.value_sel, "_value");
        assert_eq!(options.def_val, "");
        assert_eq!(options.declaration, Declaration::Omit);
        assert!(options.self_close);
    }

    #[test]
    fn test_merge_is_per_field() {
        let base = Options::resolve(&OptionsOverride::new().def_val("?").indent(2usize));
        let merged = base.merged(&OptionsOverride::new().indent(""));

        assert_eq!(merged.indent, Indent::Text(String::new()));
        assert_eq!(merged.def_val, "?");
        assert_eq!(base.indent, Indent::Width(2));
    }

    #[test]
    fn test_width_indent_becomes_spaces() {
        assert_eq!(Indent::Width(4).as_text(), "    ");
        assert_eq!(Indent::Width(0).as_text(), "");
    }

    #[rstest]
    #[case("_a", true, false)]
    #[case("_value", false, true)]
    #[case("a", false, false)]
    #[case("a_", false, false)]
    fn test_key_classification(
        #[case] key: &str,
        #[case] attribute: bool,
        #[case] value: bool,
    ) {
        let options = Options::default();
        assert_eq!(options.is_attribute_key(key), attribute);
        assert_eq!(options.is_value_key(key), value);
        assert_eq!(options.is_element_key(key), !attribute && !value);
    }

    #[test]
    fn test_overlay_prefers_later_fields() {
        let file = OptionsOverride::new().indent(2usize).self_close(false);
        let flags = OptionsOverride::new().indent("\t");

        let combined = file.overlay(&flags);
        assert_eq!(combined.indent, Some(Indent::Text("\t".to_string())));
        assert_eq!(combined.self_close, Some(false));
    }

    #[test]
    fn test_declaration_text() {
        assert_eq!(Declaration::Omit.text(), None);
        assert_eq!(Declaration::Standard.text(), Some(STANDARD_DECLARATION));
        assert_eq!(
            Declaration::from("<?xml version=\"1.1\"?>").text(),
            Some("<?xml version=\"1.1\"?>")
        );
    }
}
