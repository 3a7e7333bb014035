//! Plain-structure extraction.
//!
//! Produces a nested `serde_json::Value` mirroring the markup tree:
//! attributes keep their prefix (or are grouped under `attr_key`), the direct
//! value sits under `value_sel`, and array-like nodes become arrays.

use serde_json::{Map, Value as JsonValue};

use crate::node::MarkupNode;
use crate::value::Element;

impl MarkupNode {
    /// Extract into a fresh accumulator.
    ///
    /// A named node yields `{name: ...}`. An unnamed node yields its content
    /// directly, which is an array when the node is array-like.
    pub fn extract(&self) -> JsonValue {
        if self.name.is_none() && self.is_array_like() {
            return self.content();
        }
        let mut acc = Map::new();
        self.extract_into(&mut acc);
        JsonValue::Object(acc)
    }

    /// Extract into a caller-provided accumulator.
    pub fn extract_into(&self, acc: &mut Map<String, JsonValue>) {
        self.extract_named(self.name(), acc);
    }

    fn extract_named(&self, name: Option<&str>, acc: &mut Map<String, JsonValue>) {
        if self.is_array_like() {
            match name {
                Some(name) => {
                    let slot = acc
                        .entry(name)
                        .or_insert_with(|| JsonValue::Array(Vec::new()));
                    if !slot.is_array() {
                        *slot = JsonValue::Array(Vec::new());
                    }
                    if let JsonValue::Array(items) = slot {
                        self.extract_items(items);
                    }
                }
                None => {
                    for (key, element) in self.children(&self.options) {
                        acc.insert(key.to_string(), element_json(element));
                    }
                }
            }
            return;
        }

        match name {
            Some(name) => {
                let mut fields = Map::new();
                self.extract_fields(&mut fields);
                acc.insert(name.to_string(), JsonValue::Object(fields));
            }
            None => self.extract_fields(acc),
        }
    }

    /// Entries of an array-like node, in key order.
    ///
    /// Nested array-like entries are flattened one level. Scalars land at
    /// the index named by their key, as long as the null padding is no longer
    /// than the number of entries; farther keys append.
    fn extract_items(&self, items: &mut Vec<JsonValue>) {
        for (key, element) in self.children(&self.options) {
            match element {
                Element::Node(child) if child.is_array_like() => {
                    for (_, grandchild) in child.children(&child.options) {
                        items.push(element_json(grandchild));
                    }
                }
                Element::Node(child) => items.push(child.content()),
                Element::Scalar(scalar) => place_at(items, key, scalar.to_json(), self.len()),
            }
        }
    }

    fn extract_fields(&self, obj: &mut Map<String, JsonValue>) {
        let options = &self.options;

        match &options.attr_key {
            Some(attr_key) => {
                let grouped: Map<String, JsonValue> = self
                    .attributes(options)
                    .map(|(key, element)| {
                        (options.attribute_name(key).to_string(), element_json(element))
                    })
                    .collect();
                if !grouped.is_empty() {
                    obj.insert(attr_key.clone(), JsonValue::Object(grouped));
                }
            }
            None => {
                for (key, element) in self.attributes(options) {
                    obj.insert(key.to_string(), element_json(element));
                }
            }
        }

        if let Some(value) = self.direct_value() {
            obj.insert(options.value_sel.clone(), element_json(value));
            return;
        }

        for (key, element) in self.children(options) {
            match element {
                Element::Scalar(scalar) => {
                    obj.insert(key.to_string(), scalar.to_json());
                }
                Element::Node(child) => child.extract_named(Some(child.name().unwrap_or(key)), obj),
            }
        }
    }

    /// This node's content without a name wrapper.
    fn content(&self) -> JsonValue {
        if self.is_array_like() {
            let mut items = Vec::new();
            self.extract_items(&mut items);
            JsonValue::Array(items)
        } else {
            let mut fields = Map::new();
            self.extract_fields(&mut fields);
            JsonValue::Object(fields)
        }
    }
}

fn element_json(element: &Element) -> JsonValue {
    match element {
        Element::Scalar(scalar) => scalar.to_json(),
        Element::Node(node) => node.content(),
    }
}

/// Put `value` at the integral index `key`, padding with at most `max_pad`
/// nulls; other keys append.
fn place_at(items: &mut Vec<JsonValue>, key: &str, value: JsonValue, max_pad: usize) {
    match key.trim().parse::<usize>() {
        Ok(index) if index < items.len() => items[index] = value,
        Ok(index) if index - items.len() <= max_pad => {
            items.resize(index, JsonValue::Null);
            items.push(value);
        }
        _ => items.push(value),
    }
}
