//! Declarative node and credential metadata.
//!
//! Plain serializable data: the host renders forms from it and applies
//! its own validation (`required`, `minValue`/`maxValue`). Nothing here
//! executes.

use serde::Serialize;
use serde_json::Value;

/// Input widget / value kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Json,
    Options,
    Collection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

/// A fixed choice of an `options` property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyChoice {
    pub name: String,
    pub value: Value,
}

impl PropertyChoice {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Children of a property: fixed choices for `options`, nested fields for
/// `collection`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyOptions {
    Choices(Vec<PropertyChoice>),
    Fields(Vec<NodeProperty>),
}

/// One user-facing field of a node or credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub default: Value,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<PropertyOptions>,
}

impl NodeProperty {
    pub fn new(
        display_name: impl Into<String>,
        name: impl Into<String>,
        kind: PropertyType,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            name: name.into(),
            kind,
            default: default.into(),
            required: false,
            description: None,
            placeholder: None,
            type_options: None,
            options: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Mask the input in the host UI.
    pub fn password(mut self) -> Self {
        self.type_options.get_or_insert_with(TypeOptions::default).password = Some(true);
        self
    }

    /// Inclusive numeric bounds enforced by the host form.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        let opts = self.type_options.get_or_insert_with(TypeOptions::default);
        opts.min_value = Some(min);
        opts.max_value = Some(max);
        self
    }

    pub fn choices(mut self, choices: Vec<PropertyChoice>) -> Self {
        self.options = Some(PropertyOptions::Choices(choices));
        self
    }

    pub fn fields(mut self, fields: Vec<NodeProperty>) -> Self {
        self.options = Some(PropertyOptions::Fields(fields));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDefaults {
    pub name: String,
}

/// A credential type a node requires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialRequirement {
    pub name: String,
    pub required: bool,
}

/// Everything a host needs to list, render and wire a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: String,
    pub name: String,
    pub icon: String,
    pub group: Vec<String>,
    pub version: u32,
    pub description: String,
    pub usable_as_tool: bool,
    pub defaults: NodeDefaults,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub credentials: Vec<CredentialRequirement>,
    pub properties: Vec<NodeProperty>,
}

impl NodeDescription {
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Shape of a stored credential type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescription {
    pub name: String,
    pub display_name: String,
    pub documentation_url: String,
    pub icon: String,
    pub properties: Vec<NodeProperty>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn property_serializes_without_empty_fields() {
        let prop = NodeProperty::new("Cursor", "cursor", PropertyType::String, "");
        assert_eq!(
            serde_json::to_value(&prop).unwrap_or_default(),
            json!({ "displayName": "Cursor", "name": "cursor", "type": "string", "default": "" })
        );
    }

    #[test]
    fn builder_accumulates_type_options() {
        let prop = NodeProperty::new("Limit", "limit", PropertyType::Number, 50)
            .range(1.0, 100.0)
            .required();

        assert_eq!(
            serde_json::to_value(&prop).unwrap_or_default(),
            json!({
                "displayName": "Limit",
                "name": "limit",
                "type": "number",
                "default": 50,
                "required": true,
                "typeOptions": { "minValue": 1.0, "maxValue": 100.0 }
            })
        );
    }

    #[test]
    fn choices_and_fields_serialize_as_plain_lists() {
        let order = NodeProperty::new("Order", "order", PropertyType::Options, "ASC")
            .choices(vec![PropertyChoice::new("ASC", "ASC")]);
        let sort = NodeProperty::new("Sort", "sort", PropertyType::Collection, json!({}))
            .fields(vec![order]);

        let value = serde_json::to_value(&sort).unwrap_or_default();
        assert_eq!(value["options"][0]["name"], json!("order"));
        assert_eq!(value["options"][0]["options"], json!([{ "name": "ASC", "value": "ASC" }]));
    }
}
