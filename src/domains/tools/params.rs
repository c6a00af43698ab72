//! Parameter descriptors derived from tool input schemas.
//!
//! Each tool publishes a JSON schema generated from its params struct. The
//! descriptors flatten that schema into `{name, kind, required}` triples,
//! which are checked before a call is dispatched and are also what startup
//! logging and tests introspect.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::ToolError;

/// Primitive kind of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    String,
    Boolean,
    Array,
    Object,
    /// No type constraint (e.g. a free-form JSON value).
    Any,
}

impl ParamKind {
    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "integer" | "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// Whether `value` satisfies this kind. `null` is handled by the caller.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => true,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamDescriptor {
    /// Flatten an object schema's `properties` / `required`.
    pub fn from_schema(schema: &Map<String, Value>) -> Vec<Self> {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return Vec::new();
        };

        properties
            .iter()
            .map(|(name, property)| Self {
                name: name.clone(),
                kind: kind_of(property, schema),
                required: required.contains(&name.as_str()),
            })
            .collect()
    }
}

/// Resolve the kind of one property schema.
///
/// Handles plain `type`, nullable `type: [T, "null"]`, `$ref` into `$defs`
/// and `anyOf`/`oneOf` unions with `null`. Anything else is `Any`.
fn kind_of(property: &Value, root: &Map<String, Value>) -> ParamKind {
    if let Some(reference) = property.get("$ref").and_then(Value::as_str) {
        return resolve_ref(reference, root)
            .map(|target| kind_of(target, root))
            .unwrap_or(ParamKind::Any);
    }

    match property.get("type") {
        Some(Value::String(name)) => {
            return ParamKind::from_type_name(name).unwrap_or(ParamKind::Any);
        }
        Some(Value::Array(names)) => {
            let kinds: Vec<ParamKind> = names
                .iter()
                .filter_map(Value::as_str)
                .filter(|n| *n != "null")
                .filter_map(ParamKind::from_type_name)
                .collect();
            return match kinds.as_slice() {
                [single] => *single,
                _ => ParamKind::Any,
            };
        }
        _ => {}
    }

    for union in ["anyOf", "oneOf"] {
        if let Some(variants) = property.get(union).and_then(Value::as_array) {
            let non_null: Vec<&Value> = variants
                .iter()
                .filter(|v| v.get("type").and_then(Value::as_str) != Some("null"))
                .collect();
            if let [single] = non_null.as_slice() {
                return kind_of(single, root);
            }
            return ParamKind::Any;
        }
    }

    if property.get("enum").is_some() {
        return ParamKind::String;
    }

    ParamKind::Any
}

fn resolve_ref<'a>(reference: &str, root: &'a Map<String, Value>) -> Option<&'a Value> {
    let name = reference
        .strip_prefix("#/$defs/")
        .or_else(|| reference.strip_prefix("#/definitions/"))?;
    root.get("$defs")
        .or_else(|| root.get("definitions"))
        .and_then(|defs| defs.get(name))
}

/// Check presence of required parameters and primitive types of the ones given.
///
/// `null` counts as absent. Unknown arguments are left to deserialization.
pub fn validate(descriptors: &[ParamDescriptor], args: &Map<String, Value>) -> Result<(), ToolError> {
    for descriptor in descriptors {
        match args.get(&descriptor.name) {
            None | Some(Value::Null) => {
                if descriptor.required {
                    return Err(ToolError::invalid_arguments(format!(
                        "Missing required parameter '{}'",
                        descriptor.name
                    )));
                }
            }
            Some(value) => {
                if !descriptor.kind.accepts(value) {
                    return Err(ToolError::invalid_arguments(format!(
                        "Parameter '{}' must be {} {}",
                        descriptor.name,
                        article(descriptor.kind),
                        descriptor.kind
                    )));
                }
            }
        }
    }
    Ok(())
}

fn article(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Array | ParamKind::Object | ParamKind::Any => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::handler::server::tool::schema_for_type;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct SampleParams {
        post_id: u64,
        title: String,
        #[serde(default)]
        force: bool,
        categories: Option<Vec<u64>>,
        #[serde(default)]
        props: Map<String, Value>,
        value: Option<Value>,
    }

    fn descriptors() -> Vec<ParamDescriptor> {
        ParamDescriptor::from_schema(&schema_for_type::<SampleParams>())
    }

    fn find<'a>(descriptors: &'a [ParamDescriptor], name: &str) -> &'a ParamDescriptor {
        descriptors
            .iter()
            .find(|d| d.name == name)
            .unwrap_or_else(|| panic!("missing descriptor {name}"))
    }

    #[test]
    fn test_descriptors_from_derived_schema() {
        let descriptors = descriptors();
        assert_eq!(descriptors.len(), 6);

        let post_id = find(&descriptors, "postId");
        assert_eq!(post_id.kind, ParamKind::Number);
        assert!(post_id.required);

        let title = find(&descriptors, "title");
        assert_eq!(title.kind, ParamKind::String);
        assert!(title.required);

        let force = find(&descriptors, "force");
        assert_eq!(force.kind, ParamKind::Boolean);
        assert!(!force.required);

        let categories = find(&descriptors, "categories");
        assert_eq!(categories.kind, ParamKind::Array);
        assert!(!categories.required);

        assert_eq!(find(&descriptors, "props").kind, ParamKind::Object);
        assert!(!find(&descriptors, "value").required);
    }

    #[test]
    fn test_kind_resolution_variants() {
        let root = json!({
            "$defs": {"Status": {"type": "string", "enum": ["draft", "publish"]}}
        });
        let root = root.as_object().unwrap();

        assert_eq!(kind_of(&json!({"type": ["integer", "null"]}), root), ParamKind::Number);
        assert_eq!(kind_of(&json!({"$ref": "#/$defs/Status"}), root), ParamKind::String);
        assert_eq!(
            kind_of(&json!({"anyOf": [{"$ref": "#/$defs/Status"}, {"type": "null"}]}), root),
            ParamKind::String
        );
        assert_eq!(kind_of(&json!(true), root), ParamKind::Any);
        assert_eq!(kind_of(&json!({}), root), ParamKind::Any);
    }

    #[test]
    fn test_validate_reports_missing_required() {
        let args = json!({"title": "Hello"});
        let err = validate(&descriptors(), args.as_object().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter 'postId'");

        let args = json!({"postId": null, "title": "Hello"});
        assert!(validate(&descriptors(), args.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_validate_reports_wrong_type() {
        let args = json!({"postId": "42", "title": "Hello"});
        let err = validate(&descriptors(), args.as_object().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'postId' must be a number");

        let args = json!({"postId": 42, "title": "Hello", "categories": 3});
        let err = validate(&descriptors(), args.as_object().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'categories' must be an array");
    }

    #[test]
    fn test_validate_accepts_optional_omissions() {
        let args = json!({"postId": 42, "title": "Hello", "value": {"any": "thing"}});
        assert!(validate(&descriptors(), args.as_object().unwrap()).is_ok());
    }
}
