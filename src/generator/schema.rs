use crate::spec::{is_ref, origin_of};
use anyhow::{bail, ensure};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A named record type compiled from an object schema.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDefinition {
    pub name: String,
    pub docs: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl TypeDefinition {
    /// Structural comparison ignoring documentation.
    fn same_shape(&self, other: &TypeDefinition) -> bool {
        self.name == other.name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|(a, b)| a.name == b.name && a.ty == b.ty && a.optional == b.optional)
    }
}

/// A field of a compiled record type.
///
/// All fields are read-only: the model represents API payloads, not mutable
/// domain objects.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    pub name: String,
    /// Target type reference (a primitive, a registered name, or `unknown`).
    pub ty: String,
    pub optional: bool,
    pub docs: Option<String>,
    pub readonly: bool,
}

/// Insertion-ordered registry of the types compiled for one resource.
///
/// A registry lives for exactly one resource's compilation pass and is
/// discarded once that resource's file is emitted; type names are unique
/// within one pass, not across resources.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    defs: Vec<TypeDefinition>,
    index: HashMap<String, usize>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiled definition under its name.
    ///
    /// A structurally identical re-registration dedups silently (the same
    /// titled schema reached through two properties). A structurally
    /// different definition under an existing name is a fatal collision; the
    /// alternative of keeping the last writer hides real schema conflicts.
    pub fn register(&mut self, def: TypeDefinition) -> anyhow::Result<()> {
        if let Some(&i) = self.index.get(&def.name) {
            ensure!(
                self.defs[i].same_shape(&def),
                "type name collision: `{}` resolves to two structurally different definitions",
                def.name
            );
            return Ok(());
        }
        self.index.insert(def.name.clone(), self.defs.len());
        self.defs.push(def);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Definitions in registration order (dependencies before dependents).
    pub fn definitions(&self) -> &[TypeDefinition] {
        &self.defs
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Closed classification of a JSON-Schema node's shape, computed once per
/// node instead of duck-typed field probing at every use site.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemaShape {
    Array,
    Object,
    Union,
    Primitive(String),
    Opaque,
}

fn classify(schema: &Value) -> SchemaShape {
    let declared = schema.get("type").and_then(Value::as_str);
    // Most specific first: arrays, then objects (including untyped schemas
    // that carry properties), then union-likes, then declared primitives.
    match declared {
        Some("array") => SchemaShape::Array,
        Some("object") => SchemaShape::Object,
        None if schema.get("properties").is_some() => SchemaShape::Object,
        _ if schema.get("oneOf").is_some()
            || schema.get("anyOf").is_some()
            || schema.get("allOf").is_some() =>
        {
            SchemaShape::Union
        }
        Some(kind) => SchemaShape::Primitive(kind.to_string()),
        None => SchemaShape::Opaque,
    }
}

/// CamelCase a naming token, splitting on `_`, `-`, and whitespace while
/// preserving interior capitalization of each segment.
pub fn pascal_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// camelCase variant of [`pascal_case`], used for generated method names.
pub fn camel_case(s: &str) -> String {
    let pascal = pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Remove all whitespace from a declared schema title.
pub fn strip_whitespace(title: &str) -> String {
    title.chars().filter(|c| !c.is_whitespace()).collect()
}

fn concat_chain(chain: &[String]) -> String {
    chain.iter().map(|token| pascal_case(token)).collect()
}

/// Recursively compile a dereferenced schema into a target type reference,
/// registering named composite types in `registry`.
///
/// `namespace` is the resource being compiled; an object stamped with a
/// different resource's registry name short-circuits to an opaque reference
/// so each resource's output stays self-contained. `chain` is the ordered
/// list of naming tokens from the root down, used only as a fallback when a
/// schema declares no title.
///
/// # Errors
///
/// Fails on surviving `$ref` nodes, on unsupported primitive kinds, and on
/// name collisions between structurally different definitions.
pub fn compile_schema(
    namespace: &str,
    schema: &Value,
    chain: &[String],
    registry: &mut TypeRegistry,
) -> anyhow::Result<String> {
    ensure!(
        !is_ref(schema),
        "schema reached the type compiler with an unresolved $ref (namespace {namespace})"
    );

    match classify(schema) {
        SchemaShape::Array => {
            let item_ty = match schema.get("items") {
                Some(items) => compile_schema(namespace, items, chain, registry)?,
                None => "unknown".to_string(),
            };
            Ok(format!("{item_ty}[]"))
        }
        SchemaShape::Object => compile_object(namespace, schema, chain, registry),
        // Structural union synthesis is deliberately out of scope; callers
        // relying on precise union typing must treat this as a known
        // limitation.
        SchemaShape::Union => Ok("unknown".to_string()),
        SchemaShape::Opaque => Ok("unknown".to_string()),
        SchemaShape::Primitive(kind) => match kind.as_str() {
            "string" => Ok("string".to_string()),
            "number" => Ok("number".to_string()),
            "boolean" => Ok("boolean".to_string()),
            other => bail!("unable to convert type `{other}`"),
        },
    }
}

fn compile_object(
    namespace: &str,
    schema: &Value,
    chain: &[String],
    registry: &mut TypeRegistry,
) -> anyhow::Result<String> {
    // A stamp naming a different resource means the type is owned by that
    // resource's output file; reference it opaquely instead of duplicating.
    if let Some(origin) = origin_of(schema) {
        if origin != namespace {
            return Ok("unknown".to_string());
        }
    }

    let title = schema
        .get("title")
        .and_then(Value::as_str)
        .map(strip_whitespace)
        .filter(|t| !t.is_empty());

    // A declared title anchors descendants to the titled type itself rather
    // than to the path that happened to reach it.
    let (name, child_chain) = match title {
        Some(t) => (t.clone(), vec![t]),
        None => (concat_chain(chain), chain.to_vec()),
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut fields = Vec::new();
    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (prop_name, prop_schema) in props {
            let mut prop_chain = child_chain.clone();
            prop_chain.push(prop_name.clone());
            let ty = compile_schema(namespace, prop_schema, &prop_chain, registry)?;
            fields.push(FieldDef {
                name: prop_name.clone(),
                ty,
                optional: !required.contains(&prop_name.as_str()),
                docs: prop_schema
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                readonly: true,
            });
        }
    }

    registry.register(TypeDefinition {
        name: name.clone(),
        docs: schema
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        fields,
    })?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    fn chain(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_pascal_and_camel_case() {
        assert_eq!(pascal_case("user_profile"), "UserProfile");
        assert_eq!(pascal_case("v1-widgets-get"), "V1WidgetsGet");
        assert_eq!(pascal_case("ContactPoint"), "ContactPoint");
        assert_eq!(camel_case("v1-widgets-id-get"), "v1WidgetsIdGet");
        assert_eq!(camel_case("list_widgets"), "listWidgets");
    }

    #[test]
    fn test_primitives() {
        let mut reg = TypeRegistry::new();
        let c = chain(&["X"]);
        assert_eq!(
            compile_schema("X", &json!({ "type": "string" }), &c, &mut reg).unwrap(),
            "string"
        );
        assert_eq!(
            compile_schema("X", &json!({ "type": "number" }), &c, &mut reg).unwrap(),
            "number"
        );
        assert_eq!(
            compile_schema("X", &json!({ "type": "boolean" }), &c, &mut reg).unwrap(),
            "boolean"
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unsupported_primitive_is_fatal() {
        let mut reg = TypeRegistry::new();
        let err =
            compile_schema("X", &json!({ "type": "integer" }), &chain(&["X"]), &mut reg)
                .unwrap_err();
        assert!(err.to_string().contains("unable to convert type"));
    }

    #[test]
    fn test_array_of_primitive() {
        let mut reg = TypeRegistry::new();
        let ty = compile_schema(
            "X",
            &json!({ "type": "array", "items": { "type": "string" } }),
            &chain(&["X"]),
            &mut reg,
        )
        .unwrap();
        assert_eq!(ty, "string[]");
    }

    #[test]
    fn test_union_degrades_to_opaque() {
        let mut reg = TypeRegistry::new();
        let ty = compile_schema(
            "X",
            &json!({ "oneOf": [{ "type": "string" }, { "type": "boolean" }] }),
            &chain(&["X"]),
            &mut reg,
        )
        .unwrap();
        assert_eq!(ty, "unknown");
        assert!(reg.is_empty());
    }

    #[test]
    fn test_object_named_by_title() {
        let mut reg = TypeRegistry::new();
        let ty = compile_schema(
            "Widget",
            &json!({
                "title": "Contact Point",
                "type": "object",
                "properties": { "email": { "type": "string" } }
            }),
            &chain(&["Widget", "owner"]),
            &mut reg,
        )
        .unwrap();
        assert_eq!(ty, "ContactPoint");
        assert!(reg.contains("ContactPoint"));
    }

    #[test]
    fn test_dedup_by_title() {
        let mut reg = TypeRegistry::new();
        let schema = json!({
            "type": "object",
            "properties": {
                "home": {
                    "title": "Contact Point",
                    "type": "object",
                    "properties": { "email": { "type": "string" } }
                },
                "work": {
                    "title": "Contact Point",
                    "type": "object",
                    "properties": { "email": { "type": "string" } }
                }
            }
        });
        let ty = compile_schema("Widget", &schema, &chain(&["Widget"]), &mut reg).unwrap();
        assert_eq!(ty, "Widget");
        let contact_count = reg
            .definitions()
            .iter()
            .filter(|d| d.name == "ContactPoint")
            .count();
        assert_eq!(contact_count, 1);
        let widget = reg.definitions().iter().find(|d| d.name == "Widget").unwrap();
        assert!(widget.fields.iter().all(|f| f.ty == "ContactPoint"));
    }

    #[test]
    fn test_collision_between_different_shapes_is_fatal() {
        let mut reg = TypeRegistry::new();
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {
                    "title": "Thing",
                    "type": "object",
                    "properties": { "x": { "type": "string" } }
                },
                "b": {
                    "title": "Thing",
                    "type": "object",
                    "properties": { "y": { "type": "boolean" } }
                }
            }
        });
        let err = compile_schema("Widget", &schema, &chain(&["Widget"]), &mut reg).unwrap_err();
        assert!(err.to_string().contains("collision"));
    }

    #[test]
    fn test_naming_chain_fallback_for_untitled_objects() {
        let mut reg = TypeRegistry::new();
        let schema = json!({
            "type": "object",
            "properties": {
                "settings": {
                    "type": "object",
                    "properties": { "theme": { "type": "string" } }
                }
            }
        });
        let ty = compile_schema("Widget", &schema, &chain(&["Widget"]), &mut reg).unwrap();
        assert_eq!(ty, "Widget");
        assert!(reg.contains("WidgetSettings"));
    }

    #[test]
    fn test_title_resets_descendant_chain() {
        let mut reg = TypeRegistry::new();
        let schema = json!({
            "type": "object",
            "properties": {
                "billing": {
                    "title": "Account",
                    "type": "object",
                    "properties": {
                        "owner": {
                            "type": "object",
                            "properties": { "name": { "type": "string" } }
                        }
                    }
                }
            }
        });
        compile_schema("Widget", &schema, &chain(&["Widget"]), &mut reg).unwrap();
        // Descendants of a titled type are anchored to the title, not to the
        // property path that reached it.
        assert!(reg.contains("AccountOwner"));
        assert!(!reg.contains("WidgetBillingOwner"));
    }

    #[test]
    fn test_cross_resource_reference_is_opaque() {
        let mut reg = TypeRegistry::new();
        let schema = json!({
            "type": "object",
            "properties": {
                "owner": {
                    "type": "object",
                    "x-ref-name": "Account",
                    "properties": { "id": { "type": "string" } }
                }
            }
        });
        let ty = compile_schema("Widget", &schema, &chain(&["Widget"]), &mut reg).unwrap();
        assert_eq!(ty, "Widget");
        assert!(!reg.contains("Account"));
        let widget = reg.definitions().iter().find(|d| d.name == "Widget").unwrap();
        assert_eq!(widget.fields[0].ty, "unknown");
    }

    #[test]
    fn test_required_controls_optionality() {
        let mut reg = TypeRegistry::new();
        let schema = json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": { "type": "string" },
                "label": { "type": "string", "description": "Human label" }
            }
        });
        compile_schema("Widget", &schema, &chain(&["Widget"]), &mut reg).unwrap();
        let widget = &reg.definitions()[0];
        let id = widget.fields.iter().find(|f| f.name == "id").unwrap();
        let label = widget.fields.iter().find(|f| f.name == "label").unwrap();
        assert!(!id.optional);
        assert!(label.optional);
        assert_eq!(label.docs.as_deref(), Some("Human label"));
        assert!(id.readonly && label.readonly);
    }

    #[test]
    fn test_unresolved_ref_is_fatal() {
        let mut reg = TypeRegistry::new();
        let err = compile_schema(
            "X",
            &json!({ "$ref": "#/components/schemas/Y" }),
            &chain(&["X"]),
            &mut reg,
        )
        .unwrap_err();
        assert!(err.to_string().contains("$ref"));
    }
}
