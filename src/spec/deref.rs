use anyhow::{anyhow, bail};
use oas3::spec::ObjectOrReference;
use oas3::OpenApiV3Spec;
use serde_json::Value;

/// Field stamped onto every inlined `components/schemas` object so the
/// declared registry name survives dereferencing. This is the only way to
/// recover "this inlined object used to be schema X" after flattening.
pub const ORIGIN_KEY: &str = "x-ref-name";

/// Whether a schema node is still a reference indirection.
pub fn is_ref(value: &Value) -> bool {
    value.get("$ref").map(Value::is_string).unwrap_or(false)
}

/// Read back the registry-name stamp of a dereferenced schema object.
pub fn origin_of(value: &Value) -> Option<&str> {
    value.get(ORIGIN_KEY).and_then(Value::as_str)
}

/// Assert that no reference indirection survived dereferencing.
///
/// A surviving `$ref` downstream of the dereference step indicates a
/// dereferencer defect and aborts the whole run.
pub fn ensure_dereferenced(value: &Value) -> anyhow::Result<()> {
    match value {
        Value::Object(obj) => {
            if is_ref(value) {
                bail!(
                    "schema node is still a reference after dereferencing: {}",
                    obj.get("$ref").and_then(Value::as_str).unwrap_or("<non-string $ref>")
                );
            }
            for v in obj.values() {
                ensure_dereferenced(v)?;
            }
        }
        Value::Array(arr) => {
            for v in arr {
                ensure_dereferenced(v)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Resolve a `#/components/schemas/...` reference to its schema definition.
pub fn resolve_schema_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::ObjectSchema> {
    let name = ref_path.strip_prefix("#/components/schemas/")?;
    spec.components
        .as_ref()?
        .schemas
        .get(name)
        .and_then(|schema_ref| match schema_ref {
            ObjectOrReference::Object(schema) => Some(schema),
            _ => None,
        })
}

/// Resolve a `#/components/parameters/...` reference.
pub fn resolve_parameter_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::Parameter> {
    let name = ref_path.strip_prefix("#/components/parameters/")?;
    spec.components
        .as_ref()?
        .parameters
        .get(name)
        .and_then(|param_ref| match param_ref {
            ObjectOrReference::Object(param) => Some(param),
            _ => None,
        })
}

/// Recursively inline every `$ref` in a schema value.
///
/// Each inlined `components/schemas` object is stamped with [`ORIGIN_KEY`]
/// before the expansion replaces the reference node, so the stamp is present
/// at every use site of the shared schema. `$ref` cycles are out of contract;
/// the upstream registry is expected to be acyclic.
///
/// # Errors
///
/// Fails on any reference that cannot be resolved against
/// `components/schemas`; that is a precondition violation, not a recoverable
/// per-node condition.
pub fn expand_schema_refs(spec: &OpenApiV3Spec, value: &mut Value) -> anyhow::Result<()> {
    match value {
        Value::Object(obj) => {
            if let Some(ref_path) = obj.get("$ref").and_then(Value::as_str) {
                let ref_path = ref_path.to_string();
                let schema = resolve_schema_ref(spec, &ref_path)
                    .ok_or_else(|| anyhow!("unresolvable schema reference: {ref_path}"))?;
                let mut new_val = serde_json::to_value(schema)?;
                expand_schema_refs(spec, &mut new_val)?;
                if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
                    if let Value::Object(o) = &mut new_val {
                        o.insert(ORIGIN_KEY.to_string(), Value::String(name.to_string()));
                    }
                }
                *value = new_val;
                return Ok(());
            }
            for v in obj.values_mut() {
                expand_schema_refs(spec, v)?;
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                expand_schema_refs(spec, v)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Serialize a schema-or-reference and fully dereference it.
///
/// Serializing the reference variant keeps the `$ref` node in the value so
/// [`expand_schema_refs`] applies the origin stamp uniformly. The result is
/// asserted reference-free before being handed downstream; every parameter,
/// content, and component schema in the document model passes through here.
pub fn dereferenced_schema(
    spec: &OpenApiV3Spec,
    schema_ref: &ObjectOrReference<oas3::spec::ObjectSchema>,
) -> anyhow::Result<Value> {
    let mut value = serde_json::to_value(schema_ref)?;
    expand_schema_refs(spec, &mut value)?;
    ensure_dereferenced(&value)?;
    Ok(value)
}
