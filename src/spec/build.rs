use super::deref::{dereferenced_schema, resolve_parameter_ref, ORIGIN_KEY};
use super::types::{
    Content, Document, MediaObject, Operation, ParameterLocation, ParameterSpec, Resource,
    ResponseSpec,
};
use anyhow::{anyhow, bail, Context};
use http::Method;
use oas3::spec::{MediaTypeExamples, ObjectOrReference, Parameter};
use oas3::OpenApiV3Spec;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Synthetic group name for operations whose resource cannot be inferred.
pub const SHARED_RESOURCE: &str = "shared";

static DASH_RUNS: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new("-{2,}").expect("static pattern is valid")
});

/// Derive a stable printable operation id from arbitrary input.
///
/// Every character outside `[A-Za-z0-9-]` becomes `-`; runs collapse to a
/// single `-`; leading and trailing dashes are trimmed.
pub fn slugify(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    DASH_RUNS.replace_all(&replaced, "-").trim_matches('-').to_string()
}

fn operation_id(path: &str, method: &Method, op: &oas3::spec::Operation) -> String {
    match op.operation_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => slugify(&format!("{}-{}", path, method.as_str().to_ascii_lowercase())),
    }
}

/// Resolve and normalize a raw parameter list, preserving declaration order.
///
/// # Errors
///
/// A parameter that is still a reference indirection aborts the run; the
/// upstream dereference step is expected to have resolved it.
pub fn extract_parameters(
    spec: &OpenApiV3Spec,
    params: &[ObjectOrReference<Parameter>],
) -> anyhow::Result<Vec<ParameterSpec>> {
    let mut out = Vec::new();
    for p in params {
        let param = match p {
            ObjectOrReference::Object(obj) => obj,
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(spec, ref_path)
                .ok_or_else(|| anyhow!("unresolvable parameter reference: {ref_path}"))?,
        };
        let schema = param
            .schema
            .as_ref()
            .map(|s| dereferenced_schema(spec, s))
            .transpose()?;
        out.push(ParameterSpec {
            name: param.name.clone(),
            location: ParameterLocation::from(param.location),
            required: param.required.unwrap_or(false),
            schema,
            description: param.description.clone(),
        });
    }
    Ok(out)
}

/// Synthesize one object schema covering all query parameters.
///
/// Properties are keyed by parameter name in declaration order; the
/// `required` list names exactly the parameters marked required. Returns
/// `None` when there are no query parameters.
pub fn synthesize_query_schema(query_params: &[ParameterSpec]) -> Option<Value> {
    if query_params.is_empty() {
        return None;
    }
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for p in query_params {
        let mut schema = p
            .schema
            .clone()
            .unwrap_or_else(|| serde_json::json!({ "type": "string" }));
        if let (Some(desc), Some(obj)) = (p.description.as_ref(), schema.as_object_mut()) {
            obj.entry("description")
                .or_insert_with(|| Value::String(desc.clone()));
        }
        properties.insert(p.name.clone(), schema);
        if p.required {
            required.push(Value::String(p.name.clone()));
        }
    }
    let mut obj = serde_json::Map::new();
    obj.insert("type".to_string(), Value::String("object".to_string()));
    obj.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        obj.insert("required".to_string(), Value::Array(required));
    }
    Some(Value::Object(obj))
}

fn build_content<'a, I>(spec: &OpenApiV3Spec, content: I) -> anyhow::Result<Content>
where
    I: IntoIterator<Item = (&'a String, &'a oas3::spec::MediaType)>,
{
    let mut media = Vec::new();
    for (media_type, mt) in content {
        let schema = mt
            .schema
            .as_ref()
            .map(|s| dereferenced_schema(spec, s))
            .transpose()
            .with_context(|| format!("media type {media_type}"))?;
        let example = match &mt.examples {
            Some(MediaTypeExamples::Example { example }) => Some(example.clone()),
            Some(MediaTypeExamples::Examples { examples }) => {
                examples.iter().find_map(|(_, v)| match v {
                    ObjectOrReference::Object(obj) => obj.value.clone(),
                    _ => None,
                })
            }
            None => None,
        };
        media.push(MediaObject {
            media_type: media_type.clone(),
            schema,
            example,
        });
    }
    Ok(Content { media })
}

/// Normalize one (path, method, operation) triple into a canonical record.
///
/// `shared_params` are the path-item level parameters, applied before the
/// operation's own. Request and response bodies that are still references
/// abort the run; they indicate a dereferencer defect, not a recoverable
/// per-operation issue.
pub fn build_operation(
    spec: &OpenApiV3Spec,
    path: &str,
    method: &Method,
    op: &oas3::spec::Operation,
    shared_params: &[ObjectOrReference<Parameter>],
) -> anyhow::Result<Operation> {
    let id = operation_id(path, method, op);

    let mut params = extract_parameters(spec, shared_params)
        .with_context(|| format!("parameters of path {path}"))?;
    params.extend(
        extract_parameters(spec, &op.parameters)
            .with_context(|| format!("parameters of operation {id}"))?,
    );

    let mut path_params = Vec::new();
    let mut query_params = Vec::new();
    for p in params {
        match p.location {
            ParameterLocation::Path => path_params.push(p),
            ParameterLocation::Query => query_params.push(p),
            // Header and cookie parameters are transport concerns, not part
            // of the client model.
            ParameterLocation::Header | ParameterLocation::Cookie => {}
        }
    }
    let query_schema = synthesize_query_schema(&query_params);

    let (request, request_required) = match op.request_body.as_ref() {
        Some(ObjectOrReference::Object(body)) => (
            Some(
                build_content(spec, &body.content)
                    .with_context(|| format!("request body of {id}"))?,
            ),
            body.required.unwrap_or(false),
        ),
        Some(ObjectOrReference::Ref { ref_path, .. }) => {
            bail!("request body of {id} is still a reference after dereferencing: {ref_path}")
        }
        None => (None, false),
    };

    let mut responses = Vec::new();
    if let Some(responses_map) = op.responses.as_ref() {
        for (status, resp_ref) in responses_map {
            let resp = match resp_ref {
                ObjectOrReference::Object(resp) => resp,
                ObjectOrReference::Ref { ref_path, .. } => bail!(
                    "response {status} of {id} is still a reference after dereferencing: {ref_path}"
                ),
            };
            responses.push(ResponseSpec {
                status: status.clone(),
                content: build_content(spec, &resp.content)
                    .with_context(|| format!("response {status} of {id}"))?,
            });
        }
    }

    Ok(Operation {
        path: path.to_string(),
        method: method.clone(),
        id,
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        path_params,
        query_params,
        query_schema,
        request,
        request_required,
        responses,
    })
}

/// Infer which named resource an operation belongs to.
///
/// Reads the `"default"` response, picks its default media type, unwraps the
/// `{object: {enum: ["list"]}, data: [...]}` list envelope when present, and
/// answers with the working schema's registry-name stamp. List-returning
/// operations describe the true resource through the envelope's `data`
/// items; everything else describes it directly.
pub fn infer_resource(op: &Operation) -> Option<String> {
    let response = op.default_response()?;
    let media = response.content.default_media()?;
    let schema = media.schema.as_ref()?;

    let is_list_envelope = schema
        .pointer("/properties/object/enum/0")
        .and_then(Value::as_str)
        == Some("list");

    let working = if is_list_envelope {
        let data = schema.pointer("/properties/data")?;
        if data.get("type").and_then(Value::as_str) != Some("array") {
            return None;
        }
        data.get("items")?
    } else {
        schema
    };

    super::deref::origin_of(working).map(str::to_string)
}

/// Dereference every `components/schemas` entry and stamp it with its own
/// registry key.
pub(crate) fn component_schema_registry(
    spec: &OpenApiV3Spec,
) -> anyhow::Result<BTreeMap<String, Value>> {
    let mut registry = BTreeMap::new();
    if let Some(components) = spec.components.as_ref() {
        for (name, schema_ref) in &components.schemas {
            let mut value = dereferenced_schema(spec, schema_ref)
                .with_context(|| format!("component schema {name}"))?;
            if let Value::Object(obj) = &mut value {
                obj.entry(ORIGIN_KEY)
                    .or_insert_with(|| Value::String(name.clone()));
            }
            registry.insert(name.clone(), value);
        }
    }
    Ok(registry)
}

/// Walk every path × standard HTTP method, normalize each operation, group
/// the results by inferred resource, and pair each group with its component
/// schema.
///
/// Groups whose name has no matching `components/schemas` entry are dropped
/// from the document; ungrouped operations do not block generation.
pub fn build_document(spec: &OpenApiV3Spec) -> anyhow::Result<Document> {
    let mut groups: Vec<(String, Vec<Operation>)> = Vec::new();

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            for (method, raw_op) in item.methods() {
                let op = build_operation(spec, path, &method, raw_op, &item.parameters)?;
                let name = infer_resource(&op).unwrap_or_else(|| SHARED_RESOURCE.to_string());
                match groups.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, ops)) => ops.push(op),
                    None => groups.push((name, vec![op])),
                }
            }
        }
    }

    let registry = component_schema_registry(spec)?;
    let mut resources = Vec::new();
    for (name, operations) in groups {
        match registry.get(&name) {
            Some(schema) => resources.push(Resource {
                name,
                schema: schema.clone(),
                operations,
            }),
            None => {
                tracing::debug!(
                    resource = %name,
                    "dropping operations with no matching component schema"
                );
            }
        }
    }

    Ok(Document { resources })
}
