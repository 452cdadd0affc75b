use super::platform::Generator;
use super::schema::{camel_case, compile_schema, pascal_case, FieldDef, TypeRegistry};
use super::templates::RenderContext;
use crate::spec::{Document, Operation, Resource};
use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TS_IDENT: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static pattern is valid")
});

static PATH_PARAM: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{([^}]+)\}").expect("static pattern is valid")
});

#[derive(Debug, Serialize)]
struct FieldView {
    ident: String,
    ty: String,
    optional: bool,
    docs: Option<String>,
}

#[derive(Debug, Serialize)]
struct TypeView {
    name: String,
    docs: Option<String>,
    fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
struct OperationView {
    name: String,
    docs: Option<String>,
    args: String,
    return_type: String,
    method: String,
    /// Either a JSON string literal or a template literal interpolating the
    /// path parameters.
    path_expr: String,
    /// Trailing transport options, including the leading comma, or empty.
    options: String,
}

#[derive(Debug, Serialize)]
struct ResourceView {
    name: String,
    container: String,
    file_stem: String,
    docs: Option<String>,
    types: Vec<TypeView>,
    operations: Vec<OperationView>,
}

#[derive(Debug, Serialize)]
struct IndexEntry {
    name: String,
    module: String,
    file: String,
    container: String,
}

fn field_ident(name: &str) -> anyhow::Result<String> {
    if TS_IDENT.is_match(name) {
        Ok(name.to_string())
    } else {
        // Quote names that are not valid identifiers ("x-legacy", "2fa").
        Ok(serde_json::to_string(name)?)
    }
}

fn type_view(name: &str, docs: Option<&str>, fields: &[FieldDef]) -> anyhow::Result<TypeView> {
    let fields = fields
        .iter()
        .map(|f| {
            Ok(FieldView {
                ident: field_ident(&f.name)?,
                ty: f.ty.clone(),
                optional: f.optional,
                docs: f.docs.clone(),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(TypeView {
        name: name.to_string(),
        docs: docs.map(str::to_string),
        fields,
    })
}

fn operation_docs(op: &Operation) -> Option<String> {
    match (op.summary.as_deref(), op.description.as_deref()) {
        (Some(s), Some(d)) => Some(format!("{s}\n\n{d}")),
        (Some(s), None) => Some(s.to_string()),
        (None, Some(d)) => Some(d.to_string()),
        (None, None) => None,
    }
}

fn path_expression(op: &Operation) -> anyhow::Result<String> {
    if op.path_params.is_empty() {
        Ok(serde_json::to_string(&op.path)?)
    } else {
        Ok(format!("`{}`", PATH_PARAM.replace_all(&op.path, "$${$1}")))
    }
}

fn operation_view(
    resource: &Resource,
    op: &Operation,
    registry: &mut TypeRegistry,
) -> anyhow::Result<OperationView> {
    let op_pascal = pascal_case(&op.id);

    let mut args: Vec<String> = Vec::new();
    for p in &op.path_params {
        let ty = match &p.schema {
            Some(schema) => compile_schema(
                &resource.name,
                schema,
                &[op_pascal.clone(), pascal_case(&p.name)],
                registry,
            )
            .with_context(|| format!("parameter {} of {}", p.name, op.id))?,
            None => "string".to_string(),
        };
        args.push(format!("{}: {}", p.name, ty));
    }

    // Optional arguments must trail required ones in the signature, so the
    // body/query pair is ordered required-first.
    let mut tail: Vec<(bool, String)> = Vec::new();
    let mut has_body = false;
    if let Some(media) = op.request.as_ref().and_then(|c| c.default_media()) {
        if let Some(schema) = &media.schema {
            let ty = compile_schema(
                &resource.name,
                schema,
                &[op_pascal.clone(), "Request".to_string()],
                registry,
            )
            .with_context(|| format!("request body of {}", op.id))?;
            let opt = if op.request_required { "" } else { "?" };
            tail.push((op.request_required, format!("body{opt}: {ty}")));
            has_body = true;
        }
    }
    let has_query = op.query_schema.is_some();
    if let Some(query_schema) = &op.query_schema {
        let ty = compile_schema(
            &resource.name,
            query_schema,
            &[op_pascal.clone(), "Query".to_string()],
            registry,
        )
        .with_context(|| format!("query parameters of {}", op.id))?;
        let required = op.query_params.iter().any(|p| p.required);
        let opt = if required { "" } else { "?" };
        tail.push((required, format!("query{opt}: {ty}")));
    }
    tail.sort_by_key(|(required, _)| !*required);
    args.extend(tail.into_iter().map(|(_, a)| a));

    let return_type = match op
        .primary_response()
        .and_then(|r| r.content.default_media())
        .and_then(|m| m.schema.as_ref())
    {
        Some(schema) => compile_schema(
            &resource.name,
            schema,
            &[op_pascal, "Response".to_string()],
            registry,
        )
        .with_context(|| format!("response of {}", op.id))?,
        None => "void".to_string(),
    };

    let options = match (has_query, has_body) {
        (true, true) => ", { query, body }".to_string(),
        (true, false) => ", { query }".to_string(),
        (false, true) => ", { body }".to_string(),
        (false, false) => String::new(),
    };

    Ok(OperationView {
        name: camel_case(&op.id),
        docs: operation_docs(op),
        args: args.join(", "),
        return_type,
        method: op.method.as_str().to_string(),
        path_expr: path_expression(op)?,
        options,
    })
}

fn resource_view(resource: &Resource) -> anyhow::Result<ResourceView> {
    let display = resource.display_name();

    // Fresh registry per resource: type names are only unique within one
    // resource's compilation pass.
    let mut registry = TypeRegistry::new();
    compile_schema(
        &resource.name,
        &resource.schema,
        &[display.clone()],
        &mut registry,
    )
    .with_context(|| format!("compiling schema of resource {}", resource.name))?;

    let mut operations = Vec::new();
    for op in &resource.operations {
        operations.push(operation_view(resource, op, &mut registry)?);
    }

    let types = registry
        .definitions()
        .iter()
        .map(|d| type_view(&d.name, d.docs.as_deref(), &d.fields))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ResourceView {
        name: resource.name.clone(),
        container: format!("{display}Resource"),
        file_stem: display,
        docs: resource
            .schema
            .get("description")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        types,
        operations,
    })
}

/// Emits a TypeScript client: one module per resource plus `index.ts`.
pub struct TypeScriptGenerator;

impl Generator for TypeScriptGenerator {
    fn generate(&self, ctx: &mut RenderContext, document: &Document) -> anyhow::Result<()> {
        let mut entries = Vec::new();
        for resource in &document.resources {
            let view = resource_view(resource)?;
            let rendered = ctx.render("resource.ts.jinja", &view)?;
            let file = format!("{}.ts", view.file_stem);
            ctx.write_file(&file, &rendered)?;
            entries.push(IndexEntry {
                name: resource.name.clone(),
                module: view.file_stem,
                file,
                container: view.container,
            });
        }

        let rendered = ctx.render("index.ts.jinja", minijinja::context! { resources => entries })?;
        ctx.write_file("index.ts", &rendered)?;
        Ok(())
    }
}
