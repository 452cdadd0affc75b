use super::build::build_document;
use super::types::Document;
use anyhow::Context;
use oas3::OpenApiV3Spec;
use std::path::Path;

fn strip_unknown_verbs(val: &mut serde_json::Value) {
    const METHODS: [&str; 8] = [
        "get", "post", "put", "delete", "patch", "options", "head", "trace",
    ];

    if let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") {
        for item in paths_map.values_mut() {
            if let serde_json::Value::Object(obj) = item {
                let keys: Vec<String> = obj.keys().cloned().collect();
                for k in keys {
                    let lk = k.to_ascii_lowercase();
                    let keep = match lk.as_str() {
                        "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                        m if METHODS.contains(&m) => true,
                        _ => k.starts_with("x-"),
                    };
                    if !keep {
                        obj.remove(&k);
                    }
                }
            }
        }
    }
}

/// Parse an OpenAPI document from a YAML or JSON file.
///
/// Non-standard keys on path items are stripped before the typed parse so a
/// stray vendor verb does not fail deserialization.
pub fn parse_spec(file_path: &Path) -> anyhow::Result<OpenApiV3Spec> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read spec {}", file_path.display()))?;
    let is_yaml = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let mut value: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec = serde_json::from_value(value)
        .with_context(|| format!("failed to parse spec {}", file_path.display()))?;
    Ok(spec)
}

/// Load a spec file and assemble the full document model in one pass.
pub fn load_document(file_path: &Path) -> anyhow::Result<Document> {
    let spec = parse_spec(file_path)?;
    build_document(&spec)
}
