use http::Method;
use serde_json::Value;

/// Where a parameter is declared in the OpenAPI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl From<oas3::spec::ParameterIn> for ParameterLocation {
    fn from(loc: oas3::spec::ParameterIn) -> Self {
        match loc {
            oas3::spec::ParameterIn::Path => ParameterLocation::Path,
            oas3::spec::ParameterIn::Query => ParameterLocation::Query,
            oas3::spec::ParameterIn::Header => ParameterLocation::Header,
            oas3::spec::ParameterIn::Cookie => ParameterLocation::Cookie,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// A resolved operation parameter with its dereferenced schema.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
    pub description: Option<String>,
}

/// One media-type entry of a request or response body.
///
/// The schema is fully dereferenced; inlined `components/schemas` objects
/// carry their registry-name stamp (see [`crate::spec::deref`]).
#[derive(Debug, Clone)]
pub struct MediaObject {
    pub media_type: String,
    pub schema: Option<Value>,
    pub example: Option<Value>,
}

/// An ordered content map (media type → body description).
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub media: Vec<MediaObject>,
}

impl Content {
    /// The media object a client should bind to by default.
    ///
    /// Deterministic tie-break when several media types are declared:
    /// `application/json` wins, otherwise the first declared entry.
    pub fn default_media(&self) -> Option<&MediaObject> {
        self.media
            .iter()
            .find(|m| m.media_type == "application/json")
            .or_else(|| self.media.first())
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}

/// A normalized response keyed by its declared status entry.
///
/// `status` is the raw response key and may be the literal `"default"`.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    pub status: String,
    pub content: Content,
}

/// A canonical operation record built from one (path, method, operation)
/// triple. Constructed once during document assembly, immutable thereafter.
#[derive(Debug, Clone)]
pub struct Operation {
    pub path: String,
    pub method: Method,
    /// Explicit `operationId`, or a slug derived from path and method.
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub path_params: Vec<ParameterSpec>,
    pub query_params: Vec<ParameterSpec>,
    /// Object schema synthesized from the query parameters, so the type
    /// compiler can treat query strings and request bodies uniformly.
    pub query_schema: Option<Value>,
    pub request: Option<Content>,
    pub request_required: bool,
    pub responses: Vec<ResponseSpec>,
}

impl Operation {
    /// The response registered under the literal `"default"` key, if any.
    pub fn default_response(&self) -> Option<&ResponseSpec> {
        self.responses.iter().find(|r| r.status == "default")
    }

    /// The response used for documentation return-type inference: the
    /// `"default"` entry when declared, otherwise the first entry.
    ///
    /// Deterministic tie-break for the fallback: responses are keyed by a
    /// sorted status map upstream, so without a `"default"` entry the
    /// lexicographically smallest status key wins (`"200"` before `"404"`).
    pub fn primary_response(&self) -> Option<&ResponseSpec> {
        self.default_response().or_else(|| self.responses.first())
    }
}

/// An inferred logical API entity: a named component schema paired with the
/// operations attributed to it.
#[derive(Debug, Clone)]
pub struct Resource {
    /// The `components/schemas` registry key.
    pub name: String,
    /// The dereferenced registry schema, stamped with its own name.
    pub schema: Value,
    pub operations: Vec<Operation>,
}

impl Resource {
    /// Display name used for generated file and type names: the schema's
    /// declared title with whitespace stripped, or the raw registry key.
    pub fn display_name(&self) -> String {
        self.schema
            .get("title")
            .and_then(Value::as_str)
            .map(crate::generator::strip_whitespace)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// The compiled top-level model handed to a generator.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub resources: Vec<Resource>,
}
