//! OpenAPI document loading, dereferencing, and normalization.
//!
//! Everything downstream of this module works on a fully dereferenced
//! document: [`deref`] inlines every `$ref` and stamps inlined component
//! schemas with their registry name, [`build`] normalizes operations and
//! groups them into resources, and [`load`] ties file parsing to assembly.

pub mod build;
pub mod deref;
mod load;
mod types;

pub use build::{
    build_document, build_operation, infer_resource, slugify, synthesize_query_schema,
    SHARED_RESOURCE,
};
pub use deref::{ensure_dereferenced, expand_schema_refs, is_ref, origin_of, ORIGIN_KEY};
pub use load::{load_document, parse_spec};
pub use types::*;
