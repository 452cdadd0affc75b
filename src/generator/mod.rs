//! # Generator Module
//!
//! Turns the assembled document model into client source files.
//!
//! ## Pipeline
//!
//! ```text
//! Document → per-resource type compilation → template rendering → output files
//! ```
//!
//! 1. **Type compilation** ([`schema`]) - recursively converts each
//!    dereferenced schema into target type references, registering named
//!    composite types once per resource pass
//! 2. **Rendering** ([`templates`]) - a minijinja environment exposing the
//!    `json`, `wrap`, and `prefix` filters to the built-in templates
//! 3. **Emission** ([`platform`]) - a named-generator registry; the selected
//!    [`Generator`] writes one file per resource plus an `index` file
//!
//! ## Output
//!
//! For the TypeScript target a generated directory looks like:
//!
//! ```text
//! sdk/
//! ├── Widget.ts       # Widget types + WidgetResource container
//! ├── Account.ts
//! └── index.ts        # re-exports + resource manifest
//! ```
//!
//! Each resource is compiled with a fresh type registry; names are unique
//! within one resource file, never across files.

mod platform;
mod schema;
mod templates;
mod typescript;

pub use platform::{generator_for, Generator};
pub use schema::{
    camel_case, compile_schema, pascal_case, strip_whitespace, FieldDef, TypeDefinition,
    TypeRegistry,
};
pub use templates::RenderContext;
pub use typescript::TypeScriptGenerator;
