//! # sdkgen
//!
//! **sdkgen** compiles a fully dereferenced [OpenAPI 3](https://spec.openapis.org/oas/v3.1.0)
//! document into typed client SDKs.
//!
//! ## Overview
//!
//! The pipeline has two halves. The [`spec`] module parses a YAML or JSON
//! specification, inlines every `$ref` while stamping the originating
//! component name onto the inlined schema, and assembles a normalized
//! [`spec::Document`]: operations grouped into resources, each resource
//! paired with its component schema. The [`generator`] module then compiles
//! each resource's schemas into named type definitions and renders one
//! source file per resource plus an index for the selected target platform.
//!
//! ## Architecture
//!
//! - **[`spec`]** - parsing, `$ref` expansion, and the resource/operation model
//! - **[`generator`]** - per-resource type compilation and template rendering
//! - **[`cli`]** - the `sdkgen` binary's `generate` and `resources` commands
//!
//! ## Example
//!
//! ```rust,ignore
//! use sdkgen::generator::{generator_for, RenderContext};
//!
//! let document = sdkgen::load_document("openapi.yaml".as_ref())?;
//! let generator = generator_for("typescript")?;
//! let mut ctx = RenderContext::new("sdk")?;
//! generator.generate(&mut ctx, &document)?;
//! ```

pub mod cli;
pub mod generator;
pub mod spec;

pub use spec::load_document;
