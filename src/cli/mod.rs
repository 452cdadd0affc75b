//! # CLI Module
//!
//! Command-line interface for the SDK generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Compile an OpenAPI specification and emit a client SDK:
//!
//! ```bash
//! sdkgen generate --spec openapi.yaml --output sdk
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Path to OpenAPI specification (required)
//! - `--output <DIR>` - Output directory for the generated client (required)
//! - `--language <LANG>` - Target platform (default: typescript)
//! - `--force` - Overwrite files in a non-empty output directory
//!
//! ### `resources`
//!
//! Print the resource groups and operations a spec would produce, without
//! writing anything:
//!
//! ```bash
//! sdkgen resources --spec openapi.yaml
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
