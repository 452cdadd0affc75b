use super::templates::RenderContext;
use super::typescript::TypeScriptGenerator;
use crate::spec::Document;

/// One target language's code emitter.
///
/// Invoked once per run with the whole compiled document; the implementation
/// compiles each resource into view models and asks the context to render
/// and write one file per resource plus an aggregating index file.
pub trait Generator {
    fn generate(&self, ctx: &mut RenderContext, document: &Document) -> anyhow::Result<()>;
}

/// Select a generator implementation by language identifier.
///
/// Fails before any file I/O happens, so an unknown platform never creates
/// an output directory.
pub fn generator_for(language: &str) -> anyhow::Result<Box<dyn Generator>> {
    match language {
        "typescript" | "ts" | "node" => Ok(Box::new(TypeScriptGenerator)),
        other => anyhow::bail!("unknown platform `{other}` (supported: typescript)"),
    }
}
