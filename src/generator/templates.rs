use anyhow::Context;
use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Rendering and output facilities handed to a generator.
///
/// The context owns the template environment and the output directory; a
/// file is written only after its whole contents have been rendered, so a
/// failed resource compilation never leaves a partially written file behind.
pub struct RenderContext {
    env: Environment<'static>,
    out_dir: PathBuf,
}

fn json_filter(value: minijinja::Value) -> Result<String, minijinja::Error> {
    serde_json::to_string(&value).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, format!("cannot stringify: {e}"))
    })
}

/// Greedy word wrap for comment text. Words longer than the width stay on
/// their own line rather than being split.
fn wrap_filter(text: String, width: Option<usize>) -> String {
    let width = width.unwrap_or(80);
    let mut lines = Vec::new();
    for input_line in text.lines() {
        let mut line = String::new();
        for word in input_line.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
            } else if line.len() + 1 + word.len() <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        lines.push(line);
    }
    while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n")
}

/// Prefix each line of a block, starting at `start` (zero-based line
/// offset). The offset lets callers skip lines that already sit after an
/// opening token, e.g. the first line of a doc comment.
fn prefix_filter(text: String, prefix: String, start: Option<usize>) -> String {
    let start = start.unwrap_or(0);
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i < start {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl RenderContext {
    /// Build a context rendering into `out_dir` with the built-in templates
    /// and the three committed filters: `json`, `wrap`, and `prefix`.
    pub fn new(out_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let mut env = Environment::new();
        env.add_filter("json", json_filter);
        env.add_filter("wrap", wrap_filter);
        env.add_filter("prefix", prefix_filter);
        env.add_template(
            "resource.ts.jinja",
            include_str!("../../templates/resource.ts.jinja"),
        )?;
        env.add_template(
            "index.ts.jinja",
            include_str!("../../templates/index.ts.jinja"),
        )?;
        Ok(Self {
            env,
            out_dir: out_dir.into(),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Render a named template against a serializable view model.
    pub fn render(&self, template: &str, view: impl Serialize) -> anyhow::Result<String> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(view)?)
    }

    /// Write one fully rendered output file under the output directory.
    pub fn write_file(&self, file_name: &str, contents: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("failed to create {}", self.out_dir.display()))?;
        let path = self.out_dir.join(file_name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✅ Generated {path:?}");
        Ok(())
    }
}
