//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render to a writer, followed by a newline unless the output is empty.
    ///
    /// Raw rewritten text is written byte for byte.
    pub fn render_to<W: Write>(&self, result_set: &ResultSet, mut writer: W) -> std::io::Result<()> {
        let output = self.render(result_set);
        if output.is_empty() {
            return Ok(());
        }
        writer.write_all(output.as_bytes())?;
        if !output.ends_with('\n') && !self.is_verbatim(result_set) {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn is_verbatim(&self, result_set: &ResultSet) -> bool {
        self.config.format == OutputFormat::Raw
            && result_set.items.iter().all(|item| item.kind == Kind::Rewrite)
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut files = Vec::new();
        let mut references = Vec::new();
        let mut rewrites = Vec::new();
        let mut roles = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::File => files.push(item),
                Kind::Reference => references.push(item),
                Kind::Rewrite => rewrites.push(item),
                Kind::Role => roles.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}", error.code, error.message));
                    if let Some(path) = &item.path {
                        output.push_str(&format!(" (`{}`)", path));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !files.is_empty() {
            output.push_str("## Files\n\n");
            for item in files {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`", path));
                    if let Some(count) = reference_count(item) {
                        output.push_str(&format!(" ({} references)", count));
                    }
                    if item.meta.written {
                        output.push_str(" [written]");
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !references.is_empty() {
            output.push_str("## References\n\n");
            for item in references {
                self.render_reference_md(&mut output, item);
            }
            output.push('\n');
        }

        if !rewrites.is_empty() {
            output.push_str("## Rewritten\n\n");
            for item in rewrites {
                if let Some(excerpt) = &item.excerpt {
                    output.push_str("```\n");
                    output.push_str(excerpt);
                    if !excerpt.ends_with('\n') {
                        output.push('\n');
                    }
                    output.push_str("```\n");
                }
            }
            output.push('\n');
        }

        if !roles.is_empty() {
            output.push_str("## Roles\n\n");
            for item in roles {
                if let Some(name) = &item.excerpt {
                    output.push_str(&format!("- `{}`\n", name));
                }
            }
            output.push('\n');
        }

        output
    }

    fn render_reference_md(&self, output: &mut String, item: &ResultItem) {
        output.push_str("- ");
        if let Some(path) = &item.path {
            output.push_str(&format!("`{}`", path));
            if let Some(range) = &item.range {
                output.push_str(&format!(":{}", range.start));
            }
            output.push_str(": ");
        }
        if let Some(excerpt) = &item.excerpt {
            output.push_str(&format!("`{}`", excerpt.replace('\n', " ")));
        }
        if let Some(link) = item
            .data
            .as_ref()
            .and_then(|d| d.get("link"))
            .and_then(|l| l.as_str())
        {
            output.push_str(&format!(" -> {}", link));
        }
        output.push('\n');
    }

    /// Render as raw output: excerpts only
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn reference_count(item: &ResultItem) -> Option<u64> {
    item.data
        .as_ref()
        .and_then(|d| d.get("references"))
        .and_then(|c| c.as_u64())
}
