//! Text backend - Rewrite and render free-standing text

use anyhow::Result;
use serde_json::json;

use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::refs::pattern::{count_references, rewrite};
use crate::refs::role::{render_roles, RoleRegistry};

/// Rewrite references in `text` into a single result item
pub fn rewrite_text(text: &str) -> ResultItem {
    let references = count_references(text);
    ResultItem::rewrite(rewrite(text)).with_data(json!({ "references": references }))
}

/// Render every inline role `registry` knows in `text`
pub fn render_text(text: &str, registry: &RoleRegistry) -> ResultItem {
    ResultItem::rewrite(render_roles(text, registry)).with_data(json!({ "roles": registry.names() }))
}

/// One item per registered role
pub fn list_roles(registry: &RoleRegistry) -> ResultSet {
    registry.names().into_iter().map(ResultItem::role).collect()
}

/// Run the rewrite command
pub fn run_rewrite(text: &str, config: RenderConfig) -> Result<()> {
    let item = rewrite_text(text);
    tracing::debug!("rewrote {} bytes", text.len());
    emit(item, config)
}

/// Run the render command
pub fn run_render(text: &str, registry: &RoleRegistry, config: RenderConfig) -> Result<()> {
    emit(render_text(text, registry), config)
}

/// Run the roles command
pub fn run_roles(registry: &RoleRegistry, config: RenderConfig) -> Result<()> {
    Renderer::with_config(config).render_to(&list_roles(registry), std::io::stdout().lock())?;
    Ok(())
}

fn emit(item: ResultItem, config: RenderConfig) -> Result<()> {
    let mut result_set = ResultSet::new();
    result_set.push(item);
    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}
