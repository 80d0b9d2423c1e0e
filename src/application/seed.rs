//! Loading seed node lists from JSON or TOML files.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::TreeNode;

/// Seed document shape: `[[nodes]]` in TOML, `{"nodes": [...]}` in JSON.
#[derive(Debug, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    nodes: Vec<TreeNode>,
}

/// JSON accepts a bare array as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSeed {
    List(Vec<TreeNode>),
    Document(SeedDocument),
}

/// Reads raw nodes from `path`. Files ending in `.toml` parse as TOML,
/// everything else as JSON. Ids are normalized, structure is not validated.
#[instrument(level = "debug")]
pub fn load_seed(path: &Path) -> ApplicationResult<Vec<TreeNode>> {
    let content = fs::read_to_string(path).with_path_context("read seed", path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let nodes = if is_toml {
        parse_toml(&content)
    } else {
        parse_json(&content)
    }
    .map_err(|message| ApplicationError::Seed {
        path: path.to_path_buf(),
        message,
    })?;

    debug!(nodes = nodes.len(), "seed loaded");
    Ok(nodes)
}

pub fn parse_json(content: &str) -> Result<Vec<TreeNode>, String> {
    match serde_json::from_str::<JsonSeed>(content) {
        Ok(JsonSeed::List(nodes)) => Ok(nodes),
        Ok(JsonSeed::Document(doc)) => Ok(doc.nodes),
        // untagged errors are opaque, re-parse as a list for a useful message
        Err(_) => serde_json::from_str::<Vec<TreeNode>>(content).map_err(|e| e.to_string()),
    }
}

pub fn parse_toml(content: &str) -> Result<Vec<TreeNode>, String> {
    toml::from_str::<SeedDocument>(content)
        .map(|doc| doc.nodes)
        .map_err(|e| e.to_string())
}
