//! Scene files: a versioned JSON list of annotations.
//!
//! Effect caches are never written; they are regenerated against the source
//! when the scene is inserted into a session.

use crate::draw::Annotation;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SceneFile {
    version: u32,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

/// Parses scene JSON. Accepts a versioned object or a bare annotation array.
pub fn parse_scene(text: &str) -> Result<Vec<Annotation>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("Invalid annotation list");
    }
    let file: SceneFile = serde_json::from_str(text).context("Invalid scene file")?;
    if file.version > CURRENT_VERSION {
        bail!(
            "Scene version {} is newer than supported version {}",
            file.version,
            CURRENT_VERSION
        );
    }
    debug!("Parsed scene v{} with {} annotations", file.version, file.annotations.len());
    Ok(file.annotations)
}

/// Reads a scene file from disk.
pub fn load_scene(path: &Path) -> Result<Vec<Annotation>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene from {}", path.display()))?;
    let annotations =
        parse_scene(&text).with_context(|| format!("Failed to parse scene {}", path.display()))?;
    info!("Loaded {} annotations from {}", annotations.len(), path.display());
    Ok(annotations)
}

/// Writes annotations as a versioned scene file.
pub fn save_scene(path: &Path, annotations: &[Annotation]) -> Result<()> {
    let file = SceneFile {
        version: CURRENT_VERSION,
        annotations: annotations.to_vec(),
    };
    let json = serde_json::to_string_pretty(&file).context("Failed to serialise scene")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write scene to {}", path.display()))?;
    info!("Saved {} annotations to {}", annotations.len(), path.display());
    Ok(())
}
