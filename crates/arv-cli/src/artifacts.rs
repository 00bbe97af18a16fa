//! # Artifact writing
//!
//! The three JSON artifacts a run persists: `public.json`,
//! `witness.json`, `proof.json`. Artifacts from a failed run carry a
//! `"verified": false` marker so diagnostic output can never be mistaken
//! for the product of a successful verification.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write a value as pretty-printed JSON, creating parent directories.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let bytes = serde_json::to_vec_pretty(value).context("failed to encode artifact")?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write a diagnostic artifact from a failed run, tagged unverified.
///
/// The value must serialize to a JSON object; the marker is inserted as
/// a top-level `"verified": false` field.
pub fn write_json_unverified(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut tagged = serde_json::to_value(value).context("failed to encode artifact")?;
    if let Some(obj) = tagged.as_object_mut() {
        obj.insert("verified".to_string(), serde_json::Value::Bool(false));
    }
    write_json(path, &tagged)
}
