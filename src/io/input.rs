use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::eval::EvalSample;

/// Read a transcript from a file, or from stdin when no path is given
pub fn read_transcript(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read transcript from stdin")?;
            Ok(text)
        }
    }
}

/// Load an evaluation dataset (JSON array of samples)
pub fn load_dataset(path: &Path) -> Result<Vec<EvalSample>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset: {:?}", path))?;
    parse_dataset(&content)
}

pub fn parse_dataset(json: &str) -> Result<Vec<EvalSample>> {
    serde_json::from_str(json).context("Failed to parse evaluation dataset")
}
