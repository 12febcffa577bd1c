//! Watermark text configuration
//!
//! The watermark text lives in a small JSON file next to the documents
//! being processed, so a site administrator can change the stamp without
//! touching the tool itself:
//!
//! ```json
//! { "watermark_text": "Confidential\\nDo not distribute" }
//! ```
//!
//! The two-character token `\n` (backslash followed by `n`) inside the
//! text marks a line break in the rendered watermark. A missing
//! `watermark_text` key falls back to [`DEFAULT_WATERMARK_TEXT`]; a
//! missing or malformed file is an error, so a deployment with a broken
//! config never stamps documents with the wrong text.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default config file name, looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "gdpr_watermark.json";

/// Watermark text used when the config omits the `watermark_text` key
pub const DEFAULT_WATERMARK_TEXT: &str = "Confidential";

/// Parsed watermark configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct WatermarkConfig {
    /// Text to stamp on each page; `None` when the key is absent or null
    #[serde(default)]
    pub watermark_text: Option<String>,
}

/// Load the watermark text from a JSON config file.
///
/// Returns [`Error::Config`] if the file cannot be read or is not valid
/// JSON. A file that parses but has no `watermark_text` key yields
/// [`DEFAULT_WATERMARK_TEXT`].
pub fn load_watermark_text(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let config: WatermarkConfig = serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config
        .watermark_text
        .unwrap_or_else(|| DEFAULT_WATERMARK_TEXT.to_string()))
}
