use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Maps a literal display string to its translation.
pub trait Localizer {
    fn translate(&self, msgid: &str) -> String;
}

/// Returns every string untranslated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Localizer for Identity {
    fn translate(&self, msgid: &str) -> String {
        msgid.to_string()
    }
}

/// Flat `{msgid: msgstr}` catalog; unknown ids fall through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn from_json(doc: &str) -> Result<Self> {
        let messages: HashMap<String, String> =
            serde_json::from_str(doc).context("locale catalog must be a {msgid: msgstr} object")?;
        Ok(Self { messages })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let doc = std::fs::read_to_string(path)
            .with_context(|| format!("reading locale catalog {}", path.display()))?;
        Self::from_json(&doc)
    }
}

impl Localizer for Catalog {
    fn translate(&self, msgid: &str) -> String {
        match self.messages.get(msgid) {
            Some(msgstr) if !msgstr.is_empty() => msgstr.clone(),
            _ => msgid.to_string(),
        }
    }
}
