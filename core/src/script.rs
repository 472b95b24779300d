use std::path::PathBuf;

use crate::error::{GsmErrorExt, Level};

/// A unit of GSM source text together with the name used in diagnostics.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, Box<dyn GsmErrorExt>> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(MissingScriptError {
                path: path.clone(),
                reason: e.to_string(),
            }) as Box<dyn GsmErrorExt>
        })?;
        Ok(Script { name, path, content })
    }

    /// Build a script from in-memory text; `name` is what diagnostics report.
    pub fn from_source(name: &str, content: &str) -> Self {
        Script {
            name: name.to_string(),
            path: PathBuf::from(name),
            content: content.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing script at {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for MissingScriptError {}

impl GsmErrorExt for MissingScriptError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "gsm.script".to_string()
    }

    fn span(&self) -> Option<crate::location::Span> {
        None
    }

    fn location(&self) -> Option<crate::location::Location> {
        None
    }
}
