use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

/// Key/value overrides for the card's texts, plus the special `imagePath`
/// key that swaps the photo source.
pub type CustomizeDoc = BTreeMap<String, String>;

#[derive(thiserror::Error, Debug)]
pub enum CustomizeError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

pub fn parse(text: &str) -> Result<CustomizeDoc, serde_json::Error> {
    serde_json::from_str(text)
}

/// Reads the customization document. Every failure is reported to the
/// caller, who logs and proceeds with defaults; nothing here is fatal.
pub fn load(path: &Path) -> Result<CustomizeDoc, CustomizeError> {
    let text = fs::read_to_string(path).map_err(|source| CustomizeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let doc = parse(&text).map_err(|source| CustomizeError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), keys = doc.len(), "customization loaded");
    Ok(doc)
}

/// Load-or-defaults convenience used at startup.
pub fn load_or_default(path: &Path) -> CustomizeDoc {
    match load(path) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(%err, "customization unavailable, using built-in content");
            CustomizeDoc::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_string_map() {
        let doc = parse(r#"{ "title": "Happy Birthday", "imagePath": "" }"#).unwrap();
        assert_eq!(doc["title"], "Happy Birthday");
        assert_eq!(doc["imagePath"], "");
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(parse(r#"{ "title": 3 }"#).is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CustomizeError::Io { .. }));
    }

    #[test]
    fn load_or_default_swallows_failures() {
        let doc = load_or_default(Path::new("/definitely/not/here.json"));
        assert!(doc.is_empty());
    }
}
