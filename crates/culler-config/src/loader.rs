//! Predicate document loading.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// On-disk encoding of a predicate document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl PredicateFormat {
    /// Format implied by `path`'s extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedPredicateFormat`] for any other extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedPredicateFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Read and parse the predicate document at `path`.
///
/// # Errors
///
/// Returns an error when the extension is unsupported, the file cannot be read,
/// or its contents do not parse.
pub fn load_predicate_document(path: &Path) -> ConfigResult<Value> {
    let format = PredicateFormat::from_path(path)?;
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::PredicateRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Result<Value, String> = match format {
        PredicateFormat::Json => serde_json::from_str(&raw).map_err(|err| err.to_string()),
        PredicateFormat::Yaml => serde_yaml::from_str(&raw).map_err(|err| err.to_string()),
    };
    let document = parsed.map_err(|detail| ConfigError::PredicateParse {
        path: path.to_path_buf(),
        format: format.as_str(),
        detail,
    })?;

    debug!(path = %path.display(), format = format.as_str(), "loaded predicate document");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    #[test]
    fn json_and_yaml_documents_parse_identically() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let json_path = write(
            &dir,
            "remove.json",
            r#"{ "properties": { "uploadRatio": { "minimum": 2 } } }"#,
        )?;
        let yaml_path = write(
            &dir,
            "remove.YML",
            "properties:\n  uploadRatio:\n    minimum: 2\n",
        )?;

        let expected = json!({ "properties": { "uploadRatio": { "minimum": 2 } } });
        assert_eq!(load_predicate_document(&json_path)?, expected);
        assert_eq!(load_predicate_document(&yaml_path)?, expected);
        Ok(())
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_predicate_document(Path::new("/tmp/predicate.tmpl")).expect_err("tmpl");
        assert!(matches!(err, ConfigError::UnsupportedPredicateFormat { .. }));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = load_predicate_document(Path::new("/definitely/missing/predicate.json"))
            .expect_err("missing");
        assert!(matches!(err, ConfigError::PredicateRead { .. }));
    }

    #[test]
    fn malformed_document_reports_format() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let path = write(&dir, "broken.json", "{ not json")?;
        let err = load_predicate_document(&path).expect_err("malformed");
        assert!(matches!(err, ConfigError::PredicateParse { format: "json", .. }));
        Ok(())
    }
}
