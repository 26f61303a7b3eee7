//! Typed YAML loading for case files, the case store and the config file

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Deserialize `content`, reporting failures against `origin`
///
/// `origin` names the document in diagnostics (usually its path).
pub fn parse_yaml<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, origin).into())
}

/// Read and deserialize the YAML document at `path`
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let origin = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(content) => parse_yaml(&content, &origin),
        Err(source) => Err(YamlError::Read {
            path: origin,
            source,
        }),
    }
}
