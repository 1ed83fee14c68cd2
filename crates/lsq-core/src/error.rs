use crate::validate::ValidationIssue;

/// Alias for `Result<T, CatalogError>`.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur when building or loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog content breaks one or more invariants.
    #[error("invalid catalog: {}", summarize(.0))]
    Invalid(Vec<ValidationIssue>),

    /// The catalog document could not be parsed.
    #[error("cannot parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn summarize(issues: &[ValidationIssue]) -> String {
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error)
        .map(|i| i.to_string())
        .collect();
    match errors.len() {
        0 => "no errors".to_string(),
        1 => errors[0].clone(),
        n => format!("{} (and {} more)", errors[0], n - 1),
    }
}
