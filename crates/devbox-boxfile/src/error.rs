/// Errors raised while parsing a boxfile.
#[derive(Debug, thiserror::Error)]
pub enum BoxfileError {
    /// The text is not valid YAML.
    #[error("Invalid boxfile YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document root is something other than a mapping.
    #[error("Boxfile root must be a mapping, found {found}")]
    NotAMapping {
        /// Kind of value found at the root.
        found: &'static str,
    },

    /// Two keys of one mapping name the same entry once stringified.
    #[error("Duplicate boxfile key: {key}")]
    DuplicateKey { key: String },
}

impl BoxfileError {
    pub(crate) fn not_a_mapping(found: &'static str) -> Self {
        Self::NotAMapping { found }
    }

    pub(crate) fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }
}
