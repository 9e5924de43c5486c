/// Result alias that carries the custom [`SceneError`] type.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Every way a compile call (or one of its helpers) can fail.
///
/// A failure always voids the whole call: callers never receive a partially
/// compiled scene alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A joint refers to object ids that are not present in the scene.
    #[error("{joint} references unknown object id(s): {}", .ids.join(", "))]
    MissingObject { joint: String, ids: Vec<String> },
    /// A field the compiler needs was absent from an input record.
    #[error("{context} is missing required field `{field}`")]
    MissingField {
        context: String,
        field: &'static str,
    },
    /// A field the compiler reads has a shape it cannot compute with.
    #[error("{context} has invalid `{field}`: {source}")]
    InvalidField {
        context: String,
        field: &'static str,
        source: serde_json::Error,
    },
    /// A JSON document could not be read into its typed model, either
    /// because a required key is absent or because a value has the wrong type.
    #[error("invalid or missing key: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Caller supplied parameters outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The renderer template could not be filled in.
    #[error("template error: {0}")]
    Template(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl SceneError {
    pub(crate) fn missing_field(context: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            context: context.into(),
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_object_names_every_id() {
        let err = SceneError::MissingObject {
            joint: "PulleyJoint".to_string(),
            ids: vec!["ghost".to_string(), "phantom".to_string()],
        };

        let text = err.to_string();
        assert!(text.contains("ghost"));
        assert!(text.contains("phantom"));
    }

    #[test]
    fn missing_field_mentions_context() {
        let err = SceneError::missing_field("object `ball`", "position");
        assert_eq!(
            err.to_string(),
            "object `ball` is missing required field `position`"
        );
    }

    #[test]
    fn invalid_field_carries_parse_failure() {
        let source = serde_json::from_str::<f64>("\"heavy\"").unwrap_err();
        let err = SceneError::InvalidField {
            context: "object `crate`".to_string(),
            field: "mass",
            source,
        };
        assert!(err.to_string().starts_with("object `crate` has invalid `mass`: "));
    }
}
