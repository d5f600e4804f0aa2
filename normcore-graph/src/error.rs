use normcore_types::InstanceId;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur constructing or addressing instances.
///
/// Hook failures carry the message the defaults function or setup hook
/// returned; nothing is committed when construction fails partway, apart
/// from related instances already committed by earlier branches of the same
/// payload.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("unknown model `{0}`")]
    UnknownModel(String),

    #[error("payload for `{model}` must be an object, got {found}")]
    InvalidPayload { model: String, found: &'static str },

    #[error("defaults for `{model}` failed: {message}")]
    Defaults { model: String, message: String },

    #[error("setup hook for `{model}` failed: {message}")]
    Setup { model: String, message: String },

    #[error("unknown instance {0}")]
    UnknownInstance(InstanceId),

    #[error("instance {uid} of `{model}` has no identifier to commit under")]
    MissingIdentifier { model: String, uid: InstanceId },
}
