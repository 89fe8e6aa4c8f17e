use thiserror::Error;

/// Failures raised by a workflow registry or a workflow itself.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No registered workflow supports the subject.
    #[error("unable to find a workflow for subject \"{subject}\"")]
    NotFound { subject: String },

    /// Several workflows support the subject and no name was given to pick one.
    #[error("too many workflows ({names}) match this subject ({subject}); set a different name on each and pass it explicitly")]
    Ambiguous { names: String, subject: String },

    #[error("transition \"{transition}\" is not enabled for workflow \"{workflow}\"")]
    NotEnabled { transition: String, workflow: String },

    #[error("transition \"{transition}\" is not defined for workflow \"{workflow}\"")]
    Undefined { transition: String, workflow: String },

    #[error("invalid workflow definition: {0}")]
    InvalidDefinition(String),
}

impl WorkflowError {
    /// Whether this is a failure of the transition logic (as opposed to a lookup
    /// or definition problem).
    pub fn is_logic(&self) -> bool {
        matches!(self, Self::NotEnabled { .. } | Self::Undefined { .. })
    }
}

/// Failures raised by the admin's persistence layer.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("model manager error: {0}")]
    ModelManager(String),

    /// The stored object changed since it was loaded.
    #[error("lock error: {0}")]
    Lock(String),
}

/// Typed failures of the transition controller action.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{message}")]
    NotFound {
        message: String,
        #[source]
        source: Option<WorkflowError>,
    },

    #[error("{message}")]
    BadRequest {
        message: String,
        #[source]
        source: Option<WorkflowError>,
    },

    #[error("access denied: {capability}")]
    AccessDenied { capability: String },

    #[error(transparent)]
    ModelManager(PersistenceError),

    /// The engine failed for a reason other than the transition logic.
    #[error(transparent)]
    Workflow(WorkflowError),
}

impl ControllerError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            source: None,
        }
    }
}

/// Invalid extension options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid extension options: {0}")]
    Invalid(#[from] toml::de::Error),

    #[error("option \"{0}\" must not be empty")]
    Empty(&'static str),
}

/// Top-level failures of the `workflow-admin` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No pull request with id {0}")]
    UnknownObject(String),

    #[error("Options error: {0}")]
    Options(#[from] OptionsError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
