use geodiff_core_types::RunId;
use thiserror::Error;

use crate::model::EntityType;
use crate::rules::InvalidAction;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised while turning a change stream into audit records. Each kind maps to
/// a stable error code that can be used for programmatic handling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    MissingField,

    // Consistency
    /// The claimed action does not match the stored entity state (BREAK mode only)
    InvalidAction,
    NotFound,
    AlreadyExists,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ConstraintViolation,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::InvalidAction => "ERR_INVALID_ACTION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the entity,
/// changeset and run context needed to find the offending change again.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_type: Option<EntityType>,
    entity_id: Option<i64>,
    changeset_id: Option<i64>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_type: None,
            entity_id: None,
            changeset_id: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context
    pub fn with_entity(mut self, entity_type: EntityType, entity_id: i64) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = Some(entity_id);
        self
    }

    /// Add changeset context
    pub fn with_changeset_id(mut self, changeset_id: i64) -> Self {
        self.changeset_id = Some(changeset_id);
        self
    }

    /// Add run context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity type context, if any
    pub fn entity_type(&self) -> Option<EntityType> {
        self.entity_type
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    /// Get the changeset ID context, if any
    pub fn changeset_id(&self) -> Option<i64> {
        self.changeset_id
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let (Some(entity_type), Some(entity_id)) = (self.entity_type, self.entity_id) {
            write!(f, " (entity: {} {})", entity_type, entity_id)?;
        }
        if let Some(changeset_id) = self.changeset_id {
            write!(f, " (changeset_id: {})", changeset_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for change processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoDiffError {
    /// An entity arrived without the timestamp every audit record needs
    #[error("Entity({entity_type}) {entity_id} does not have a timestamp set.")]
    MissingTimestamp {
        entity_type: EntityType,
        entity_id: i64,
    },

    /// Entity versions start at 1
    #[error("Entity({entity_type}) {entity_id} has invalid version {version}; versions start at 1.")]
    InvalidVersion {
        entity_type: EntityType,
        entity_id: i64,
        version: i64,
    },

    /// The claimed action contradicts the stored entity state
    #[error("Invalid action: {0}")]
    InvalidAction(InvalidAction),

    /// Unrecognized change action name
    #[error("The action {value} is unrecognized.")]
    UnknownAction { value: String },

    /// Unrecognized entity type name or code
    #[error("Unknown entity type: {value}")]
    UnknownEntityType { value: String },

    /// Unrecognized invalid-actions mode name
    #[error("Unknown invalid actions mode: {value} (expected ignore, log or break)")]
    UnknownInvalidActionsMode { value: String },
}

/// Conversion from GeoDiffError to ExError
///
/// Domain errors keep their human-readable message and gain a stable kind.
impl From<GeoDiffError> for ExError {
    fn from(err: GeoDiffError) -> Self {
        let message = err.to_string();
        match err {
            GeoDiffError::MissingTimestamp {
                entity_type,
                entity_id,
            } => ExError::new(ExErrorKind::MissingField)
                .with_op("process_change")
                .with_entity(entity_type, entity_id)
                .with_message(message),

            GeoDiffError::InvalidVersion {
                entity_type,
                entity_id,
                ..
            } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("process_change")
                .with_entity(entity_type, entity_id)
                .with_message(message),

            GeoDiffError::InvalidAction(invalid) => ExError::new(ExErrorKind::InvalidAction)
                .with_op("validate_action")
                .with_entity(invalid.entity_type, invalid.entity_id)
                .with_message(message),

            GeoDiffError::UnknownAction { .. }
            | GeoDiffError::UnknownEntityType { .. }
            | GeoDiffError::UnknownInvalidActionsMode { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}
