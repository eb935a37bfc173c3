use crate::editor::state::SaveStage;
use crate::model::Field;
use crate::service::ServiceError;

/// The draft cannot be submitted as it is. Nothing was sent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields(Vec<Field>),

    #[error("Initial price must be a non-negative number, got {0:?}")]
    InvalidPrice(String),
}

/// Errors returned by [`ProductEditor`](crate::editor::ProductEditor).
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A remote write failed. With `stage == PriceHistoryWrite` the product row is
    /// already committed unless `rolled_back` is set.
    #[error("{stage} failed: {source}")]
    SaveFailed {
        stage: SaveStage,
        #[source]
        source: ServiceError,
        rolled_back: bool,
    },

    #[error("a submission is already in progress")]
    Busy,

    #[error("the editor is closed")]
    Closed,

    #[error("{0} cannot be changed when editing a product")]
    FieldLocked(Field),

    #[error("{0} is not shown when editing a product")]
    FieldHidden(Field),
}

impl EditorError {
    /// The text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            EditorError::SaveFailed { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}
