use crate::model::Product;
use std::fmt::Display;

/// Which of the two remote writes a save is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStage {
    ProductWrite,
    PriceHistoryWrite,
}

impl Display for SaveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveStage::ProductWrite => f.write_str("product write"),
            SaveStage::PriceHistoryWrite => f.write_str("price history write"),
        }
    }
}

/// Lifecycle of one submission.
///
/// `Idle -> Validating -> Saving(ProductWrite) -> Saving(PriceHistoryWrite)? -> Succeeded | Failed`
///
/// A failed validation goes back to `Idle`. `Failed` keeps the stage that failed and, like
/// `Idle`, accepts a new submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Validating,
    Saving(SaveStage),
    Succeeded,
    Failed(SaveStage),
}

impl EditorState {
    /// A submission is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, EditorState::Validating | EditorState::Saving(_))
    }
}

/// Create a new product, or edit an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(Product),
}

impl EditorMode {
    pub fn from_existing(existing: Option<Product>) -> Self {
        match existing {
            Some(product) => EditorMode::Edit(product),
            None => EditorMode::Create,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, EditorMode::Create)
    }

    pub fn existing(&self) -> Option<&Product> {
        match self {
            EditorMode::Create => None,
            EditorMode::Edit(product) => Some(product),
        }
    }
}

impl Display for EditorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorMode::Create => f.write_str("create"),
            EditorMode::Edit(product) => write!(f, "edit {}", product.code),
        }
    }
}
