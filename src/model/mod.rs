//! Plain data types: the records that travel to the data service and the editor's draft.

pub mod draft;
pub mod price_history;
pub mod product;

pub use draft::*;
pub use price_history::*;
pub use product::*;
