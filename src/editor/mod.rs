//! Selection and form state for the side panel, and the operations that
//! commit it into the graph.

mod controller;
mod selection;

pub use controller::{Editor, ImportSummary, Removed};
pub use selection::{FormBuffer, FormField, Selection};
