//! Text storage for the ry editor.
//!
//! The key components are:
//! - [`TextStore`] - a buffer's contents on a [`ropey::Rope`], with point, marks and history
//! - [`ActionLog`] - the undo/redo log, with a pluggable [`MergePolicy`]
//! - [`selection::extract`] - reading the text between two cursor cells

mod history;
mod location;
mod mark;
pub mod selection;
mod store;

pub use history::{
    Action, ActionKind, ActionLog, HistoryError, MergePolicy, NeverMerge, TypingRuns,
};
pub use location::Location;
pub use mark::{Mark, MarkId};
pub use selection::{Extracted, SelectionKind};
pub use store::{Checksum, TextStore};
