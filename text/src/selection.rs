//! Turning two cursor cells into a span of text.

use crate::{Location, TextStore};
use std::ops::Range;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionKind {
    /// From one cell to the other, both included.
    Charwise,
    /// Every line touched by the two cells, newlines included.
    Linewise,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    /// First selected cell.
    pub start: Location,
    pub char_count: usize,
    /// Char offsets covered by the selection.
    pub range: Range<usize>,
}

/// Reads the text between `anchor` and `head`, in either order.
///
/// A charwise selection ending on a line end includes that line's newline.
pub fn extract(store: &TextStore, anchor: Location, head: Location, kind: SelectionKind) -> Extracted {
    let (from, to) = Location::ordered(anchor, head);
    let len = store.len_chars();
    let range = match kind {
        SelectionKind::Charwise => {
            let start = store.cell_offset(from);
            let end = (store.cell_offset(to) + 1).min(len);
            start..end
        },
        SelectionKind::Linewise => {
            let start = store.cell_offset(Location::new(from.line, 0));
            let last = to.line.min(store.line_count() - 1);
            let end = (store.cell_offset(Location::new(last, 0)) + store.line_len(last) + 1).min(len);
            start..end
        },
    };
    let text = store.slice(range.clone());
    Extracted {
        start: store.cell_location(range.start),
        char_count: range.len(),
        text,
        range,
    }
}
