use crate::Location;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Handle to a [`Mark`] inside one [`crate::TextStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarkId(pub(crate) u32);

/// A remembered position. Floating marks follow the text around them as it
/// is edited; fixed marks keep their coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mark {
    pub location: Location,
    pub fixed: bool,
}

#[derive(Debug, Default)]
pub(crate) struct MarkSet {
    next_id: u32,
    marks: FxHashMap<MarkId, Mark>,
    named: FxHashMap<char, MarkId>,
}

impl MarkSet {
    pub fn create(&mut self, location: Location, fixed: bool) -> MarkId {
        let id = MarkId(self.next_id);
        self.next_id += 1;
        self.marks.insert(id, Mark { location, fixed });
        id
    }

    pub fn get(&self, id: MarkId) -> Option<Mark> {
        self.marks.get(&id).copied()
    }

    pub fn remove(&mut self, id: MarkId) -> bool {
        self.named.retain(|_, named| *named != id);
        self.marks.remove(&id).is_some()
    }

    pub fn relocate(&mut self, id: MarkId, location: Location) {
        if let Some(mark) = self.marks.get_mut(&id) {
            mark.location = location;
        }
    }

    pub fn floating(&self) -> impl Iterator<Item = (MarkId, Location)> + '_ {
        self.marks
            .iter()
            .filter(|(_, mark)| !mark.fixed)
            .map(|(id, mark)| (*id, mark.location))
    }

    pub fn fixed(&self) -> impl Iterator<Item = (MarkId, Location)> + '_ {
        self.marks
            .iter()
            .filter(|(_, mark)| mark.fixed)
            .map(|(id, mark)| (*id, mark.location))
    }

    /// Binds `name` to `id`, returning the mark it previously named.
    pub fn name(&mut self, name: char, id: MarkId) -> Option<MarkId> {
        self.named.insert(name, id)
    }

    pub fn named(&self, name: char) -> Option<MarkId> {
        self.named.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }
}

// Marks are tracked as gaps: the number of chars before them.

/// Gap of a floating mark after `len` chars were inserted at gap `at`.
/// Insertions exactly at the mark land after it.
pub(crate) fn shift_for_insert(mark: usize, at: usize, len: usize) -> usize {
    if at < mark {
        mark + len
    } else {
        mark
    }
}

/// Gap of a floating mark after `len` chars were removed starting at gap
/// `at`. A mark inside the removed span collapses to its start.
pub(crate) fn shift_for_delete(mark: usize, at: usize, len: usize) -> usize {
    if at + len <= mark {
        mark - len
    } else if at < mark {
        at
    } else {
        mark
    }
}
