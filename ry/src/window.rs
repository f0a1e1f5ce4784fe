//! Split layout of the windows on screen.
//!
//! The tree lives in an arena: nodes refer to their parent and children by
//! [`WindowId`], and a closed node leaves an empty slot behind that the next
//! split reuses.

use crate::buffer::BufferId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Retries of a focus move that lands back where it started.
const MAX_FOCUS_RETRIES: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitKind {
    /// Side by side: the first child is on the left.
    Vertical,
    /// Stacked: the first child is on top.
    Horizontal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn inverse(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The split kind whose children lie along this direction.
    fn axis(self) -> SplitKind {
        match self {
            Direction::Left | Direction::Right => SplitKind::Vertical,
            Direction::Up | Direction::Down => SplitKind::Horizontal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub buffer: BufferId,
    /// First buffer line shown.
    pub top_line: usize,
    /// Recenter on the cursor at the next scroll adjustment.
    pub center_pending: bool,
    /// Rows at the last layout, `0` until the window is first drawn.
    #[serde(default)]
    pub height: usize,
}

impl Leaf {
    pub fn new(buffer: BufferId) -> Self {
        Self {
            buffer,
            top_line: 0,
            center_pending: false,
            height: 0,
        }
    }

    /// Keeps `cursor_line` visible in a window `height` rows tall, the last
    /// row being the status bar.
    pub fn adjust_scroll(&mut self, cursor_line: usize, height: usize) {
        if self.center_pending {
            self.top_line = cursor_line.saturating_sub(height.saturating_sub(1) / 2);
            self.center_pending = false;
            return;
        }
        let visible = height.saturating_sub(2);
        if cursor_line > self.top_line + visible {
            self.top_line = cursor_line - visible;
        }
        if cursor_line < self.top_line {
            self.top_line = cursor_line;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub kind: SplitKind,
    pub first: WindowId,
    pub second: WindowId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf(Leaf),
    Split(Split),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowNode {
    pub parent: Option<WindowId>,
    pub kind: NodeKind,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTree {
    nodes: Vec<Option<WindowNode>>,
    root: WindowId,
    focused: WindowId,
}

impl WindowTree {
    /// A single window showing `buffer`.
    pub fn new(buffer: BufferId) -> Self {
        Self {
            nodes: vec![Some(WindowNode {
                parent: None,
                kind: NodeKind::Leaf(Leaf::new(buffer)),
            })],
            root: WindowId(0),
            focused: WindowId(0),
        }
    }

    pub fn root(&self) -> WindowId {
        self.root
    }

    pub fn focused(&self) -> WindowId {
        self.focused
    }

    pub fn node(&self, id: WindowId) -> Option<&WindowNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: WindowId) -> Option<&mut WindowNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn leaf(&self, id: WindowId) -> Option<&Leaf> {
        match &self.node(id)?.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    pub fn leaf_mut(&mut self, id: WindowId) -> Option<&mut Leaf> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    fn split_of(&self, id: WindowId) -> Option<&Split> {
        match &self.node(id)?.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn parent(&self, id: WindowId) -> Option<WindowId> {
        self.node(id)?.parent
    }

    pub fn focused_leaf(&self) -> Option<&Leaf> {
        self.leaf(self.focused)
    }

    pub fn focused_leaf_mut(&mut self) -> Option<&mut Leaf> {
        self.leaf_mut(self.focused)
    }

    pub fn focused_buffer(&self) -> Option<BufferId> {
        self.focused_leaf().map(|leaf| leaf.buffer)
    }

    /// Focuses a leaf. Returns `false` for splits and stale ids.
    pub fn focus(&mut self, id: WindowId) -> bool {
        if self.leaf(id).is_none() {
            return false;
        }
        self.focused = id;
        true
    }

    fn alloc(&mut self, node: WindowNode) -> WindowId {
        match self.nodes.iter().position(Option::is_none) {
            Some(ix) => {
                self.nodes[ix] = Some(node);
                WindowId(ix)
            },
            None => {
                self.nodes.push(Some(node));
                WindowId(self.nodes.len() - 1)
            },
        }
    }

    /// Points whichever slot held `old` at `new`.
    fn replace_child(&mut self, parent: Option<WindowId>, old: WindowId, new: WindowId) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                if let Some(WindowNode {
                    kind: NodeKind::Split(split),
                    ..
                }) = self.node_mut(parent)
                {
                    if split.first == old {
                        split.first = new;
                    } else if split.second == old {
                        split.second = new;
                    }
                }
            },
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = parent;
        }
    }

    /// Replaces the focused leaf with the split `build` makes from it.
    ///
    /// `build` receives the id the demoted leaf keeps and returns the kind
    /// of split, the new leaf and whether the new leaf goes first. Returns
    /// the id of the new leaf; focus does not move.
    pub fn replace_current(
        &mut self,
        build: impl FnOnce(WindowId) -> (SplitKind, Leaf, bool),
    ) -> WindowId {
        let current = self.focused;
        let parent = self.parent(current);
        let (kind, leaf, new_first) = build(current);
        let new_leaf = self.alloc(WindowNode {
            parent: None,
            kind: NodeKind::Leaf(leaf),
        });
        let (first, second) = if new_first {
            (new_leaf, current)
        } else {
            (current, new_leaf)
        };
        let split = self.alloc(WindowNode {
            parent,
            kind: NodeKind::Split(Split {
                kind,
                first,
                second,
            }),
        });
        self.replace_child(parent, current, split);
        for child in [first, second] {
            if let Some(node) = self.node_mut(child) {
                node.parent = Some(split);
            }
        }
        new_leaf
    }

    /// Splits the focused window. The old window keeps the left or top half
    /// and the new one, showing `buffer`, takes focus.
    pub fn split(&mut self, kind: SplitKind, buffer: BufferId) -> WindowId {
        let new_leaf = self.replace_current(|_| (kind, Leaf::new(buffer), false));
        self.focused = new_leaf;
        debug!(?kind, window = new_leaf.0, "split window");
        new_leaf
    }

    /// Closes the focused window and gives its space to its sibling. The
    /// last window can't be closed.
    pub fn close_focused(&mut self) -> bool {
        let current = self.focused;
        let Some(parent) = self.parent(current) else {
            return false;
        };
        let Some(split) = self.split_of(parent).cloned() else {
            return false;
        };
        let sibling = if split.first == current {
            split.second
        } else {
            split.first
        };
        let grandparent = self.parent(parent);
        self.replace_child(grandparent, parent, sibling);
        self.nodes[current.0] = None;
        self.nodes[parent.0] = None;
        self.focused = self.first_leaf(sibling);
        debug!(closed = current.0, focused = self.focused.0, "closed window");
        true
    }

    fn first_leaf(&self, mut id: WindowId) -> WindowId {
        while let Some(split) = self.split_of(id) {
            id = split.first;
        }
        id
    }

    /// Every leaf, left to right and top to bottom.
    pub fn leaves(&self) -> Vec<WindowId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.node(id).map(|node| &node.kind) {
                Some(NodeKind::Leaf(_)) => leaves.push(id),
                Some(NodeKind::Split(split)) => {
                    stack.push(split.second);
                    stack.push(split.first);
                },
                None => {},
            }
        }
        leaves
    }

    /// Scrolls every drawn window showing `buffer` so `cursor_line` stays
    /// visible.
    pub fn scroll_to(&mut self, buffer: BufferId, cursor_line: usize) {
        for node in self.nodes.iter_mut().flatten() {
            if let NodeKind::Leaf(leaf) = &mut node.kind {
                if leaf.buffer == buffer && leaf.height > 0 {
                    leaf.adjust_scroll(cursor_line, leaf.height);
                }
            }
        }
    }

    /// Points every window showing `old` at `new`.
    pub fn retarget(&mut self, old: BufferId, new: BufferId) {
        for node in self.nodes.iter_mut().flatten() {
            if let NodeKind::Leaf(leaf) = &mut node.kind {
                if leaf.buffer == old {
                    *leaf = Leaf::new(new);
                }
            }
        }
    }

    /// Rectangles of every leaf within `area`. Splits halve their area,
    /// the first child getting the smaller half.
    pub fn layout(&self, area: Rect) -> Vec<(WindowId, Rect)> {
        let mut out = Vec::new();
        self.layout_node(self.root, area, &mut out);
        out
    }

    fn layout_node(&self, id: WindowId, area: Rect, out: &mut Vec<(WindowId, Rect)>) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Leaf(_) => out.push((id, area)),
            NodeKind::Split(split) => {
                let (first, second) = match split.kind {
                    SplitKind::Vertical => {
                        let half = area.width / 2;
                        (
                            Rect::new(area.x, area.y, half, area.height),
                            Rect::new(area.x + half, area.y, area.width - half, area.height),
                        )
                    },
                    SplitKind::Horizontal => {
                        let half = area.height / 2;
                        (
                            Rect::new(area.x, area.y, area.width, half),
                            Rect::new(area.x, area.y + half, area.width, area.height - half),
                        )
                    },
                };
                self.layout_node(split.first, first, out);
                self.layout_node(split.second, second, out);
            },
        }
    }

    /// The first split of `kind` at or above `from`.
    fn climb(&self, mut from: Option<WindowId>, kind: SplitKind) -> Option<WindowId> {
        while let Some(id) = from {
            if self.split_of(id).is_some_and(|split| split.kind == kind) {
                return Some(id);
            }
            from = self.parent(id);
        }
        None
    }

    /// Moves focus to the nearest window in `direction`. Returns `false`
    /// when there is none.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        let before = self.focused;
        self.move_focus_skipping(direction, 0);
        debug!(?direction, from = before.0, to = self.focused.0, "move focus");
        self.focused != before
    }

    /// Climbs to the nearest split along `going`, then past `skip` more
    /// splits of that kind, and descends towards `going`. After the first
    /// step down the direction flips, so the descent hugs the edge the focus
    /// came from. Landing back on the focused window retries one split
    /// higher.
    fn move_focus_skipping(&mut self, mut going: Direction, skip: usize) {
        let axis = going.axis();
        let mut node = self.climb(Some(self.focused), axis);
        for _ in 0..skip {
            let above = node.and_then(|id| self.parent(id));
            node = self.climb(above, axis);
        }
        let Some(mut node) = node else {
            return;
        };

        let mut flipped = false;
        while let Some(split) = self.split_of(node) {
            node = match split.kind {
                SplitKind::Horizontal if going == Direction::Up => split.first,
                SplitKind::Horizontal => split.second,
                SplitKind::Vertical if going == Direction::Left => split.first,
                SplitKind::Vertical => split.second,
            };
            if !flipped {
                flipped = true;
                going = going.inverse();
            }
        }

        if node == self.focused {
            if skip < MAX_FOCUS_RETRIES {
                self.move_focus_skipping(going.inverse(), skip + 1);
            }
            return;
        }
        self.focused = node;
    }
}
