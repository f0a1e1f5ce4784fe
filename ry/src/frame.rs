//! What a renderer needs to draw one screen.

use crate::{
    buffer::BufferId,
    editor::{Editor, Message},
    window::{Rect, WindowId},
};
use ry_text::Location;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pane {
    pub window: WindowId,
    pub buffer: BufferId,
    pub rect: Rect,
    pub top_line: usize,
    /// Cursor cell of the buffer shown.
    pub cursor: Location,
    pub focused: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub panes: Vec<Pane>,
    /// Active modes of the current buffer.
    pub modes: Vec<String>,
    pub message: Option<Message>,
    pub pending_keys: String,
    /// The prompt line, prefix included.
    pub prompt: Option<String>,
}

impl Editor {
    /// Lays the windows out over `width` by `height` cells. The bottom row
    /// is left for the message bar.
    ///
    /// A window drawn at a new size, or waiting to recenter, is scrolled to
    /// its cursor here. Otherwise scrolling follows the `moved` hook.
    pub fn frame(&mut self, width: u16, height: u16) -> Frame {
        let area = Rect::new(0, 0, width, height.saturating_sub(1));
        let focused = self.windows.focused();
        let mut panes = Vec::new();
        for (window, rect) in self.windows.layout(area) {
            let Some(buffer) = self.windows.leaf(window).map(|leaf| leaf.buffer) else {
                continue;
            };
            let cursor = self
                .buffer(buffer)
                .map(|buffer| buffer.store.cursor())
                .unwrap_or_default();
            let Some(leaf) = self.windows.leaf_mut(window) else {
                continue;
            };
            let height = rect.height as usize;
            if leaf.height != height || leaf.center_pending {
                leaf.height = height;
                leaf.adjust_scroll(cursor.line, height);
            }
            panes.push(Pane {
                window,
                buffer,
                rect,
                top_line: leaf.top_line,
                cursor,
                focused: window == focused,
            });
        }
        let current = self.current();
        Frame {
            panes,
            modes: current.modes.names().into_iter().map(String::from).collect(),
            message: self.message().cloned(),
            pending_keys: self.pending_keys().to_string(),
            prompt: self
                .prompt()
                .map(|prompt| format!("{}{}", prompt.kind.prefix(), prompt.text)),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pane in &self.panes {
            let marker = if pane.focused { "*" } else { " " };
            writeln!(
                f,
                "{marker}{} {}x{} at {},{} buffer {} top {} cursor {}",
                pane.window.0,
                pane.rect.width,
                pane.rect.height,
                pane.rect.x,
                pane.rect.y,
                pane.buffer,
                pane.top_line,
                pane.cursor,
            )?;
        }
        write!(f, "[{}]", self.modes.join(" "))?;
        if !self.pending_keys.is_empty() {
            write!(f, " {}", self.pending_keys)?;
        }
        if let Some(prompt) = &self.prompt {
            write!(f, " {prompt}")?;
        }
        if let Some(message) = &self.message {
            write!(f, " {}", message.text)?;
        }
        Ok(())
    }
}
