//! Handing edits to the editor from other threads.
//!
//! Only the thread that owns the [`Editor`] mutates it. Everyone else sends
//! a [`Mutation`] and the owner applies it in
//! [`Editor::drain_mutations`].

use crate::editor::Editor;
use futures::channel::mpsc::UnboundedSender;
use ry_config::SettingValue;
use std::fmt;

pub enum Mutation {
    /// Inserts at the point of the named buffer, or the current one.
    Insert { buffer: Option<String>, text: String },
    Delete { buffer: Option<String>, count: usize },
    SetSetting { name: String, value: SettingValue },
    Message(String),
    Apply(Box<dyn FnOnce(&mut Editor) + Send>),
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Insert { buffer, text } => f
                .debug_struct("Insert")
                .field("buffer", buffer)
                .field("text", text)
                .finish(),
            Mutation::Delete { buffer, count } => f
                .debug_struct("Delete")
                .field("buffer", buffer)
                .field("count", count)
                .finish(),
            Mutation::SetSetting { name, value } => f
                .debug_struct("SetSetting")
                .field("name", name)
                .field("value", value)
                .finish(),
            Mutation::Message(text) => f.debug_tuple("Message").field(text).finish(),
            Mutation::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("The editor is no longer accepting mutations")]
pub struct QueueClosed;

#[derive(Debug, Clone)]
pub struct MutationSender {
    tx: UnboundedSender<Mutation>,
}

impl MutationSender {
    pub(crate) fn new(tx: UnboundedSender<Mutation>) -> Self {
        Self { tx }
    }

    pub fn send(&self, mutation: Mutation) -> Result<(), QueueClosed> {
        self.tx.unbounded_send(mutation).map_err(|_| QueueClosed)
    }

    pub fn insert(&self, buffer: Option<&str>, text: impl Into<String>) -> Result<(), QueueClosed> {
        self.send(Mutation::Insert {
            buffer: buffer.map(str::to_string),
            text: text.into(),
        })
    }

    pub fn delete(&self, buffer: Option<&str>, count: usize) -> Result<(), QueueClosed> {
        self.send(Mutation::Delete {
            buffer: buffer.map(str::to_string),
            count,
        })
    }

    pub fn set_setting(
        &self,
        name: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Result<(), QueueClosed> {
        self.send(Mutation::SetSetting {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn message(&self, text: impl Into<String>) -> Result<(), QueueClosed> {
        self.send(Mutation::Message(text.into()))
    }

    pub fn apply(&self, f: impl FnOnce(&mut Editor) + Send + 'static) -> Result<(), QueueClosed> {
        self.send(Mutation::Apply(Box::new(f)))
    }
}
