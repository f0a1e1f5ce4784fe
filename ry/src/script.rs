//! The surface scripts get: a direct API for code running on the editor
//! thread, and [`ScriptTask`] for work running elsewhere.

use crate::{editor::Editor, queue::MutationSender};
use futures::channel::oneshot;
use ry_config::{SettingValue, SettingsError};
use ry_text::Location;
use std::{
    panic::{self, AssertUnwindSafe},
    thread,
};
use tracing::warn;

/// Builtins for scripts that run on the thread that owns the editor.
pub struct ScriptApi<'a> {
    editor: &'a mut Editor,
}

impl<'a> ScriptApi<'a> {
    pub fn new(editor: &'a mut Editor) -> Self {
        Self { editor }
    }

    pub fn buffer_names(&self) -> Vec<String> {
        self.editor
            .buffers()
            .iter()
            .map(|buffer| buffer.name().to_string())
            .collect()
    }

    pub fn current_buffer_name(&self) -> String {
        self.editor.current().name().to_string()
    }

    /// Shows the named buffer in the focused window.
    pub fn switch_buffer(&mut self, name: &str) -> bool {
        match self.editor.buffer_by_name(name) {
            Some(id) => self.editor.show_buffer(id),
            None => false,
        }
    }

    pub fn cursor(&self) -> Location {
        self.editor.store().cursor()
    }

    pub fn insert(&mut self, text: &str) {
        self.editor.store_mut().insert(text);
    }

    pub fn delete(&mut self, count: usize) -> String {
        self.editor.store_mut().delete(count)
    }

    pub fn setting(&self, name: &str) -> Option<SettingValue> {
        self.editor.settings().get(name).cloned()
    }

    /// Sets a setting, registering it if no one has yet.
    pub fn set_setting(
        &mut self,
        name: &str,
        value: impl Into<SettingValue>,
    ) -> Result<(), SettingsError> {
        self.editor.settings_mut().assign(name, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Script task panicked")]
    Panicked,
    #[error("Script task was dropped before finishing")]
    Cancelled,
}

/// A script future: a computation on its own thread whose result is
/// collected later. It reaches the editor only through its
/// [`MutationSender`].
#[derive(Debug)]
pub struct ScriptTask<T> {
    receiver: oneshot::Receiver<Result<T, TaskError>>,
}

impl<T: Send + 'static> ScriptTask<T> {
    pub fn spawn<F>(sender: MutationSender, f: F) -> Self
    where
        F: FnOnce(MutationSender) -> T + Send + 'static,
    {
        let (tx, receiver) = oneshot::channel();
        let spawned = thread::Builder::new()
            .name("ry-script".into())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| f(sender)))
                    .map_err(|_| TaskError::Panicked);
                // The receiver may be gone already, nothing to report then.
                let _ = tx.send(result);
            });
        if let Err(err) = spawned {
            warn!(%err, "failed to start script task");
        }
        Self { receiver }
    }

    /// Blocks until the task is done.
    pub fn force(self) -> Result<T, TaskError> {
        futures::executor::block_on(self.receiver).unwrap_or(Err(TaskError::Cancelled))
    }

    /// The result if the task has finished. Yields it once.
    pub fn try_take(&mut self) -> Option<Result<T, TaskError>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(TaskError::Cancelled)),
        }
    }
}
