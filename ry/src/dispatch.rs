//! Feeding keystrokes through the active layers.

use crate::{
    chord::KeyChord,
    editor::Editor,
    key::{KeyCode, KeyParseError, KeyStroke},
};
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

/// What one keystroke did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A binding ran with these keys.
    Handled(KeyChord),
    /// The key was added to the pending chord.
    Pending,
    /// The pending chord was dropped.
    Cancelled,
}

fn is_cancel(key: &KeyStroke) -> bool {
    key.code == KeyCode::Escape && key.modifiers.is_empty()
        || *key == KeyStroke::char('g').ctrl()
}

impl Editor {
    /// Pushes `key` onto the pending chord and runs the binding it completes.
    ///
    /// The first layer with a match wins. If a longer binding in any layer
    /// could still complete from the keys typed so far, the editor waits for
    /// the next key instead of firing the shorter match.
    pub fn handle_key(&mut self, key: KeyStroke) -> Dispatch {
        if !self.pending.is_empty() && is_cancel(&key) {
            debug!(keys = %self.pending, "cancelled");
            self.pending.clear();
            return Dispatch::Cancelled;
        }
        self.pending.push(key);

        let layers = self.layers();
        let found = layers.iter().find_map(|mode| {
            let (binding, len) = mode.lookup(&self.pending)?;
            Some((SmolStr::from(mode.name()), binding.command.clone(), len))
        });
        let matched = found.as_ref().map_or(0, |(_, _, len)| *len);
        let waiting = layers
            .iter()
            .filter_map(|mode| mode.longest_wait(&self.pending))
            .max();
        if waiting.is_some_and(|typed| typed >= matched) {
            trace!(keys = %self.pending, "waiting for more keys");
            return Dispatch::Pending;
        }
        let Some((mode, command, len)) = found else {
            trace!(keys = %self.pending, "no binding");
            return Dispatch::Pending;
        };

        let keys = self.pending.suffix(len);
        self.pending.clear();
        debug!(%mode, %keys, %command, "dispatched");
        self.run_command(&command, &keys);
        self.last_keys = keys.clone();
        Dispatch::Handled(keys)
    }

    /// Runs a registered command as if `keys` had triggered it, firing
    /// buffer hooks for what it changed.
    pub fn run_command(&mut self, name: &str, keys: &KeyChord) -> bool {
        match self.commands().get(name).map(|command| command.run) {
            Some(run) => {
                let id = self.current_id();
                self.watching(id, |editor| run(editor, keys));
                true
            },
            None => {
                warn!(command = name, "bound to an unknown command");
                self.set_message(crate::editor::Message::error(format!(
                    "Unknown command '{name}'"
                )));
                false
            },
        }
    }

    /// Feeds a space separated key sequence such as `"i h i ESC"`.
    pub fn feed(&mut self, keys: &str) -> Result<Vec<Dispatch>, KeyParseError> {
        let strokes = keys
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::parse::<KeyStroke>)
            .collect::<Result<Vec<_>, _>>()?;
        let mut results = Vec::with_capacity(strokes.len());
        for stroke in strokes {
            if stroke.is_wildcard() {
                return Err(KeyParseError::UnknownKey(stroke.to_string()));
            }
            results.push(self.handle_key(stroke));
        }
        Ok(results)
    }
}
