//! The modal editing core of ry.
//!
//! - [`key`] and [`chord`] - keystrokes, binding patterns and their matching
//! - [`mode`] - binding tables and the per-buffer mode stack
//! - [`Editor`] - buffers, windows, settings and [`Editor::handle_key`]
//! - [`window`] - the split tree and directional focus
//! - [`hooks`] - callbacks on buffer edits and cursor motion
//! - [`queue`] and [`script`] - reaching the editor from other threads
//!
//! Text storage lives in [`ry_text`], settings and the rc language in
//! [`ry_config`].

pub mod buffer;
pub mod chord;
pub mod clipboard;
pub mod command;
pub mod commands;
pub mod dispatch;
pub mod editor;
pub mod ex;
pub mod frame;
pub mod hooks;
pub mod key;
pub mod mode;
pub mod persistence;
pub mod queue;
pub mod rc;
pub mod script;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod window;

pub use buffer::{Buffer, BufferId};
pub use chord::KeyChord;
pub use clipboard::{Clipboard, Registers, DEFAULT_REGISTER};
pub use command::{Command, CommandError, CommandFn, CommandRegistry};
pub use dispatch::Dispatch;
pub use editor::{BindError, Editor, Message, MessageKind};
pub use frame::{Frame, Pane};
pub use hooks::{BufferEvent, BufferHook, BufferHooks};
pub use key::{KeyCode, KeyParseError, KeyStroke, Modifiers, RawKey};
pub use mode::{Binding, Mode, ModeCategory, ModeError, ModeRegistry, ModeStack};
pub use persistence::{MemoryStorage, Persistence};
pub use queue::{Mutation, MutationSender, QueueClosed};
pub use rc::ConfigError;
pub use script::{ScriptApi, ScriptTask, TaskError};
pub use window::{Direction, Rect, SplitKind, WindowId, WindowTree};
