//! The builtin commands, modes and default key bindings.

pub mod buffers;
pub mod edit;
pub mod marks;
pub mod movement;
pub mod prompt;
pub mod search;
pub mod visual;
pub mod window;

use crate::{
    command::CommandFn,
    editor::Editor,
    hooks::{self, BufferEvent},
    mode::ModeCategory,
};
use tracing::warn;

pub const NORMAL: &str = "normal";
pub const INSERT: &str = "insert";
pub const VISUAL: &str = "visual";
pub const VISUAL_LINE: &str = "visual-line";
pub const PROMPT: &str = "prompt";
/// Major mode of the `*buffers*` list.
pub const BUFFERS: &str = "buffers";

const MODES: &[&str] = &[NORMAL, INSERT, VISUAL, VISUAL_LINE, PROMPT];

const COMMANDS: &[(&str, CommandFn)] = &[
    ("move_left", movement::left),
    ("move_right", movement::right),
    ("move_up", movement::up),
    ("move_down", movement::down),
    ("move_line_start", movement::line_start),
    ("move_line_end", movement::line_end),
    ("move_top", movement::top),
    ("move_bottom", movement::bottom),
    ("page_up", movement::page_up),
    ("page_down", movement::page_down),
    ("word_forward", movement::word_forward),
    ("word_backward", movement::word_backward),
    ("center_view", movement::center),
    ("cancel", edit::cancel),
    ("insert_before", edit::insert_before),
    ("insert_after", edit::insert_after),
    ("insert_line_start", edit::insert_line_start),
    ("insert_line_end", edit::insert_line_end),
    ("open_below", edit::open_below),
    ("open_above", edit::open_above),
    ("delete_char", edit::delete_char),
    ("delete_line", edit::delete_line),
    ("yank_line", edit::yank_line),
    ("paste", edit::paste),
    ("undo", edit::undo),
    ("redo", edit::redo),
    ("insert_exit", edit::insert_exit),
    ("insert_newline", edit::insert_newline),
    ("insert_backspace", edit::insert_backspace),
    ("insert_key", edit::insert_key),
    ("visual_start", visual::start),
    ("visual_line_start", visual::start_line),
    ("visual_exit", visual::exit),
    ("visual_yank", visual::yank),
    ("visual_delete", visual::delete),
    ("visual_change", visual::change),
    ("visual_paste", visual::paste),
    ("mark_set", marks::set),
    ("mark_goto", marks::goto),
    ("search_prompt", search::prompt),
    ("search_next", search::next),
    ("search_prev", search::prev),
    ("search_clear", search::clear),
    ("command_prompt", prompt::command),
    ("prompt_cancel", prompt::cancel),
    ("prompt_finish", prompt::finish),
    ("prompt_backspace", prompt::backspace),
    ("prompt_insert", prompt::insert),
    ("split_horizontal", window::split_horizontal),
    ("split_vertical", window::split_vertical),
    ("window_close", window::close),
    ("focus_left", window::focus_left),
    ("focus_down", window::focus_down),
    ("focus_up", window::focus_up),
    ("focus_right", window::focus_right),
    ("buffers_list", buffers::list),
    ("buffers_close", buffers::close),
    ("buffers_open", buffers::open),
];

const MOTIONS: &[(&str, &str)] = &[
    ("h", "move_left"),
    ("j", "move_down"),
    ("k", "move_up"),
    ("l", "move_right"),
    ("0", "move_line_start"),
    ("$", "move_line_end"),
    ("g g", "move_top"),
    ("G", "move_bottom"),
    ("C-u", "page_up"),
    ("C-d", "page_down"),
    ("w", "word_forward"),
    ("b", "word_backward"),
    ("z z", "center_view"),
];

const NORMAL_BINDINGS: &[(&str, &str)] = &[
    ("ESC", "cancel"),
    ("C-c", "cancel"),
    ("C-g", "cancel"),
    ("i", "insert_before"),
    ("a", "insert_after"),
    ("I", "insert_line_start"),
    ("A", "insert_line_end"),
    ("o", "open_below"),
    ("O", "open_above"),
    ("x", "delete_char"),
    ("d d", "delete_line"),
    ("y y", "yank_line"),
    ("p", "paste"),
    ("u", "undo"),
    ("C-r", "redo"),
    ("v", "visual_start"),
    ("V", "visual_line_start"),
    ("m $alpha", "mark_set"),
    ("' $alpha", "mark_goto"),
    ("/", "search_prompt"),
    ("n", "search_next"),
    ("N", "search_prev"),
    ("SPC n", "search_clear"),
    ("SPC b", "buffers_list"),
    (":", "command_prompt"),
    ("C-w s", "split_horizontal"),
    ("C-w v", "split_vertical"),
    ("C-w c", "window_close"),
    ("C-w h", "focus_left"),
    ("C-w j", "focus_down"),
    ("C-w k", "focus_up"),
    ("C-w l", "focus_right"),
    ("C-h", "focus_left"),
    ("C-j", "focus_down"),
    ("C-k", "focus_up"),
    ("C-l", "focus_right"),
];

const INSERT_BINDINGS: &[(&str, &str)] = &[
    ("ESC", "insert_exit"),
    ("RET", "insert_newline"),
    ("BAK", "insert_backspace"),
    ("$any", "insert_key"),
];

const VISUAL_BINDINGS: &[(&str, &str)] = &[
    ("ESC", "visual_exit"),
    ("C-c", "visual_exit"),
    ("y", "visual_yank"),
    ("d", "visual_delete"),
    ("x", "visual_delete"),
    ("c", "visual_change"),
    ("p", "visual_paste"),
];

const PROMPT_BINDINGS: &[(&str, &str)] = &[
    ("ESC", "prompt_cancel"),
    ("C-c", "prompt_cancel"),
    ("C-g", "prompt_cancel"),
    ("RET", "prompt_finish"),
    ("BAK", "prompt_backspace"),
    ("$any", "prompt_insert"),
];

const BUFFERS_BINDINGS: &[(&str, &str)] = &[("q", "buffers_close"), ("RET", "buffers_open")];

/// Registers the builtin modes, commands, bindings and hooks.
pub(crate) fn register_builtins(editor: &mut Editor) {
    for mode in MODES {
        if let Err(err) = editor.define_mode(mode, ModeCategory::Editing) {
            warn!(%err, "failed to define builtin mode");
        }
    }
    if let Err(err) = editor.define_mode(BUFFERS, ModeCategory::Major) {
        warn!(%err, "failed to define builtin mode");
    }
    for (name, run) in COMMANDS {
        if let Err(err) = editor.register_command(name, *run) {
            warn!(%err, "failed to register builtin command");
        }
    }
    let tables: [(&str, &[&[(&str, &str)]]); 6] = [
        (NORMAL, &[MOTIONS, NORMAL_BINDINGS]),
        (INSERT, &[INSERT_BINDINGS]),
        (VISUAL, &[MOTIONS, VISUAL_BINDINGS]),
        (VISUAL_LINE, &[MOTIONS, VISUAL_BINDINGS]),
        (PROMPT, &[PROMPT_BINDINGS]),
        (BUFFERS, &[BUFFERS_BINDINGS]),
    ];
    for (mode, groups) in tables {
        for (pattern, command) in groups.iter().flat_map(|group| group.iter()) {
            if let Err(err) = editor.bind(mode, pattern, command) {
                warn!(mode, pattern, %err, "failed to bind builtin key");
            }
        }
    }
    editor.add_hook(BufferEvent::Moved, hooks::scroll_to_cursor);
}

/// Switches the current buffer to an editing mode registered above.
pub(crate) fn switch_mode(editor: &mut Editor, mode: &str) {
    if let Err(err) = editor.enter_mode(mode) {
        warn!(mode, %err, "failed to switch mode");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_binding_resolves() {
        let editor = Editor::new();
        for mode in MODES.iter().chain([&BUFFERS]) {
            let mode = editor.modes().get(mode).unwrap();
            assert!(!mode.bindings().is_empty(), "{} has no bindings", mode.name());
            for binding in mode.bindings() {
                assert!(editor.commands().contains(&binding.command));
            }
        }
        assert_eq!(editor.commands().len(), COMMANDS.len());
    }
}
