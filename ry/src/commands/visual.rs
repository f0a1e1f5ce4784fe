//! Charwise and linewise visual selection.
//!
//! The anchor is a fixed mark named `<` set when the selection starts; the
//! other end is the cursor.

use super::{switch_mode, INSERT, NORMAL, VISUAL, VISUAL_LINE};
use crate::{
    chord::KeyChord,
    clipboard::DEFAULT_REGISTER,
    editor::{Editor, Message},
};
use ry_text::{selection, Extracted, SelectionKind};

const ANCHOR: char = '<';

impl Editor {
    /// The selected text while a visual mode is active.
    pub fn selection(&self) -> Option<Extracted> {
        let kind = match self.current().editing_mode()? {
            VISUAL => SelectionKind::Charwise,
            VISUAL_LINE => SelectionKind::Linewise,
            _ => return None,
        };
        let store = self.store();
        let anchor = store.mark(store.named_mark(ANCHOR)?)?;
        let anchor = store.point_to_cell(anchor.location);
        Some(selection::extract(store, anchor, store.cursor(), kind))
    }
}

fn begin(editor: &mut Editor, mode: &str) {
    editor.store_mut().set_named_mark(ANCHOR, true);
    switch_mode(editor, mode);
}

pub fn start(editor: &mut Editor, _: &KeyChord) {
    begin(editor, VISUAL);
}

pub fn start_line(editor: &mut Editor, _: &KeyChord) {
    begin(editor, VISUAL_LINE);
}

pub fn exit(editor: &mut Editor, _: &KeyChord) {
    switch_mode(editor, NORMAL);
}

/// Removes the selection, leaving the cursor where it started.
fn take(editor: &mut Editor) -> Option<Extracted> {
    let selected = editor.selection()?;
    let store = editor.store_mut();
    store.set_cursor(selected.start.line, selected.start.column);
    store.delete(selected.char_count);
    Some(selected)
}

pub fn yank(editor: &mut Editor, _: &KeyChord) {
    if let Some(selected) = editor.selection() {
        editor.clipboard.set(DEFAULT_REGISTER, selected.text);
        editor
            .store_mut()
            .set_cursor(selected.start.line, selected.start.column);
    }
    switch_mode(editor, NORMAL);
}

pub fn delete(editor: &mut Editor, _: &KeyChord) {
    if let Some(selected) = take(editor) {
        editor.clipboard.set(DEFAULT_REGISTER, selected.text);
    }
    switch_mode(editor, NORMAL);
}

pub fn change(editor: &mut Editor, _: &KeyChord) {
    if let Some(selected) = take(editor) {
        editor.clipboard.set(DEFAULT_REGISTER, selected.text);
    }
    switch_mode(editor, INSERT);
}

/// Replaces the selection with the default register, which then holds the
/// replaced text.
pub fn paste(editor: &mut Editor, _: &KeyChord) {
    let Some(text) = editor
        .clipboard
        .get(DEFAULT_REGISTER)
        .filter(|text| !text.is_empty())
    else {
        editor.set_message(Message::error("Nothing to paste!"));
        switch_mode(editor, NORMAL);
        return;
    };
    if let Some(selected) = take(editor) {
        editor.store_mut().insert(&text);
        editor.clipboard.set(DEFAULT_REGISTER, selected.text);
    }
    switch_mode(editor, NORMAL);
}
