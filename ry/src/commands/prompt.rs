//! The one-line prompt used by `:` and `/`.

use super::{switch_mode, NORMAL, PROMPT};
use crate::{chord::KeyChord, editor::Editor, ex};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    Command,
    Search,
}

impl PromptKind {
    /// Shown before the typed text.
    pub fn prefix(self) -> char {
        match self {
            PromptKind::Command => ':',
            PromptKind::Search => '/',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

pub(crate) fn open(editor: &mut Editor, kind: PromptKind) {
    editor.prompt = Some(Prompt {
        kind,
        text: String::new(),
    });
    editor.clear_message();
    switch_mode(editor, PROMPT);
}

pub fn command(editor: &mut Editor, _: &KeyChord) {
    open(editor, PromptKind::Command);
}

pub fn cancel(editor: &mut Editor, _: &KeyChord) {
    editor.prompt = None;
    switch_mode(editor, NORMAL);
}

pub fn finish(editor: &mut Editor, _: &KeyChord) {
    let Some(prompt) = editor.prompt.take() else {
        switch_mode(editor, NORMAL);
        return;
    };
    switch_mode(editor, NORMAL);
    match prompt.kind {
        PromptKind::Command => ex::run(editor, &prompt.text),
        PromptKind::Search => editor.start_search(&prompt.text),
    }
}

pub fn backspace(editor: &mut Editor, _: &KeyChord) {
    if let Some(prompt) = editor.prompt.as_mut() {
        prompt.text.pop();
    }
}

pub fn insert(editor: &mut Editor, keys: &KeyChord) {
    let rune = keys.last().and_then(|key| key.plain_rune());
    if let (Some(prompt), Some(rune)) = (editor.prompt.as_mut(), rune) {
        prompt.text.push(rune);
    }
}
