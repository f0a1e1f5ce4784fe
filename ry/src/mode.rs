//! Named binding tables and the per-buffer stack of active modes.

use crate::{chord::KeyChord, key::KeyParseError};
use ry_config::ModeKind;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModeCategory {
    /// Exclusive top-level state such as normal or insert.
    Editing,
    /// Exclusive, usually tied to the kind of content.
    Major,
    /// Stackable, any number at once.
    Minor,
}

impl From<ModeKind> for ModeCategory {
    fn from(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Editing => ModeCategory::Editing,
            ModeKind::Major => ModeCategory::Major,
            ModeKind::Minor => ModeCategory::Minor,
        }
    }
}

impl fmt::Display for ModeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModeCategory::Editing => "editing",
            ModeCategory::Major => "major",
            ModeCategory::Minor => "minor",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("Unknown mode '{0}'")]
    Unknown(SmolStr),
    #[error("Mode '{name}' is already defined as {existing}")]
    Conflict {
        name: SmolStr,
        existing: ModeCategory,
    },
    #[error("Bad key pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: KeyParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub pattern: KeyChord,
    pub command: SmolStr,
}

#[derive(Debug, Clone)]
pub struct Mode {
    name: SmolStr,
    category: ModeCategory,
    bindings: Vec<Binding>,
}

impl Mode {
    pub fn new(name: impl Into<SmolStr>, category: ModeCategory) -> Self {
        Self {
            name: name.into(),
            category,
            bindings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ModeCategory {
        self.category
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Binds `pattern` to `command`. Rebinding a pattern keeps its place in
    /// the registration order.
    pub fn bind(&mut self, pattern: KeyChord, command: impl Into<SmolStr>) {
        let command = command.into();
        match self.bindings.iter_mut().find(|b| b.pattern == pattern) {
            Some(existing) => existing.command = command,
            None => self.bindings.push(Binding { pattern, command }),
        }
    }

    /// Finds the binding for the tail of `input`.
    ///
    /// The longest matching pattern wins, the first registered on a tie. A
    /// lone `$any` is only tried when nothing else matches.
    pub fn lookup(&self, input: &KeyChord) -> Option<(&Binding, usize)> {
        let mut best: Option<(&Binding, usize)> = None;
        for binding in self.bindings.iter().filter(|b| !b.pattern.is_catch_all()) {
            if let Some(len) = binding.pattern.suffix_match(input) {
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((binding, len));
                }
            }
        }
        best.or_else(|| {
            self.bindings
                .iter()
                .filter(|b| b.pattern.is_catch_all())
                .find_map(|b| b.pattern.suffix_match(input).map(|len| (b, len)))
        })
    }

    /// Whether a binding could still complete with more keys.
    pub fn waits_on(&self, input: &KeyChord) -> bool {
        self.longest_wait(input).is_some()
    }

    /// The most typed keys any binding could still extend.
    pub fn longest_wait(&self, input: &KeyChord) -> Option<usize> {
        self.bindings
            .iter()
            .filter(|b| !b.pattern.is_catch_all())
            .filter_map(|b| b.pattern.prefix_len(input))
            .max()
    }
}

/// Every mode the editor knows, by name.
#[derive(Debug, Default)]
pub struct ModeRegistry {
    modes: FxHashMap<SmolStr, Mode>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a mode. Defining it again with the same category is a no-op.
    pub fn define(&mut self, name: &str, category: ModeCategory) -> Result<(), ModeError> {
        match self.modes.get(name) {
            Some(mode) if mode.category != category => Err(ModeError::Conflict {
                name: name.into(),
                existing: mode.category,
            }),
            Some(_) => Ok(()),
            None => {
                self.modes.insert(name.into(), Mode::new(name, category));
                Ok(())
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&Mode> {
        self.modes.get(name)
    }

    pub fn category(&self, name: &str) -> Option<ModeCategory> {
        self.get(name).map(Mode::category)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    /// Compiles `pattern` and binds it in `mode`.
    pub fn bind(&mut self, mode: &str, pattern: &str, command: &str) -> Result<(), ModeError> {
        let chord = KeyChord::parse(pattern).map_err(|source| ModeError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let mode = self
            .modes
            .get_mut(mode)
            .ok_or_else(|| ModeError::Unknown(mode.into()))?;
        mode.bind(chord, command);
        Ok(())
    }
}

/// The modes active on one buffer: at most one editing mode, at most one
/// major mode and any number of minor modes, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeStack {
    modes: Vec<(SmolStr, ModeCategory)>,
}

impl ModeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates a mode, dropping any mode with the same name and, for
    /// editing and major modes, the current one of that category.
    pub fn add(&mut self, name: &str, category: ModeCategory) {
        self.modes.retain(|(active, active_category)| {
            active != name && (category == ModeCategory::Minor || *active_category != category)
        });
        self.modes.push((name.into(), category));
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.modes.len();
        self.modes.retain(|(active, _)| active != name);
        self.modes.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modes.iter().any(|(active, _)| active == name)
    }

    fn of(&self, category: ModeCategory) -> impl Iterator<Item = &str> + '_ {
        self.modes
            .iter()
            .filter(move |(_, active)| *active == category)
            .map(|(name, _)| name.as_str())
    }

    pub fn editing(&self) -> Option<&str> {
        self.of(ModeCategory::Editing).next()
    }

    pub fn major(&self) -> Option<&str> {
        self.of(ModeCategory::Major).next()
    }

    pub fn minors(&self) -> impl Iterator<Item = &str> + '_ {
        self.of(ModeCategory::Minor)
    }

    /// Names in the order bindings are searched.
    pub fn search_order(&self) -> Vec<&str> {
        self.major()
            .into_iter()
            .chain(self.editing())
            .chain(self.minors())
            .collect()
    }

    /// Names in activation order, for the status line.
    pub fn names(&self) -> Vec<&str> {
        self.modes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}
