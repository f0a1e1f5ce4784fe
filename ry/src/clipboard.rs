use rustc_hash::FxHashMap;

/// The register yanks and deletes go to when none is named.
pub const DEFAULT_REGISTER: char = '"';

/// Register storage for yanked and deleted text.
pub trait Clipboard: Send {
    fn get(&self, register: char) -> Option<String>;
    fn set(&mut self, register: char, text: String);
}

/// Registers kept in memory.
#[derive(Debug, Default, Clone)]
pub struct Registers {
    registers: FxHashMap<char, String>,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for Registers {
    fn get(&self, register: char) -> Option<String> {
        self.registers.get(&register).cloned()
    }

    fn set(&mut self, register: char, text: String) {
        self.registers.insert(register, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_are_independent() {
        let mut registers = Registers::new();
        assert_eq!(registers.get(DEFAULT_REGISTER), None);
        registers.set(DEFAULT_REGISTER, "one".into());
        registers.set('a', "two".into());
        registers.set(DEFAULT_REGISTER, "three".into());
        assert_eq!(registers.get(DEFAULT_REGISTER).as_deref(), Some("three"));
        assert_eq!(registers.get('a').as_deref(), Some("two"));
    }
}
