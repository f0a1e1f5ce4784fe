use crate::key::{KeyCode, KeyParseError, KeyStroke};
use smallvec::SmallVec;
use std::{fmt, str::FromStr};

/// An ordered run of keystrokes: either what has been typed so far, or the
/// pattern a binding is registered under.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyChord(SmallVec<[KeyStroke; 4]>);

impl KeyChord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a pattern such as `"C-w s"` or `"m $alpha"`. Keys are
    /// separated by spaces; a wildcard may only come last.
    pub fn parse(pattern: &str) -> Result<Self, KeyParseError> {
        let tokens: Vec<&str> = pattern.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.is_empty() {
            return Err(KeyParseError::Empty);
        }
        let mut chord = KeyChord::new();
        for (ix, token) in tokens.iter().enumerate() {
            let stroke: KeyStroke = token.parse()?;
            if stroke.is_wildcard() && ix + 1 != tokens.len() {
                return Err(KeyParseError::WildcardNotLast(token.to_string()));
            }
            chord.push(stroke);
        }
        Ok(chord)
    }

    pub fn push(&mut self, stroke: KeyStroke) {
        self.0.push(stroke);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn strokes(&self) -> &[KeyStroke] {
        &self.0
    }

    pub fn last(&self) -> Option<&KeyStroke> {
        self.0.last()
    }

    /// The last `len` strokes.
    pub fn suffix(&self, len: usize) -> KeyChord {
        let start = self.len().saturating_sub(len);
        self.0[start..].iter().copied().collect()
    }

    /// Whether this pattern is a lone `$any`. Longer patterns ending in
    /// `$any`, such as `r $any`, are as concrete as any other.
    pub fn is_catch_all(&self) -> bool {
        self.len() == 1 && self.0[0].code == KeyCode::Any
    }

    /// Whether `input` has this pattern's length and matches it stroke by
    /// stroke.
    pub fn matches(&self, input: &[KeyStroke]) -> bool {
        self.len() == input.len()
            && self
                .0
                .iter()
                .zip(input)
                .all(|(pattern, stroke)| pattern.matches(stroke))
    }

    /// Matches this pattern against the tail of `input`, returning the
    /// number of strokes matched.
    pub fn suffix_match(&self, input: &KeyChord) -> Option<usize> {
        let len = self.len();
        if len == 0 || len > input.len() {
            return None;
        }
        self.matches(&input.0[input.len() - len..]).then_some(len)
    }

    /// The longest tail of `input` that is a proper prefix of this pattern,
    /// i.e. how many typed keys more input could still complete.
    pub fn prefix_len(&self, input: &KeyChord) -> Option<usize> {
        (1..self.len())
            .rev()
            .filter(|&len| len <= input.len())
            .find(|&len| {
                let tail = &input.0[input.len() - len..];
                self.0[..len]
                    .iter()
                    .zip(tail)
                    .all(|(pattern, stroke)| pattern.matches(stroke))
            })
    }

    pub fn waits_on(&self, input: &KeyChord) -> bool {
        self.prefix_len(input).is_some()
    }
}

impl FromIterator<KeyStroke> for KeyChord {
    fn from_iter<I: IntoIterator<Item = KeyStroke>>(iter: I) -> Self {
        KeyChord(iter.into_iter().collect())
    }
}

impl From<KeyStroke> for KeyChord {
    fn from(stroke: KeyStroke) -> Self {
        std::iter::once(stroke).collect()
    }
}

impl FromStr for KeyChord {
    type Err = KeyParseError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        KeyChord::parse(pattern)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ix, stroke) in self.0.iter().enumerate() {
            if ix > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{stroke}")?;
        }
        Ok(())
    }
}
