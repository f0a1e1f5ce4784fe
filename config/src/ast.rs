use std::ops::Range;

pub type Span = Range<usize>;

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A parsed rc file. Statements apply in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Set(Setting),
    Mode(ModeDecl),
    Bind(Binding),
}

/// `set tab_width = 2`
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub name: Spanned<String>,
    pub value: Spanned<Value>,
}

/// `mode "lisp" major`
#[derive(Debug, Clone, PartialEq)]
pub struct ModeDecl {
    pub name: Spanned<String>,
    pub kind: Spanned<ModeKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Editing,
    Major,
    Minor,
}

/// `bind normal "g g" -> move_top`
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub mode: Spanned<String>,
    pub pattern: Spanned<String>,
    pub command: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Number(i64),
    Bool(bool),
}
