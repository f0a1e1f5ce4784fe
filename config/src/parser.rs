use crate::{
    ast::{Binding, Config, ModeDecl, ModeKind, Setting, Spanned, Statement, Value},
    error::ParseError,
};
use chumsky::{error::SimpleReason, prelude::*, text};

type Error = Simple<char>;

/// Blank space, newlines and `#` comments between statements.
fn filler() -> impl Parser<char, (), Error = Error> + Clone {
    let comment = just('#').then(filter(|c: &char| *c != '\n').repeated());
    comment
        .ignored()
        .or(filter(|c: &char| c.is_whitespace()).ignored())
        .repeated()
        .ignored()
}

/// Spaces inside one statement. Statements never span lines.
fn gap() -> impl Parser<char, (), Error = Error> + Clone {
    one_of(" \t").repeated().at_least(1).ignored()
}

fn spaced<T>(
    inner: impl Parser<char, T, Error = Error> + Clone,
) -> impl Parser<char, T, Error = Error> + Clone {
    inner.padded_by(gap().or_not())
}

fn is_name_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_' || *c == '-'
}

/// An identifier that may also contain `-`, as in `visual-line`.
fn name() -> impl Parser<char, String, Error = Error> + Clone {
    filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .chain(filter(is_name_char).repeated())
        .collect()
}

/// `"..."` with `\"`, `\\`, `\n` and `\t` escapes.
fn quoted() -> impl Parser<char, String, Error = Error> + Clone {
    let escape = just('\\').ignore_then(one_of("\\\"nt").map(|c| match c {
        'n' => '\n',
        't' => '\t',
        c => c,
    }));
    none_of("\\\"")
        .or(escape)
        .repeated()
        .delimited_by(just('"'), just('"'))
        .collect()
}

fn value() -> impl Parser<char, Value, Error = Error> + Clone {
    let number = just('-')
        .or_not()
        .then(text::int(10))
        .try_map(|(sign, digits): (Option<char>, String), span| {
            let digits = format!("{}{digits}", sign.map(String::from).unwrap_or_default());
            digits
                .parse()
                .map(Value::Number)
                .map_err(|err| Simple::custom(span, format!("bad number: {err}")))
        });
    choice((
        quoted().map(Value::String),
        number,
        text::keyword("true").to(Value::Bool(true)),
        text::keyword("false").to(Value::Bool(false)),
    ))
}

fn statement() -> impl Parser<char, Statement, Error = Error> + Clone {
    let mode_name = quoted().or(name()).map_with_span(Spanned::new);

    let set = text::keyword("set")
        .ignore_then(gap())
        .ignore_then(text::ident().map_with_span(Spanned::new))
        .then_ignore(spaced(just('=')))
        .then(value().map_with_span(Spanned::new))
        .map(|(name, value)| Statement::Set(Setting { name, value }));

    let kind = choice((
        text::keyword("editing").to(ModeKind::Editing),
        text::keyword("major").to(ModeKind::Major),
        text::keyword("minor").to(ModeKind::Minor),
    ))
    .map_with_span(Spanned::new);
    let mode = text::keyword("mode")
        .ignore_then(gap())
        .ignore_then(mode_name.clone())
        .then_ignore(gap())
        .then(kind)
        .map(|(name, kind)| Statement::Mode(ModeDecl { name, kind }));

    let bind = text::keyword("bind")
        .ignore_then(gap())
        .ignore_then(mode_name)
        .then_ignore(gap())
        .then(quoted().map_with_span(Spanned::new))
        .then_ignore(spaced(just("->")))
        .then(name().map_with_span(Spanned::new))
        .map(|((mode, pattern), command)| {
            Statement::Bind(Binding {
                mode,
                pattern,
                command,
            })
        });

    choice((set, mode, bind))
}

fn config() -> impl Parser<char, Config, Error = Error> {
    statement()
        .map_with_span(Spanned::new)
        .then_ignore(filler())
        .repeated()
        .delimited_by(filler(), end())
        .map(|statements| Config { statements })
}

fn describe(source: &str, error: Error) -> ParseError {
    let span = error.span();
    // Keywords report the whole word they rejected without a found char.
    let word: String = source.chars().skip(span.start).take(span.len()).collect();
    let found = match error.found() {
        Some(c) => format!("{c:?}"),
        None if word.is_empty() => "end of input".to_string(),
        None => format!("{word:?}"),
    };
    let mut expected: Vec<String> = error
        .expected()
        .map(|c| match c {
            Some(c) => format!("{c:?}"),
            None => "end of input".to_string(),
        })
        .collect();
    expected.sort();
    expected.dedup();

    let message = match error.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { delimiter, .. } => format!("unclosed {delimiter:?}"),
        SimpleReason::Unexpected => format!("unexpected {found}"),
    };
    let parsed = ParseError::new(span, message);
    if expected.is_empty() {
        parsed
    } else {
        parsed.with_hint(format!("expected {}", expected.join(", ")))
    }
}

pub fn parse(source: &str) -> (Option<Config>, Vec<ParseError>) {
    let (config, errors) = config().parse_recovery(source);
    let errors = errors
        .into_iter()
        .map(|error| describe(source, error))
        .collect();
    (config, errors)
}
