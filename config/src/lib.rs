//! The ry rc-file language and the settings it configures.
//!
//! An rc file is a list of statements, one per line:
//!
//! ```text
//! # comment
//! set tab_width = 2
//! mode "lisp" major
//! bind normal "g g" -> move_top
//! ```

mod ast;
mod error;
mod parser;
mod settings;

pub use ast::{Binding, Config, ModeDecl, ModeKind, Setting, Span, Spanned, Statement, Value};
pub use error::{format_errors, ParseError};
pub use settings::{SettingKind, SettingValue, Settings, SettingsError};

pub fn parse(source: &str) -> (Option<Config>, Vec<ParseError>) {
    parser::parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Config {
        let (result, errors) = parse(source);
        if !errors.is_empty() {
            panic!("parse errors:\n{}", format_errors(source, &errors));
        }
        result.expect("expected successful parse")
    }

    fn assert_setting(stmt: &Spanned<Statement>) -> &Setting {
        match &stmt.node {
            Statement::Set(s) => s,
            _ => panic!("expected setting, got {:?}", stmt),
        }
    }

    fn assert_mode(stmt: &Spanned<Statement>) -> &ModeDecl {
        match &stmt.node {
            Statement::Mode(m) => m,
            _ => panic!("expected mode, got {:?}", stmt),
        }
    }

    fn assert_binding(stmt: &Spanned<Statement>) -> &Binding {
        match &stmt.node {
            Statement::Bind(b) => b,
            _ => panic!("expected binding, got {:?}", stmt),
        }
    }

    #[test]
    fn empty_config() {
        assert!(parse_ok("").statements.is_empty());
        assert!(parse_ok("\n  # only a comment\n").statements.is_empty());
    }

    #[test]
    fn settings_of_each_type() {
        let config = parse_ok(
            r#"
            set tab_width = 2
            set tab_to_spaces = false
            set theme = "dark"
            set offset=-3
            "#,
        );
        let values: Vec<_> = config
            .statements
            .iter()
            .map(|stmt| {
                let setting = assert_setting(stmt);
                (setting.name.node.as_str(), setting.value.node.clone())
            })
            .collect();
        assert_eq!(
            values,
            vec![
                ("tab_width", Value::Number(2)),
                ("tab_to_spaces", Value::Bool(false)),
                ("theme", Value::String("dark".into())),
                ("offset", Value::Number(-3)),
            ]
        );
    }

    #[test]
    fn mode_declarations() {
        let config = parse_ok("mode \"lisp\" major\nmode zen-mode minor\nmode edit editing");
        let lisp = assert_mode(&config.statements[0]);
        assert_eq!(lisp.name.node, "lisp");
        assert_eq!(lisp.kind.node, ModeKind::Major);
        let zen = assert_mode(&config.statements[1]);
        assert_eq!(zen.name.node, "zen-mode");
        assert_eq!(zen.kind.node, ModeKind::Minor);
        assert_eq!(assert_mode(&config.statements[2]).kind.node, ModeKind::Editing);
    }

    #[test]
    fn bindings() {
        let config = parse_ok(
            r#"
            bind normal "g g" -> move_top   # jump to the top
            bind "lisp" "C-c C-e" -> eval-sexp
            bind visual-line "\"" -> yank
            "#,
        );
        let first = assert_binding(&config.statements[0]);
        assert_eq!(first.mode.node, "normal");
        assert_eq!(first.pattern.node, "g g");
        assert_eq!(first.command.node, "move_top");

        let second = assert_binding(&config.statements[1]);
        assert_eq!(second.mode.node, "lisp");
        assert_eq!(second.pattern.node, "C-c C-e");
        assert_eq!(second.command.node, "eval-sexp");

        let third = assert_binding(&config.statements[2]);
        assert_eq!(third.mode.node, "visual-line");
        assert_eq!(third.pattern.node, "\"");
    }

    #[test]
    fn spans_point_into_source() {
        let source = "set tab_width = 2\nbind normal \"x\" -> delete_char";
        let config = parse_ok(source);
        let binding = assert_binding(&config.statements[1]);
        assert_eq!(&source[binding.command.span.clone()], "delete_char");
        assert_eq!(&source[config.statements[0].span.clone()], "set tab_width = 2");
    }

    #[test]
    fn errors_are_reported() {
        let source = "set tab_width = 2\nbind normal g -> move_top\n";
        let (result, errors) = parse(source);
        assert!(result.is_none() || !errors.is_empty());
        assert!(!errors.is_empty());
        assert!(errors[0].span.start >= source.find("bind").unwrap_or(0));
    }

    #[test]
    fn format_errors_output() {
        let source = "mode lisp sideways";
        let (_, errors) = parse(source);
        assert!(!errors.is_empty());
        let output = format_errors(source, &errors);
        assert!(output.contains(&errors[0].message));
        assert!(output.contains("mode lisp sideways"));
    }
}
