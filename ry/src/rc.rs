//! Applying an rc file to the editor.

use crate::{
    command::CommandError,
    editor::{BindError, Editor},
    mode::{ModeCategory, ModeError},
};
use ry_config::{format_errors, ParseError, SettingsError, Span, Statement};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{rendered}")]
    Parse {
        errors: Vec<ParseError>,
        rendered: String,
    },
    #[error("{source}")]
    Setting {
        span: Span,
        #[source]
        source: SettingsError,
    },
    #[error("{source}")]
    Mode {
        span: Span,
        #[source]
        source: ModeError,
    },
    #[error("{source}")]
    Command {
        span: Span,
        #[source]
        source: CommandError,
    },
}

impl ConfigError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ConfigError::Parse { .. } => None,
            ConfigError::Setting { span, .. }
            | ConfigError::Mode { span, .. }
            | ConfigError::Command { span, .. } => Some(span.clone()),
        }
    }

    /// Renders the error against the rc file it came from.
    pub fn report(&self, source: &str) -> String {
        match self {
            ConfigError::Parse { rendered, .. } => rendered.clone(),
            _ => {
                let span = self.span().unwrap_or_default();
                format_errors(source, &[ParseError::new(span, self.to_string())])
            },
        }
    }

    fn bind(span: Span, err: BindError) -> Self {
        match err {
            BindError::Mode(source) => ConfigError::Mode { span, source },
            BindError::Command(source) => ConfigError::Command { span, source },
        }
    }
}

impl Editor {
    /// Parses `source` and applies its statements in order. Stops at the
    /// first statement that fails.
    pub fn apply_config(&mut self, source: &str) -> Result<(), ConfigError> {
        let (config, errors) = ry_config::parse(source);
        let config = match config {
            Some(config) if errors.is_empty() => config,
            _ => {
                let rendered = format_errors(source, &errors);
                return Err(ConfigError::Parse { errors, rendered });
            },
        };

        for statement in config.statements {
            match statement.node {
                Statement::Set(setting) => {
                    self.settings_mut()
                        .assign(&setting.name.node, setting.value.node)
                        .map_err(|source| ConfigError::Setting {
                            span: statement.span.clone(),
                            source,
                        })?;
                },
                Statement::Mode(decl) => {
                    let category = ModeCategory::from(decl.kind.node);
                    self.define_mode(&decl.name.node, category)
                        .map_err(|source| ConfigError::Mode {
                            span: decl.name.span.clone(),
                            source,
                        })?;
                },
                Statement::Bind(binding) => {
                    let span = statement.span.clone();
                    self.bind(&binding.mode.node, &binding.pattern.node, &binding.command.node)
                        .map_err(|err| ConfigError::bind(span, err))?;
                },
            }
        }
        info!(statements = source.lines().count(), "applied config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn applies_statements_in_order() {
        let mut editor = Editor::new();
        editor
            .apply_config(
                r#"
# remap
set tab_width = 2
set theme = "dark"
mode "lisp" major
bind normal "Q" -> move_top
bind "lisp" "C-c C-e" -> undo
"#,
            )
            .unwrap();
        assert_eq!(editor.settings().number("tab_width"), Some(2));
        assert_eq!(editor.settings().string("theme"), Some("dark"));
        assert_eq!(editor.modes().category("lisp"), Some(ModeCategory::Major));
        assert_eq!(editor.modes().get("lisp").unwrap().bindings().len(), 1);
        editor.set_text("a\nb");
        editor.input("j Q");
        assert_eq!(editor.store().cursor().line, 0);
    }

    #[test]
    fn type_mismatch_points_at_statement() {
        let mut editor = Editor::new();
        let source = "set tab_width = \"wide\"\n";
        let err = editor.apply_config(source).unwrap_err();
        assert!(matches!(err, ConfigError::Setting { .. }));
        assert_eq!(err.span(), Some(0..22));
        assert_snapshot!(err.to_string(), @"Setting 'tab_width' expects a number, got a string");
    }

    #[test]
    fn unknown_command_is_fatal() {
        let mut editor = Editor::new();
        let err = editor
            .apply_config("bind normal \"x\" -> explode\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Command {
                source: CommandError::Unknown(_),
                ..
            }
        ));
        assert!(err.report("bind normal \"x\" -> explode\n").contains("Unknown command 'explode'"));
    }

    #[test]
    fn mode_conflict_is_fatal() {
        let mut editor = Editor::new();
        let err = editor.apply_config("mode normal minor\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Mode {
                source: ModeError::Conflict { .. },
                ..
            }
        ));
    }

    #[test]
    fn parse_errors_are_rendered() {
        let mut editor = Editor::new();
        let err = editor.apply_config("set = 3\n").unwrap_err();
        let ConfigError::Parse { errors, rendered } = &err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert!(!errors.is_empty());
        assert!(rendered.contains("Error"));
    }
}
