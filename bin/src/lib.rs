//! The `ry` command line: opens files, applies an rc file, replays keys
//! through the editor and reports what came out.

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use ry::{Editor, Persistence};
use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "ry", version, about = "Replays keys through the ry editing engine")]
pub struct Cli {
    /// Files to open. A scratch buffer is used when none are given.
    pub files: Vec<PathBuf>,

    /// rc file to apply. Defaults to `<config dir>/ry/ryrc` when it exists.
    #[arg(long, env = "RY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Space separated keys, e.g. "i h i ESC".
    #[arg(long, default_value = "")]
    pub keys: String,

    /// Write every modified buffer that has a path.
    #[arg(long)]
    pub write: bool,

    /// Print the focused buffer's text.
    #[arg(long)]
    pub print: bool,

    /// Dump the window layout for a screen of this size.
    #[arg(long, value_name = "WxH", value_parser = parse_frame_size)]
    pub frame: Option<FrameSize>,

    /// Log file, or the directory to put it in.
    #[arg(long, env = "RY_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u16,
    pub height: u16,
}

fn parse_frame_size(value: &str) -> Result<FrameSize, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{value}'"))?;
    let parse = |n: &str| {
        n.trim()
            .parse::<u16>()
            .map_err(|err| format!("bad size '{n}': {err}"))
    };
    Ok(FrameSize {
        width: parse(width)?,
        height: parse(height)?,
    })
}

/// Buffers backed by the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPersistence;

impl Persistence for FsPersistence {
    fn load(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn save(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, contents)
    }
}

pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let mut editor = Editor::new().with_persistence(FsPersistence);
    open_files(&mut editor, &cli.files);

    if let Some(path) = config_path(cli) {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        editor
            .apply_config(&source)
            .map_err(|err| anyhow!("{}", err.report(&source)))
            .with_context(|| format!("applying config {}", path.display()))?;
    }

    let dispatched = editor.feed(&cli.keys).context("parsing --keys")?;
    let applied = editor.drain_mutations();
    debug!(keys = dispatched.len(), mutations = applied, "replayed input");
    if let Some(message) = editor.message() {
        info!(kind = ?message.kind, "{}", message.text);
    }
    if editor.quit_requested() {
        debug!("quit requested");
    }

    if cli.write {
        write_modified(&mut editor)?;
    }
    if cli.print {
        write!(out, "{}", editor.store().contents())?;
    }
    if let Some(size) = cli.frame {
        writeln!(out, "{}", editor.frame(size.width, size.height))?;
    }
    Ok(())
}

/// Opens `files` in order and shows the first. The scratch buffer is dropped
/// once a file is open.
fn open_files(editor: &mut Editor, files: &[PathBuf]) {
    let scratch = editor.current_id();
    let mut first = None;
    for path in files {
        let id = editor.open_file(path);
        first.get_or_insert(id);
    }
    if let Some(first) = first {
        editor.show_buffer(first);
        editor.close_buffer(scratch, true);
    }
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    if let Some(path) = &cli.config {
        return Some(path.clone());
    }
    let default = dirs::config_dir()?.join("ry").join("ryrc");
    default.exists().then_some(default)
}

fn write_modified(editor: &mut Editor) -> anyhow::Result<()> {
    let modified: Vec<_> = editor
        .buffers()
        .iter()
        .filter(|buffer| buffer.store.is_modified() && buffer.store.path().is_some())
        .map(|buffer| buffer.id)
        .collect();
    for id in modified {
        if !editor.save_buffer(id) {
            let reason = editor
                .message()
                .map(|message| message.text.clone())
                .unwrap_or_default();
            bail!("{reason}");
        }
    }
    if let Some(unsaved) = editor
        .buffers()
        .iter()
        .find(|buffer| buffer.store.is_modified())
    {
        warn!(buffer = unsaved.name(), "modified buffer has no path");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ry").chain(args.iter().copied())).unwrap()
    }

    fn output(cli: &Cli) -> String {
        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn frame_sizes() {
        assert_eq!(
            parse_frame_size("80x24"),
            Ok(FrameSize {
                width: 80,
                height: 24
            })
        );
        assert!(parse_frame_size("80").is_err());
        assert!(parse_frame_size("80xtall").is_err());
    }

    #[test]
    fn edits_and_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "world\n").unwrap();
        let cli = cli(&[
            path.to_str().unwrap(),
            "--keys",
            "i h e l l o SPC ESC",
            "--write",
            "--print",
        ]);
        assert_eq!(output(&cli), "hello world\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world\n");
    }

    #[test]
    fn missing_file_is_created_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("new.txt");
        let cli = cli(&[path.to_str().unwrap(), "--keys", "i n e w ESC", "--write"]);
        output(&cli);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn config_is_applied_before_keys() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join("ryrc");
        fs::write(&rc, "bind normal \"Q\" -> insert_line_end\n").unwrap();
        let cli = cli(&[
            "--config",
            rc.to_str().unwrap(),
            "--keys",
            "i a b ESC Q c ESC",
            "--print",
        ]);
        assert_eq!(output(&cli), "abc");
    }

    #[test]
    fn bad_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join("ryrc");
        fs::write(&rc, "bind normal \"Q\" -> explode\n").unwrap();
        let cli = cli(&["--config", rc.to_str().unwrap()]);
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown command 'explode'"));
    }

    #[test]
    fn frame_is_dumped() {
        let cli = cli(&["--keys", "C-w v", "--frame", "20x5"]);
        let frame = output(&cli);
        assert!(frame.starts_with(" 0 10x4 at 0,0"), "{frame}");
        assert!(frame.contains("*1 10x4 at 10,0"), "{frame}");
    }
}
