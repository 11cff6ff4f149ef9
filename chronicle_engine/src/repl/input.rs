//! Terminal input handling for the Chronicle REPL.
//!
//! Wraps rustyline configuration and completion tailored to the engine's
//! command set and saved characters.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::save_files::list_saved_characters;

/// Outcome of reading a line from the REPL input.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

const COMMAND_WORDS: &[&str] = &[
    "abandon",
    "ability",
    "accept",
    "attack",
    "auto",
    "available",
    "buy",
    "chain",
    "complete",
    "delete",
    "drop",
    "equip",
    "exit",
    "explore",
    "fight dragon",
    "fight goblin",
    "fight orc",
    "flee",
    "help",
    "inventory",
    "load",
    "new",
    "progress",
    "quests",
    "quit",
    "revive",
    "save",
    "saves",
    "sell",
    "shop",
    "stats",
    "unequip armor",
    "unequip weapon",
    "use",
];

static COMMAND_TERMS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut terms: Vec<String> = COMMAND_WORDS.iter().map(|word| (*word).to_string()).collect();
    terms.sort_unstable();
    terms.dedup();
    terms
});

type ReplEditor = rustyline::Editor<ChronicleHelper, DefaultHistory>;

struct ChronicleHelper {
    save_dir: PathBuf,
}

impl Helper for ChronicleHelper {}

impl Completer for ChronicleHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }
        let lower = prefix.to_lowercase();
        if let Some(candidates) = save_name_completions(&self.save_dir, &prefix, &lower, start) {
            return Ok(candidates);
        }
        let pairs = COMMAND_TERMS
            .iter()
            .filter(|term| term.starts_with(&lower))
            .map(|term| Pair {
                display: term.clone(),
                replacement: term.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ChronicleHelper {
    type Hint = String;
}

impl Highlighter for ChronicleHelper {}

impl Validator for ChronicleHelper {}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let trimmed = slice.trim_start_matches(char::is_whitespace);
    let start = pos - trimmed.len();
    (start, trimmed.to_string())
}

/// Complete character names after `load` or `delete`.
fn save_name_completions(save_dir: &Path, prefix: &str, lower: &str, start: usize) -> Option<(usize, Vec<Pair>)> {
    let keyword = ["load", "delete"]
        .into_iter()
        .find(|keyword| lower.strip_prefix(keyword).is_some_and(|rest| rest.starts_with(char::is_whitespace)))?;
    let after_keyword = &prefix[keyword.len()..];
    let partial = after_keyword.trim_start();
    let insertion = start + prefix.len() - partial.len();
    let names = match list_saved_characters(save_dir) {
        Ok(names) => names,
        Err(err) => {
            warn!("failed to list saved characters for completion: {err}");
            return None;
        },
    };
    let pairs = names
        .into_iter()
        .filter(|name| name.to_lowercase().starts_with(&partial.to_lowercase()))
        .map(|name| Pair {
            display: name.clone(),
            replacement: name,
        })
        .collect();
    Some((insertion, pairs))
}

/// Location of the persistent command history.
fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("chronicle").join("history.txt"))
}

/// Helper responsible for managing the interactive input backend.
///
/// Prefers `rustyline` when an interactive terminal is available, falling back to
/// a basic stdin reader otherwise.
pub struct InputManager {
    backend: Backend,
}

impl InputManager {
    pub fn new(save_dir: &Path) -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new(save_dir) {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(Box::new(editor))
                },
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), falling back to basic stdin");
                    Backend::plain()
                },
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };

        Self { backend }
    }

    /// Read a line from the current backend. If the interactive backend reports an
    /// unrecoverable error, switch to the plain stdin backend and retry once.
    ///
    /// # Errors
    /// - if stdin itself cannot be read
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) if self.backend.is_rustyline() => {
                warn!("rustyline input failed: {err} -- switching to basic stdin");
                self.backend = Backend::plain();
                self.backend.read_line(prompt)
            },
            Err(err) => Err(err),
        }
    }
}

enum Backend {
    Rustyline(Box<RustylineInput>),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
    history_path: Option<PathBuf>,
}

impl RustylineInput {
    fn new(save_dir: &Path) -> io::Result<Self> {
        let mut editor = ReplEditor::new().map_err(map_io_err)?;
        editor.set_helper(Some(ChronicleHelper {
            save_dir: save_dir.to_path_buf(),
        }));
        let history_path = history_file_path();

        if let Some(path) = history_path.as_ref() {
            if let Some(dir) = path.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                warn!("failed to create history directory {}: {err}", dir.display());
            }

            if let Err(err) = editor.load_history(path) {
                match err {
                    ReadlineError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                        info!("no prior history found at {}, starting fresh", path.display());
                    },
                    other => warn!("failed to load history from {}: {other}", path.display()),
                }
            }
        }

        Ok(Self { editor, history_path })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to append to history: {err}");
                    }
                    if let Some(path) = self.history_path.as_ref()
                        && let Err(err) = self.editor.save_history(path)
                    {
                        warn!("failed to persist history to {}: {err}", path.display());
                    }
                }
                Ok(InputEvent::Line(line))
            },
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        let bytes = io::stdin().read_line(&mut self.buffer)?;
        if bytes == 0 {
            return Ok(InputEvent::Eof);
        }
        let line = self.buffer.trim_end_matches(['\n', '\r']);
        Ok(InputEvent::Line(line.to_string()))
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        other => Err(map_io_err(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}
