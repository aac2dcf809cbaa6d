//! Shell integration: line commands and the event loop.
//!
//! Parsing and applying line commands are pure functions over the
//! [`Workspace`]. The loops in this module are the impure shell: they own the
//! channel that merges user input with background fetch results and apply
//! every event to the workspace one at a time.

use crate::model::{AppError, DateClass, SizeClass, SortKey};
use crate::source::{spawn_fetch, ListingSource};
use crate::state::{Command, ListingState, Workspace};
use crate::view;
use clap::ValueEnum;
use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Help text for the interactive shell.
pub const HELP: &str = "\
Commands:
  search <text>   filter by name (empty text clears)
  size <class>    all | small | medium | large
  date <class>    all | last7 | last30 | older
  sort <key>      name | size | modTime (repeat to flip direction)
  select <n>      select row n of the listing
  loaded          report that the preview finished loading
  open            open the selected document in the system viewer
  refresh         fetch the listing again
  list            show the listing
  help            show this help
  quit            exit";

// ===== Line commands =====

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// `search <text>`; an empty term clears the search.
    Search(String),
    /// `size <class>`
    Size(SizeClass),
    /// `date <class>`
    Date(DateClass),
    /// `sort <key>`, toggling the direction on the active key.
    Sort(SortKey),
    /// 1-based row in the visible listing.
    Select(usize),
    /// Mark the current preview as loaded.
    Loaded,
    /// Launch the preview.
    Open,
    /// Fetch the listing again.
    Refresh,
    /// Print the listing.
    List,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Nothing,
}

/// Errors from parsing or applying a shell line.
///
/// None of these end the session; they are printed and the loop continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// First word is not a known command.
    #[error("unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),

    /// Command requires a value and none was given.
    #[error("'{command}' needs an argument")]
    MissingArgument {
        /// Command word.
        command: &'static str,
    },

    /// Value does not parse for the command.
    #[error("invalid value '{value}' for '{command}'")]
    InvalidValue {
        /// Command word.
        command: &'static str,
        /// The rejected argument.
        value: String,
    },

    /// `select` past the end of the visible listing.
    #[error("no row {row}, the listing shows {visible} document(s)")]
    NoSuchRow {
        /// Requested 1-based row.
        row: usize,
        /// Number of visible rows.
        visible: usize,
    },

    /// `loaded` or `open` without a selection.
    #[error("nothing is selected")]
    NothingSelected,
}

/// Parse one input line.
///
/// The first word is the command; for `search` the rest of the line, trimmed,
/// is the term. Class and key values are matched case-insensitively.
pub fn parse_line(line: &str) -> Result<LineCommand, ShellError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" => Ok(LineCommand::Nothing),
        "search" => Ok(LineCommand::Search(rest.to_string())),
        "size" => value_arg("size", rest).map(LineCommand::Size),
        "date" => value_arg("date", rest).map(LineCommand::Date),
        "sort" => value_arg("sort", rest).map(LineCommand::Sort),
        "select" => {
            if rest.is_empty() {
                return Err(ShellError::MissingArgument { command: "select" });
            }
            rest.parse::<usize>()
                .map(LineCommand::Select)
                .map_err(|_| ShellError::InvalidValue {
                    command: "select",
                    value: rest.to_string(),
                })
        }
        "loaded" => Ok(LineCommand::Loaded),
        "open" => Ok(LineCommand::Open),
        "refresh" => Ok(LineCommand::Refresh),
        "list" | "ls" => Ok(LineCommand::List),
        "help" | "?" => Ok(LineCommand::Help),
        "quit" | "exit" | "q" => Ok(LineCommand::Quit),
        other => Err(ShellError::UnknownCommand(other.to_string())),
    }
}

fn value_arg<T: ValueEnum>(command: &'static str, value: &str) -> Result<T, ShellError> {
    if value.is_empty() {
        return Err(ShellError::MissingArgument { command });
    }
    T::from_str(value, true).map_err(|_| ShellError::InvalidValue {
        command,
        value: value.to_string(),
    })
}

/// What the event loop must do after a line was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// State changed or was requested; print the listing.
    Render,
    /// Start a new background fetch.
    Refresh,
    /// Launch the preview surface for the current session.
    Open,
    /// Print the command list.
    Help,
    /// Leave the loop.
    Quit,
    /// Nothing to do.
    Idle,
}

/// Apply a parsed line to the workspace.
///
/// Criteria and selection commands go through [`Workspace::dispatch`];
/// I/O is left to the caller through the returned [`Effect`].
pub fn apply_line(ws: &mut Workspace, command: LineCommand) -> Result<Effect, ShellError> {
    let command = match command {
        LineCommand::Search(text) => Command::SetSearchTerm(text),
        LineCommand::Size(class) => Command::SetSizeClass(class),
        LineCommand::Date(class) => Command::SetDateClass(class),
        LineCommand::Sort(key) => Command::ToggleSort(key),
        LineCommand::Select(row) => {
            let visible = ws.visible();
            let doc = row
                .checked_sub(1)
                .and_then(|i| visible.get(i))
                .map(|d| (*d).clone())
                .ok_or(ShellError::NoSuchRow {
                    row,
                    visible: visible.len(),
                })?;
            Command::SelectDocument(doc)
        }
        LineCommand::Loaded => {
            let signal = ws
                .preview()
                .map(|session| session.load_signal())
                .ok_or(ShellError::NothingSelected)?;
            Command::PreviewLoaded(signal)
        }
        LineCommand::Open => {
            return if ws.preview().is_some() {
                Ok(Effect::Open)
            } else {
                Err(ShellError::NothingSelected)
            };
        }
        LineCommand::Refresh => return Ok(Effect::Refresh),
        LineCommand::List => return Ok(Effect::Render),
        LineCommand::Help => return Ok(Effect::Help),
        LineCommand::Quit => return Ok(Effect::Quit),
        LineCommand::Nothing => return Ok(Effect::Idle),
    };

    ws.dispatch(command);
    Ok(Effect::Render)
}

// ===== Event loop =====

/// Events merged into the shell's single channel.
#[derive(Debug)]
pub enum ShellEvent {
    /// A line of user input.
    Line(String),
    /// User input reached EOF.
    InputClosed,
    /// A background fetch finished.
    Listing(Command),
}

impl From<Command> for ShellEvent {
    fn from(command: Command) -> Self {
        ShellEvent::Listing(command)
    }
}

/// Fetch once, print the listing and return.
///
/// # Errors
///
/// Returns `AppError::Fetch` when the listing could not be loaded, and
/// `AppError::Io` when writing the output fails.
pub fn run_once<W: Write>(
    ws: &mut Workspace,
    source: &ListingSource,
    out: &mut W,
) -> Result<(), AppError> {
    ws.dispatch(Command::BeginFetch);
    let (tx, rx) = mpsc::channel::<Command>();
    spawn_fetch(source.clone(), tx);
    if let Ok(command) = rx.recv() {
        ws.dispatch(command);
    }

    if let ListingState::Failed(err) = ws.listing() {
        return Err(err.clone().into());
    }

    write!(out, "{}", view::render_listing(ws))?;
    for line in view::render_status(ws) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Run the interactive shell until `quit` or until input closes and no
/// fetch is outstanding.
///
/// Fetch failures are shown in the status lines and never end the session.
///
/// # Errors
///
/// Returns `AppError::Io` when writing the output fails.
pub fn run_interactive<R, W>(
    ws: &mut Workspace,
    source: &ListingSource,
    input: R,
    out: &mut W,
) -> Result<(), AppError>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let (tx, rx) = mpsc::channel::<ShellEvent>();
    spawn_input_reader(input, tx.clone());

    ws.dispatch(Command::BeginFetch);
    spawn_fetch(source.clone(), tx.clone());
    let mut pending_fetches = 1usize;
    let mut input_closed = false;

    writeln!(out, "Loading {} (type 'help' for commands)", source.origin())?;

    while let Ok(event) = rx.recv() {
        match event {
            ShellEvent::Listing(command) => {
                pending_fetches = pending_fetches.saturating_sub(1);
                ws.dispatch(command);
                write!(out, "{}", view::render(ws))?;
                if input_closed && pending_fetches == 0 {
                    break;
                }
            }

            ShellEvent::InputClosed => {
                debug!(pending_fetches, "Shell input closed");
                input_closed = true;
                if pending_fetches == 0 {
                    break;
                }
            }

            ShellEvent::Line(line) => {
                let effect = parse_line(&line).and_then(|command| apply_line(ws, command));
                match effect {
                    Ok(Effect::Render) => write!(out, "{}", view::render(ws))?,
                    Ok(Effect::Help) => writeln!(out, "{HELP}")?,
                    Ok(Effect::Idle) => {}
                    Ok(Effect::Quit) => break,
                    Ok(Effect::Refresh) => {
                        if pending_fetches > 0 {
                            writeln!(out, "A fetch is already in progress.")?;
                        } else {
                            ws.dispatch(Command::BeginFetch);
                            spawn_fetch(source.clone(), tx.clone());
                            pending_fetches += 1;
                            writeln!(out, "Refreshing {}", source.origin())?;
                        }
                    }
                    Ok(Effect::Open) => open_preview(ws, source, out)?,
                    Err(err) => writeln!(out, "error: {err}")?,
                }
            }
        }
    }

    info!("Shell finished");
    Ok(())
}

/// Launch the system viewer for the current preview session.
///
/// A successful launch counts as the preview's load signal.
fn open_preview<W: Write>(
    ws: &mut Workspace,
    source: &ListingSource,
    out: &mut W,
) -> Result<(), AppError> {
    let Some(signal) = ws.preview().map(|session| session.load_signal()) else {
        writeln!(out, "error: {}", ShellError::NothingSelected)?;
        return Ok(());
    };

    let location = source.preview_location(&signal.target_url);
    match open::that(&location) {
        Ok(()) => {
            info!(session = %signal.session, location = %location, "Preview opened");
            ws.dispatch(Command::PreviewLoaded(signal));
            write!(out, "{}", view::render(ws))?;
        }
        Err(err) => {
            warn!(location = %location, error = %err, "Failed to open preview");
            writeln!(out, "error: could not open {location}: {err}")?;
        }
    }
    Ok(())
}

/// Forward input lines to the shell channel, then `InputClosed`.
fn spawn_input_reader<R>(input: R, tx: Sender<ShellEvent>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if tx.send(ShellEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "Failed to read shell input");
                    break;
                }
            }
        }
        let _ = tx.send(ShellEvent::InputClosed);
    })
}

#[cfg(test)]
#[path = "integration_tests.rs"]
mod tests;
