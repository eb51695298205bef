//! Interactive planning session.
//!
//! The task list lives only as long as the process. Every `show`
//! regenerates the day from the current list.

use std::io::{self, BufRead, Write};

use chrono::Local;
use focus_core::{Config, Priority, Session, ViewRange};

use super::plan::format_plan;

const HELP: &str = "\
commands:
  add <name...> <minutes> <must|want>   queue a task
  list                                  show queued tasks
  show [morning|afternoon|all]          print the day plan
  reset                                 clear all tasks
  help                                  this text
  quit                                  leave the session
";

#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Add {
        name: String,
        minutes: u32,
        priority: Priority,
    },
    List,
    Show(Option<ViewRange>),
    Reset,
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<SessionCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(SessionCommand::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let [name @ .., minutes, priority] = rest.as_slice() else {
                return Err("usage: add <name...> <minutes> <must|want>".into());
            };
            let minutes = minutes
                .parse::<u32>()
                .map_err(|_| format!("invalid minutes '{minutes}'"))?;
            let priority = priority.parse::<Priority>().map_err(|e| e.to_string())?;
            Ok(SessionCommand::Add {
                name: name.join(" "),
                minutes,
                priority,
            })
        }
        "list" | "ls" => Ok(SessionCommand::List),
        "show" => match rest.first() {
            Some(view) => view
                .parse::<ViewRange>()
                .map(|v| SessionCommand::Show(Some(v)))
                .map_err(|e| e.to_string()),
            None => Ok(SessionCommand::Show(None)),
        },
        "reset" => Ok(SessionCommand::Reset),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

/// Drive a session over any line source.
pub fn run_loop<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &Config,
) -> io::Result<Session> {
    let builder = config.builder();
    let mut session = Session::new();

    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(output, "error: {message}")?;
                continue;
            }
        };

        match command {
            SessionCommand::Add {
                name,
                minutes,
                priority,
            } => match session.submit(&name, minutes, priority) {
                Ok(true) => writeln!(output, "added: {name} ({minutes} min, {priority})")?,
                Ok(false) => {}
                Err(err) => writeln!(output, "error: {err}")?,
            },
            SessionCommand::List => {
                if session.is_empty() {
                    writeln!(output, "(no tasks)")?;
                }
                for (i, task) in session.tasks().iter().enumerate() {
                    writeln!(
                        output,
                        "{}. {} ({} min, {})",
                        i + 1,
                        task.name,
                        task.minutes,
                        task.priority
                    )?;
                }
            }
            SessionCommand::Show(view) => {
                let schedule = session.generate(&builder, &config.routines);
                let view = view.unwrap_or(config.view.default);
                let rendered = format_plan(&schedule, view, Local::now().date_naive(), false)
                    .map_err(io::Error::other)?;
                write!(output, "{rendered}")?;
            }
            SessionCommand::Reset => {
                session.reset();
                writeln!(output, "all tasks cleared")?;
            }
            SessionCommand::Help => write!(output, "{HELP}")?,
            SessionCommand::Quit => break,
            SessionCommand::Empty => {}
        }
        output.flush()?;
    }

    Ok(session)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing::debug!(routines = config.routines.len(), "session started");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "focus session; type 'help' for commands")?;
    run_loop(stdin.lock(), &mut stdout, &config)?;
    Ok(())
}
