pub mod error;
pub mod store;
pub mod todo;

use clap::Parser;
use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use log::info;
use std::io::Write;
use std::path::PathBuf;

pub use error::{Result, TodoError};
pub use store::Store;
pub use todo::{Item, TodoList};

/// To-do list in the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
  /// JSON file the todos are kept in
  #[arg(
    short,
    long,
    env = "TODO_FILE",
    default_value = "todos.json",
    global = true
  )]
  file: PathBuf,

  /// Log more (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

impl Args {
  pub fn verbosity(&self) -> u8 {
    self.verbose
  }
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Add new todo
  Add {
    /// What needs doing
    title: String,
  },

  /// Remove todo
  Rm {
    /// Id shown by `ls`
    id: String,
  },

  /// Mark todo as done
  Done {
    /// Id shown by `ls`
    id: String,
  },

  /// Mark todo as not done
  Undo {
    /// Id shown by `ls`
    id: String,
  },

  /// Change the title of a todo
  Edit {
    /// Id shown by `ls`
    id: String,

    /// New title; asked for interactively when omitted
    #[arg(short, long)]
    title: Option<String>,
  },

  /// List todos
  Ls {
    /// Show only items not yet done
    #[arg(short, long)]
    pending: bool,
  },
}

/// Sends `log` output to stderr; `RUST_LOG` wins over `-v`.
pub fn init_logging(verbosity: u8) {
  let level = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
    .format_timestamp(None)
    .try_init();
}

/// Runs one command: load, apply, save if changed, report to `out`.
pub fn run(args: Args, out: &mut impl Write) -> Result<()> {
  let store = Store::new(&args.file);

  match args.command {
    Commands::Add { title } => add(&title, &store, out),
    Commands::Rm { id } => rm(todo::parse_id(&id)?, &store, out),
    Commands::Done { id } => set_done(todo::parse_id(&id)?, true, &store, out),
    Commands::Undo { id } => set_done(todo::parse_id(&id)?, false, &store, out),
    Commands::Edit { id, title } => edit(todo::parse_id(&id)?, title, &store, out),
    Commands::Ls { pending } => list(pending, &store, out),
  }
}

fn add(title: &str, store: &Store, out: &mut impl Write) -> Result<()> {
  // Reject before touching the file.
  todo::validate_title(title)?;

  let mut todos = store.load()?;
  let item = todos.add(title)?.clone();
  store.save(&todos)?;
  info!("added todo {}", item.id);
  writeln!(out, "Added #{}: {}", item.id, item.title)?;
  Ok(())
}

fn rm(id: u64, store: &Store, out: &mut impl Write) -> Result<()> {
  let mut todos = store.load()?;
  let removed = todos.remove(id)?;
  store.save(&todos)?;
  info!("removed todo {}", id);
  writeln!(out, "Removed #{}: {}", removed.id, removed.title)?;
  Ok(())
}

fn set_done(id: u64, done: bool, store: &Store, out: &mut impl Write) -> Result<()> {
  let mut todos = store.load()?;
  let item = if done {
    todos.complete(id)?.clone()
  } else {
    todos.reopen(id)?.clone()
  };
  store.save(&todos)?;

  let verb = if done { "Completed" } else { "Reopened" };
  info!("{} todo {}", verb.to_lowercase(), id);
  writeln!(out, "{} #{}: {}", verb, item.id, item.title)?;
  Ok(())
}

fn edit(id: u64, title: Option<String>, store: &Store, out: &mut impl Write) -> Result<()> {
  if let Some(title) = &title {
    todo::validate_title(title)?;
  }

  let mut todos = store.load()?;
  let current = todos.find(id).ok_or(TodoError::NotFound(id))?.title.clone();
  let new = match title {
    Some(title) => title,
    None => Input::with_theme(&ColorfulTheme::default())
      .with_prompt(format!("Change '{}' to", current))
      .with_initial_text(current.clone())
      .interact_text()?,
  };

  let old = todos.rename(id, &new)?;
  store.save(&todos)?;
  let new = &todos.find(id).ok_or(TodoError::NotFound(id))?.title;
  info!("renamed todo {}", id);
  writeln!(out, "Updated #{}: {} -> {}", id, old, new)?;
  Ok(())
}

fn list(pending: bool, store: &Store, out: &mut impl Write) -> Result<()> {
  let todos = store.load()?;
  let shown: Vec<&Item> = todos
    .items()
    .iter()
    .filter(|item| !pending || !item.done)
    .collect();
  render_table(&shown, out)
}

fn render_table(items: &[&Item], out: &mut impl Write) -> Result<()> {
  let width = items
    .iter()
    .map(|item| item.id.to_string().len())
    .max()
    .unwrap_or(0)
    .max("ID".len());

  writeln!(out, "{:>width$}  DONE  TITLE", "ID")?;
  if items.is_empty() {
    writeln!(out, "(no items)")?;
    return Ok(());
  }

  for item in items {
    if item.done {
      writeln!(
        out,
        "{:>width$}  [x]   {}",
        item.id,
        style(&item.title).strikethrough()
      )?;
    } else {
      writeln!(out, "{:>width$}  [ ]   {}", item.id, item.title)?;
    }
  }
  Ok(())
}
