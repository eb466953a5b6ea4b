//! Line-oriented front end
//!
//! Reads one command per line and drives the [`AppController`]. Input and
//! output are generic so the whole loop can run against in-memory buffers.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::controller::{AppController, Confirm, RemoveOutcome, SearchOutcome, SearchRefused};
use crate::form::FormField;
use crate::services::{CatalogApi, TokenSource};
use crate::store::CollectionStore;

const HELP: &str = "\
Commands:
  search <query>       search albums and artists
  results              show the last search results
  add <n>              open the add form for result n
  edit <id>            open the edit form for a collection entry
  set <field> <value>  owned | format | condition | date | notes
  form                 show the open form
  save                 save the open form to the collection
  cancel               close the form without saving
  remove <id>          remove an entry (asks for confirmation)
  list                 show the collection
  status               show token status
  help                 show this help
  quit                 exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Results,
    Add(usize),
    Edit(String),
    Set { field: String, value: String },
    Form,
    Save,
    Cancel,
    Remove(String),
    List,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let need = |what: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("usage: {} {}", verb, what))
            } else {
                Ok(rest.to_string())
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "results" | "r" => Ok(Command::Results),
            "add" | "a" => need("<n>")?
                .parse()
                .map(Command::Add)
                .map_err(|_| format!("not a result number: {}", rest)),
            "edit" | "e" => need("<id>").map(Command::Edit),
            "set" => {
                let rest = need("<field> <value>")?;
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field.to_string(), value.trim().to_string()),
                    None => (rest, String::new()),
                };
                Ok(Command::Set { field, value })
            }
            "form" => Ok(Command::Form),
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "remove" | "rm" => need("<id>").map(Command::Remove),
            "list" | "ls" => Ok(Command::List),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command: {} (try 'help')", other)),
        }
    }
}

/// Confirmation read from the same input as the commands
struct PromptConfirm<'a, R, W> {
    input: RefCell<&'a mut R>,
    out: RefCell<&'a mut W>,
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<'_, R, W> {
    fn confirm(&self, prompt: &str) -> bool {
        let mut out = self.out.borrow_mut();
        if write!(out, "{} [y/N] ", prompt).and_then(|_| out.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Run the command loop until `quit` or end of input
pub async fn run<S, C, T, R, W>(
    controller: &mut AppController<S>,
    catalog: &C,
    tokens: &T,
    mut input: R,
    mut out: W,
) -> io::Result<()>
where
    S: CollectionStore,
    C: CatalogApi + ?Sized,
    T: TokenSource + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };

        match command {
            Command::Quit => return Ok(()),
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Status => render_status(controller, &mut out)?,
            Command::Search(query) => {
                let outcome = controller.search(&query, catalog, tokens).await;
                match outcome {
                    SearchOutcome::Found(_) => render_results(controller, &mut out)?,
                    SearchOutcome::Empty => writeln!(out, "No albums found for \"{}\"", query.trim())?,
                    SearchOutcome::Failed => writeln!(out, "Search failed; results cleared")?,
                    SearchOutcome::Refused(SearchRefused::NoToken) => {
                        writeln!(out, "{}", controller.status())?
                    }
                    SearchOutcome::Refused(SearchRefused::EmptyQuery) | SearchOutcome::Stale => {}
                }
            }
            Command::Results => render_results(controller, &mut out)?,
            Command::Add(n) => match controller.open_for_add_result(n) {
                Ok(()) => render_form(controller, &mut out)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Edit(id) => match controller.open_for_edit(&id) {
                Ok(()) => render_form(controller, &mut out)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Set { field, value } => {
                let applied = FormField::parse(&field, &value)
                    .map_err(crate::Error::from)
                    .and_then(|field| controller.update_form(field));
                match applied {
                    Ok(()) => render_form(controller, &mut out)?,
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            Command::Form => render_form(controller, &mut out)?,
            Command::Save => match controller.save() {
                Ok(entry) => {
                    let name = entry.name.clone();
                    writeln!(out, "Saved \"{}\"", name)?;
                    writeln!(out, "{}", controller.collection().summary())?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Cancel => {
                controller.close_form();
                writeln!(out, "Form closed")?;
            }
            Command::Remove(id) => {
                let outcome = {
                    let confirm = PromptConfirm {
                        input: RefCell::new(&mut input),
                        out: RefCell::new(&mut out),
                    };
                    controller.remove(&id, &confirm)
                };
                match outcome {
                    RemoveOutcome::Removed => {
                        writeln!(out, "Removed")?;
                        writeln!(out, "{}", controller.collection().summary())?;
                    }
                    RemoveOutcome::Declined => writeln!(out, "Kept")?,
                    RemoveOutcome::NotFound => writeln!(out, "Not in collection: {}", id)?,
                }
            }
            Command::List => render_collection(controller, &mut out)?,
        }
    }
}

pub fn render_status<S: CollectionStore, W: Write>(controller: &AppController<S>, out: &mut W) -> io::Result<()> {
    if !controller.status().is_empty() {
        writeln!(out, "{}", controller.status())?;
    } else if controller.has_token() {
        writeln!(out, "Ready to search")?;
    } else {
        writeln!(out, "No Spotify token yet; the next search will request one")?;
    }
    writeln!(out, "{}", controller.collection().summary())
}

pub fn render_results<S: CollectionStore, W: Write>(controller: &AppController<S>, out: &mut W) -> io::Result<()> {
    if controller.results().is_empty() {
        return writeln!(out, "No results");
    }

    for (i, album) in controller.results().iter().enumerate() {
        let badge = if controller.in_collection(&album.id) {
            "  [in collection]"
        } else {
            ""
        };
        writeln!(
            out,
            "{:>3}. {} - {} (released {}){}",
            i + 1,
            album.name,
            album.artist_line(),
            album.release_date.as_deref().unwrap_or("unknown"),
            badge
        )?;
        if let Some(url) = &album.external_url {
            writeln!(out, "     {}", url)?;
        }
    }
    Ok(())
}

pub fn render_form<S: CollectionStore, W: Write>(controller: &AppController<S>, out: &mut W) -> io::Result<()> {
    let Some(form) = controller.form() else {
        return writeln!(out, "No form open");
    };

    let album = form.album();
    let values = form.values();
    writeln!(out, "{} - {}", album.name, album.artist_line())?;
    writeln!(out, "  owned:     {}", if values.owned { "yes" } else { "no" })?;
    writeln!(out, "  format:    {}", values.format)?;
    writeln!(out, "  condition: {}", values.condition)?;
    writeln!(
        out,
        "  date:      {}",
        values
            .purchase_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    )?;
    writeln!(out, "  notes:     {}", values.notes)
}

pub fn render_collection<S: CollectionStore, W: Write>(controller: &AppController<S>, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", controller.collection().summary())?;
    for entry in controller.collection().iter() {
        writeln!(
            out,
            "  {}  {} - {} [{}, {}{}]",
            entry.id,
            entry.name,
            entry.artists.join(", "),
            entry.format,
            entry.condition,
            if entry.owned { "" } else { ", not owned" }
        )?;
    }
    Ok(())
}
