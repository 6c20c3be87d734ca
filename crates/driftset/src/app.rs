//! The interactive shell.
//!
//! A line-driven front end over the list and detail screens. Input comes
//! from any async line reader and output goes to any writer, so the whole
//! shell runs the same against a terminal and a scripted test.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::car::Field;
use crate::config::ShellConfig;
use crate::error::Result;
use crate::repository::CarRepository;
use crate::ui::{DetailScreen, ListScreen, Navigation};

const LIST_HELP: &str = "\
Commands:
  search <text>   Filter cars by name
  clear           Clear the search
  open <n>        Open the nth car
  add             Add a car
  help            Show this help
  quit            Exit";

const DETAIL_HELP: &str = "\
Commands:
  edit                    Toggle editing (leaving editing saves)
  mirror on|off           Copy left/right edits to the other side
  set <field> <value...>  Change a field while editing
  fields                  List field keys
  delete                  Delete this car
  back                    Return to the list
  help                    Show this help
  quit                    Exit";

/// What the shell does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Redraw the current screen.
    Render,
    /// The command printed its own output.
    Quiet,
    /// Stop reading input.
    Quit,
}

/// The interactive shell state.
#[derive(Debug)]
pub struct App<W> {
    repository: CarRepository,
    list: ListScreen,
    detail: Option<DetailScreen>,
    config: ShellConfig,
    out: W,
}

impl<W: Write> App<W> {
    /// Create a shell showing the car list.
    pub fn new(repository: CarRepository, config: ShellConfig, out: W) -> Self {
        Self {
            list: ListScreen::new(repository.clone()),
            repository,
            detail: None,
            config,
            out,
        }
    }

    /// Read and execute lines until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails, or if a store write
    /// fails.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.render()?;

        loop {
            self.prompt()?;
            let Some(line) = lines.next_line().await? else {
                debug!("End of input");
                break;
            };
            match self.handle_line(&line).await? {
                Outcome::Render => self.render()?,
                Outcome::Quiet => {}
                Outcome::Quit => break,
            }
        }

        self.close_detail().await?;
        info!("Shell closed");
        Ok(())
    }

    /// Give back the writer.
    pub fn into_output(self) -> W {
        self.out
    }

    fn prompt(&mut self) -> Result<()> {
        if self.list.add_dialog().is_some() {
            write!(self.out, "Car name (:cancel to dismiss): ")?;
        } else if self
            .detail
            .as_ref()
            .is_some_and(DetailScreen::is_delete_dialog_open)
        {
            write!(self.out, "Delete this car? [y/N] ")?;
        } else {
            write!(self.out, "{}", self.config.prompt)?;
        }
        self.out.flush()?;
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Outcome> {
        if self.list.add_dialog().is_some() {
            return self.handle_add_dialog(line).await;
        }
        if self.detail.is_some() {
            return self.handle_detail(line).await;
        }
        self.handle_list(line)
    }

    fn handle_list(&mut self, line: &str) -> Result<Outcome> {
        let (command, rest) = split_command(line);
        match command {
            "" => Ok(Outcome::Quiet),
            "search" => {
                self.list.set_search_query(rest);
                Ok(Outcome::Render)
            }
            "clear" => {
                self.list.set_search_query("");
                Ok(Outcome::Render)
            }
            "open" => {
                let selected = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| self.list.select(index));
                match selected {
                    Some(navigation) => {
                        self.navigate(navigation);
                        Ok(Outcome::Render)
                    }
                    None => {
                        writeln!(self.out, "No car number '{rest}' in the list.")?;
                        Ok(Outcome::Quiet)
                    }
                }
            }
            "add" => {
                self.list.open_add_dialog();
                Ok(Outcome::Quiet)
            }
            "help" => {
                writeln!(self.out, "{LIST_HELP}")?;
                Ok(Outcome::Quiet)
            }
            "quit" | "exit" => Ok(Outcome::Quit),
            other => {
                writeln!(self.out, "Unknown command '{other}'. Type `help`.")?;
                Ok(Outcome::Quiet)
            }
        }
    }

    async fn handle_add_dialog(&mut self, line: &str) -> Result<Outcome> {
        if line.trim() == ":cancel" {
            self.list.dismiss_add_dialog();
            return Ok(Outcome::Render);
        }

        self.list.set_new_car_name(line);
        match self.list.confirm_add().await? {
            Some(navigation) => {
                self.navigate(navigation);
                Ok(Outcome::Render)
            }
            None => Ok(Outcome::Quiet),
        }
    }

    async fn handle_detail(&mut self, line: &str) -> Result<Outcome> {
        let Some(detail) = self.detail.as_mut() else {
            return Ok(Outcome::Render);
        };

        if detail.is_delete_dialog_open() {
            if line.trim().eq_ignore_ascii_case("y") {
                let navigation = detail.confirm_delete().await?;
                writeln!(self.out, "Deleted.")?;
                self.navigate(navigation);
            } else {
                detail.cancel_delete();
            }
            return Ok(Outcome::Render);
        }

        let (command, rest) = split_command(line);
        match command {
            "" => Ok(Outcome::Quiet),
            "edit" => {
                detail.toggle_edit();
                Ok(Outcome::Render)
            }
            "mirror" => match rest {
                "on" => {
                    detail.set_mirror(true);
                    Ok(Outcome::Render)
                }
                "off" => {
                    detail.set_mirror(false);
                    Ok(Outcome::Render)
                }
                _ => {
                    writeln!(self.out, "Usage: mirror on|off")?;
                    Ok(Outcome::Quiet)
                }
            },
            "set" => {
                let (key, value) = split_command(rest);
                if !detail.is_editing() {
                    writeln!(self.out, "Not editing. Type `edit` first.")?;
                    return Ok(Outcome::Quiet);
                }
                match key.parse::<Field>() {
                    Ok(field) => {
                        detail.set_field(field, value);
                        Ok(Outcome::Render)
                    }
                    Err(err) => {
                        writeln!(self.out, "{err}")?;
                        Ok(Outcome::Quiet)
                    }
                }
            }
            "fields" => {
                write_field_keys(&mut self.out)?;
                Ok(Outcome::Quiet)
            }
            "delete" => {
                detail.request_delete();
                Ok(Outcome::Quiet)
            }
            "back" => {
                self.close_detail().await?;
                Ok(Outcome::Render)
            }
            "help" => {
                writeln!(self.out, "{DETAIL_HELP}")?;
                Ok(Outcome::Quiet)
            }
            "quit" | "exit" => Ok(Outcome::Quit),
            other => {
                writeln!(self.out, "Unknown command '{other}'. Type `help`.")?;
                Ok(Outcome::Quiet)
            }
        }
    }

    fn navigate(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Detail { car, fresh } => {
                self.detail = Some(DetailScreen::open(self.repository.clone(), car, fresh));
            }
            Navigation::Back => self.detail = None,
        }
    }

    async fn close_detail(&mut self) -> Result<()> {
        if let Some(mut detail) = self.detail.take() {
            detail.back();
            detail.settle().await?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        match &self.detail {
            Some(detail) => render_detail(&mut self.out, detail, self.config.show_field_keys),
            None => render_list(&mut self.out, &self.list),
        }
    }
}

fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (line, ""),
    }
}

fn render_list(out: &mut impl Write, list: &ListScreen) -> Result<()> {
    writeln!(out)?;
    if list.search_query().is_empty() {
        writeln!(out, "Cars")?;
    } else {
        writeln!(out, "Cars matching \"{}\"", list.search_query())?;
    }

    let cars = list.visible_cars();
    if cars.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (n, car) in cars.iter().enumerate() {
        writeln!(out, "  {:>2}. {}", n + 1, car.name)?;
    }
    Ok(())
}

fn render_detail(out: &mut impl Write, detail: &DetailScreen, show_keys: bool) -> Result<()> {
    let mode = match (detail.is_editing(), detail.has_unsaved_changes()) {
        (true, true) => "editing, unsaved",
        (true, false) => "editing",
        (false, _) => "viewing",
    };
    let mirror = if detail.mirror() { "on" } else { "off" };

    writeln!(out)?;
    writeln!(out, "{} ({mode}, mirror {mirror})", detail.title())?;
    for section in detail.sections() {
        writeln!(out, "{}", section.heading)?;
        for row in section.rows {
            if show_keys && detail.is_editing() {
                writeln!(out, "  {:<20} {:<26} {}", row.label, row.field.key(), row.value)?;
            } else {
                writeln!(out, "  {:<20} {}", row.label, row.value)?;
            }
        }
    }
    Ok(())
}

/// Print every field key with its label.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_field_keys(out: &mut impl Write) -> Result<()> {
    for field in Field::all() {
        writeln!(out, "{:<26} {}", field.key(), field.label())?;
    }
    Ok(())
}
