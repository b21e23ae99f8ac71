//! Numbered console menu driving a [`TaskStore`].
//!
//! Every prompt loops until it gets a usable value, so the store only ever
//! sees validated input. End of input acts like `0`: the current operation is
//! cancelled and the menu exits.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::{validate_description, Deadline};
use crate::store::{Search, TaskStore};

const MENU: &str = "\n===== To-Do List Manager =====\n\
1. Add New Task\n\
2. Set task as completed\n\
3. Remove task\n\
4. Search task by name\n\
5. Task Report | Sort by deadline\n\
6. Task Report | Sort by priority\n\
7. Save tasks to file\n\
8. Open tasks file\n\
9. Delete all Tasks\n\
0. Exit";

const PRIORITY_TOKENS: [&str; 3] = ["low", "medium", "high"];

pub struct Menu<'a, R, W> {
    store: &'a mut TaskStore,
    path: PathBuf,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut TaskStore, path: &Path, input: R, output: W) -> Self {
        Menu { store, path: path.to_path_buf(), input, output }
    }

    /// Shows the menu until the user picks `0` or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(line) = self.prompt("Enter your selection: ")? else { break };
            match line.trim().parse::<i64>() {
                Ok(0) => break,
                Ok(1) => self.add_task()?,
                Ok(2) => self.toggle_status()?,
                Ok(3) => self.remove_task()?,
                Ok(4) => self.search_task_name()?,
                Ok(5) => {
                    self.store.list_by_deadline();
                    self.print_report()?;
                }
                Ok(6) => {
                    self.store.list_by_priority();
                    self.print_report()?;
                }
                Ok(7) => {
                    let msg = match self.store.save(&self.path) {
                        Ok(msg) => msg,
                        Err(e) => format!("Failed to save tasks: {}", e),
                    };
                    writeln!(self.output, "{}", msg)?;
                }
                Ok(8) => {
                    let msg = match self.store.load(&self.path) {
                        Ok(msg) => msg,
                        Err(e) => format!("Failed to load tasks: {}", e),
                    };
                    writeln!(self.output, "{}", msg)?;
                }
                Ok(9) => {
                    let msg = self.store.delete_all();
                    writeln!(self.output, "{}", msg)?;
                }
                Ok(_) => writeln!(self.output, "Invalid menu selection!")?,
                Err(_) => writeln!(self.output, "Invalid symbol entered!")?,
            }
        }
        writeln!(self.output, "===    Program is Closed    ===")
    }

    /// Collects every field of a new task and hands it to the store.
    ///
    /// Returns without adding anything if the description prompt is quit.
    pub fn add_task(&mut self) -> io::Result<()> {
        let Some(description) = self.read_description()? else { return Ok(()) };
        let Some(category) = self.prompt("Enter task category (or press ENTER to skip): ")? else { return Ok(()) };
        let Some(deadline) = self.read_deadline()? else { return Ok(()) };
        let Some(priority) = self.read_priority()? else { return Ok(()) };

        if let Err(e) = self.store.add(&description, &category, &deadline.to_string(), priority) {
            writeln!(self.output, "{}", e)?;
        }
        Ok(())
    }

    fn toggle_status(&mut self) -> io::Result<()> {
        let index = self.read_index()?;
        let msg = self.store.toggle_status(index).unwrap_or_else(|e| e.to_string());
        writeln!(self.output, "{}", msg)
    }

    fn remove_task(&mut self) -> io::Result<()> {
        let index = self.read_index()?;
        let msg = self.store.remove(index).unwrap_or_else(|e| e.to_string());
        writeln!(self.output, "{}", msg)
    }

    fn search_task_name(&mut self) -> io::Result<()> {
        self.print_report()?;
        let query = self.prompt("Enter Task Name (ENTER to quit): ")?.unwrap_or_default();
        match self.store.search_by_name(&query) {
            Search::Cancelled => writeln!(self.output, "Search closed"),
            Search::Matches(found) if found.is_empty() => writeln!(self.output, "No task under this description!"),
            Search::Matches(found) => {
                for t in found {
                    writeln!(self.output, "{}", t)?;
                }
                Ok(())
            }
        }
    }

    fn print_report(&mut self) -> io::Result<()> {
        if self.store.is_empty() {
            return writeln!(self.output, "No tasks found.");
        }
        for line in self.store.report() {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn read_description(&mut self) -> io::Result<Option<String>> {
        loop {
            let Some(raw) = self.prompt("Enter task description (max 30 characters) (or Q to quit): ")? else {
                return Ok(None);
            };
            let text = capitalize(raw.trim());
            if text == "Q" {
                return Ok(None);
            }
            match validate_description(&text) {
                Ok(valid) => return Ok(Some(valid)),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    fn read_deadline(&mut self) -> io::Result<Option<Deadline>> {
        loop {
            let Some(raw) = self.prompt("Enter deadline (YYYY-MM-DD) (or press ENTER to skip): ")? else {
                return Ok(None);
            };
            match raw.parse::<Deadline>() {
                Ok(d) => return Ok(Some(d)),
                Err(_) => writeln!(self.output, "Invalid date format!")?,
            }
        }
    }

    /// Returns the accepted token: `low`, `medium`, `high` or empty.
    fn read_priority(&mut self) -> io::Result<Option<&'static str>> {
        loop {
            let Some(raw) = self.prompt("Set priority (low, medium, high) (or press ENTER to skip): ")? else {
                return Ok(None);
            };
            let token = raw.trim().to_lowercase();
            if token.is_empty() {
                return Ok(Some(""));
            }
            match PRIORITY_TOKENS.iter().copied().find(|p| *p == token) {
                Some(p) => return Ok(Some(p)),
                None => writeln!(self.output, "Invalid selection!")?,
            }
        }
    }

    /// Re-lists the tasks in their current order and asks for a row number.
    ///
    /// `0` (or end of input) cancels.
    fn read_index(&mut self) -> io::Result<usize> {
        let order = self.store.order();
        self.store.list_by(order);
        self.print_report()?;
        if self.store.is_empty() {
            return Ok(0);
        }
        loop {
            let Some(raw) = self.prompt("Enter Task Index (0 to quit): ")? else { return Ok(0) };
            match raw.trim().parse::<usize>() {
                Ok(0) => return Ok(0),
                Ok(n) if n <= self.store.len() => return Ok(n),
                Ok(_) => writeln!(self.output, "Task does not exist!")?,
                Err(_) => writeln!(self.output, "Invalid selection!")?,
            }
        }
    }

    /// Prints `text` and reads one line without its line ending.
    ///
    /// `None` means the input is exhausted.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("input exhausted");
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
