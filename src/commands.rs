use std::io::{self, BufRead, Write};
use std::path::Path;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{status_glyph, Priority};
use crate::store::{Search, SortKey, TaskStore};

/// Opens the task file, printing the reason when it cannot be read.
fn open_store(path: &Path, silent: bool) -> Option<TaskStore> {
    match TaskStore::open(path) {
        Ok(store) => Some(store),
        Err(e) => {
            if !silent { eprintln!("Failed to load tasks: {}", e); }
            None
        }
    }
}

fn persist(store: &TaskStore, path: &Path, silent: bool) -> bool {
    match store.save(path) {
        Ok(_) => true,
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
            false
        }
    }
}

/// Adds a new task to the task file.
///
/// Missing category, deadline and priority fall back to `none`.
pub fn cmd_add(path: &Path, description: String, category: Option<String>, deadline: Option<String>, priority: Option<String>, silent: bool) {
    let Some(mut store) = open_store(path, silent) else { return };
    let added = store.add(
        &description,
        category.as_deref().unwrap_or_default(),
        deadline.as_deref().unwrap_or_default(),
        priority.as_deref().unwrap_or_default(),
    );
    match added {
        Ok(_) => {
            if persist(&store, path, silent) && !silent {
                println!("Task added ({} in total)", store.len());
            }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Lists tasks in a formatted table, sorted by `by`.
///
/// Row numbers are the indexes `done` and `remove` expect with the same `--by`.
pub fn cmd_list(path: &Path, by: SortKey) {
    let Some(mut store) = open_store(path, false) else { return };
    let tasks = store.list_by(by);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Deadline").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for (i, t) in tasks.iter().enumerate() {
        let priority_color = match t.priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
            Priority::None => Color::Reset,
        };
        let status_color = if t.status { Color::Green } else { Color::Yellow };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&t.description),
            Cell::new(&t.category),
            Cell::new(t.deadline),
            Cell::new(t.priority).fg(priority_color),
            Cell::new(status_glyph(t.status)).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Toggles the completion flag of the task at row `index` of the `by` listing.
pub fn cmd_done(path: &Path, index: usize, by: SortKey, silent: bool) {
    let Some(mut store) = open_store(path, silent) else { return };
    store.list_by(by);
    match store.toggle_status(index) {
        Ok(msg) if index == 0 => {
            if !silent { println!("{}", msg); }
        }
        Ok(msg) => {
            if persist(&store, path, silent) && !silent { println!("{}", msg); }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Removes the task at row `index` of the `by` listing.
pub fn cmd_remove(path: &Path, index: usize, by: SortKey, silent: bool) {
    let Some(mut store) = open_store(path, silent) else { return };
    store.list_by(by);
    match store.remove(index) {
        Ok(msg) if index == 0 => {
            if !silent { println!("{}", msg); }
        }
        Ok(msg) => {
            if persist(&store, path, silent) && !silent { println!("{}", msg); }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Prints every task whose description contains `query`.
pub fn cmd_search(path: &Path, query: String) {
    let Some(store) = open_store(path, false) else { return };
    match store.search_by_name(&query) {
        Search::Cancelled => println!("Search closed"),
        Search::Matches(found) if found.is_empty() => println!("No task under this description!"),
        Search::Matches(found) => {
            for t in found {
                println!("{}", t);
            }
        }
    }
}

/// Deletes every task in the file.
pub fn cmd_clear(path: &Path, force: bool) {
    if !force {
        let stdin = io::stdin();
        if !confirm(&mut stdin.lock(), &mut io::stdout(), "Are you sure you want to delete all tasks? This cannot be undone. [y/N] ") {
            println!("Aborted.");
            return;
        }
    }

    let Some(mut store) = open_store(path, false) else { return };
    let msg = store.delete_all();
    if persist(&store, path, false) {
        println!("{}", msg);
    }
}

/// Asks a yes/no question; anything but `y` is a no.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> bool {
    if write!(output, "{}", question).and_then(|_| output.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}
