use std::path::{Path, PathBuf};

use ratatui::widgets::TableState;

use crate::menu::capitalize;
use crate::models::{status_glyph, validate_description, Deadline, Priority, Task};
use crate::store::{Search, TaskStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Searching,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub description: String,
    pub category: String,
    pub deadline: String,
    pub step: usize, // 0: Description, 1: Category, 2: Deadline, 3: Priority
}

pub struct App {
    pub store: TaskStore,
    pub path: PathBuf,
    /// Ids of the rows on screen, top to bottom.
    pub visible: Vec<u64>,
    /// Active name filter, if a search narrowed the view.
    pub filter: Option<String>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// One-line feedback shown under the table.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App instance and loads the task file at `path`.
    pub fn new(path: &Path) -> App {
        match TaskStore::open(path) {
            Ok(store) => App::with_store(store, path),
            Err(e) => {
                let mut app = App::with_store(TaskStore::new(), path);
                app.message = Some(format!("Failed to load tasks: {}", e));
                app
            }
        }
    }

    pub fn with_store(store: TaskStore, path: &Path) -> App {
        let mut app = App {
            store,
            path: path.to_path_buf(),
            visible: Vec::new(),
            filter: None,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            message: None,
        };
        app.refresh();
        app
    }

    /// Tasks currently on screen, in display order.
    pub fn rows(&self) -> Vec<&Task> {
        self.visible.iter().filter_map(|id| self.store.get(*id)).collect()
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.state.selected().and_then(|i| self.visible.get(i).copied())
    }

    /// Selects the next row, wrapping to the top.
    pub fn next(&mut self) {
        if self.visible.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row, wrapping to the bottom.
    pub fn previous(&mut self) {
        if self.visible.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Flips the completion flag of the selected task.
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        self.message = Some(match self.store.toggle_by_id(id) {
            Ok(t) => format!("Task: {} | Status: {}", t.description, status_glyph(t.status)),
            Err(e) => e.to_string(),
        });
    }

    /// Removes the selected task.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        self.message = Some(match self.store.remove_by_id(id) {
            Ok(t) => format!("Task removed: {}", t.description),
            Err(e) => e.to_string(),
        });
        self.refresh();
    }

    /// Switches between deadline and priority ordering.
    pub fn toggle_sort(&mut self) {
        let key = self.store.order().toggled();
        self.store.list_by(key);
        self.refresh();
    }

    pub fn delete_all(&mut self) {
        self.message = Some(self.store.delete_all());
        self.filter = None;
        self.refresh();
    }

    pub fn save(&mut self) {
        self.message = Some(self.store.save(&self.path).unwrap_or_else(|e| format!("Failed to save tasks: {}", e)));
    }

    pub fn load(&mut self) {
        self.message = Some(self.store.load(&self.path).unwrap_or_else(|e| format!("Failed to load tasks: {}", e)));
        self.filter = None;
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.refresh();
    }

    /// Re-sorts with the current key and recomputes the visible rows.
    pub fn refresh(&mut self) {
        let order = self.store.order();
        self.store.list_by(order);

        self.visible = match self.filter.as_deref().map(|q| self.store.search_by_name(q)) {
            Some(Search::Matches(found)) => found.iter().map(|t| t.id).collect(),
            Some(Search::Cancelled) | None => self.store.tasks().iter().map(|t| t.id).collect(),
        };

        if self.visible.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.visible.len() {
                self.state.select(Some(self.visible.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Searching => self.handle_search_input(),
            InputMode::Normal => {}
        }
    }

    fn handle_search_input(&mut self) {
        let query = std::mem::take(&mut self.input_buffer);
        self.input_mode = InputMode::Normal;
        match self.store.search_by_name(&query) {
            Search::Cancelled => {
                self.message = Some("Search closed".to_string());
                self.filter = None;
            }
            Search::Matches(found) => {
                self.message = Some(match found.len() {
                    0 => "No task under this description!".to_string(),
                    n => format!("{} matching task(s), Esc to clear", n),
                });
                self.filter = Some(query);
            }
        }
        self.refresh();
    }

    /// Handles input for the "Add Task" wizard.
    ///
    /// Invalid input keeps the wizard on the same step.
    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                match validate_description(&capitalize(self.input_buffer.trim())) {
                    Ok(d) => {
                        self.add_state.description = d;
                        self.next_step();
                    }
                    Err(e) => self.message = Some(e.to_string()),
                }
            }
            1 => {
                self.add_state.category = self.input_buffer.trim().to_string();
                self.next_step();
            }
            2 => {
                match self.input_buffer.parse::<Deadline>() {
                    Ok(d) => {
                        self.add_state.deadline = d.to_string();
                        self.next_step();
                    }
                    Err(_) => self.message = Some("Invalid date format!".to_string()),
                }
            }
            _ => {
                if let Err(e) = self.input_buffer.parse::<Priority>() {
                    self.message = Some(e.to_string());
                    return;
                }
                let order = self.store.order();
                let added = self.store.add(
                    &self.add_state.description,
                    &self.add_state.category,
                    &self.add_state.deadline,
                    &self.input_buffer,
                );
                self.message = Some(match added {
                    Ok(_) => format!("Task added: {}", self.add_state.description),
                    Err(e) => e.to_string(),
                });
                self.store.list_by(order);
                self.cancel_input();
                self.refresh();
            }
        }
    }

    fn next_step(&mut self) {
        self.add_state.step += 1;
        self.input_buffer.clear();
        self.message = None;
    }
}
