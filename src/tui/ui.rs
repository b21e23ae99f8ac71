use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::models::{status_glyph, Priority};
use super::app::{App, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help / status
        ].as_ref())
        .split(f.area());

    let rows: Vec<Row> = app
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let style = if t.status {
                Style::default().fg(Color::DarkGray)
            } else {
                match t.priority {
                    Priority::High => Style::default().fg(Color::Red),
                    Priority::Medium => Style::default().fg(Color::Yellow),
                    Priority::Low => Style::default().fg(Color::Green),
                    Priority::None => Style::default(),
                }
            };

            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(t.description.clone()),
                Cell::from(t.category.clone()),
                Cell::from(t.deadline.to_string()),
                Cell::from(t.priority.label()),
                Cell::from(status_glyph(t.status)),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(30),
        Constraint::Length(20),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(6),
    ];

    let mut title = format!("taskdesk - by {}", app.store.order().label());
    if let Some(q) = &app.filter {
        title.push_str(&format!(" - matching '{}'", q));
    }

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["#", "Description", "Category", "Deadline", "Priority", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | Space: Toggle Done | d: Del | s: Sort | /: Search | Esc: Clear Search | w: Save | o: Open | D: Delete All",
        InputMode::Adding | InputMode::Searching => "Enter: Confirm | Esc: Cancel",
    };
    let status_line = match &app.message {
        Some(msg) => format!("{}  |  {}", msg, help_text),
        None => help_text.to_string(),
    };

    let help = Paragraph::new(status_line)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    let title = match app.input_mode {
        InputMode::Normal => return,
        InputMode::Searching => "Search: Enter part of a description (empty to close)",
        InputMode::Adding => match app.add_state.step {
            0 => "Add Task: Enter Description (max 30 characters)",
            1 => "Add Task: Enter Category (Optional)",
            2 => "Add Task: Enter Deadline YYYY-MM-DD (Optional)",
            _ => "Add Task: Enter Priority low/medium/high (Optional)",
        },
    };

    let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
    f.render_widget(Clear, area);

    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
