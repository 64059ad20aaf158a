//! Image list widget

use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Row, Table, TableState},
};

use crate::core::ImageRecord;
use crate::runtime::short;
use crate::state::ResourceTable;

/// Widget for displaying the images table
pub struct ImageListWidget<'a> {
    table: &'a ResourceTable<ImageRecord>,
}

impl<'a> ImageListWidget<'a> {
    pub fn new(table: &'a ResourceTable<ImageRecord>) -> Self {
        Self { table }
    }

    pub fn state(&self) -> TableState {
        let mut state = TableState::default();
        state.select(self.table.selected());
        state
    }

    /// Build the table widget
    pub fn build_table(&self) -> Table<'a> {
        let header = Row::new(vec!["ID", "REPOSITORY", "TAG"])
            .style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(0);

        let rows: Vec<Row> = self
            .table
            .rows()
            .iter()
            .map(|i| {
                // Untagged images stand out
                let style = if i.is_dangling() {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Row::new(vec![
                    Line::from(short(&i.id).to_string()),
                    Line::from(Span::styled(i.repository.clone(), style)),
                    Line::from(Span::styled(i.tag.clone(), style)),
                ])
            })
            .collect();

        let title = match self.table.last_error() {
            Some(_) => format!(" Images ({}) [stale] ", self.table.len()),
            None => format!(" Images ({}) ", self.table.len()),
        };

        Table::new(
            rows,
            [
                Constraint::Length(14), // ID
                Constraint::Min(20),    // Repository
                Constraint::Length(15), // Tag
            ],
        )
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::Black))
        .highlight_symbol("▶ ")
    }
}
