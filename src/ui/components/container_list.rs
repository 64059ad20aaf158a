//! Container list widget

use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Row, Table, TableState},
};

use crate::core::{ContainerRecord, ContainerStatus};
use crate::runtime::short;
use crate::state::ResourceTable;

/// Widget for displaying the containers table
pub struct ContainerListWidget<'a> {
    table: &'a ResourceTable<ContainerRecord>,
}

impl<'a> ContainerListWidget<'a> {
    pub fn new(table: &'a ResourceTable<ContainerRecord>) -> Self {
        Self { table }
    }

    /// Table state mirroring the current selection
    pub fn state(&self) -> TableState {
        let mut state = TableState::default();
        state.select(self.table.selected());
        state
    }

    /// Build the table widget
    pub fn build_table(&self) -> Table<'a> {
        let header = Row::new(vec!["ID", "NAME", "STATUS"])
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
            .map(|c| {
                let status_style = match c.status {
                    ContainerStatus::Running => Style::default().fg(Color::Green),
                    ContainerStatus::Stopped => Style::default().fg(Color::Red),
                };

                Row::new(vec![
                    Line::from(short(&c.id).to_string()),
                    Line::from(c.name.clone()),
                    Line::from(Span::styled(c.status.to_string(), status_style)),
                ])
            })
            .collect();

        let title = match self.table.last_error() {
            Some(_) => format!(" Containers ({}) [stale] ", self.table.len()),
            None => format!(" Containers ({}) ", self.table.len()),
        };

        Table::new(
            rows,
            [
                Constraint::Length(14), // ID
                Constraint::Min(10),    // Name
                Constraint::Length(10), // Status
            ],
        )
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::Black))
        .highlight_symbol("▶ ")
    }
}
