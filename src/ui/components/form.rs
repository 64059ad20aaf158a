//! Rename / create form panel

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::FormState;

/// Render the form with the focused field highlighted
pub fn render_form(frame: &mut Frame, area: Rect, form: &FormState) {
    let mut lines = Vec::with_capacity(form.fields.len() * 2 + 2);

    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focused;
        let value_style = if focused {
            Style::default().fg(Color::Black).bg(Color::LightBlue)
        } else {
            Style::default().fg(Color::Black).bg(Color::Blue)
        };
        let cursor = if focused { "_" } else { "" };

        lines.push(Line::from(Span::styled(
            field.label,
            Style::default().fg(Color::Magenta),
        )));
        lines.push(Line::from(Span::styled(
            format!("{}{}", field.value, cursor),
            value_style,
        )));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "[Enter] Save  [Esc] Cancel  [Tab] Next field",
        Style::default().fg(Color::Gray),
    )));

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form.title()),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageRecord;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_render_create_form() {
        let form = FormState::create(&ImageRecord::new("sha", "nginx", "latest"));
        let mut terminal = Terminal::new(TestBackend::new(50, 14)).unwrap();
        terminal
            .draw(|f| render_form(f, f.area(), &form))
            .unwrap();
        let out: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();

        assert!(out.contains("Create Container"));
        assert!(out.contains("Port to expose"));
        assert!(out.contains("nginx:latest"));
        assert!(out.contains("nginx_"));
    }
}
