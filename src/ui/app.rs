//! UI Application logic

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info};

use crate::controller::Command;
use crate::core::{NotificationLevel, ResourceKind, Tab};
use crate::state::{AppState, FormState};
use crate::ui::components::{render_form, ContainerListWidget, ImageListWidget};

/// What the coordinator should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    None,
    Quit,
    /// Refresh one table now
    Refresh(ResourceKind),
    /// Run a command against the row or form captured at key-press time
    Dispatch(Command),
}

/// UI Application controller
pub struct UiApp {
    pub state: AppState,
    pub should_quit: bool,
}

impl UiApp {
    /// Create a new UI app
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    /// Handle a terminal event
    pub fn handle_event(&mut self, event: Event) -> UiAction {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                UiAction::None
            }
            _ => UiAction::None,
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> UiAction {
        // Only handle key press events (not release or repeat)
        if key.kind != KeyEventKind::Press {
            return UiAction::None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            info!("Ctrl+C pressed");
            self.should_quit = true;
            return UiAction::Quit;
        }

        // If help is showing, any key closes it (except when toggling help)
        if self.state.show_help && key.code != KeyCode::Char('?') {
            self.state.show_help = false;
            return UiAction::None;
        }

        if self.state.form.is_some() {
            return self.handle_form_key(key);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                info!("Quit key pressed");
                self.should_quit = true;
                UiAction::Quit
            }
            KeyCode::Char('r') if ctrl => UiAction::Refresh(self.state.current_tab.kind()),

            // Tab switching; Ctrl+arrows as well as bare arrows
            KeyCode::Left => self.switch_tab(Tab::Containers),
            KeyCode::Right => self.switch_tab(Tab::Images),
            KeyCode::Char('1') => self.switch_tab(Tab::Containers),
            KeyCode::Char('2') => self.switch_tab(Tab::Images),

            // Row navigation
            KeyCode::Down | KeyCode::Char('j') => {
                match self.state.current_tab {
                    Tab::Containers => self.state.containers.next(),
                    Tab::Images => self.state.images.next(),
                }
                UiAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                match self.state.current_tab {
                    Tab::Containers => self.state.containers.previous(),
                    Tab::Images => self.state.images.previous(),
                }
                UiAction::None
            }

            KeyCode::Char('?') => {
                self.state.show_help = !self.state.show_help;
                UiAction::None
            }

            KeyCode::Char(c) if !ctrl => match self.state.current_tab {
                Tab::Containers => self.container_key(c),
                Tab::Images => self.image_key(c),
            },

            _ => {
                debug!("Unhandled key: {:?}", key);
                UiAction::None
            }
        }
    }

    fn container_key(&mut self, c: char) -> UiAction {
        if !matches!(c, 'd' | 'r' | 's' | 'e') {
            return UiAction::None;
        }
        let Some(container) = self.state.containers.selected_row().cloned() else {
            self.state
                .add_notification("No container selected", NotificationLevel::Warning);
            return UiAction::None;
        };
        let id = container.id.clone();

        match c {
            'd' => UiAction::Dispatch(Command::DeleteContainer { id }),
            'r' => UiAction::Dispatch(Command::RunContainer { id }),
            's' => UiAction::Dispatch(Command::StopContainer { id }),
            _ => {
                self.state.form = Some(FormState::rename(&container));
                UiAction::None
            }
        }
    }

    fn image_key(&mut self, c: char) -> UiAction {
        if !matches!(c, 'd' | 'c') {
            return UiAction::None;
        }
        let Some(image) = self.state.images.selected_row().cloned() else {
            self.state
                .add_notification("No image selected", NotificationLevel::Warning);
            return UiAction::None;
        };

        if c == 'd' {
            UiAction::Dispatch(Command::DeleteImage { id: image.id })
        } else {
            self.state.form = Some(FormState::create(&image));
            UiAction::None
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> UiAction {
        let Some(form) = self.state.form.as_mut() else {
            return UiAction::None;
        };

        match key.code {
            KeyCode::Esc => {
                debug!("Form cancelled");
                self.state.form = None;
            }
            KeyCode::Enter => return UiAction::Dispatch(form.to_command()),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.push_char(c)
            }
            _ => {}
        }
        UiAction::None
    }

    /// Switch to a specific tab
    fn switch_tab(&mut self, tab: Tab) -> UiAction {
        if self.state.current_tab != tab {
            info!("Switching to tab: {:?}", tab);
            self.state.switch_tab(tab);
        }
        UiAction::None
    }

    /// Render the UI
    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tab bar
                Constraint::Min(3),    // Table (+ form)
                Constraint::Length(1), // Instructions
                Constraint::Length(1), // Status
            ])
            .split(area);

        self.render_header(frame, main_layout[0]);
        self.render_main_content(frame, main_layout[1]);
        self.render_instructions(frame, main_layout[2]);
        self.render_status(frame, main_layout[3]);

        if self.state.show_help {
            self.render_help_overlay(frame, area);
        }
    }

    /// Render the tab bar
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " dockpane ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({}) ", self.state.runtime_name),
                Style::default().fg(Color::Gray),
            ),
        ];

        for (idx, tab) in Tab::all().iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" | "));
            }
            let style = if *tab == self.state.current_tab {
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!("{}:{}", tab.shortcut(), tab.name()), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the table, with the form beside it when one is open
    fn render_main_content(&self, frame: &mut Frame, area: Rect) {
        let (table_area, form_area) = match &self.state.form {
            Some(_) => {
                let split = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(area);
                (split[0], Some(split[1]))
            }
            None => (area, None),
        };

        match self.state.current_tab {
            Tab::Containers => {
                let widget = ContainerListWidget::new(&self.state.containers);
                let mut table_state = widget.state();
                frame.render_stateful_widget(widget.build_table(), table_area, &mut table_state);
            }
            Tab::Images => {
                let widget = ImageListWidget::new(&self.state.images);
                let mut table_state = widget.state();
                frame.render_stateful_widget(widget.build_table(), table_area, &mut table_state);
            }
        }

        if let (Some(form), Some(form_area)) = (&self.state.form, form_area) {
            render_form(frame, form_area, form);
        }
    }

    fn render_instructions(&self, frame: &mut Frame, area: Rect) {
        let text = self.state.current_tab.instructions();
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::Magenta))
                .alignment(ratatui::layout::Alignment::Center),
            area,
        );
    }

    /// Latest notification, else the current table's refresh state
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(n) = self.state.latest_notification() {
            let color = match n.level {
                NotificationLevel::Info => Color::Gray,
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Warning => Color::Yellow,
                NotificationLevel::Error => Color::Red,
            };
            Span::styled(format!(" {}", n.message), Style::default().fg(color))
        } else {
            let kind = self.state.current_tab.kind();
            match self.state.refresh_error(kind) {
                Some(err) => Span::styled(format!(" {}", err), Style::default().fg(Color::Red)),
                None => {
                    let refreshed = match kind {
                        ResourceKind::Containers => self.state.containers.refreshed_at(),
                        ResourceKind::Images => self.state.images.refreshed_at(),
                    };
                    let text = refreshed
                        .map(|t| {
                            let local = t.with_timezone(&chrono::Local);
                            format!(" Updated {}", local.format("%H:%M:%S"))
                        })
                        .unwrap_or_else(|| " Loading...".to_string());
                    Span::styled(text, Style::default().fg(Color::DarkGray))
                }
            }
        };

        frame.render_widget(Paragraph::new(Line::from(line)), area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup_area = Self::centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);

        let help_text = r#"Keyboard Shortcuts

Navigation:
  ← / → or 1 / 2    Switch between Containers and Images
  ↑ / ↓ or j / k    Select row
  Ctrl+R            Refresh current tab now

Containers Tab:
  d  Delete (force)     r  Run
  s  Stop               e  Rename

Images Tab:
  d  Delete (force)     c  Create container

Forms:
  Tab / ↑ / ↓  Move between fields
  Enter        Submit
  Esc          Cancel

Global:
  q / Ctrl+C   Quit
  ?            Toggle this help screen
"#;

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help (Press any key to close) ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false });

        frame.render_widget(help, popup_area);
    }

    /// Calculate centered rectangle for popups
    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}
