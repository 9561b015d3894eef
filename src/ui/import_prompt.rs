use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::components::{popup::centered_rect, text_input::TextInput};

pub enum ImportAction {
    Cancel,
    Upload(PathBuf),
}

/// File path prompt for bulk project import.
pub struct ImportPromptState {
    pub path: TextInput,
    pub error: Option<String>,
}

impl ImportPromptState {
    pub fn new() -> Self {
        let mut path = TextInput::new();
        path.toggle_editing();
        Self { path, error: None }
    }
}

pub fn render_import_prompt<B: Backend>(frame: &mut Frame<B>, state: &ImportPromptState) {
    let area = centered_rect(60, 30, frame.size());

    let mut lines = vec![
        Spans::from("Path of a CSV or JSON file with projects:"),
        Spans::from(""),
        Spans::from(state.path.get_display_string()),
        Spans::from(""),
    ];
    if let Some(error) = &state.error {
        lines.push(Spans::from(error.clone()));
    }
    lines.push(Spans::from("Enter - Upload | Esc - Cancel"));

    let popup = Paragraph::new(lines)
        .block(Block::default().title("Import Projects").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

pub fn handle_input(state: &mut ImportPromptState, key: KeyEvent) -> Option<ImportAction> {
    match key.code {
        KeyCode::Esc => Some(ImportAction::Cancel),
        KeyCode::Enter => {
            let path = state.path.value.trim();
            if path.is_empty() {
                state.error = Some("Please select a file to import".into());
                None
            } else {
                Some(ImportAction::Upload(PathBuf::from(path)))
            }
        }
        code => {
            if state.path.handle_input(code) {
                state.error = None;
            }
            None
        }
    }
}
