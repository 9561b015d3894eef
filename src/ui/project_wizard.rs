use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{ProjectDraft, PROJECT_STATUSES, PROVINCES};

pub enum ProjectWizardAction {
    Cancel,
    Save(ProjectDraft),
}

#[derive(Clone, PartialEq, Copy)]
pub enum ProjectField {
    Name,
    Budget,
    Status,
    Province,
    City,
}

impl ProjectField {
    fn is_selector(self) -> bool {
        matches!(self, ProjectField::Status | ProjectField::Province)
    }
}

pub struct ProjectWizardState {
    pub name: String,
    pub budget: String,
    pub status_index: usize,
    pub province_index: Option<usize>,
    pub city: String,
    pub current_field: ProjectField,
    pub editing: bool,
    pub error: Option<String>,
    /// Set while the geocode and save are in flight.
    pub submitting: bool,
}

impl ProjectWizardState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            budget: String::new(),
            status_index: 0,
            province_index: None,
            city: String::new(),
            current_field: ProjectField::Name,
            editing: false,
            error: None,
            submitting: false,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::Budget,
            ProjectField::Budget => ProjectField::Status,
            ProjectField::Status => ProjectField::Province,
            ProjectField::Province => ProjectField::City,
            ProjectField::City => ProjectField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::City,
            ProjectField::Budget => ProjectField::Name,
            ProjectField::Status => ProjectField::Budget,
            ProjectField::Province => ProjectField::Status,
            ProjectField::City => ProjectField::Province,
        };
    }

    fn cycle_selector(&mut self, forward: bool) {
        match self.current_field {
            ProjectField::Status => {
                let len = PROJECT_STATUSES.len();
                self.status_index = if forward {
                    (self.status_index + 1) % len
                } else {
                    (self.status_index + len - 1) % len
                };
            }
            ProjectField::Province => {
                let len = PROVINCES.len();
                self.province_index = Some(match (self.province_index, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                });
            }
            _ => {}
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field = match self.current_field {
            ProjectField::Name => &mut self.name,
            ProjectField::City => &mut self.city,
            ProjectField::Budget => {
                match key {
                    KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == ',' => self.budget.push(c),
                    KeyCode::Backspace => {
                        self.budget.pop();
                    }
                    _ => {}
                }
                return;
            }
            ProjectField::Status | ProjectField::Province => return,
        };
        match key {
            KeyCode::Char(c) => field.push(c),
            KeyCode::Backspace => {
                field.pop();
            }
            _ => {}
        }
    }

    pub fn province(&self) -> &str {
        self.province_index.map(|i| PROVINCES[i]).unwrap_or("")
    }

    pub fn status(&self) -> &str {
        PROJECT_STATUSES[self.status_index]
    }

    /// Build the typed request from the form, or explain what is missing.
    pub fn draft(&self) -> Result<ProjectDraft, String> {
        ProjectDraft::parse(&self.name, &self.budget, self.status(), self.province(), &self.city)
            .map_err(|err| err.to_string())
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    f.render_widget(Clear, area);
    let title = Paragraph::new("Add New Project")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let (notice, color) = match (&state.error, state.submitting) {
        (_, true) => ("Locating and saving project...".to_string(), Color::Cyan),
        (Some(error), false) => (error.clone(), Color::Red),
        (None, false) => (String::new(), Color::Gray),
    };
    f.render_widget(
        Paragraph::new(notice)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else if state.current_field.is_selector() {
        "Left/Right - Change | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ProjectWizardState, area: Rect) {
    let province = match state.province_index {
        Some(i) => format!("< {} >", PROVINCES[i]),
        None => "< Select province... >".to_string(),
    };
    let fields = [
        (ProjectField::Name, "Name", state.name.clone()),
        (ProjectField::Budget, "Budget ($)", state.budget.clone()),
        (ProjectField::Status, "Status", format!("< {} >", state.status())),
        (ProjectField::Province, "Province", province),
        (ProjectField::City, "City", state.city.clone()),
    ];

    let items: Vec<ListItem> = fields
        .iter()
        .map(|(field, name, value)| {
            let current = *field == state.current_field;
            let label_style = if current {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value = if current && state.editing {
                Span::styled(format!("{value}|"), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(value.clone())
            };
            ListItem::new(Spans::from(vec![Span::styled(format!("{name}: "), label_style), value]))
        })
        .collect();

    let form_list = List::new(items).block(Block::default().borders(Borders::ALL).title("Project Details"));
    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState, key: KeyEvent) -> Option<ProjectWizardAction> {
    if state.submitting {
        return None;
    }

    match key.code {
        KeyCode::Esc => {
            if state.editing {
                state.editing = false;
            } else {
                return Some(ProjectWizardAction::Cancel);
            }
        }
        KeyCode::Enter => {
            if !state.current_field.is_selector() {
                state.editing = !state.editing;
            }
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down | KeyCode::Tab if !state.editing => state.next_field(),
        KeyCode::Left if !state.editing => state.cycle_selector(false),
        KeyCode::Right if !state.editing => state.cycle_selector(true),
        KeyCode::Char('s') | KeyCode::Char('S') if !state.editing => match state.draft() {
            Ok(draft) => {
                state.error = None;
                return Some(ProjectWizardAction::Save(draft));
            }
            Err(error) => state.error = Some(error),
        },
        _ if state.editing => state.edit_current_field(key.code),
        _ => {}
    }

    None
}
