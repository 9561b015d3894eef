use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{NewCompany, PROVINCES};

pub enum CompanyWizardAction {
    Cancel,
    Save(NewCompany),
}

#[derive(Clone, PartialEq, Copy)]
pub enum CompanyField {
    Name,
    Province,
    City,
    Email,
    Number,
}

pub struct CompanyWizardState {
    pub name: String,
    pub province_index: Option<usize>,
    pub city: String,
    pub email: String,
    pub number: String,
    pub current_field: CompanyField,
    pub editing: bool,
    pub error: Option<String>,
    pub submitting: bool,
}

impl CompanyWizardState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            province_index: None,
            city: String::new(),
            email: String::new(),
            number: String::new(),
            current_field: CompanyField::Name,
            editing: false,
            error: None,
            submitting: false,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            CompanyField::Name => CompanyField::Province,
            CompanyField::Province => CompanyField::City,
            CompanyField::City => CompanyField::Email,
            CompanyField::Email => CompanyField::Number,
            CompanyField::Number => CompanyField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            CompanyField::Name => CompanyField::Number,
            CompanyField::Province => CompanyField::Name,
            CompanyField::City => CompanyField::Province,
            CompanyField::Email => CompanyField::City,
            CompanyField::Number => CompanyField::Email,
        };
    }

    fn cycle_province(&mut self, forward: bool) {
        let len = PROVINCES.len();
        self.province_index = Some(match (self.province_index, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field = match self.current_field {
            CompanyField::Name => &mut self.name,
            CompanyField::City => &mut self.city,
            CompanyField::Email => &mut self.email,
            CompanyField::Number => &mut self.number,
            CompanyField::Province => return,
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

    pub fn request(&self) -> Result<NewCompany, String> {
        NewCompany::parse(&self.name, self.province(), &self.city, &self.email, &self.number)
            .map_err(|err| err.to_string())
    }
}

pub fn render_company_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &CompanyWizardState) {
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
    let title = Paragraph::new("Add New Company")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let province = match state.province_index {
        Some(i) => format!("< {} >", PROVINCES[i]),
        None => "< Select province... >".to_string(),
    };
    let fields = [
        (CompanyField::Name, "Name", state.name.clone()),
        (CompanyField::Province, "Province", province),
        (CompanyField::City, "City", state.city.clone()),
        (CompanyField::Email, "Email", state.email.clone()),
        (CompanyField::Number, "Phone", state.number.clone()),
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
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("Company Details")),
        chunks[1],
    );

    let (notice, color) = match (&state.error, state.submitting) {
        (_, true) => ("Saving company...".to_string(), Color::Cyan),
        (Some(error), false) => (error.clone(), Color::Red),
        (None, false) => (String::new(), Color::Gray),
    };
    f.render_widget(
        Paragraph::new(notice)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );

    let help_text = match (state.editing, state.current_field) {
        (true, _) => "Enter - Save field | Esc - Cancel editing",
        (false, CompanyField::Province) => {
            "Left/Right - Change | Up/Down - Navigate fields | S - Save company | Esc - Cancel"
        }
        (false, _) => "Enter - Edit field | Up/Down - Navigate fields | S - Save company | Esc - Cancel",
    };
    f.render_widget(
        Paragraph::new(help_text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL)),
        chunks[3],
    );
}

pub fn handle_input(state: &mut CompanyWizardState, key: KeyEvent) -> Option<CompanyWizardAction> {
    if state.submitting {
        return None;
    }

    match key.code {
        KeyCode::Esc => {
            if state.editing {
                state.editing = false;
            } else {
                return Some(CompanyWizardAction::Cancel);
            }
        }
        KeyCode::Enter => {
            if state.current_field != CompanyField::Province {
                state.editing = !state.editing;
            }
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down | KeyCode::Tab if !state.editing => state.next_field(),
        KeyCode::Left if !state.editing && state.current_field == CompanyField::Province => {
            state.cycle_province(false)
        }
        KeyCode::Right if !state.editing && state.current_field == CompanyField::Province => {
            state.cycle_province(true)
        }
        KeyCode::Char('s') | KeyCode::Char('S') if !state.editing => match state.request() {
            Ok(company) => {
                state.error = None;
                return Some(CompanyWizardAction::Save(company));
            }
            Err(error) => state.error = Some(error),
        },
        _ if state.editing => state.edit_current_field(key.code),
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(state: &mut CompanyWizardState, code: KeyCode) -> Option<CompanyWizardAction> {
        handle_input(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn province_must_be_chosen() {
        let mut state = CompanyWizardState::new();
        state.name = "PCL".into();
        state.city = "Edmonton".into();

        assert!(press(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error.as_deref(), Some("Province is required"));

        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Right);
        match press(&mut state, KeyCode::Char('s')) {
            Some(CompanyWizardAction::Save(company)) => assert_eq!(company.province, "Alberta"),
            _ => panic!("expected a save"),
        }
    }

    #[test]
    fn typing_in_edit_mode_fills_current_field() {
        let mut state = CompanyWizardState::new();
        press(&mut state, KeyCode::Enter);
        for c in "sq".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        press(&mut state, KeyCode::Esc);

        assert_eq!(state.name, "sq");
        assert!(!state.editing);
    }
}
