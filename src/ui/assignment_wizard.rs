use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Company, NewAssignment, Project};

pub enum AssignmentWizardAction {
    Cancel,
    Save(NewAssignment),
}

#[derive(Clone, Copy, PartialEq)]
pub enum AssignmentField {
    Project,
    Company,
}

/// One option of a selection list: record id and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

pub struct AssignmentWizardState {
    projects: Vec<Choice>,
    companies: Vec<Choice>,
    project_list: ListState,
    company_list: ListState,
    pub current_field: AssignmentField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl AssignmentWizardState {
    /// Both selection lists are filled from freshly fetched collections
    /// before the form is shown. Records without an id cannot be assigned.
    pub fn new(projects: &[Project], companies: &[Company]) -> Self {
        let projects = projects
            .iter()
            .filter_map(|p| {
                p.id.map(|id| Choice {
                    id,
                    label: format!("{} ({}, {})", p.name, p.city, p.province),
                })
            })
            .collect();
        let companies = companies
            .iter()
            .map(|c| Choice {
                id: c.id,
                label: format!("{} ({}, {})", c.name, c.city, c.province),
            })
            .collect();

        Self {
            projects,
            companies,
            project_list: ListState::default(),
            company_list: ListState::default(),
            current_field: AssignmentField::Project,
            error: None,
            submitting: false,
        }
    }

    fn focused(&mut self) -> (&mut ListState, usize) {
        match self.current_field {
            AssignmentField::Project => (&mut self.project_list, self.projects.len()),
            AssignmentField::Company => (&mut self.company_list, self.companies.len()),
        }
    }

    pub fn next(&mut self) {
        let (list, len) = self.focused();
        if len == 0 {
            return;
        }
        let i = match list.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        list.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (list, len) = self.focused();
        if len == 0 {
            return;
        }
        let i = match list.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        list.select(Some(i));
    }

    pub fn toggle_field(&mut self) {
        self.current_field = match self.current_field {
            AssignmentField::Project => AssignmentField::Company,
            AssignmentField::Company => AssignmentField::Project,
        };
    }

    pub fn request(&self) -> Result<NewAssignment, String> {
        let project = self.project_list.selected().and_then(|i| self.projects.get(i));
        let company = self.company_list.selected().and_then(|i| self.companies.get(i));
        match (project, company) {
            (Some(project), Some(company)) => Ok(NewAssignment {
                project_id: project.id,
                company_id: company.id,
            }),
            (None, _) => Err("Select a project".to_string()),
            (_, None) => Err("Select a company".to_string()),
        }
    }
}

pub fn render_assignment_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut AssignmentWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);
    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new("Add New Assignment")
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let highlight = Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let border = |field: AssignmentField| {
        if state.current_field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };
    let project_border = border(AssignmentField::Project);
    let company_border = border(AssignmentField::Company);

    let project_items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|c| ListItem::new(c.label.clone()))
        .collect();
    let project_list = List::new(project_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(project_border)
                .title("Project (select...)"),
        )
        .highlight_style(highlight);
    f.render_stateful_widget(project_list, lists[0], &mut state.project_list);

    let company_items: Vec<ListItem> = state
        .companies
        .iter()
        .map(|c| ListItem::new(c.label.clone()))
        .collect();
    let company_list = List::new(company_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(company_border)
                .title("Company (select...)"),
        )
        .highlight_style(highlight);
    f.render_stateful_widget(company_list, lists[1], &mut state.company_list);

    let (notice, color) = match (&state.error, state.submitting) {
        (_, true) => ("Saving assignment...".to_string(), Color::Cyan),
        (Some(error), false) => (error.clone(), Color::Red),
        (None, false) => (String::new(), Color::Gray),
    };
    f.render_widget(
        Paragraph::new(notice)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new("Up/Down - Choose | Tab - Switch list | S - Save assignment | Esc - Cancel")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL)),
        chunks[3],
    );
}

pub fn handle_input(state: &mut AssignmentWizardState, key: KeyEvent) -> Option<AssignmentWizardAction> {
    if state.submitting {
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(AssignmentWizardAction::Cancel),
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => state.toggle_field(),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => match state.request() {
            Ok(assignment) => {
                state.error = None;
                return Some(AssignmentWizardAction::Save(assignment));
            }
            Err(error) => state.error = Some(error),
        },
        _ => {}
    }
    None
}
