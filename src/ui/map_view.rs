use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

use crate::error::AtlasResult;
use crate::models::{Project, PROJECT_STATUSES, PROVINCES};
use crate::pipeline::{elapsed, filter, format, Collection, Criteria, FetchOutcome, FetchTicket};
use crate::ui::components::{status::StatusBar, text_input::TextInput};

// Longitude/latitude window around Canada.
const X_BOUNDS: [f64; 2] = [-141.0, -52.0];
const Y_BOUNDS: [f64; 2] = [41.0, 84.0];

/// Glyph and colour of a map marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerIcon {
    pub glyph: &'static str,
    pub color: Color,
}

pub const DEFAULT_MARKER: MarkerIcon = MarkerIcon {
    glyph: "■",
    color: Color::Gray,
};

pub fn marker_icon(status: &str) -> MarkerIcon {
    match status {
        "Planned" => MarkerIcon {
            glyph: "◆",
            color: Color::Yellow,
        },
        "In-Progress" => MarkerIcon {
            glyph: "●",
            color: Color::LightBlue,
        },
        "Completed" => MarkerIcon {
            glyph: "✔",
            color: Color::Green,
        },
        _ => DEFAULT_MARKER,
    }
}

pub enum MapAction {
    Quit,
    Refresh,
}

pub struct MapViewState {
    pub collection: Collection<Project>,
    pub criteria: Criteria,
    pub budget: TextInput,
    pub status: StatusBar,
    /// Index into [`MapViewState::markers`].
    selected: Option<usize>,
    source: String,
    today: NaiveDate,
}

impl MapViewState {
    pub fn new(source: String, today: NaiveDate) -> Self {
        Self {
            collection: Collection::new(),
            criteria: Criteria::default(),
            budget: TextInput::numeric(),
            status: StatusBar::default(),
            selected: None,
            source,
            today,
        }
    }

    /// Filtered records that can be placed, with their coordinates.
    pub fn markers(&self) -> Vec<(&Project, (f64, f64))> {
        filter::apply(self.collection.records(), &self.criteria)
            .into_iter()
            .filter_map(|project| project.coordinates().map(|at| (project, at)))
            .collect()
    }

    pub fn selected(&self) -> Option<&Project> {
        let markers = self.markers();
        self.selected.and_then(|i| markers.get(i)).map(|(project, _)| *project)
    }

    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: AtlasResult<Vec<Project>>) -> FetchOutcome {
        let outcome = self.collection.complete(ticket, result);
        if let FetchOutcome::Installed(_) = outcome {
            self.clamp_selection();
        }
        outcome
    }

    fn clamp_selection(&mut self) {
        let len = self.markers().len();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
    }

    fn select_next(&mut self, forward: bool) {
        let len = self.markers().len();
        if len == 0 {
            return;
        }
        self.selected = Some(match (self.selected, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        });
    }

    fn apply_budget_input(&mut self) {
        self.criteria.set_min_budget_text(&self.budget.value);
        self.clamp_selection();
    }

    /// Field lines of the popup for the selected marker.
    pub fn popup_lines(&self, project: &Project) -> Vec<Spans<'static>> {
        let label = Style::default().fg(Color::Yellow);
        let field = |name: &str, value: String| {
            Spans::from(vec![Span::styled(format!("{name}: "), label), Span::raw(value)])
        };

        let planned = match project.planned_date() {
            Some(date) => format!(
                "{} ({})",
                date.format("%Y-%m-%d"),
                elapsed::describe(date, self.today)
            ),
            None => "Unknown".to_string(),
        };

        let mut lines = vec![
            Spans::from(Span::styled(
                project.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            field("Status", project.status.clone()),
            field("Province", project.province.clone()),
            field("City", project.city.clone()),
            field("Budget", format::currency(project.budget, 0)),
            field("Planned", planned),
        ];
        if let Some(description) = &project.description {
            lines.push(field("Description", description.clone()));
        }
        if let Some(reason) = &project.reason {
            lines.push(field("Reason", reason.clone()));
        }
        lines
    }
}

pub fn render_map_view<B: Backend>(frame: &mut Frame<B>, state: &MapViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(state.status.height(frame.size().width)),
            Constraint::Length(1),
        ])
        .split(frame.size());

    frame.render_widget(Paragraph::new(filter_line(state)), chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_canvas(frame, body[0], state);
    render_popup(frame, body[1], state);

    state.status.render(frame, chunks[2]);

    let help = "<Left/Right> Select | <P> Province | <S> Status | <B> Min budget | <C> Clear | <R> Refresh | <Q> Quit";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::Gray)),
        chunks[3],
    );
}

fn render_canvas<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &MapViewState) {
    let markers = state.markers();
    let title = if state.collection.is_loading() {
        format!("Projects: {} (loading...)", state.source)
    } else {
        format!("Projects: {} ({} on map)", state.source, markers.len())
    };

    let canvas = Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_bounds(X_BOUNDS)
        .y_bounds(Y_BOUNDS)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for (i, (project, (lat, lon))) in markers.iter().enumerate() {
                let icon = marker_icon(&project.status);
                let mut style = Style::default().fg(icon.color);
                if state.selected == Some(i) {
                    style = style.bg(Color::White).add_modifier(Modifier::BOLD);
                }
                ctx.print(*lon, *lat, Span::styled(icon.glyph, style));
            }
        });
    frame.render_widget(canvas, area);
}

fn render_popup<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &MapViewState) {
    let block = Block::default().title("Details").borders(Borders::ALL);
    let lines = match state.selected() {
        Some(project) => state.popup_lines(project),
        None if state.collection.is_empty() => vec![Spans::from("No projects loaded")],
        None => vec![Spans::from("No project selected")],
    };
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn filter_line(state: &MapViewState) -> Spans<'static> {
    let label = Style::default().fg(Color::Yellow);
    let all = |value: &Option<String>| value.clone().unwrap_or_else(|| "All".into());
    let budget = if state.budget.editing || !state.budget.value.is_empty() {
        format!("{}B", state.budget.get_display_string())
    } else {
        "-".into()
    };

    Spans::from(vec![
        Span::styled(" Province: ", label),
        Span::raw(all(&state.criteria.province)),
        Span::styled("  Status: ", label),
        Span::raw(all(&state.criteria.status)),
        Span::styled("  Min budget: ", label),
        Span::raw(budget),
    ])
}

pub fn handle_input(state: &mut MapViewState, key: KeyEvent) -> Option<MapAction> {
    if state.budget.editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.budget.toggle_editing(),
            code => {
                if state.budget.handle_input(code) {
                    state.apply_budget_input();
                }
            }
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(MapAction::Quit),
        KeyCode::Char('r') => return Some(MapAction::Refresh),
        KeyCode::Char('p') => {
            state.criteria.province = filter::cycle(&state.criteria.province, &PROVINCES);
            state.clamp_selection();
        }
        KeyCode::Char('s') => {
            state.criteria.status = filter::cycle(&state.criteria.status, &PROJECT_STATUSES);
            state.clamp_selection();
        }
        KeyCode::Char('b') => state.budget.toggle_editing(),
        KeyCode::Char('c') => {
            state.criteria = Criteria::default();
            state.budget.clear();
            state.clamp_selection();
        }
        KeyCode::Right | KeyCode::Down | KeyCode::Tab => state.select_next(true),
        KeyCode::Left | KeyCode::Up | KeyCode::BackTab => state.select_next(false),
        _ => {}
    }
    None
}
