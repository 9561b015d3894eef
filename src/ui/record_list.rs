use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::error::AtlasResult;
use crate::models::{Record, RecordKind, PROJECT_STATUSES, PROVINCES};
use crate::pipeline::{filter, Collection, Criteria, Criterion, FetchOutcome, FetchTicket, Filterable};
use crate::ui::components::popup::render_delete_confirmation;
use crate::ui::components::text_input::TextInput;

/// Per-kind presentation of one record in the admin lists.
pub trait CardTemplate: Record + Filterable {
    fn card(&self) -> Vec<Spans<'static>>;

    /// Second line of the empty state.
    fn empty_hint() -> &'static str;

    /// Statistics over the whole, unfiltered collection.
    fn summary(records: &[Self]) -> String;
}

pub enum ListAction {
    Quit,
    SwitchTab(RecordKind),
    Refresh,
    NewRecord,
    Import,
    Delete { kind: RecordKind, id: i64 },
}

struct PendingDelete {
    id: i64,
    prompt: String,
}

/// State of one admin tab: its own collection, filter controls and
/// selection.
pub struct RecordListState<R> {
    pub collection: Collection<R>,
    pub criteria: Criteria,
    summary: String,
    list_state: ListState,
    searching: bool,
    /// Minimum budget in billions, typed in place.
    budget: TextInput,
    pending_delete: Option<PendingDelete>,
}

impl<R: CardTemplate> Default for RecordListState<R> {
    fn default() -> Self {
        Self {
            collection: Collection::new(),
            criteria: Criteria::default(),
            summary: R::summary(&[]),
            list_state: ListState::default(),
            searching: false,
            budget: TextInput::numeric(),
            pending_delete: None,
        }
    }
}

impl<R: CardTemplate> RecordListState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records passing the current filter, in collection order.
    pub fn visible(&self) -> Vec<&R> {
        filter::apply(self.collection.records(), &self.criteria)
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Apply a fetch result; statistics are recomputed on every install.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: AtlasResult<Vec<R>>) -> FetchOutcome {
        let outcome = self.collection.complete(ticket, result);
        if let FetchOutcome::Installed(_) = outcome {
            self.summary = R::summary(self.collection.records());
            self.clamp_selection();
        }
        outcome
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&R> {
        self.list_state.selected().and_then(|i| self.visible().get(i).copied())
    }

    pub fn is_confirming(&self) -> bool {
        self.pending_delete.is_some()
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_editing_budget(&self) -> bool {
        self.budget.editing
    }

    fn supports(criterion: Criterion) -> bool {
        R::CRITERIA.contains(&criterion)
    }
}

pub fn handle_input<R: CardTemplate>(state: &mut RecordListState<R>, key: KeyEvent) -> Option<ListAction> {
    if let Some(pending) = &state.pending_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let id = pending.id;
                state.pending_delete = None;
                return Some(ListAction::Delete { kind: R::KIND, id });
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.pending_delete = None;
            }
            _ => {}
        }
        return None;
    }

    if state.searching {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.searching = false,
            KeyCode::Char(c) => state.criteria.search.push(c),
            KeyCode::Backspace => {
                state.criteria.search.pop();
            }
            _ => {}
        }
        state.clamp_selection();
        return None;
    }

    if state.budget.editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.budget.toggle_editing(),
            code => {
                if state.budget.handle_input(code) {
                    state.criteria.set_min_budget_text(&state.budget.value);
                    state.clamp_selection();
                }
            }
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ListAction::Quit),
        KeyCode::Char('1') => return Some(ListAction::SwitchTab(RecordKind::Project)),
        KeyCode::Char('2') => return Some(ListAction::SwitchTab(RecordKind::Company)),
        KeyCode::Char('3') => return Some(ListAction::SwitchTab(RecordKind::Assignment)),
        KeyCode::Char('r') => return Some(ListAction::Refresh),
        KeyCode::Char('n') => return Some(ListAction::NewRecord),
        KeyCode::Char('i') if R::KIND == RecordKind::Project => return Some(ListAction::Import),
        KeyCode::Char('d') => {
            let target = state
                .selected()
                .and_then(|record| record.id().map(|id| (id, record.delete_prompt())));
            if let Some((id, prompt)) = target {
                state.pending_delete = Some(PendingDelete { id, prompt });
            }
        }
        KeyCode::Char('/') if RecordListState::<R>::supports(Criterion::Search) => {
            state.searching = true;
        }
        KeyCode::Char('p') if RecordListState::<R>::supports(Criterion::Province) => {
            state.criteria.province = filter::cycle(&state.criteria.province, &PROVINCES);
            state.clamp_selection();
        }
        KeyCode::Char('s') if RecordListState::<R>::supports(Criterion::Status) => {
            state.criteria.status = filter::cycle(&state.criteria.status, &PROJECT_STATUSES);
            state.clamp_selection();
        }
        KeyCode::Char('b') if RecordListState::<R>::supports(Criterion::MinBudget) => {
            state.budget.toggle_editing();
        }
        KeyCode::Char('c') => {
            state.criteria = Criteria::default();
            state.budget.clear();
            state.clamp_selection();
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

pub fn render_record_list<B: Backend, R: CardTemplate>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &mut RecordListState<R>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let stats = Paragraph::new(state.summary().to_string())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    frame.render_widget(stats, chunks[0]);

    frame.render_widget(Paragraph::new(filter_line(state)), chunks[1]);

    let kind = R::KIND;
    let visible = state.visible();
    let title = if state.collection.is_loading() {
        format!("{} (loading...)", kind.title())
    } else {
        format!("{} ({} of {})", capitalized(kind.plural()), visible.len(), state.collection.len())
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if visible.is_empty() {
        let empty = if state.collection.is_loading() {
            Paragraph::new("Loading...")
        } else {
            Paragraph::new(vec![
                Spans::from(Span::styled(
                    format!("No {} found", kind.plural()),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Spans::from(R::empty_hint()),
            ])
        };
        frame.render_widget(empty.block(block), chunks[2]);
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|record| {
                let mut lines = record.card();
                lines.push(Spans::from(""));
                ListItem::new(Text::from(lines))
            })
            .collect();
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, chunks[2], &mut state.list_state);
    }

    let help = if state.is_confirming() {
        "<Y> Yes | <N> No".to_string()
    } else if state.is_searching() {
        "Type to search | <Enter> Done".to_string()
    } else if state.is_editing_budget() {
        "Type a minimum budget in billions | <Enter> Done".to_string()
    } else {
        let mut help = String::from("<N> New | <D> Delete | </> Search");
        if RecordListState::<R>::supports(Criterion::Province) {
            help.push_str(" | <P> Province");
        }
        if RecordListState::<R>::supports(Criterion::Status) {
            help.push_str(" | <S> Status");
        }
        if RecordListState::<R>::supports(Criterion::MinBudget) {
            help.push_str(" | <B> Min budget");
        }
        if kind == RecordKind::Project {
            help.push_str(" | <I> Import");
        }
        help.push_str(" | <C> Clear | <R> Refresh | <1-3> Tabs | <Q> Quit");
        help
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::Gray)),
        chunks[3],
    );

    if let Some(pending) = &state.pending_delete {
        render_delete_confirmation(frame, &pending.prompt);
    }
}

fn filter_line<R: CardTemplate>(state: &RecordListState<R>) -> Spans<'static> {
    let label = Style::default().fg(Color::Yellow);
    let mut spans = Vec::new();

    let search = if state.searching {
        format!("{}|", state.criteria.search)
    } else if !state.criteria.is_active(Criterion::Search) {
        "-".to_string()
    } else {
        state.criteria.search.clone()
    };
    spans.push(Span::styled(" Search: ", label));
    spans.push(Span::raw(search));

    if RecordListState::<R>::supports(Criterion::Province) {
        spans.push(Span::styled("  Province: ", label));
        spans.push(Span::raw(state.criteria.province.clone().unwrap_or_else(|| "All".into())));
    }
    if RecordListState::<R>::supports(Criterion::Status) {
        spans.push(Span::styled("  Status: ", label));
        spans.push(Span::raw(state.criteria.status.clone().unwrap_or_else(|| "All".into())));
    }
    if RecordListState::<R>::supports(Criterion::MinBudget) {
        let budget = if state.budget.editing || !state.budget.value.is_empty() {
            format!("{}B", state.budget.get_display_string())
        } else {
            "-".into()
        };
        spans.push(Span::styled("  Min budget: ", label));
        spans.push(Span::raw(budget));
    }
    Spans::from(spans)
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
