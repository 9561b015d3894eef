use tui::{
    style::{Color, Modifier, Style},
    text::{Span, Spans},
};

use crate::models::Project;
use crate::pipeline::{format, Summary};
use crate::ui::record_list::CardTemplate;

pub fn status_color(status: &str) -> Color {
    match status {
        "Planned" => Color::Yellow,
        "In-Progress" => Color::Blue,
        "Completed" => Color::Green,
        _ => Color::Gray,
    }
}

impl CardTemplate for Project {
    fn card(&self) -> Vec<Spans<'static>> {
        let label = Style::default().fg(Color::Yellow);
        let id = self.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());

        vec![
            Spans::from(Span::styled(
                self.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(vec![
                Span::styled("  Budget: ", label),
                Span::raw(format::currency(self.budget, 2)),
            ]),
            Spans::from(vec![
                Span::styled("  Province: ", label),
                Span::raw(self.province.clone()),
                Span::styled("  City: ", label),
                Span::raw(self.city.clone()),
                Span::styled("  ID: ", label),
                Span::raw(id),
            ]),
            Spans::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", format::status_badge(&self.status)),
                    Style::default().fg(status_color(&self.status)),
                ),
            ]),
        ]
    }

    fn empty_hint() -> &'static str {
        "Add a new project to get started!"
    }

    fn summary(records: &[Self]) -> String {
        let summary = Summary::of(records, |p| p.budget);
        format!(
            "Total projects: {}   Total budget: {}   Average budget: {}",
            summary.count,
            format::currency(summary.total, 2),
            format::currency(summary.average, 2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tui::{backend::TestBackend, Terminal};

    use crate::models::RecordKind;
    use crate::ui::record_list::{handle_input, render_record_list, ListAction, RecordListState};

    fn project(id: i64, name: &str, province: &str, budget: f64) -> Project {
        Project {
            id: Some(id),
            name: name.into(),
            status: "In-Progress".into(),
            province: province.into(),
            city: "Toronto".into(),
            budget,
            latitude: None,
            longitude: None,
            description: None,
            reason: None,
            planned_date: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(records: Vec<Project>) -> RecordListState<Project> {
        let mut state = RecordListState::new();
        let ticket = state.collection.begin_fetch();
        state.complete_fetch(ticket, Ok(records));
        state
    }

    fn screen_text(state: &mut RecordListState<Project>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_record_list(f, area, state);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    #[test]
    fn summary_ignores_active_filters() {
        let mut state = loaded(vec![
            project(1, "A", "Ontario", 100.0),
            project(2, "B", "Quebec", 300.0),
            project(3, "C", "Ontario", 200.0),
        ]);
        state.criteria.province = Some("Quebec".into());

        assert_eq!(state.visible().len(), 1);
        assert_eq!(
            state.summary(),
            "Total projects: 3   Total budget: $600.00   Average budget: $200.00"
        );
    }

    #[test]
    fn renders_cards_and_empty_state() {
        let mut state = loaded(vec![project(7, "Ontario Line", "Ontario", 19e9)]);
        let text = screen_text(&mut state);
        assert!(text.contains("Ontario Line"));
        assert!(text.contains("$19,000,000,000.00"));
        assert!(text.contains("[IN PROGRESS]"));

        state.criteria.search = "nothing matches".into();
        let text = screen_text(&mut state);
        assert!(text.contains("No projects found"));
        assert!(text.contains("Add a new project to get started!"));
    }

    #[test]
    fn delete_requires_confirmation_naming_the_record() {
        let mut state = loaded(vec![project(7, "Ontario Line", "Ontario", 19e9)]);

        assert!(handle_input(&mut state, key(KeyCode::Char('d'))).is_none());
        assert!(state.is_confirming());
        assert!(screen_text(&mut state).contains("Delete \"Ontario Line\"?"));

        match handle_input(&mut state, key(KeyCode::Char('y'))) {
            Some(ListAction::Delete { kind, id }) => {
                assert_eq!(kind, RecordKind::Project);
                assert_eq!(id, 7);
            }
            _ => panic!("expected a delete action"),
        }
        assert!(!state.is_confirming());
    }

    #[test]
    fn declined_confirmation_changes_nothing() {
        let mut state = loaded(vec![project(7, "Ontario Line", "Ontario", 19e9)]);

        handle_input(&mut state, key(KeyCode::Char('d')));
        assert!(handle_input(&mut state, key(KeyCode::Char('n'))).is_none());

        assert!(!state.is_confirming());
        assert_eq!(state.collection.len(), 1);
        assert_eq!(state.selected().map(|p| p.id), Some(Some(7)));
    }

    #[test]
    fn typing_a_search_narrows_the_selection() {
        let mut state = loaded(vec![
            project(1, "Eglinton Crosstown", "Ontario", 1.0),
            project(2, "Site C", "British Columbia", 1.0),
        ]);
        state.next();
        assert_eq!(state.selected().map(|p| p.name.as_str()), Some("Site C"));

        handle_input(&mut state, key(KeyCode::Char('/')));
        for c in "eglin".chars() {
            handle_input(&mut state, key(KeyCode::Char(c)));
        }
        handle_input(&mut state, key(KeyCode::Enter));

        assert!(!state.is_searching());
        assert_eq!(state.selected().map(|p| p.name.as_str()), Some("Eglinton Crosstown"));
    }

    #[test]
    fn budget_key_filters_by_minimum_in_billions() {
        let mut state = loaded(vec![
            project(1, "Eglinton Crosstown", "Ontario", 1.5e9),
            project(2, "Ontario Line", "Ontario", 19e9),
        ]);

        handle_input(&mut state, key(KeyCode::Char('b')));
        assert!(state.is_editing_budget());
        // Letters are rejected and other shortcuts are not triggered while typing.
        assert!(handle_input(&mut state, key(KeyCode::Char('q'))).is_none());
        handle_input(&mut state, key(KeyCode::Char('2')));
        handle_input(&mut state, key(KeyCode::Enter));

        assert!(!state.is_editing_budget());
        assert_eq!(state.criteria.min_budget_billions, Some(2.0));
        let names: Vec<_> = state.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ontario Line"]);
        let text = screen_text(&mut state);
        assert!(text.contains("Min budget: 2B"));
        assert!(text.contains("<B> Min budget"));

        handle_input(&mut state, key(KeyCode::Char('c')));
        assert_eq!(state.visible().len(), 2);
        assert!(screen_text(&mut state).contains("Min budget: -"));
    }

    #[test]
    fn province_key_cycles_through_provinces() {
        let mut state = loaded(vec![project(1, "A", "Alberta", 1.0), project(2, "B", "Ontario", 1.0)]);

        handle_input(&mut state, key(KeyCode::Char('p')));

        assert_eq!(state.criteria.province.as_deref(), Some("Alberta"));
        assert_eq!(state.visible().len(), 1);
    }
}
