use tui::{
    style::{Color, Modifier, Style},
    text::{Span, Spans},
};

use crate::models::Assignment;
use crate::pipeline::format;
use crate::ui::record_list::CardTemplate;

impl CardTemplate for Assignment {
    fn card(&self) -> Vec<Spans<'static>> {
        let label = Style::default().fg(Color::Yellow);
        let created = self
            .created_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into());

        vec![
            Spans::from(Span::styled(
                format!("Assignment #{}", self.id),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(vec![
                Span::styled("  Project: ", label),
                Span::raw(format!("{} (#{})", self.project_name, self.project_id)),
                Span::styled("  Company: ", label),
                Span::raw(format!("{} (#{})", self.company_name, self.company_id)),
            ]),
            Spans::from(vec![
                Span::styled("  Location: ", label),
                Span::raw(format!("{}, {}", self.project_city, self.project_province)),
            ]),
            Spans::from(vec![
                Span::styled("  Status: ", label),
                Span::raw(format::status_badge(&self.project_status)),
                Span::styled("  Created: ", label),
                Span::raw(created),
            ]),
        ]
    }

    fn empty_hint() -> &'static str {
        "Assign a company to a project to get started!"
    }

    fn summary(records: &[Self]) -> String {
        format!("Total assignments: {}", records.len())
    }
}
