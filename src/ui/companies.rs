use tui::{
    style::{Color, Modifier, Style},
    text::{Span, Spans},
};

use crate::models::Company;
use crate::ui::record_list::CardTemplate;

impl CardTemplate for Company {
    fn card(&self) -> Vec<Spans<'static>> {
        let label = Style::default().fg(Color::Yellow);

        let mut lines = vec![
            Spans::from(Span::styled(
                self.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(vec![
                Span::styled("  Province: ", label),
                Span::raw(self.province.clone()),
                Span::styled("  City: ", label),
                Span::raw(self.city.clone()),
            ]),
        ];

        // Contact details only when the company has them
        let mut contact = Vec::new();
        if let Some(email) = &self.email {
            contact.push(Span::styled("  Email: ", label));
            contact.push(Span::raw(email.clone()));
        }
        if let Some(number) = &self.number {
            contact.push(Span::styled("  Phone: ", label));
            contact.push(Span::raw(number.clone()));
        }
        if !contact.is_empty() {
            lines.push(Spans::from(contact));
        }

        lines.push(Spans::from(vec![
            Span::styled("  ID: ", label),
            Span::raw(self.id.to_string()),
        ]));
        lines
    }

    fn empty_hint() -> &'static str {
        "Add a new company to get started!"
    }

    fn summary(records: &[Self]) -> String {
        format!("Total companies: {}", records.len())
    }
}
