use std::time::{Duration, Instant};

use tui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
    backend::Backend,
};

pub const SUCCESS_LIFETIME: Duration = Duration::from_secs(3);
pub const ERROR_LIFETIME: Duration = Duration::from_secs(5);
pub const IMPORT_REPORT_LIFETIME: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// A plain-text message shown in the status area until it expires.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub lines: Vec<String>,
    pub tone: Tone,
    expires_at: Option<Instant>,
}

impl StatusMessage {
    pub fn new(lines: Vec<String>, tone: Tone, lifetime: Option<Duration>) -> Self {
        Self {
            lines,
            tone,
            expires_at: lifetime.map(|l| Instant::now() + l),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()], Tone::Error, Some(ERROR_LIFETIME))
    }

    /// Stays until replaced.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()], Tone::Info, None)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// The dedicated message area of a screen.
#[derive(Debug, Default)]
pub struct StatusBar {
    message: Option<StatusMessage>,
}

impl StatusBar {
    pub fn set(&mut self, message: StatusMessage) {
        self.message = Some(message);
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    #[cfg(test)]
    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn clear_expired(&mut self, now: Instant) {
        if self.message.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.message = None;
        }
    }

    /// Rows needed to show the whole message at `width`, borders included.
    pub fn height(&self, width: u16) -> u16 {
        let Some(message) = &self.message else {
            return 0;
        };
        let inner = width.saturating_sub(2) as usize;
        let rows: usize = message.lines.iter().map(|line| wrapped_rows(line, inner)).sum();
        u16::try_from(rows + 2).unwrap_or(u16::MAX)
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let Some(message) = &self.message else {
            return;
        };
        if area.height == 0 {
            return;
        }

        let color = match message.tone {
            Tone::Info => Color::Cyan,
            Tone::Success => Color::Green,
            Tone::Error => Color::Red,
        };
        let lines: Vec<Spans> = message
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let style = if i == 0 {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };
                Spans::from(Span::styled(line.clone(), style))
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Rows a line takes when word-wrapped to `width` columns.
fn wrapped_rows(line: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    let mut rows = 1;
    let mut used = 0;
    for word in line.split_whitespace() {
        let len = word.chars().count();
        if used == 0 && len <= width {
            used = len;
        } else if used + 1 + len <= width {
            used += 1 + len;
        } else if len <= width {
            rows += 1;
            used = len;
        } else {
            // Words longer than a row are broken across rows.
            if used > 0 {
                rows += 1;
            }
            rows += (len - 1) / width;
            used = (len - 1) % width + 1;
        }
    }
    rows
}
