//! Help overlay rendering.
//!
//! Displays keyboard shortcuts in a modal overlay.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

/// Key binding entry for the help display.
struct KeyBinding {
    key: &'static str,
    description: &'static str,
}

const BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Space / Enter",
        description: "Start, or continue to the next round",
    },
    KeyBinding {
        key: "1-9, a-q",
        description: "Choose the numbered answer",
    },
    KeyBinding {
        key: "r",
        description: "Replay the interval",
    },
    KeyBinding {
        key: "?",
        description: "Toggle this help",
    },
    KeyBinding {
        key: "Esc",
        description: "Quit",
    },
    KeyBinding {
        key: "Ctrl+C",
        description: "Force quit",
    },
];

/// Renders the help overlay on top of the current screen.
pub fn render_help(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacer
            Constraint::Min(3),    // Bindings
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|binding| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<15}", binding.key),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(binding.description, Style::default().fg(Color::White)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[?/Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" Close", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[2],
    );
}
