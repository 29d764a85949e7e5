//! Terminal user interface components.
//!
//! This module renders the quiz: a header with progress and score, the
//! screen for the current phase, and a footer with key hints.

mod help;
mod quiz;

use crate::app::{answer_key_range, App, Phase};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub use help::render_help;
pub use quiz::render_phase;

/// Renders the complete UI.
///
/// The layout is divided into:
/// - Top: title, round progress and running score
/// - Center: the screen for the current phase
/// - Bottom: key hints and status
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Phase screen
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(frame, chunks[0], app);
    render_phase(frame, chunks[1], app);
    render_footer(frame, chunks[2], app);

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let title = match &app.settings().level_name {
        Some(name) => format!(" earwig: {} ", name),
        None => " earwig ".to_string(),
    };

    let round_label = match app.phase() {
        Phase::Intro => format!("{} rounds", session.total()),
        Phase::Summary => "Finished".to_string(),
        _ => format!("Round {}/{}", app.current_index() + 1, session.total()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                round_label,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}/{}", session.correct(), session.answered()),
                Style::default().fg(Color::Green),
            ),
            Span::styled("   Accuracy: ", Style::default().fg(Color::DarkGray)),
            Span::styled(session.accuracy_label(), Style::default().fg(Color::Yellow)),
        ]))
        .block(block),
        area,
    );
}

/// Key hints for the current phase, as (key, description) pairs.
///
/// The answer hint only names keys that select one of `option_count` options.
fn footer_hints(phase: Phase, option_count: usize) -> Vec<(String, &'static str)> {
    let hints: &[(&str, &'static str)] = match phase {
        Phase::Intro => &[("[Space]", " Start  "), ("[?]", " Help  "), ("[Esc]", " Quit")],
        Phase::Listening => &[("", "Listen...")],
        Phase::Answering => {
            return vec![
                (format!("[{}]", answer_key_range(option_count)), " Answer  "),
                ("[r]".to_string(), " Replay  "),
                ("[?]".to_string(), " Help  "),
                ("[Esc]".to_string(), " Quit"),
            ];
        }
        Phase::Feedback { .. } => &[("[Space]", " Continue  "), ("[Esc]", " Quit")],
        Phase::Summary => &[("[Any key]", " Exit")],
    };
    hints
        .iter()
        .map(|(key, description)| (key.to_string(), *description))
        .collect()
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let option_count = app.current_round().map_or(0, |r| r.options.len());
    let mut spans: Vec<Span> = footer_hints(app.phase(), option_count)
        .into_iter()
        .flat_map(|(key, description)| {
            [
                Span::styled(key, Style::default().fg(Color::Yellow)),
                Span::styled(description, Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    if let Some(status) = app.status() {
        spans.push(Span::styled("  | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(status, Style::default().fg(Color::Cyan)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

/// Returns a rectangle of the given percentage size, centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);

    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, Settings};
    use crate::trainer::generate_with_seed;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::path::PathBuf;

    fn make_app() -> App {
        let overrides = Overrides {
            soundfont: Some(PathBuf::from("test.sf2")),
            intervals: Some("m2,A4".to_string()),
            rounds: Some(2),
            ..Default::default()
        };
        let settings = Settings::resolve(&overrides, None).unwrap();
        let rounds = generate_with_seed(&settings.session, 3).unwrap();
        App::new(settings, rounds)
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_intro() {
        let app = make_app();
        let text = screen_text(&app);
        assert!(text.contains("press SPACE to start"));
        assert!(text.contains("2 rounds"));
    }

    #[test]
    fn test_render_question_lists_options() {
        use crossterm::event::{KeyCode, KeyModifiers};

        let mut app = make_app();
        app.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(screen_text(&app).contains("now hearing the interval"));

        app.playback_finished();
        let text = screen_text(&app);
        assert!(text.contains("what interval did you just hear?"));
        assert!(text.contains("1. minor second"));
        assert!(text.contains("2. augmented fourth"));
        assert!(text.contains("Round 1/2"));
        assert!(text.contains("[1-2] Answer"));
        assert!(!text.contains("a-q"));
    }

    #[test]
    fn test_footer_hint_matches_option_count() {
        let hint = |count| footer_hints(Phase::Answering, count)[0].0.clone();
        assert_eq!(hint(2), "[1-2]");
        assert_eq!(hint(12), "[1-9/a-c]");
        assert_eq!(hint(26), "[1-9/a-q]");
        assert_eq!(footer_hints(Phase::Intro, 0)[0].0, "[Space]");
    }

    #[test]
    fn test_render_help_overlay() {
        let mut app = make_app();
        app.show_help = true;
        assert!(screen_text(&app).contains("Replay the interval"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, area);
        assert_eq!(inner, Rect::new(25, 10, 50, 20));
    }
}
