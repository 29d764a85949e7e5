//! Phase screens: intro, listening, question, feedback and summary.

use crate::app::{answer_key, App, Phase};
use crate::trainer::Round;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Renders the body screen for the app's current phase.
pub fn render_phase(frame: &mut Frame, area: Rect, app: &App) {
    let lines = match app.phase() {
        Phase::Intro => intro_lines(app),
        Phase::Listening => listening_lines(app),
        Phase::Answering => app
            .current_round()
            .map(|round| question_lines(round, None))
            .unwrap_or_default(),
        Phase::Feedback { chosen } => app
            .current_round()
            .map(|round| question_lines(round, Some(chosen)))
            .unwrap_or_default(),
        Phase::Summary => summary_lines(app),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// Label for an option, e.g. "1. minor second".
fn option_label(round: &Round, position: usize) -> String {
    let key = answer_key(position).unwrap_or('?');
    format!("{}. {}", key, round.options[position].code.display_name())
}

fn intro_lines(app: &App) -> Vec<Line<'static>> {
    let settings = app.settings();
    let session = &settings.session;
    let intervals = session
        .interval_codes()
        .iter()
        .map(|c| c.display_name())
        .collect::<Vec<_>>()
        .join(", ");

    let mut directions = Vec::new();
    if session.allow_ascending() || !session.allow_descending() {
        directions.push("ascending");
    }
    if session.allow_descending() {
        directions.push("descending");
    }
    let mut styles = Vec::new();
    if session.allow_melodic() || !session.allow_harmonic() {
        styles.push("melodic");
    }
    if session.allow_harmonic() {
        styles.push("harmonic");
    }

    let detail = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "Interval ear training",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!("Intervals: {}", intervals), detail)),
        Line::from(Span::styled(
            format!("Directions: {}", directions.join(", ")),
            detail,
        )),
        Line::from(Span::styled(format!("Playback: {}", styles.join(", ")), detail)),
        Line::from(""),
        Line::from(Span::styled(
            "press SPACE to start...",
            Style::default().fg(Color::Yellow),
        )),
    ]
}

fn listening_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "now hearing the interval",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(round) = app.current_round() {
        lines.push(Line::from(Span::styled(
            format!("({}, {})", round.direction.label(), round.style.label()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn question_lines(round: &Round, chosen: Option<usize>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "what interval did you just hear?",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for position in 0..round.options.len() {
        let style = match chosen {
            Some(_) if round.is_correct(position) => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Some(c) if c == position => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::White),
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", option_label(round, position)),
            style,
        )));
    }

    if let Some(chosen) = chosen {
        lines.push(Line::from(""));
        let correct = round.correct_option();
        let reveal = format!(
            "{} -> {}",
            correct.pitch_pair.0, correct.pitch_pair.1
        );
        if round.is_correct(chosen) {
            lines.push(Line::from(vec![
                Span::styled(
                    "correct! ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(reveal, Style::default().fg(Color::DarkGray)),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(
                        "the correct answer is {} ",
                        option_label(round, round.correct_answer_index)
                    ),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(reveal, Style::default().fg(Color::DarkGray)),
            ]));
        }
        lines.push(Line::from(Span::styled(
            "press SPACE to continue...",
            Style::default().fg(Color::Yellow),
        )));
    }

    lines
}

fn summary_lines(app: &App) -> Vec<Line<'static>> {
    let session = app.session();
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("your accuracy is {}", session.accuracy_label()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} of {} rounds correct",
                session.correct(),
                session.total()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}
