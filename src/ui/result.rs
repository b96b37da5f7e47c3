use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::engine::LevelRecord;
use crate::shuffle::OptionShuffler;

const TITLE_PREVIEW_LENGTH: usize = 40;

pub fn render<S: OptionShuffler>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_level_summary(frame, chunks[1], app);
    render_history(frame, chunks[2], app.session().history(), app.result_scroll());
    render_total(frame, chunks[3], app);
    super::render_status(frame, chunks[4], app.status());
    super::render_controls(frame, chunks[5], controls(app));
}

fn render_level_summary<S: OptionShuffler>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();
    let title = app.current_level().map(|l| l.title()).unwrap_or_default();
    let Some(result) = session.level_result() else {
        return;
    };

    let (verdict, color) = if session.is_complete() {
        ("You've completed all levels! Well done!".to_string(), Color::Green)
    } else if result.passed {
        (format!("Congratulations! You passed {title}."), Color::Green)
    } else {
        (
            "You did not pass this level. Review the answers and try again.".to_string(),
            Color::Red,
        )
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}", result.score, result.out_of),
            Style::default().fg(color).bold(),
        )),
        Line::from(Span::styled(verdict, Style::default().fg(color))),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_history(frame: &mut Frame, area: Rect, history: &[LevelRecord], scroll: usize) {
    let lines: Vec<Line> = history
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let (symbol, color) = if record.result.passed {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            Line::from(vec![
                Span::styled(format!(" {symbol} "), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate_title(&record.level),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  {} / {}", record.result.score, record.result.out_of),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(widget, area);
}

fn render_total<S: OptionShuffler>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();
    if !session.final_score_available() {
        return;
    }

    let widget = Paragraph::new(Span::styled(
        format!(
            "Your total score: {} / {}",
            session.total_score(),
            app.engine().total_possible()
        ),
        Style::default().fg(Color::Cyan).bold(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn controls<S: OptionShuffler>(app: &App<S>) -> &'static str {
    let session = app.session();
    if session.is_complete() {
        "j/k scroll  ·  R restart  ·  q quit"
    } else if session.level_passed() {
        "n next level  ·  j/k scroll  ·  R restart  ·  q quit"
    } else {
        "r retry  ·  j/k scroll  ·  R restart  ·  q quit"
    }
}

fn truncate_title(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > TITLE_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(TITLE_PREVIEW_LENGTH).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}
