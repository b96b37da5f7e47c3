use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::engine::QuestionState;
use crate::shuffle::OptionShuffler;

pub fn render<S: OptionShuffler>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], app);
    render_progress(frame, chunks[1], app);

    if let Some(question) = app.current_question() {
        render_prompt(frame, chunks[2], question.prompt());
        render_options(frame, chunks[3], question, app.option_cursor());
    }

    super::render_status(frame, chunks[4], app.status());
    super::render_controls(
        frame,
        chunks[5],
        "j/k option  ·  tab question  ·  space select  ·  s submit  ·  R restart  ·  q quit",
    );
}

fn render_header<S: OptionShuffler>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let title = app.current_level().map(|l| l.title()).unwrap_or_default();
    let session = app.session();

    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Length(28)]).split(area);

    let level = Paragraph::new(Span::styled(
        format!("Current Level: {title}"),
        Style::default().fg(Color::Cyan).bold(),
    ))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(level, columns[0]);

    let score = Paragraph::new(format!(
        "attempt {}  ·  score {}",
        session.attempts(),
        session.cumulative_score()
    ))
    .alignment(Alignment::Right)
    .fg(Color::DarkGray)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(score, columns[1]);
}

fn render_progress<S: OptionShuffler>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let session = app.session();
    let total = session.questions().len();
    let markers: Vec<Span> = session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let symbol = if question.answer().is_answered() { "●" } else { "○" };
            let style = if index == app.question_cursor() {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!("{symbol} "), style)
        })
        .collect();

    let mut spans = markers;
    spans.push(Span::styled(
        format!(" {}/{}", app.question_cursor() + 1, total),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        area,
    );
}

fn render_prompt(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &QuestionState, cursor: usize) {
    let selected = question.selected_index();
    let mut lines: Vec<Line> = Vec::with_capacity(question.labels().len() * 2);

    for (index, label) in question.labels().iter().enumerate() {
        let is_cursor = index == cursor;
        let is_selected = selected == Some(index);
        let style = match (is_cursor, is_selected) {
            (true, _) => Style::default().fg(Color::Cyan).bold(),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_cursor { ">" } else { " " };
        let radio = if is_selected { "(•)" } else { "( )" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{radio} "), style),
            Span::styled(label.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
