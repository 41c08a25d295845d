use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use spelldrill::{session::SessionReport, submission::SubmissionSource};
use unicode_width::UnicodeWidthChar;

use crate::{App, Source};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const MISSED_PANEL_WIDTH: u16 = 30;
const MAX_SUBLIST_ROWS: u16 = 8;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let running = self.is_running();

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(20), Constraint::Length(MISSED_PANEL_WIDTH)])
            .split(area);

        let selector_height = match &self.source {
            Source::Topic(_) => 3,
            Source::Catalog { labels, .. } => sublist_rows(labels.len()) + 2,
        };
        let definition_height = if self.has_definitions() { 4 } else { 0 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(selector_height),
                Constraint::Length(1), // stats
                Constraint::Length(3), // spelling field
                Constraint::Min(3),    // status
                Constraint::Length(definition_height),
                Constraint::Length(1), // help
            ])
            .split(columns[0]);

        render_selector(self, running, rows[0], buf);
        render_stats(self, rows[1], buf);
        render_spelling(self, running, rows[2], buf);
        render_status(self, running, rows[3], buf);

        if self.has_definitions() {
            Paragraph::new(self.view.definition.as_str())
                .style(Style::default().fg(Color::Blue))
                .wrap(Wrap { trim: true })
                .render(rows[4], buf);
        }

        let help = if running {
            "(esc) stop | (ctrl+c) quit"
        } else if let Source::Catalog { .. } = self.source {
            "(↑/↓) choose | (enter) start | (esc) quit"
        } else {
            "(enter) start | (esc) quit"
        };
        Paragraph::new(help)
            .style(
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .render(rows[5], buf);

        render_missed(self, columns[1], buf);
    }
}

fn render_selector(app: &App, running: bool, area: Rect, buf: &mut Buffer) {
    let dim = if running {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    match &app.source {
        Source::Topic(_) => {
            let inner_width = area.width.saturating_sub(3) as usize;
            let mut text = tail_to_width(&app.topic, inner_width).to_string();
            if !running {
                text.push('▏');
            }
            Paragraph::new(text)
                .style(dim)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("📝 Enter a Topic or Word"),
                )
                .render(area, buf);
        }
        Source::Catalog {
            labels, selected, ..
        } => {
            let visible = area.height.saturating_sub(2) as usize;
            let offset = (selected + 1).saturating_sub(visible);
            let lines: Vec<Line> = labels
                .iter()
                .enumerate()
                .skip(offset)
                .take(visible)
                .map(|(idx, label)| {
                    if idx == *selected {
                        Line::from(Span::styled(
                            format!("▶ {label}"),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ))
                    } else {
                        Line::from(format!("  {label}"))
                    }
                })
                .collect();

            Paragraph::new(lines)
                .style(dim)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("📚 Choose a Sublist"),
                )
                .render(area, buf);
        }
    }
}

fn render_stats(app: &App, area: Rect, buf: &mut Buffer) {
    let stats = &app.view.stats;
    let line = Line::from(vec![
        Span::styled(
            format!("✅ Correct: {:<6}", stats.correct),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("❌ Incorrect: {:<6}", stats.incorrect),
            Style::default().fg(Color::Red),
        ),
        Span::raw(format!("🔁 Remaining: {}", stats.remaining())),
    ]);
    Paragraph::new(line).render(area, buf);
}

fn render_spelling(app: &App, running: bool, area: Rect, buf: &mut Buffer) {
    let inner_width = area.width.saturating_sub(3) as usize;
    let typed = app.submission.current();
    let mut text = tail_to_width(&typed, inner_width).to_string();

    let style = if running {
        text.push('▏');
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("✍️ Spelling"))
        .render(area, buf);
}

fn render_status(app: &App, running: bool, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::from(Span::styled(
        app.view.status.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if let (false, Some(report)) = (running, &app.view.report) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            summary_line(report),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_missed(app: &App, area: Rect, buf: &mut Buffer) {
    let lines: Vec<Line> = app
        .view
        .missed
        .iter()
        .map(|word| Line::from(word.as_str()))
        .collect();

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    "❗ Misspelled Words",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .render(area, buf);
}

/// Selector rows for `count` sublists, at least one and at most `MAX_SUBLIST_ROWS`.
fn sublist_rows(count: usize) -> u16 {
    u16::try_from(count.clamp(1, MAX_SUBLIST_ROWS as usize)).unwrap_or(MAX_SUBLIST_ROWS)
}

fn summary_line(report: &SessionReport) -> String {
    let elapsed = report.elapsed();
    let time = format!(
        "{}m {:02}s",
        elapsed.num_minutes(),
        elapsed.num_seconds() % 60
    );
    match report.accuracy() {
        Some(acc) => format!("{acc:.0}% correct in {time}"),
        None => format!("nothing graded in {time}"),
    }
}

/// Longest suffix of `s` that fits in `width` terminal columns.
fn tail_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &s[idx + c.len_utf8()..];
        }
    }
    s
}
