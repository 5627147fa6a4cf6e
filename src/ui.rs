use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;

use tappa::history::Record;
use tappa::session::{classify, Judgment, Phase};

use crate::{App, Screen};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Typing => render_typing(self, area, buf),
            Screen::Results => render_results(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let view = app.session.view();

    // styles
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((view.passage.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;

    if view.passage.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    // Countdown readout; the last ten seconds turn red
    let timer = match view.phase {
        Phase::Idle => Span::styled("press enter to begin", italic_style),
        _ => Span::styled(
            format!("{}s", view.remaining_secs),
            if view.remaining_secs <= 10 {
                red_bold_style
            } else {
                dim_bold_style
            },
        ),
    };
    Paragraph::new(timer)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let spans = classify(view.passage, view.typed)
        .map(|(expected, judgment)| match judgment {
            Judgment::Correct => Span::styled(expected.to_string(), green_bold_style),
            Judgment::Incorrect => Span::styled(
                match expected {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            Judgment::Current => Span::styled(expected.to_string(), underlined_dim_bold_style),
            Judgment::Untouched => Span::styled(expected.to_string(), dim_bold_style),
        })
        .collect::<Vec<Span>>();

    let passage = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            // when the passage is small enough to fit on one line
            // centering the text gives a nice zen feeling
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    passage.render(chunks[2], buf);

    let stats = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {} correct   {} incorrect",
            view.wpm, view.accuracy, view.correct_chars, view.incorrect_chars
        ),
        bold_style,
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[3], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let headline = match app.session.last_result() {
        Some(record) => format!(
            "{} wpm   {}% acc   {} correct   {} incorrect   {}s",
            record.wpm,
            record.accuracy,
            record.correct_chars,
            record.incorrect_chars,
            record.time_taken
        ),
        None => String::from("no attempt completed yet"),
    };
    Paragraph::new(Span::styled(headline, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let header = Row::new(vec![
        Cell::from("when"),
        Cell::from("wpm"),
        Cell::from("acc"),
        Cell::from("time"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    // History reads back oldest first; show the most recent attempt on top
    let rows: Vec<Row> = app
        .history
        .iter()
        .rev()
        .map(|record| {
            Row::new(vec![
                Cell::from(humanized_date(record)),
                Cell::from(record.wpm.to_string()),
                Cell::from(format!("{}%", record.accuracy)),
                Cell::from(format!("{}s", record.time_taken)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        &[
            Constraint::Length(24),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("history"));
    table.render(chunks[1], buf);

    let legend = Paragraph::new(Span::styled(
        "(enter) new test / (esc)ape",
        italic_style,
    ));
    legend.render(chunks[2], buf);
}

fn humanized_date(record: &Record) -> String {
    let age_secs = Utc::now()
        .signed_duration_since(record.date)
        .num_seconds()
        .max(0) as u64;
    HumanTime::from(std::time::Duration::from_secs(age_secs))
        .to_text_en(Accuracy::Rough, Tense::Past)
}
