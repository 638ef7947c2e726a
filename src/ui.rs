//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a two-row split: the earthquake list on top and a
//!   one-line status bar at the bottom.
//! * Each row reads `magnitude  offset  primary location  date  time`.
//!   Magnitude colours follow the integer bucket of the magnitude.
//! * Times are shown in UTC.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::feed::Earthquake;

/// Offset text for locations that carry no `" of "` prefix.
const NEAR_THE: &str = "Near the";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    match app.empty_message() {
        Some(message) => draw_empty_state(&message, frame, main_area),
        None => draw_quake_list(app, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

fn list_block() -> Block<'static> {
    Block::default()
        .title(" Recent Earthquakes ")
        .borders(Borders::ALL)
}

fn draw_quake_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app.earthquakes.iter().map(quake_line).map(ListItem::new).collect();

    let list = List::new(list_items)
        .block(list_block())
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_empty_state(message: &str, frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Gray),
    )))
    .block(list_block())
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn quake_line(quake: &Earthquake) -> Line<'_> {
    let (offset, primary) = quake.location_parts();

    let (date, time) = match quake.occurred_at() {
        Some(at) => (format_date(&at), format_time(&at)),
        None => ("unknown date".to_string(), String::new()),
    };

    Line::from(vec![
        Span::styled(
            format!(" {} ", format_magnitude(quake.magnitude())),
            Style::default()
                .fg(Color::Black)
                .bg(magnitude_color(quake.magnitude()))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{:<14}", offset.unwrap_or(NEAR_THE).to_uppercase()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
        Span::styled(format!("{primary:<36}"), Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(date, Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(time, Style::default().fg(Color::Gray)),
    ])
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let detail = app
        .selected()
        .map(|q| q.detail_url())
        .filter(|url| !url.is_empty())
        .unwrap_or("-");

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} earthquakes", app.earthquakes.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(detail, Style::default().fg(Color::Cyan)),
        Span::raw("  q: quit  ↑/↓: scroll  r: reload  c: cancel"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

pub fn format_magnitude(magnitude: f64) -> String {
    format!("{magnitude:.2}")
}

/// `Mar 03, 1984`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %d, %Y").to_string()
}

/// `4:30 PM`
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%-I:%M %p").to_string()
}

/// Background colour for a magnitude, bucketed by its integer part.
pub fn magnitude_color(magnitude: f64) -> Color {
    // Truncation toward zero; anything below 2 shares the lowest bucket.
    match magnitude.trunc() as i64 {
        i64::MIN..=1 => Color::Rgb(0x4A, 0x7B, 0xA7),
        2 => Color::Rgb(0x04, 0xB4, 0xB3),
        3 => Color::Rgb(0x10, 0xCA, 0xC9),
        4 => Color::Rgb(0xF5, 0xA6, 0x23),
        5 => Color::Rgb(0xFF, 0x7D, 0x50),
        6 => Color::Rgb(0xFC, 0x66, 0x44),
        7 => Color::Rgb(0xE7, 0x5F, 0x40),
        8 => Color::Rgb(0xE1, 0x3A, 0x20),
        9 => Color::Rgb(0xD9, 0x32, 0x18),
        _ => Color::Rgb(0xC0, 0x38, 0x23),
    }
}
