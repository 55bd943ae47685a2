//! TUI rendering for the pushclip shell.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::PLACEHOLDER_TOKEN;
use crate::registration::TokenState;

use super::state::{AppMode, StatusLevel};
use super::AppShell;

/// Renders one frame of the shell.
pub fn render(frame: &mut Frame<'_>, shell: &AppShell) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_token_panel(frame, chunks[1], shell);
    render_status(frame, chunks[2], shell);
    render_footer(frame, chunks[3]);

    if shell.mode == AppMode::Help {
        render_help(frame);
    }
}

fn render_title(frame: &mut Frame<'_>, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled("pushclip", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" — push messages to clipboard"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_token_panel(frame: &mut Frame<'_>, area: Rect, shell: &AppShell) {
    let lines = match &shell.token {
        TokenState::Pending => vec![Line::from(Span::styled(
            PLACEHOLDER_TOKEN,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))],
        TokenState::Available(token) => vec![Line::from(Span::raw(token.clone()))],
        TokenState::Failed(reason) => vec![
            Line::from(Span::styled(
                "Token unavailable",
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                reason.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Device Token"));
    frame.render_widget(panel, area);
}

fn render_status(frame: &mut Frame<'_>, area: Rect, shell: &AppShell) {
    let mut spans = vec![Span::styled(
        shell.connection.describe(),
        Style::default().fg(Color::DarkGray),
    )];

    if let Some(status) = &shell.status {
        let color = match status.level {
            StatusLevel::Info => Color::Green,
            StatusLevel::Warn => Color::Yellow,
        };
        spans.push(Span::raw("  ·  "));
        spans.push(Span::styled(
            status.text.clone(),
            Style::default().fg(color),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " c copy token · n demo notification · ? help · q quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}

fn render_help(frame: &mut Frame<'_>) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from("  c    copy the registration token"),
        Line::from("  n    post the demo notification"),
        Line::from("  ?    toggle this help"),
        Line::from("  q    quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  Incoming messages appear as desktop notifications;",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "  their Copy action puts the body on the clipboard.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(help, area);
}

/// Creates a centered rectangle within a parent area.
///
/// Used for positioning the help overlay.
fn centered_rect(percent_x: u16, percent_y: u16, parent: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(parent);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
