use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Prompt};
use crate::transcript::{Message, MessageStatus, Role};
use crate::upload::UploadStatus;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let banner_height = if app.upload.status_message().is_some() {
        1
    } else {
        0
    };

    // Main layout: header, transcript, upload banner, input, footer
    let [header_area, transcript_area, banner_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(banner_height),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_transcript(app, frame, transcript_area);
    if banner_height > 0 {
        render_upload_banner(app, frame, banner_area);
    }
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.notice.is_some() {
        render_notice(app, frame, area);
    } else if app.show_clear_confirm {
        render_clear_confirm(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Support Chat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.input_mode == InputMode::Normal {
            Color::Cyan
        } else {
            Color::DarkGray
        }))
        .title(" Conversation ");

    // Store inner dimensions for scroll calculations
    app.transcript_height = area.height.saturating_sub(2);
    app.transcript_width = area.width.saturating_sub(2);

    let text = if app.store.shows_empty_marker() {
        Text::from(Line::from(Span::styled(
            "No conversation yet",
            Style::default().fg(Color::DarkGray),
        ))
        .centered())
    } else {
        let mut lines: Vec<Line> = Vec::new();
        for message in app.store.list() {
            push_message_lines(&mut lines, message, app.animation_frame);
        }
        Text::from(lines)
    };

    let transcript = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.transcript_scroll, 0));

    frame.render_widget(transcript, area);
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, message: &Message, animation_frame: u8) {
    match message.role {
        Role::User => {
            lines.push(Line::from(Span::styled(
                "You:",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            for line in message.content.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        Role::Assistant => {
            lines.push(Line::from(Span::styled(
                "Bot:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            match message.status {
                MessageStatus::Pending => {
                    // Animated ellipsis: cycles through ".", "..", "..."
                    let dots = ".".repeat((animation_frame as usize) + 1);
                    lines.push(Line::from(Span::styled(
                        format!("Thinking{dots}"),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
                MessageStatus::Error => {
                    for line in message.content.lines() {
                        lines.push(Line::from(Span::styled(
                            line.to_string(),
                            Style::default().fg(Color::Red),
                        )));
                    }
                }
                MessageStatus::Complete => {
                    for line in message.content.lines() {
                        lines.push(Line::from(line.to_string()));
                    }
                }
            }
        }
    }
    lines.push(Line::default());
}

fn render_upload_banner(app: &App, frame: &mut Frame, area: Rect) {
    let Some(message) = app.upload.status_message() else {
        return;
    };

    let style = match app.upload.status() {
        UploadStatus::Success => Style::default().fg(Color::Green),
        UploadStatus::Error | UploadStatus::Rejected => Style::default().fg(Color::Red),
        UploadStatus::Uploading => Style::default().fg(Color::Blue),
        UploadStatus::Idle => Style::default(),
    };

    let banner = Paragraph::new(Line::from(Span::styled(format!(" {message}"), style)));
    frame.render_widget(banner, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;

    let title = match app.prompt {
        Prompt::Chat => {
            if app.send_disabled() {
                " Message (waiting for reply...) "
            } else {
                " Message "
            }
        }
        Prompt::UploadPath => " Upload .txt file (enter path) ",
    };

    let border_color = if editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let input = Paragraph::new(app.input.as_str()).block(block);
    frame.render_widget(input, area);

    if editing {
        let cursor_x: u16 = app
            .input
            .chars()
            .take(app.cursor)
            .count() as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(
                if app.prompt == Prompt::UploadPath {
                    " upload "
                } else {
                    " send "
                },
                label_style,
            ),
            Span::styled(" Esc ", key_style),
            Span::styled(" browse ", label_style),
            Span::styled(" Up/Down ", key_style),
            Span::styled(" scroll ", label_style),
        ],
        InputMode::Normal => vec![
            Span::styled(" i ", key_style),
            Span::styled(" compose ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" u ", key_style),
            Span::styled(" upload ", label_style),
            Span::styled(" C ", key_style),
            Span::styled(" clear history ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_clear_confirm(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(44, 5, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Clear history ");

    let text = Text::from(vec![
        Line::from("Delete all chat history?"),
        Line::default(),
        Line::from(vec![
            Span::styled(" y ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            Span::raw(" confirm  "),
            Span::styled(" n ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            Span::raw(" cancel"),
        ]),
    ]);

    frame.render_widget(Paragraph::new(text).block(block), popup_area);
}

fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notice) = app.notice.as_deref() else {
        return;
    };

    let popup_area = centered_rect(50, 5, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");

    let text = Text::from(vec![
        Line::from(notice.to_string()),
        Line::default(),
        Line::from(Span::styled(
            "Press Esc to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}
