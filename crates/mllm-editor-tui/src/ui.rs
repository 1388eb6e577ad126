use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use mllm_editor_core::ChatRole;
use crate::app::{App, InputMode};
use crate::editor::{EditorLine, Glyph, Marks};

pub fn render(app: &mut App, frame: &mut Frame) {
    let [header_area, toolbar_area, editor_area, status_area, transcript_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Percentage(40),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(frame.area());

    render_header(frame, header_area);
    render_toolbar(app, frame, toolbar_area);
    render_editor(app, frame, editor_area);
    render_status(app, frame, status_area);
    render_transcript(app, frame, transcript_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Text::from(vec![
        Line::from(Span::styled(
            "mllm-chat-editor",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Build a mixed text + image prompt and send it to the model.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn toggle_span(label: &str, key: &str, on: bool) -> Span<'static> {
    let style = if on {
        Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!(" {label} ({key}) "), style)
}

fn render_toolbar(app: &App, frame: &mut Frame, area: Rect) {
    let marks = app.editor.marks;
    let sending = app.session.is_sending();
    let hint = Style::default().fg(Color::DarkGray);

    let toolbar = Line::from(vec![
        toggle_span("Bold", "^B", marks.bold),
        Span::raw(" "),
        toggle_span("Italic", "^T", marks.italic),
        Span::raw(" "),
        Span::styled(" Insert Image (^O) ", Style::default().fg(Color::Magenta)),
        Span::raw(" "),
        Span::styled(
            if sending { " Sending… " } else { " Send (^S) " },
            if sending {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            },
        ),
        Span::styled("  ^L clear  Esc quit", hint),
    ]);
    frame.render_widget(Paragraph::new(toolbar), area);
}

fn glyph_style(marks: Marks) -> Style {
    let mut style = Style::default();
    if marks.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if marks.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    style
}

fn text_line(glyphs: &[Glyph]) -> Line<'static> {
    let spans: Vec<Span> = glyphs
        .chunk_by(|a, b| a.marks == b.marks)
        .map(|run| {
            let text: String = run.iter().map(|g| g.ch).collect();
            Span::styled(text, glyph_style(run[0].marks))
        })
        .collect();
    Line::from(spans)
}

fn render_editor(app: &mut App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }))
        .title(" Compose ");

    let is_blank = matches!(app.editor.lines(), [EditorLine::Text(g)] if g.is_empty());
    let text = if is_blank {
        Text::from(Span::styled(
            "Type text here and insert images…",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let lines: Vec<Line> = app
            .editor
            .lines()
            .iter()
            .map(|line| match line {
                EditorLine::Text(glyphs) => text_line(glyphs),
                EditorLine::Image { name, .. } => Line::from(Span::styled(
                    format!("[image: {name}]"),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                )),
            })
            .collect();
        Text::from(lines)
    };

    // Keep the caret row inside the pane
    let inner_height = area.height.saturating_sub(2).max(1);
    let (row, col) = app.editor.cursor();
    let row = row.min(u16::MAX as usize) as u16;
    if row < app.editor_scroll {
        app.editor_scroll = row;
    } else if row >= app.editor_scroll + inner_height {
        app.editor_scroll = row - inner_height + 1;
    }

    let editor = Paragraph::new(text).block(block).scroll((app.editor_scroll, 0));
    frame.render_widget(editor, area);

    if editing {
        let inner_width = area.width.saturating_sub(2);
        let cursor_x = (col.min(u16::MAX as usize) as u16).min(inner_width.saturating_sub(1));
        frame.set_cursor_position((
            area.x + 1 + cursor_x,
            area.y + 1 + (row - app.editor_scroll),
        ));
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    if app.input_mode == InputMode::ImagePath {
        let label = "Image file: ";
        let prompt = Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
            Span::raw(app.image_path_input.as_str()),
            Span::styled("  (Enter insert, Esc cancel)", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(prompt), area);

        let cursor_x = (label.len() + app.image_path_input.chars().count()).min(area.width as usize) as u16;
        frame.set_cursor_position((area.x + cursor_x, area.y));
        return;
    }

    if !app.status.is_empty() {
        let status = Paragraph::new(Span::styled(
            app.status.as_str(),
            Style::default().fg(Color::Yellow),
        ));
        frame.render_widget(status, area);
    }
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders, used for scroll calculations
    app.transcript_height = area.height.saturating_sub(2);
    app.transcript_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.backend.endpoint()));

    let transcript = app.session.transcript();
    let text = if transcript.is_empty() && !app.session.is_sending() {
        Text::from(Span::styled(
            "No messages yet.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in transcript.messages() {
            let color = match msg.role {
                ChatRole::User => Color::Cyan,
                ChatRole::Assistant => Color::Yellow,
            };
            lines.push(Line::from(Span::styled(
                format!("{}:", msg.role.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            for line in msg.content.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::default());
        }

        if app.session.is_sending() {
            lines.push(Line::from(Span::styled(
                format!("{}:", ChatRole::Assistant.label()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.transcript_scroll, 0));

    frame.render_widget(paragraph, area);
}
