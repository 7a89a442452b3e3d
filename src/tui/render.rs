use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::markdown::parse_markdown;
use crate::app::ChatState;
use crate::catalog::SourceSelector;
use crate::timeline::{Role, Timeline, TimelineEntry};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App, state: &ChatState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let content_chunks = if app.show_sources {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
            .split(chunks[1])
    } else {
        std::rc::Rc::new([Rect::default(), chunks[1]])
    };

    if app.show_sources {
        render_sources(frame, content_chunks[0], &state.selector);
    }

    render_chat(frame, content_chunks[1], app, &state.timeline);
    render_input(frame, chunks[2], &state.input);
    render_status_bar(frame, chunks[3], state);
}

/// Lines for the conversation, in display order.
///
/// Assistant text goes through the markdown formatter; user text is copied
/// line by line and never parsed.
pub fn timeline_lines(timeline: &Timeline) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for entry in timeline.entries() {
        match entry {
            TimelineEntry::Message(msg) => {
                let time = msg.timestamp().format("%H:%M").to_string();
                lines.push(role_header(msg.role(), Some(time)));
                if msg.rendered_as_markup() {
                    lines.extend(parse_markdown(msg.text()));
                } else {
                    for line in msg.text().lines() {
                        lines.push(Line::from(Span::raw(line.to_string())));
                    }
                }
            }
            TimelineEntry::Pending => {
                lines.push(role_header(Role::Ai, None));
                lines.push(Line::from(Span::styled(
                    "● ● ●",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::SLOW_BLINK),
                )));
            }
        }

        lines.push(Line::from("")); // Empty line between messages
    }

    lines
}

fn role_header(role: Role, time: Option<String>) -> Line<'static> {
    let (label, color) = match role {
        Role::Human => ("Tú", Color::Blue),
        Role::Ai => ("Asistente", Color::Green),
    };
    let mut spans = vec![Span::styled(
        format!("[{}] ", label),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(time) = time {
        spans.push(Span::styled(time, Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

/// Lines for the source selector region
pub fn selector_lines(selector: &SourceSelector) -> Vec<Line<'static>> {
    match selector {
        SourceSelector::NotLoaded => vec![Line::from(Span::styled(
            "Cargando fuentes...",
            Style::default().fg(Color::DarkGray),
        ))],
        SourceSelector::Failed { notice } => vec![Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))],
        SourceSelector::Loaded { title, .. } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    title.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];

            for (source, active) in selector.controls_with_state() {
                let (marker, style) = if active {
                    (
                        "(•) ",
                        Style::default()
                            .bg(Color::Blue)
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    ("( ) ", Style::default().fg(Color::White))
                };

                let mut spans = vec![
                    Span::styled(marker, style),
                    Span::styled(source.label.clone(), style),
                ];
                if !source.is_autodetect() {
                    spans.push(Span::styled(
                        format!(" [{}]", source.category.display_name()),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                lines.push(Line::from(spans));
            }

            lines
        }
    }
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            "sourcechat",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(&app.server_url, Style::default().fg(Color::Gray)),
        Span::raw(" | Model: "),
        Span::styled(&app.model_name, Style::default().fg(Color::Green)),
        Span::raw(" | "),
        Span::styled(&app.session_id, Style::default().fg(Color::DarkGray)),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn render_sources(frame: &mut Frame, area: Rect, selector: &SourceSelector) {
    let panel = Paragraph::new(selector_lines(selector))
        .block(
            Block::default()
                .title(" Fuentes (Tab/Shift+Tab) ")
                .borders(Borders::RIGHT)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(panel, area);
}

/// Render the chat area, pinned to the newest line unless scrolled up
fn render_chat(frame: &mut Frame, area: Rect, app: &App, timeline: &Timeline) {
    let paragraph = Paragraph::new(timeline_lines(timeline)).wrap(Wrap { trim: false });

    // Scrolling counts wrapped rows, not source lines
    let rows = paragraph.line_count(area.width.saturating_sub(2));
    let viewport = area.height.saturating_sub(2);
    let top = top_line(rows, viewport, timeline.scroll_offset());
    app.set_max_scroll(max_scroll(rows, viewport));

    let paragraph = paragraph
        .block(
            Block::default()
                .title(" Chat ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((top, 0));

    frame.render_widget(paragraph, area);
}

/// First line to show so that the view ends `offset` lines above the bottom
pub fn top_line(total_lines: usize, viewport: u16, offset: u16) -> u16 {
    let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
    total.saturating_sub(viewport).saturating_sub(offset)
}

/// How far the view can move up before the first row reaches the top
pub fn max_scroll(total_rows: usize, viewport: u16) -> u16 {
    u16::try_from(total_rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(viewport)
}

/// Render the input area
fn render_input(frame: &mut Frame, area: Rect, input: &str) {
    let showing_command = input.starts_with(':');
    let title = if showing_command {
        " Comando (:sources, :help, :quit) "
    } else {
        " Escribe tu pregunta (Enter para enviar) "
    };

    let widget = Paragraph::new(input.to_string())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if showing_command {
                    Color::Yellow
                } else {
                    Color::DarkGray
                }))
                .title(title),
        );

    frame.render_widget(widget, area);

    let cursor_offset = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = (area.x + 1)
        .saturating_add(cursor_offset)
        .min(area.x + area.width.saturating_sub(2));
    frame.set_cursor_position((cursor_x, area.y + 1));
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &ChatState) {
    let status_text = if let Some(status) = &state.status_message {
        status.clone()
    } else if state.timeline.has_pending() {
        "Esperando respuesta...".to_string()
    } else {
        "Listo".to_string()
    };

    let spans = vec![
        Span::styled(
            " CHAT ",
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(status_text),
        Span::raw(" | "),
        Span::styled("Ctrl+R: reload sources", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ];

    let status_bar = Paragraph::new(vec![Line::from(spans)])
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::models::{CatalogEntry, EntryId, MockAnsweringService, SourceCatalog};
    use crate::runtime::Orchestrator;
    use crate::session::MemoryStorage;
    use crate::timeline::Message;
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn test_app() -> App {
        let config = Config::default();
        let orchestrator = Orchestrator::new(
            Arc::new(MockAnsweringService::new()),
            Arc::new(MemoryStorage::new()),
            config.chat.clone(),
        );
        App::new(orchestrator, &config)
    }

    fn draw(terminal: &mut Terminal<TestBackend>, app: &App) -> String {
        let state = app.orchestrator.snapshot();
        terminal.draw(|f| render_ui(f, app, &state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn long_answer() -> String {
        format!("{} FINALWORD", "palabra ".repeat(120))
    }

    fn plain(lines: &[Line<'static>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_human_text_is_literal() {
        let mut timeline = Timeline::new();
        timeline.append_message(Message::human("**no** <script>x</script>"));
        timeline.append_message(Message::ai("**sí**"));
        let times: Vec<String> = timeline
            .messages()
            .map(|m| m.timestamp().format("%H:%M").to_string())
            .collect();

        assert_eq!(
            plain(&timeline_lines(&timeline)),
            vec![
                format!("[Tú] {}", times[0]),
                "**no** <script>x</script>".to_string(),
                String::new(),
                format!("[Asistente] {}", times[1]),
                "sí".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_pending_indicator_is_drawn_last() {
        let mut timeline = Timeline::new();
        timeline.append_message(Message::human("hola"));
        timeline.show_pending();

        let lines = plain(&timeline_lines(&timeline));
        assert_eq!(lines[lines.len() - 2], "● ● ●");
        assert_eq!(lines[lines.len() - 3], "[Asistente] ");
    }

    #[test]
    fn test_selector_projection() {
        let selector = SourceSelector::from_catalog(SourceCatalog {
            excel: vec![CatalogEntry {
                filename: "report.xlsx".to_string(),
                id: Some(EntryId::Text("s1".to_string())),
                file_id: None,
            }],
            rag: vec![],
        });

        assert_eq!(
            plain(&selector_lines(&selector)),
            vec![
                "Fuente de datos:",
                "",
                "(•) Autodetectar",
                "( ) report.xlsx [excel]",
            ]
        );
    }

    #[test]
    fn test_failed_selector_shows_only_notice() {
        let lines = plain(&selector_lines(&SourceSelector::failed()));
        assert_eq!(lines, vec![crate::constants::SOURCES_ERROR_NOTICE]);
    }

    #[test]
    fn test_wrapped_answer_tail_is_visible() {
        let app = test_app();
        {
            let state = app.orchestrator.state();
            let mut state = state.lock();
            state.timeline.append_message(Message::human("hola"));
            state.timeline.append_message(Message::ai(long_answer()));
        }

        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        let screen = draw(&mut terminal, &app);
        assert!(screen.contains("FINALWORD"));
        assert!(!screen.contains("hola"));
    }

    #[test]
    fn test_scroll_reaches_first_wrapped_row() {
        let mut app = test_app();
        {
            let state = app.orchestrator.state();
            let mut state = state.lock();
            state.timeline.append_message(Message::human("hola"));
            state.timeline.append_message(Message::ai(long_answer()));
        }

        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        draw(&mut terminal, &app);
        for _ in 0..20 {
            app.scroll_up(true);
        }
        let screen = draw(&mut terminal, &app);
        assert!(screen.contains("hola"));
        assert!(!screen.contains("FINALWORD"));

        // Scrolling back down is bounded by the same row count
        for _ in 0..20 {
            app.scroll_down(true);
        }
        let screen = draw(&mut terminal, &app);
        assert!(screen.contains("FINALWORD"));
    }

    #[test]
    fn test_max_scroll() {
        assert_eq!(max_scroll(5, 10), 0);
        assert_eq!(max_scroll(40, 11), 29);
    }

    #[test]
    fn test_top_line_follows_tail() {
        assert_eq!(top_line(5, 10, 0), 0);
        assert_eq!(top_line(30, 10, 0), 20);
        assert_eq!(top_line(30, 10, 5), 15);
        assert_eq!(top_line(30, 10, 50), 0);
    }
}
