use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parse markdown and convert to styled ratatui Lines.
///
/// Only assistant text goes through here. Raw HTML in the input is shown as
/// plain text, never interpreted.
pub fn parse_markdown(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(input, options);
    let mut writer = LineWriter::default();
    let mut style_stack = vec![Style::default()];
    let mut in_code_block = false;
    let mut code_block_content = String::new();
    // One entry per open list: the next number for ordered lists, None for bullets
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in parser {
        let current = style_stack.last().copied().unwrap_or_default();
        match event {
            Event::Start(tag) => {
                let new_style = match tag {
                    Tag::Heading { level, .. } => {
                        writer.flush();
                        let (prefix, style) = heading_style(level);
                        writer.push(Span::styled(prefix, style));
                        style
                    }
                    Tag::Emphasis => current.add_modifier(Modifier::ITALIC),
                    Tag::Strong => current.add_modifier(Modifier::BOLD),
                    Tag::Strikethrough => current.add_modifier(Modifier::CROSSED_OUT),
                    Tag::CodeBlock(kind) => {
                        in_code_block = true;
                        code_block_content.clear();
                        writer.flush();
                        let lang = match kind {
                            CodeBlockKind::Fenced(lang) => lang.to_string(),
                            CodeBlockKind::Indented => String::new(),
                        };
                        let mut fence = vec![Span::styled("```", Style::default().fg(Color::DarkGray))];
                        if !lang.is_empty() {
                            fence.push(Span::styled(lang, Style::default().fg(Color::Magenta)));
                        }
                        writer.lines.push(Line::from(fence));
                        Style::default().fg(Color::Gray)
                    }
                    Tag::List(start) => {
                        lists.push(start);
                        writer.flush();
                        current
                    }
                    Tag::Item => {
                        let indent = "  ".repeat(lists.len().saturating_sub(1));
                        writer.push(Span::raw(indent));
                        let marker = match lists.last_mut() {
                            Some(Some(n)) => {
                                let marker = format!("{}. ", n);
                                *n += 1;
                                marker
                            }
                            _ => "• ".to_string(),
                        };
                        writer.push(Span::styled(marker, Style::default().fg(Color::Yellow)));
                        current
                    }
                    Tag::Link { .. } => {
                        writer.push(Span::styled("[", Style::default().fg(Color::Blue)));
                        Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)
                    }
                    Tag::BlockQuote(_) => {
                        writer.flush();
                        writer.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
                    }
                    _ => current,
                };
                style_stack.push(new_style);
            }
            Event::End(tag) => {
                style_stack.pop();
                match tag {
                    TagEnd::Heading(_)
                    | TagEnd::Paragraph
                    | TagEnd::Item
                    | TagEnd::BlockQuote(_)
                    | TagEnd::TableRow
                    | TagEnd::TableHead => writer.flush(),
                    TagEnd::TableCell => writer.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray))),
                    TagEnd::CodeBlock => {
                        in_code_block = false;
                        for line in code_block_content.lines() {
                            writer.lines.push(Line::from(Span::styled(
                                line.to_string(),
                                Style::default().fg(Color::Gray),
                            )));
                        }
                        writer
                            .lines
                            .push(Line::from(Span::styled("```", Style::default().fg(Color::DarkGray))));
                        code_block_content.clear();
                    }
                    TagEnd::List(_) => {
                        lists.pop();
                    }
                    TagEnd::Link => {
                        writer.push(Span::styled("]", Style::default().fg(Color::Blue)));
                    }
                    _ => {}
                }
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                if in_code_block {
                    code_block_content.push_str(&text);
                } else {
                    writer.push(Span::styled(text.to_string(), current));
                }
            }
            Event::Code(code) => {
                let style = Style::default().fg(Color::Yellow).bg(Color::Rgb(40, 40, 40));
                writer.push(Span::styled(format!(" {} ", code), style));
            }
            Event::SoftBreak | Event::HardBreak | Event::Rule => writer.flush(),
            _ => {}
        }
    }

    writer.finish()
}

fn heading_style(level: HeadingLevel) -> (&'static str, Style) {
    match level {
        HeadingLevel::H1 => ("# ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        HeadingLevel::H2 => ("## ", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        HeadingLevel::H3 => ("### ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        _ => ("#### ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    }
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
}

impl LineWriter {
    fn push(&mut self, span: Span<'static>) {
        self.spans.push(span);
    }

    /// Close the current line, if it has anything on it
    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }
}
