use std::io::{self, stdout};
use std::rc::Rc;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::builder::TargetBuilder;
use crate::output::OutputMode;
use crate::schema::Schema;
use crate::session::MessageLog;
use crate::step::{build_chain, SetupStep, TerminalStep};
use crate::suggest::{Completion, StandardCompletions};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Steps,   // One field at a time
    Confirm, // Final review of the built configuration
}

pub struct App {
    builder: TargetBuilder,
    current: Rc<SetupStep>,
    provider: StandardCompletions,
    log: MessageLog,
    phase: Phase,
    input_buffer: String,
    completions: Vec<Completion>,
    notice: Option<String>,
}

impl App {
    pub fn new(schema: &Schema) -> Self {
        let builder = TargetBuilder::from_schema(schema);
        let terminal = Rc::new(SetupStep::Terminal(TerminalStep::new(builder.target())));
        let current = build_chain(builder.fields(), terminal);

        let mut log = MessageLog::new();
        current.announce(&mut log);

        // An empty schema starts on the terminal step
        let phase = if current.is_terminal() {
            Phase::Confirm
        } else {
            Phase::Steps
        };

        let mut app = Self {
            builder,
            current,
            provider: StandardCompletions::default(),
            log,
            phase,
            input_buffer: String::new(),
            completions: Vec::new(),
            notice: None,
        };
        app.refresh_completions();
        app
    }

    fn refresh_completions(&mut self) {
        self.completions = self
            .current
            .create_suggestions(&self.provider, &self.input_buffer);
    }

    fn push_char(&mut self, c: char) {
        self.input_buffer.push(c);
        self.notice = None;
        self.refresh_completions();
    }

    fn pop_char(&mut self) {
        self.input_buffer.pop();
        self.notice = None;
        self.refresh_completions();
    }

    fn accept_completion(&mut self) {
        if let Some(first) = self.completions.first() {
            self.input_buffer = first.literal().to_string();
            self.refresh_completions();
        }
    }

    /// Submits the buffer (or the default when the buffer is empty). The
    /// step only sees input its field already said yes to; bad input stays
    /// here as an inline notice.
    fn submit(&mut self) {
        let text = if self.input_buffer.is_empty() {
            match self.current.default_value() {
                Some(default) => default,
                None => {
                    self.notice = Some("A value is required for this step".to_string());
                    return;
                }
            }
        } else {
            self.input_buffer.clone()
        };

        let accepted = match self.current.field_step() {
            Some(step) => {
                let field = step.field().borrow();
                if field.is_valid(&text) {
                    None
                } else {
                    Some(format!("'{}' is not a valid {}", text, field.kind().tag()))
                }
            }
            None => None,
        };
        if let Some(notice) = accepted {
            self.notice = Some(notice);
            return;
        }

        self.current =
            Rc::clone(&self.current).handle_input(&mut self.log, &mut self.builder, &text);
        self.current.announce(&mut self.log);
        self.input_buffer.clear();
        self.notice = None;
        if self.current.is_terminal() {
            self.phase = Phase::Confirm;
        }
        self.refresh_completions();
    }

    fn progress(&self) -> Option<(usize, usize)> {
        self.current
            .field_step()
            .map(|step| (step.index() + 1, self.builder.field_count()))
    }

    /// Committed values so far, for the breadcrumb line.
    fn build_breadcrumb(&self) -> Vec<String> {
        self.builder
            .fields()
            .iter()
            .filter_map(|field| {
                let field = field.borrow();
                field
                    .value()
                    .map(|value| format!("{}={}", field.name(), value))
            })
            .collect()
    }
}

pub fn run(schema: &Schema) -> io::Result<Option<(String, OutputMode)>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut app = App::new(schema);

    let result = loop {
        terminal.draw(|f| ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            match app.phase {
                Phase::Steps => match key.code {
                    KeyCode::Esc => break Ok(None),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Ok(None);
                    }
                    KeyCode::Enter => app.submit(),
                    KeyCode::Tab => app.accept_completion(),
                    KeyCode::Char(c) => app.push_char(c),
                    KeyCode::Backspace => app.pop_char(),
                    _ => {}
                },
                Phase::Confirm => match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => break Ok(None),
                    KeyCode::Enter => {
                        break Ok(Some((app.builder.render_pretty(), OutputMode::Print)));
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Ok(Some((app.builder.render_pretty(), OutputMode::Clipboard)));
                    }
                    KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Ok(Some((app.builder.render_pretty(), OutputMode::Save)));
                    }
                    _ => {}
                },
            }
        }
    };

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn ui(f: &mut Frame, app: &App) {
    let box_width = 64u16;
    let box_height = 18u16;
    let centered = centered_rect(box_width, box_height, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(centered);

    let title = format!(" {} ", app.builder.target());

    match app.phase {
        Phase::Steps => {
            render_step(f, chunks[0], app, &title);

            let help = Paragraph::new("Tab complete  Enter submit  Esc quit")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(help, chunks[1]);
        }
        Phase::Confirm => {
            let mut lines = vec![Line::from("")];
            if let Some(message) = app.log.last() {
                lines.push(Line::from(Span::styled(
                    message.to_string(),
                    Style::default().fg(Color::Green).bold(),
                )));
                lines.push(Line::from(""));
            }
            for json_line in app.builder.render_pretty().lines() {
                lines.push(Line::from(json_line.to_string()));
            }

            let block = Block::default().borders(Borders::ALL).title(title);
            let paragraph = Paragraph::new(lines).block(block);
            f.render_widget(paragraph, chunks[0]);

            let help = Paragraph::new("Enter print  ^C copy  ^S save  q quit")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(help, chunks[1]);
        }
    }
}

fn render_step(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Announcement
            Constraint::Length(2), // Input line
            Constraint::Length(1), // Notice
            Constraint::Min(1),    // Completions / suggestions
            Constraint::Length(1), // Breadcrumb
        ])
        .split(area);

    let boxed = Block::default().borders(Borders::ALL).title(format!(
        "{}{}",
        title,
        match app.progress() {
            Some((current, total)) => format!("step {}/{} ", current, total),
            None => String::new(),
        }
    ));
    f.render_widget(boxed, area);

    // Announcement
    if let Some(message) = app.log.last() {
        let announcement = Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().bold(),
        )));
        f.render_widget(announcement, inner_chunks[0]);
    }

    // Input line
    let display = if app.input_buffer.is_empty() {
        let placeholder = match app.current.default_value() {
            Some(default) => format!("{} (Enter to accept)", default),
            None => "Type a value...".to_string(),
        };
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.input_buffer.clone(), Style::default())
    };
    let input = Paragraph::new(Line::from(vec![Span::raw("> "), display, Span::raw("█")]));
    f.render_widget(input, inner_chunks[1]);

    // Notice
    if let Some(notice) = &app.notice {
        let warning = Paragraph::new(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        )));
        f.render_widget(warning, inner_chunks[2]);
    }

    // Completions for the current buffer, falling back to the schema's
    // suggested values when nothing has been typed yet
    let mut lines: Vec<Line> = Vec::new();
    if !app.completions.is_empty() {
        let row = app
            .completions
            .iter()
            .take(6)
            .map(|c| c.literal().to_string())
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(Line::from(Span::styled(
            row,
            Style::default().fg(Color::Cyan),
        )));
    }
    let suggested = app.current.suggestions();
    if !suggested.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("suggested: {}", suggested.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner_chunks[3]);

    // Breadcrumb of committed values
    let crumbs = app.build_breadcrumb();
    if !crumbs.is_empty() {
        let breadcrumb = Paragraph::new(Line::from(Span::styled(
            crumbs.join(" › "),
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(breadcrumb, inner_chunks[4]);
    }
}
