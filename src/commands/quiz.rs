use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ValueEnum;
use crossterm::event::KeyModifiers;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use tracing::debug;

use super::generate::{QuizOptions, generate_quiz};
use super::grade::{report_lines, summary};
use crate::gap_text::{Segment, placeholder};
use crate::grade::{CaseSensitivity, GapOutcome, ScoreResult};
use crate::session::QuizSession;
use crate::tui::Theme;
use crate::utils::pluralize;

const FLASH_SECS: f64 = 2.0;

/// How gaps get their answers in the interactive session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// Move words from a shuffled word bank into the gaps.
    #[default]
    Place,
    /// Pick each answer from the list of hidden words.
    Choose,
    /// Type answers, or paste a filled-in copy of the passage.
    Type,
}

pub async fn run(options: &QuizOptions, mode: InputMode, case: CaseSensitivity) -> Result<()> {
    let Some(quiz) = generate_quiz(options, true).await? else {
        return Ok(());
    };

    let mut session = QuizSession::new(quiz.gap_text, case);
    if mode == InputMode::Place {
        session.shuffle_bank(&mut options.rng());
    }

    let session = start_quiz_session(session, mode)?;
    if session.show_results() {
        for line in report_lines(&session.score()) {
            println!("{}", line);
        }
    }
    Ok(())
}

struct Flash {
    message: String,
    shown_at: Instant,
}

struct QuizState {
    session: QuizSession,
    mode: InputMode,
    current_gap: usize,
    bank_cursor: usize,
    choice_cursor: usize,
    flash: Option<Flash>,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Exit,
}

impl QuizState {
    fn new(session: QuizSession, mode: InputMode) -> Self {
        Self {
            session,
            mode,
            current_gap: 0,
            bank_cursor: 0,
            choice_cursor: 0,
            flash: None,
        }
    }

    fn flash(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    fn move_gap(&mut self, forward: bool) {
        let count = self.session.gap_count();
        if count == 0 {
            return;
        }
        self.current_gap = if forward {
            (self.current_gap + 1) % count
        } else {
            (self.current_gap + count - 1) % count
        };
    }

    fn move_cursor(&mut self, forward: bool) {
        let (cursor, len) = match self.mode {
            InputMode::Place => (&mut self.bank_cursor, self.session.word_bank().len()),
            InputMode::Choose => (&mut self.choice_cursor, self.session.choices().len()),
            InputMode::Type => return,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = if forward {
            (*cursor + 1) % len
        } else {
            (*cursor + len - 1) % len
        };
    }

    fn clamp_bank_cursor(&mut self) {
        let len = self.session.word_bank().len();
        if self.bank_cursor >= len {
            self.bank_cursor = len.saturating_sub(1);
        }
    }

    fn confirm(&mut self) {
        let gap = self.current_gap;
        match self.mode {
            InputMode::Place => {
                if self.session.selected_word().is_none()
                    && let Some(word) = self.session.word_bank().get(self.bank_cursor)
                {
                    let id = word.id;
                    self.session.select_word(id);
                }
                if self.session.place_word(gap) {
                    self.clamp_bank_cursor();
                    self.move_gap(true);
                }
            }
            InputMode::Choose => {
                if let Some(choice) = self.session.choices().get(self.choice_cursor).cloned() {
                    self.session.choose(gap, &choice);
                    self.move_gap(true);
                }
            }
            InputMode::Type => self.move_gap(true),
        }
    }

    fn select_highlighted(&mut self) {
        if let Some(word) = self.session.word_bank().get(self.bank_cursor) {
            let id = word.id;
            self.session.select_word(id);
        }
    }

    fn clear_current(&mut self) {
        self.session.clear_answer(self.current_gap);
    }

    fn type_char(&mut self, c: char) {
        let mut answer = self
            .session
            .answer(self.current_gap)
            .unwrap_or_default()
            .to_string();
        answer.push(c);
        self.session.type_answer(self.current_gap, answer);
    }

    fn backspace(&mut self) {
        let Some(current) = self.session.answer(self.current_gap) else {
            return;
        };
        let mut answer = current.to_string();
        answer.pop();
        if answer.is_empty() {
            self.session.clear_answer(self.current_gap);
        } else {
            self.session.type_answer(self.current_gap, answer);
        }
    }

    fn paste(&mut self, text: &str) {
        let received = self.session.paste(text);
        debug!(received, "pasted passage");
        if received == 0 {
            self.flash("No answers found in the pasted text");
        } else {
            self.flash(format!("Pasted {}", pluralize("answer", received)));
        }
    }

    fn grade(&mut self) {
        if !self.session.all_placed() {
            let missing = self.session.gap_count() - self.session.answers().answered_count();
            self.flash(format!(
                "Fill every gap before grading ({} left)",
                pluralize("gap", missing)
            ));
            return;
        }
        let score = self.session.request_grade();
        self.flash(summary(&score));
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Action::Exit;
        }
        let grade_key = match self.mode {
            InputMode::Type => {
                key.code == KeyCode::Char('g') && key.modifiers.contains(KeyModifiers::CONTROL)
            }
            _ => matches!(key.code, KeyCode::Char('G') | KeyCode::Char('g')),
        };
        if grade_key {
            self.grade();
            return Action::Continue;
        }

        match key.code {
            KeyCode::Left | KeyCode::BackTab => self.move_gap(false),
            KeyCode::Right | KeyCode::Tab => self.move_gap(true),
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Enter => self.confirm(),
            KeyCode::Delete => self.clear_current(),
            KeyCode::Backspace if self.mode == InputMode::Type => self.backspace(),
            KeyCode::Backspace => self.clear_current(),
            KeyCode::Char(' ') if self.mode == InputMode::Place => self.select_highlighted(),
            KeyCode::Char(c)
                if self.mode == InputMode::Type
                    && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.type_char(c)
            }
            _ => {}
        }
        Action::Continue
    }
}

fn start_quiz_session(session: QuizSession, mode: InputMode) -> Result<QuizSession> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("failed to configure terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to start terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;

    let mut state = QuizState::new(session, mode);
    let loop_result = event_loop(&mut terminal, &mut state);

    teardown_terminal(&mut terminal)?;

    loop_result.map(|()| state.session)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut QuizState,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| {
                let area = frame.area();
                frame.render_widget(Theme::backdrop(), area);
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Min(5),
                        Constraint::Length(4),
                        Constraint::Length(5),
                    ])
                    .split(area);

                let passage = Paragraph::new(passage_lines(state))
                    .block(Theme::panel_with_line(header_line(state)))
                    .wrap(Wrap { trim: false });
                frame.render_widget(passage, chunks[0]);

                let (title, body) = options_panel(state);
                let options = Paragraph::new(body)
                    .block(Theme::panel(title))
                    .wrap(Wrap { trim: false });
                frame.render_widget(options, chunks[1]);

                let footer = Paragraph::new(instructions_text(state))
                    .block(Theme::panel_with_line(Theme::section_header("Controls")));
                frame.render_widget(footer, chunks[2]);
            })
            .context("failed to render frame")?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if state.handle_key(key) == Action::Exit {
                    return Ok(());
                }
            }
            Event::Paste(text) if state.mode == InputMode::Type => state.paste(&text),
            _ => {}
        }
    }
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .context("failed to restore terminal")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

fn header_line(state: &QuizState) -> Line<'static> {
    let session = &state.session;
    let mut spans = vec![
        Theme::label_span(format!(
            "Gap {}/{}",
            state.current_gap + 1,
            session.gap_count()
        )),
        Theme::bullet(),
        Theme::span(format!(
            "{} answered",
            session.answers().answered_count()
        )),
    ];
    if session.show_results() {
        let score = session.score();
        spans.push(Theme::bullet());
        let style = if score.is_perfect() {
            Theme::success()
        } else {
            Theme::danger()
        };
        spans.push(Span::styled(summary(&score), style));
    }
    Line::from(spans)
}

fn gap_span(state: &QuizState, index: usize, score: Option<&ScoreResult>) -> Span<'static> {
    let answer = state.session.answer(index);
    let text = match answer {
        Some(answer) => format!("[{answer}]"),
        None => placeholder(index),
    };

    let outcome = score.and_then(|s| s.gaps.get(index)).map(|g| g.outcome);
    let style = Theme::gap(answer.is_some(), outcome, index == state.current_gap);
    Span::styled(text, style)
}

/// The passage with every gap showing its current answer or placeholder,
/// split on the passage's own line breaks.
fn passage_lines(state: &QuizState) -> Vec<Line<'static>> {
    let score = state.session.show_results().then(|| state.session.score());
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for segment in state.session.document().segments() {
        match segment {
            Segment::Text(text) => {
                let mut parts = text.split('\n');
                if let Some(first) = parts.next()
                    && !first.is_empty()
                {
                    current.push(Theme::span(first));
                }
                for part in parts {
                    lines.push(Line::from(std::mem::take(&mut current)));
                    if !part.is_empty() {
                        current.push(Theme::span(part));
                    }
                }
            }
            Segment::Gap(index) => current.push(gap_span(state, *index, score.as_ref())),
        }
    }
    lines.push(Line::from(current));

    if let Some(score) = &score {
        lines.push(Line::default());
        for gap in score.gaps.iter().filter(|g| g.outcome != GapOutcome::Correct) {
            lines.push(Line::from(vec![
                Theme::span(format!("{} ", placeholder(gap.index))),
                Span::styled(format!("expected {}", gap.expected), Theme::emphasis()),
            ]));
        }
    }
    lines
}

fn options_panel(state: &QuizState) -> (&'static str, Vec<Line<'static>>) {
    match state.mode {
        InputMode::Place => {
            let selected = state.session.selected_word();
            let spans: Vec<Span<'static>> = state
                .session
                .word_bank()
                .iter()
                .enumerate()
                .flat_map(|(i, word)| {
                    let mut style = Theme::default_style();
                    if Some(word.id) == selected {
                        style = Theme::label();
                    }
                    if i == state.bank_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    [Span::styled(format!(" {} ", word.text), style), Theme::span(" ")]
                })
                .collect();
            ("Word bank", vec![Line::from(spans)])
        }
        InputMode::Choose => {
            let spans: Vec<Span<'static>> = state
                .session
                .choices()
                .into_iter()
                .enumerate()
                .flat_map(|(i, choice)| {
                    let style = if i == state.choice_cursor {
                        Theme::label().add_modifier(Modifier::REVERSED)
                    } else {
                        Theme::default_style()
                    };
                    [Span::styled(format!(" {choice} "), style), Theme::span(" ")]
                })
                .collect();
            ("Choices", vec![Line::from(spans)])
        }
        InputMode::Type => {
            let typed = state.session.answer(state.current_gap).unwrap_or_default();
            (
                "Your answer",
                vec![Line::from(vec![
                    Theme::label_span(format!("{} ", placeholder(state.current_gap))),
                    Theme::span(format!("{typed}_")),
                ])],
            )
        }
    }
}

fn instructions_text(state: &QuizState) -> Vec<Line<'static>> {
    let mut line = vec![
        Theme::key_chip("←/→"),
        Theme::span(" gap"),
        Theme::bullet(),
    ];
    match state.mode {
        InputMode::Place => line.extend([
            Theme::key_chip("↑/↓"),
            Theme::span(" word"),
            Theme::bullet(),
            Theme::key_chip("Space"),
            Theme::span(" select"),
            Theme::bullet(),
            Theme::key_chip("Enter"),
            Theme::span(" place"),
            Theme::bullet(),
            Theme::key_chip("Del"),
            Theme::span(" remove"),
        ]),
        InputMode::Choose => line.extend([
            Theme::key_chip("↑/↓"),
            Theme::span(" choice"),
            Theme::bullet(),
            Theme::key_chip("Enter"),
            Theme::span(" choose"),
            Theme::bullet(),
            Theme::key_chip("Del"),
            Theme::span(" clear"),
        ]),
        InputMode::Type => line.extend([
            Theme::span("type to answer"),
            Theme::bullet(),
            Theme::span("paste a filled-in copy"),
            Theme::bullet(),
            Theme::key_chip("Del"),
            Theme::span(" clear"),
        ]),
    }

    let mut second = Vec::new();
    if state.session.all_placed() {
        let grade_key = match state.mode {
            InputMode::Type => "Ctrl+G",
            _ => "G",
        };
        second.extend([
            Theme::key_chip(grade_key),
            Span::styled(" grade", Theme::success()),
            Theme::bullet(),
        ]);
    }
    second.extend([
        Theme::key_chip("Esc"),
        Theme::span(" / "),
        Theme::key_chip("Ctrl+C"),
        Theme::span(" exit"),
    ]);

    let mut lines = vec![Line::from(line), Line::from(second)];
    if let Some(flash) = &state.flash
        && flash.shown_at.elapsed().as_secs_f64() < FLASH_SECS
    {
        lines.push(Line::from(vec![Theme::span(flash.message.clone())]));
    }
    lines
}
