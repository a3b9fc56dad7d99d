// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use rads_app::{
    Footer, Key, LCD_COLS, LCD_ROWS, LcdFrame, SimulatorState, dispatch, render_current,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use std::time::Duration;
use tracing::{debug, warn};

/// Session side effects the terminal loop triggers but does not own.
pub trait SessionRuntime {
    /// Called after every key the engine handled.
    fn persist(&mut self, state: &SimulatorState) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
struct ViewData {
    frame: Option<LcdFrame>,
    help_visible: bool,
    save_error: Option<String>,
}

pub fn run_app<R: SessionRuntime>(state: &mut SimulatorState, runtime: &mut R) -> Result<()> {
    let mut view_data = ViewData {
        frame: Some(render_current(state).context("render start screen")?),
        ..ViewData::default()
    };

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut result = Ok(());
    loop {
        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(250)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => match handle_key_event(state, runtime, &mut view_data, key) {
                Ok(true) => break,
                Ok(false) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            },
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Maps a terminal key onto the panel's eight keys. Anything else is
/// dropped before it reaches a screen.
pub fn key_for_event(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Key::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Key::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Key::Do),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => Some(Key::Quit),
        KeyCode::F(1) | KeyCode::Char('1') => Some(Key::F1),
        KeyCode::F(2) | KeyCode::Char('2') => Some(Key::F2),
        KeyCode::F(3) | KeyCode::Char('3') => Some(Key::F3),
        KeyCode::F(4) | KeyCode::Char('4') => Some(Key::F4),
        _ => None,
    }
}

/// Returns `Ok(true)` when the session should end. Engine errors are fatal;
/// persistence errors only surface in the status bar.
fn handle_key_event<R: SessionRuntime>(
    state: &mut SimulatorState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return Ok(true);
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return Ok(false);
    }
    if key.code == KeyCode::Char('?') {
        view_data.help_visible = true;
        return Ok(false);
    }

    let Some(panel_key) = key_for_event(key) else {
        return Ok(false);
    };
    let frame = dispatch(state, panel_key)
        .with_context(|| format!("handle {} on {}", panel_key.as_str(), state.current()))?;
    view_data.frame = Some(frame);
    debug!(key = panel_key.as_str(), screen = %state.current(), "key handled");

    match runtime.persist(state) {
        Ok(()) => view_data.save_error = None,
        Err(error) => {
            warn!(%error, "session save failed");
            view_data.save_error = Some(format!("save failed: {error:#}"));
        }
    }
    Ok(false)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &SimulatorState, view_data: &ViewData) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(LCD_COLS as u16 + 2),
            Constraint::Min(0),
        ])
        .split(frame.area());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(LCD_ROWS as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    let Some(lcd) = &view_data.frame else {
        return;
    };
    let screen = Paragraph::new(lcd_lines(lcd)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("RADS-AT")
            .style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(screen, rows[0]);

    let footer =
        Paragraph::new(footer_line(lcd.footer())).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, rows[1]);

    let status =
        Paragraph::new(status_text(state, view_data)).style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, rows[2]);
    let hints = Paragraph::new("arrows/jk  enter DO  esc QUIT  F1-F4  ? help  ctrl+q")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, rows[3]);

    if view_data.help_visible {
        let area = centered_rect(80, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text(state)).block(
            Block::default()
                .title("help")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(help, area);
    }
}

/// LCD rows as styled lines: the highlight row reversed and bold, inverse
/// rows reversed.
fn lcd_lines(lcd: &LcdFrame) -> Vec<Line<'static>> {
    lcd.lines()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let style = if lcd.highlight_line() == Some(index) {
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else if lcd.inv_lines().contains(&index) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text.clone(), style))
        })
        .collect()
}

fn footer_line(footer: &Footer) -> Line<'static> {
    match footer {
        Footer::Softkeys(keys) => {
            let mut spans = Vec::with_capacity(keys.len() * 2);
            for softkey in keys {
                spans.push(Span::styled(
                    softkey.key.as_str(),
                    Style::default().add_modifier(Modifier::REVERSED),
                ));
                spans.push(Span::raw(format!(" {} ", softkey.label)));
            }
            Line::from(spans)
        }
        Footer::Text(_) | Footer::None => Line::from(footer.to_line()),
    }
}

fn status_text(state: &SimulatorState, view_data: &ViewData) -> String {
    if let Some(error) = &view_data.save_error {
        return error.clone();
    }
    let depth = state.stack().depth();
    match &state.last_message {
        Some(message) => format!("{} [{depth}] | {message}", state.current()),
        None => format!("{} [{depth}]", state.current()),
    }
}

fn help_overlay_text(state: &SimulatorState) -> String {
    let about = state
        .current_screen()
        .map(|screen| format!("{}: {}", screen.title, screen.help_text))
        .unwrap_or_default();
    [
        about.as_str(),
        "",
        "UP/DOWN   arrows or j/k",
        "DO        enter or space",
        "QUIT      esc, backspace or q",
        "F1-F4     function keys or 1-4",
        "          F1 MEAS  F2 DISP  F3 DIAG  F4 MGR",
        "",
        "?         close this help",
        "ctrl+q    exit",
    ]
    .join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        SessionRuntime, ViewData, footer_line, handle_key_event, help_overlay_text, key_for_event,
        lcd_lines, status_text,
    };
    use anyhow::{Result, anyhow};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use rads_app::{Footer, Key, LcdFrame, MEASURE_SCREEN, SimulatorState};
    use rads_testkit::booted_state;
    use ratatui::style::Modifier;

    #[derive(Debug, Default)]
    struct TestRuntime {
        persist_count: usize,
        fail: bool,
    }

    impl SessionRuntime for TestRuntime {
        fn persist(&mut self, _state: &SimulatorState) -> Result<()> {
            self.persist_count += 1;
            if self.fail {
                return Err(anyhow!("disk full"));
            }
            Ok(())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn terminal_keys_map_onto_panel_keys() {
        assert_eq!(key_for_event(key(KeyCode::Up)), Some(Key::Up));
        assert_eq!(key_for_event(key(KeyCode::Char('j'))), Some(Key::Down));
        assert_eq!(key_for_event(key(KeyCode::Enter)), Some(Key::Do));
        assert_eq!(key_for_event(key(KeyCode::Esc)), Some(Key::Quit));
        assert_eq!(key_for_event(key(KeyCode::F(3))), Some(Key::F3));
        assert_eq!(key_for_event(key(KeyCode::Char('4'))), Some(Key::F4));
        assert_eq!(key_for_event(key(KeyCode::F(5))), None);
        assert_eq!(key_for_event(key(KeyCode::Char('x'))), None);
        assert_eq!(
            key_for_event(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            None
        );
        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_for_event(release), None);
    }

    #[test]
    fn panel_keys_dispatch_and_persist() -> Result<()> {
        let mut state = booted_state()?;
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        let exit = handle_key_event(&mut state, &mut runtime, &mut view_data, key(KeyCode::F(1)))?;
        assert!(!exit);
        assert_eq!(state.current(), MEASURE_SCREEN);
        assert_eq!(runtime.persist_count, 1);
        assert!(
            view_data
                .frame
                .as_ref()
                .is_some_and(|frame| frame.contains_text("Acquire Run"))
        );

        handle_key_event(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('x')))?;
        assert_eq!(runtime.persist_count, 1);
        Ok(())
    }

    #[test]
    fn ctrl_q_exits_without_touching_state() -> Result<()> {
        let mut state = booted_state()?;
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();
        let exit = handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        )?;
        assert!(exit);
        assert_eq!(state.stack().depth(), 1);
        assert_eq!(runtime.persist_count, 0);
        Ok(())
    }

    #[test]
    fn help_overlay_swallows_panel_keys() -> Result<()> {
        let mut state = booted_state()?;
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        handle_key_event(&mut state, &mut runtime, &mut view_data, key(KeyCode::Char('?')))?;
        assert!(view_data.help_visible);
        handle_key_event(&mut state, &mut runtime, &mut view_data, key(KeyCode::Enter))?;
        assert_eq!(state.stack().depth(), 1);
        handle_key_event(&mut state, &mut runtime, &mut view_data, key(KeyCode::Esc))?;
        assert!(!view_data.help_visible);
        assert!(help_overlay_text(&state).starts_with("MAIN MENU: RADS-AT top level"));
        Ok(())
    }

    #[test]
    fn save_failure_shows_in_status_until_next_success() -> Result<()> {
        let mut state = booted_state()?;
        let mut runtime = TestRuntime {
            fail: true,
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::default();

        handle_key_event(&mut state, &mut runtime, &mut view_data, key(KeyCode::Down))?;
        assert_eq!(status_text(&state, &view_data), "save failed: disk full");

        runtime.fail = false;
        handle_key_event(&mut state, &mut runtime, &mut view_data, key(KeyCode::Down))?;
        assert_eq!(status_text(&state, &view_data), "main [1]");
        Ok(())
    }

    #[test]
    fn lcd_rows_carry_highlight_and_inverse_styles() {
        let frame = LcdFrame::builder(["title", "item", "plain"])
            .highlight(Some(1))
            .inverse([8])
            .build();
        let lines = lcd_lines(&frame);
        assert_eq!(lines.len(), 9);
        let modifier = |row: usize| lines[row].spans[0].style.add_modifier;
        assert!(modifier(1).contains(Modifier::REVERSED | Modifier::BOLD));
        assert!(modifier(8).contains(Modifier::REVERSED));
        assert!(!modifier(2).contains(Modifier::REVERSED));
    }

    #[test]
    fn text_footer_renders_as_one_span() {
        let line = footer_line(&Footer::text("QUIT"));
        assert_eq!(line.spans.len(), 1);
        assert!(line.spans[0].content.starts_with("QUIT"));
    }
}
