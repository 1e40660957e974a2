//! Terminal driver for the interactive menu
//!
//! Pull model: every frame re-queries the mixer before drawing, so changes
//! made by other clients show up on the next keypress or refresh tick.

use crate::menu::{EscapeDebounce, Frame, Key, MenuAction, MenuState};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute, queue};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Instant;
use tracing::{debug, info};
use volumecontrol_core::domain::{CommandExecutor, MenuConfig, Mixer};

const HELP: &str = "Up/Down select   Enter choose   Left/Right volume   m mute   q/Esc back";

enum Input {
    Key(Key),
    Interrupt,
}

/// Run the menu until the user leaves it or a command fails
pub fn run<E: CommandExecutor>(mixer: &Mixer<E>, config: &MenuConfig) -> Result<()> {
    let mut stdout = io::stdout();

    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = event_loop(mixer, config, &mut stdout);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn event_loop<E: CommandExecutor, W: Write>(
    mixer: &Mixer<E>,
    config: &MenuConfig,
    out: &mut W,
) -> Result<()> {
    let mut state = MenuState::new();
    let mut escape = EscapeDebounce::new(config.escape_delay());

    loop {
        let frame = load_frame(mixer, &state)?;
        state.clamp(frame.entries.len());
        draw(out, &frame, state.selected())?;

        if !event::poll(config.refresh_interval())? {
            continue;
        }
        let key = match read_input()? {
            Some(Input::Key(key)) => key,
            Some(Input::Interrupt) => return Ok(()),
            None => continue,
        };
        if key == Key::Back && !escape.accept(Instant::now()) {
            debug!("Repeated Esc ignored");
            continue;
        }

        let action = state.handle(key, &frame.entries);
        debug!(?key, ?action, "Menu input");
        match action {
            MenuAction::None => {}
            MenuAction::Exit => return Ok(()),
            MenuAction::SetDefaultSink(id) => mixer.set_default_sink(id)?,
            MenuAction::VolumeUp(id) => {
                mixer.volume_up(id)?;
            }
            MenuAction::VolumeDown(id) => {
                mixer.volume_down(id)?;
            }
            MenuAction::ToggleMute(id) => {
                mixer.toggle_mute(id)?;
            }
            MenuAction::MoveApplication { app, sink } => {
                info!(app, sink, "Moving application");
                mixer.set_application_sink(app, sink)?;
            }
        }
    }
}

fn load_frame<E: CommandExecutor>(mixer: &Mixer<E>, state: &MenuState) -> Result<Frame> {
    let screen = state.screen();
    let sinks = mixer.list_sinks()?;
    let apps = if screen.needs_applications() {
        mixer.list_applications()?
    } else {
        BTreeMap::new()
    };
    Ok(Frame::build(screen, &sinks, &apps))
}

fn read_input() -> Result<Option<Input>> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event::read()?
    else {
        return Ok(None);
    };

    let key = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(Some(Input::Interrupt));
        }
        KeyCode::Esc => Key::Back,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(c) => Key::Char(c),
        _ => return Ok(None),
    };
    Ok(Some(Input::Key(key)))
}

fn draw<W: Write>(out: &mut W, frame: &Frame, selected: usize) -> Result<()> {
    queue!(
        out,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetAttribute(Attribute::Bold),
        Print(&frame.title),
        SetAttribute(Attribute::Reset),
    )?;

    let mut row: u16 = 2;
    for (index, entry) in frame.entries.iter().enumerate() {
        queue!(out, cursor::MoveTo(2, row))?;
        if index == selected {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(out, Print(entry.label(index)), SetAttribute(Attribute::Reset))?;
        row = row.saturating_add(1);
    }

    queue!(out, cursor::MoveTo(0, row.saturating_add(1)), Print(HELP))?;
    out.flush()?;
    Ok(())
}
