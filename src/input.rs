//! Maps raw terminal events onto game input.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

use crate::game::{GameState, InputEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(InputEvent),
    Quit,
    Resize(u16, u16),
}

/// Up, Space, Enter and a left click are one action; what it means depends on `state`.
pub fn map_event(event: &Event, state: GameState) -> Option<Command> {
    let action = match state {
        GameState::Playing => InputEvent::Jump,
        GameState::Start | GameState::GameOver => InputEvent::StartOrRestart,
    };

    match event {
        Event::Key(KeyEvent { code, kind, .. }) if *kind != KeyEventKind::Release => match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Command::Game(action)),
            _ => None,
        },
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Command::Game(action)),
            _ => None,
        },
        Event::Resize(c, r) => Some(Command::Resize(*c, *r)),
        _ => None,
    }
}
