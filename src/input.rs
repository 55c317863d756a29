use crate::app::Scene;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use petopia::Action;
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Quit,
    Move(i32),
    Confirm,
    Pick(usize),
    Act(Action),
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_command(scene: &Scene, ev: &InputEvent) -> Option<Command> {
    if matches!(ev.key, KeyCode::Char('c')) && ev.mods.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }
    match ev.key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Command::Quit),
        _ => {}
    }

    match scene {
        Scene::Choose { .. } => match ev.key {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => Some(Command::Move(-1)),
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => Some(Command::Move(1)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Confirm),
            KeyCode::Char(ch @ '1'..='9') => Some(Command::Pick(ch as usize - '1' as usize)),
            _ => None,
        },
        Scene::Main => match ev.key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::Act(Action::Feed)),
            KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::Act(Action::Bathe)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Act(Action::Sleep)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Act(Action::Play)),
            _ => None,
        },
    }
}
