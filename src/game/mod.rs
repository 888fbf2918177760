//! Healing-room escape — input dispatch.
//!
//! Routes normalized input events to the session operations in `logic`,
//! with keypad > modal > room-scene precedence. Keyboard and click paths
//! always land on the same operation.

pub mod actions;
pub mod logic;
pub mod render;
pub mod state;

use crate::input::InputEvent;

use actions::*;
use state::{room_info, GameState, Outcome, ALL_ROOMS};

/// Handle one input event. Returns true if the event was consumed.
pub fn handle_input(state: &mut GameState, event: &InputEvent) -> bool {
    if state.code_entry.is_some() {
        return handle_keypad(state, event);
    }
    if state.modal.is_some() {
        return handle_modal(state, event);
    }
    handle_scene(state, event)
}

// ── Keypad overlay ──────────────────────────────────────────

fn handle_keypad(state: &mut GameState, event: &InputEvent) -> bool {
    match event {
        InputEvent::Key(c) if c.is_ascii_digit() => logic::keypad_digit(state, *c),
        InputEvent::Backspace => logic::keypad_backspace(state),
        InputEvent::Enter => logic::keypad_confirm(state),
        InputEvent::Esc => logic::keypad_cancel(state),
        InputEvent::Click(id) => {
            if (KEYPAD_DIGIT_BASE..KEYPAD_DIGIT_BASE + 10).contains(id) {
                let digit = (b'0' + (id - KEYPAD_DIGIT_BASE) as u8) as char;
                return logic::keypad_digit(state, digit);
            }
            match *id {
                KEYPAD_BACK => logic::keypad_backspace(state),
                KEYPAD_SUBMIT => logic::keypad_confirm(state),
                KEYPAD_CANCEL => logic::keypad_cancel(state),
                _ => false,
            }
        }
        _ => false,
    }
}

// ── Modal overlay ───────────────────────────────────────────

fn handle_modal(state: &mut GameState, event: &InputEvent) -> bool {
    match event {
        InputEvent::Key(c @ '1'..='9') => {
            let index = (*c as u8 - b'1') as usize;
            logic::choose_modal(state, index)
        }
        InputEvent::Key('0') | InputEvent::Esc => logic::close_modal(state),
        InputEvent::Click(id) => {
            if (CHOICE_BASE..CHOICE_BASE + 10).contains(id) {
                return logic::choose_modal(state, (id - CHOICE_BASE) as usize);
            }
            if *id == CLOSE_MODAL {
                return logic::close_modal(state);
            }
            false
        }
        _ => false,
    }
}

// ── Room scene ──────────────────────────────────────────────

fn handle_scene(state: &mut GameState, event: &InputEvent) -> bool {
    match event {
        InputEvent::Key(c) => handle_scene_key(state, *c),
        InputEvent::Click(id) => handle_scene_click(state, *id),
        _ => false,
    }
}

fn handle_scene_key(state: &mut GameState, ch: char) -> bool {
    // Restart shortcut once the session has ended
    if (ch == 'r' || ch == 'R') && state.outcome != Outcome::Active {
        logic::restart(state);
        return true;
    }

    // Room navigation by room key
    for &room in ALL_ROOMS {
        if ch == room_info(room).nav_key {
            return logic::switch_room(state, room);
        }
    }

    // Hotspots [1]-[5]
    if let Some(index) = ch.to_digit(10).filter(|&d| d >= 1) {
        let Some(id) = state.hotspot_at(index as usize - 1) else {
            return false;
        };
        return logic::activate_hotspot(state, id);
    }

    // Inventory slots [a]-[f]; six slots cover the maximum number of
    // items held at once
    if ('a'..='f').contains(&ch) {
        let index = (ch as u8 - b'a') as usize;
        let Some(&item) = state.inventory.items().get(index) else {
            return false;
        };
        return logic::toggle_select(state, item);
    }

    false
}

fn handle_scene_click(state: &mut GameState, id: u16) -> bool {
    if (HOTSPOT_BASE..HOTSPOT_BASE + 8).contains(&id) {
        let Some(hotspot) = state.hotspot_at((id - HOTSPOT_BASE) as usize) else {
            return false;
        };
        return logic::activate_hotspot(state, hotspot);
    }
    if (NAV_BASE..NAV_BASE + 8).contains(&id) {
        let Some(&room) = ALL_ROOMS.get((id - NAV_BASE) as usize) else {
            return false;
        };
        return logic::switch_room(state, room);
    }
    if (INV_BASE..INV_BASE + 8).contains(&id) {
        let Some(&item) = state.inventory.items().get((id - INV_BASE) as usize) else {
            return false;
        };
        return logic::toggle_select(state, item);
    }
    if id == RESTART && state.outcome != Outcome::Active {
        logic::restart(state);
        return true;
    }
    false
}
