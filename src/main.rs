mod game;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use game::state::GameState;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::TickClock;

/// Query the grid container's bounding rect and convert pixel
/// coordinates to a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let state = Rc::new(RefCell::new(GameState::new()));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let clock = Rc::new(RefCell::new(TickClock::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch handler
    terminal.on_mouse_event({
        let state = state.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }

            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let action = cs.hit_test(col, row);

            web_sys::console::log_1(
                &format!(
                    "click: cell=({},{}), action={:?}, targets={}",
                    col,
                    row,
                    action,
                    cs.targets.len()
                )
                .into(),
            );
            drop(cs);

            if let Some(id) = action {
                let mut gs = state.borrow_mut();
                game::handle_input(&mut gs, &InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let state = state.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Enter => InputEvent::Enter,
                KeyCode::Backspace => InputEvent::Backspace,
                KeyCode::Esc => InputEvent::Esc,
                _ => return,
            };
            let mut gs = state.borrow_mut();
            game::handle_input(&mut gs, &event);
        }
    });

    // Render loop: advance the countdown, then draw
    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            {
                let ticks = clock.borrow_mut().update(js_sys::Date::now());
                if ticks > 0 {
                    let mut gs = state.borrow_mut();
                    game::logic::tick(&mut gs, ticks);
                }
            }

            let gs = state.borrow();
            let size = f.area();

            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            game::render::render(&gs, f, size, &click_state);
        }
    });

    Ok(())
}
