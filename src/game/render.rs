//! Healing-room escape — presentation layer.
//!
//! Reads the game state and draws it; never mutates it. Every tappable
//! line goes through `ClickableList`/`TabBar` or an explicit click
//! target so the hit regions always match what is on screen.
//!
//! Layout: title bar / room tabs / content (responsive two-column or
//! stacked) / help bar, with the modal and keypad as centered overlays.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::logic::CODE_LEN;
use super::state::{
    hotspot_info, item_info, room_info, GameState, Modal, Outcome, ALL_ROOMS,
};

pub fn render(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    render_title(state, f, chunks[0]);
    render_nav(state, f, chunks[1], click_state);

    if is_narrow_layout(area.width) {
        render_narrow_content(state, f, chunks[2], click_state);
    } else {
        render_wide_content(state, f, chunks[2], click_state);
    }

    render_help(state, f, chunks[3], click_state);

    // Overlays last: their click targets sit on top of the scene's.
    if state.code_entry.is_some() {
        render_keypad(state, f, area, click_state);
    } else if let Some(modal) = &state.modal {
        render_modal(modal, f, area, click_state);
    }
}

// ── Title & countdown ───────────────────────────────────────

/// Countdown as MM:SS.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn render_title(state: &GameState, f: &mut Frame, area: Rect) {
    let (title, title_style) = match state.outcome {
        Outcome::Escaped => (
            "★ 脱出成功！ ★",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Outcome::TimedOut => (
            "時間切れ…",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Outcome::Active => (
            "癒しの部屋からの脱出",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    };

    let timer_style = if state.time_left < 60 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let line = Line::from(vec![
        Span::styled(title, title_style),
        Span::raw("  "),
        Span::styled(format!("残り {}", format_time(state.time_left)), timer_style),
    ]);

    let widget = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

// ── Room navigation ─────────────────────────────────────────

fn render_nav(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut tab_bar = TabBar::new("│");
    for (i, &room) in ALL_ROOMS.iter().enumerate() {
        let style = if room == state.room {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_bar = tab_bar.tab(room_info(room).name, style, NAV_BASE + i as u16);
    }
    let mut cs = click_state.borrow_mut();
    tab_bar.render(f, area, &mut cs);
}

// ── Content layouts ─────────────────────────────────────────

/// Wide: room + hotspots on the left, inventory / journal / log on the
/// right.
fn render_wide_content(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(columns[0]);

    render_room_description(state, f, left[0]);
    render_hotspots(state, f, left[1], click_state);

    let inventory_height = (state.inventory.items().len() as u16 + 2).max(3);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(inventory_height),
            Constraint::Min(4),
            Constraint::Length(7),
        ])
        .split(columns[1]);

    render_inventory(state, f, right[0], click_state);
    render_journal(state, f, right[1]);
    render_log(state, f, right[2]);
}

/// Narrow: everything stacked, list panels sized to their content.
fn render_narrow_content(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let hotspot_height = room_info(state.room).hotspots.len() as u16 + 2;
    let inventory_height = (state.inventory.items().len() as u16 + 2).max(3);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(hotspot_height),
            Constraint::Length(inventory_height),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    render_room_description(state, f, chunks[0]);
    render_hotspots(state, f, chunks[1], click_state);
    render_inventory(state, f, chunks[2], click_state);
    render_journal(state, f, chunks[3]);
    render_log(state, f, chunks[4]);
}

// ── Panels ──────────────────────────────────────────────────

fn render_room_description(state: &GameState, f: &mut Frame, area: Rect) {
    let info = room_info(state.room);
    let widget = Paragraph::new(info.description)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(format!(" {} ", info.name)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_hotspots(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    for (i, &hotspot) in room_info(state.room).hotspots.iter().enumerate() {
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", i + 1),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    hotspot_info(hotspot).label,
                    Style::default().fg(Color::White),
                ),
            ]),
            HOTSPOT_BASE + i as u16,
        );
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ▶ 調べる（タップで選択） ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_inventory(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    if state.inventory.items().is_empty() {
        cl.push(Line::from(Span::styled(
            " （まだ何も持っていない）",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, &item) in state.inventory.items().iter().enumerate() {
        let info = item_info(item);
        let selected = state.inventory.selected() == Some(item);
        let marker = if selected { "▶" } else { " " };
        let style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        let slot = (b'a' + i as u8) as char;
        cl.push_clickable(
            Line::from(Span::styled(
                format!(" [{}]{} {} {}", slot, marker, info.icon, info.label),
                style,
            )),
            INV_BASE + i as u16,
        );
    }

    let title = if state.inventory.selected().is_some() {
        " 持ち物（選択中） "
    } else {
        " 持ち物 "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_journal(state: &GameState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.journal.len().saturating_sub(visible);
    let lines: Vec<Line> = state.journal[start..]
        .iter()
        .map(|entry| {
            Line::from(Span::styled(
                format!("・{}", entry),
                Style::default().fg(Color::Gray),
            ))
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" 手帳 "),
    );
    f.render_widget(widget, area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.log.len().saturating_sub(visible);
    let lines: Vec<Line> = state.log[start..]
        .iter()
        .map(|entry| {
            if entry.is_important {
                Line::from(Span::styled(
                    &entry.text,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(&entry.text, Style::default().fg(Color::Gray)))
            }
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" ログ "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_help(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let help_text = if state.outcome != Outcome::Active {
        "[R] もう一度プレイ"
    } else if state.code_entry.is_some() {
        "[0-9] 入力 / Enter 決定 / Esc 戻る"
    } else if state.modal.is_some() {
        "[1]〜 選ぶ / [0] 閉じる"
    } else {
        "[1]〜 調べる / [a]〜 持ち物 / [g][t][l] 部屋移動"
    };

    let widget = Paragraph::new(Line::from(Span::styled(
        help_text,
        Style::default().fg(Color::DarkGray),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(widget, area);

    // After an ending the whole help bar restarts the game.
    if state.outcome != Outcome::Active {
        let mut cs = click_state.borrow_mut();
        cs.add_click_target(area, RESTART);
    }
}

// ── Modal overlay ───────────────────────────────────────────

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn push_choice(cl: &mut ClickableList, index: usize, label: &str, secondary: bool) {
    let (key_style, label_style) = if secondary {
        (
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
        )
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(format!(" [{}] ", index + 1), key_style),
            Span::styled(label.to_string(), label_style),
        ]),
        CHOICE_BASE + index as u16,
    );
}

fn push_close_hint(cl: &mut ClickableList) {
    cl.push_clickable(
        Line::from(Span::styled(
            " [0] 閉じる",
            Style::default().fg(Color::DarkGray),
        )),
        CLOSE_MODAL,
    );
}

fn render_modal(
    modal: &Modal,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let width = area.width.saturating_sub(6).clamp(20, 44);
    let inner_width = width - 2;

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        modal.body.clone(),
        Style::default().fg(Color::White),
    )));
    cl.push(Line::from(""));
    for (i, choice) in modal.choices.iter().enumerate() {
        push_choice(&mut cl, i, &choice.label, choice.secondary);
    }
    push_close_hint(&mut cl);

    let height = (cl.visual_height(inner_width) + 2).min(area.height);
    let rect = centered_rect(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", modal.title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    let mut cs = click_state.borrow_mut();
    cl.register_targets(rect, &mut cs, 1, 1, 0, inner_width);

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        rect,
    );
}

// ── Keypad overlay ──────────────────────────────────────────

/// The keypad's digit cells as a display row, e.g. `  [1] [2] [3]`.
fn digit_row(digits: &[u8]) -> String {
    let cells: Vec<String> = digits.iter().map(|d| format!("[{}]", d)).collect();
    format!("  {}", cells.join(" "))
}

/// Entered digits padded with placeholders, e.g. `  4 2 ・ ・`.
fn code_buffer_row(buffer: &str) -> String {
    let mut cells: Vec<String> = buffer.chars().map(|c| c.to_string()).collect();
    while cells.len() < CODE_LEN {
        cells.push("・".to_string());
    }
    format!("  {}", cells.join(" "))
}

const KEYPAD_ROW_1: [u8; 5] = [1, 2, 3, 4, 5];
const KEYPAD_ROW_2: [u8; 5] = [6, 7, 8, 9, 0];

fn render_keypad(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let buffer = state.code_entry.as_deref().unwrap_or("");

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        code_buffer_row(buffer),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        digit_row(&KEYPAD_ROW_1),
        Style::default().fg(Color::White),
    )));
    cl.push(Line::from(Span::styled(
        digit_row(&KEYPAD_ROW_2),
        Style::default().fg(Color::White),
    )));
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(" [⏎] 決定", Style::default().fg(Color::Cyan))),
        KEYPAD_SUBMIT,
    );
    cl.push_clickable(
        Line::from(Span::styled(
            " [←] ひと文字消す",
            Style::default().fg(Color::Gray),
        )),
        KEYPAD_BACK,
    );
    cl.push_clickable(
        Line::from(Span::styled(
            " [×] やめる",
            Style::default().fg(Color::DarkGray),
        )),
        KEYPAD_CANCEL,
    );

    let width = 26u16.min(area.width);
    let height = (cl.len() as u16 + 2).min(area.height);
    let rect = centered_rect(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " 番号入力 ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    let mut cs = click_state.borrow_mut();
    // Rows: confirm / delete / cancel
    cl.register_targets(rect, &mut cs, 1, 1, 0, 0);
    // Per-digit cells: rows 2 and 3 of the content, 3 cols each with a
    // 1-col gap, matching digit_row's layout
    for (row_offset, digits) in [(3u16, &KEYPAD_ROW_1), (4u16, &KEYPAD_ROW_2)] {
        let y = rect.y + row_offset;
        for (i, &d) in digits.iter().enumerate() {
            let x = rect.x + 1 + 2 + (i as u16) * 4;
            if x + 3 <= rect.x + rect.width {
                cs.add_click_target(Rect::new(x, y, 3, 1), KEYPAD_DIGIT_BASE + d as u16);
            }
        }
    }

    f.render_widget(Clear, rect);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_basic() {
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(9), "00:09");
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 30);
        let rect = centered_rect(area, 40, 10);
        assert_eq!(rect, Rect::new(20, 10, 40, 10));
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 8);
        let rect = centered_rect(area, 44, 12);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.height, 8);
    }

    #[test]
    fn digit_row_layout() {
        assert_eq!(digit_row(&KEYPAD_ROW_1), "  [1] [2] [3] [4] [5]");
        assert_eq!(digit_row(&KEYPAD_ROW_2), "  [6] [7] [8] [9] [0]");
    }

    #[test]
    fn code_buffer_row_pads_placeholders() {
        assert_eq!(code_buffer_row(""), "  ・ ・ ・ ・");
        assert_eq!(code_buffer_row("42"), "  4 2 ・ ・");
        assert_eq!(code_buffer_row("4231"), "  4 2 3 1");
    }

    #[test]
    fn keypad_digit_targets_match_digit_row() {
        // The click target offsets assume each cell is 3 cols wide with
        // a 1-col gap, starting 2 cols into the content.
        let row = digit_row(&KEYPAD_ROW_1);
        for (i, &d) in KEYPAD_ROW_1.iter().enumerate() {
            let start = 2 + i * 4;
            assert_eq!(&row[start..start + 3], format!("[{}]", d));
        }
    }
}
