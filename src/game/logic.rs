//! Healing-room escape — pure puzzle logic (no rendering / IO).
//!
//! Every session operation funnels through here. Each hotspot resolution
//! is one synchronous, atomic transition: all of its flag / inventory /
//! journal effects apply together, and invalid input degrades to a
//! flavor-text directive instead of an error.

use super::state::{
    room_info, ChoiceAction, DeskStage, GameState, HotspotId, ItemId, Modal, ModalChoice,
    Outcome, PlanterStage, RoomId,
};

/// The drawer lock's secret, revealed by the wind chime and the note.
pub const DRAWER_CODE: &str = "4231";
/// Digits the keypad accepts before confirming.
pub const CODE_LEN: usize = 4;

// ── Display directive helpers ────────────────────────────────

fn show(state: &mut GameState, title: &str, body: &str) {
    state.add_log(body, false);
    state.modal = Some(Modal::message(title, body));
}

fn show_important(state: &mut GameState, title: &str, body: &str) {
    state.add_log(body, true);
    state.modal = Some(Modal::message(title, body));
}

fn show_with_choices(state: &mut GameState, title: &str, body: &str, choices: Vec<ModalChoice>) {
    state.add_log(body, false);
    state.modal = Some(Modal::with_choices(title, body, choices));
}

fn show_ending(state: &mut GameState, body: &str) {
    state.add_log(body, true);
    state.modal = Some(Modal::with_choices(
        "エンディング",
        body,
        vec![ModalChoice {
            label: "もう一度".into(),
            secondary: false,
            action: ChoiceAction::Restart,
        }],
    ));
}

// ── Hotspot resolver ─────────────────────────────────────────

/// Resolve a hotspot activation. Exactly one display directive per call;
/// no-op once the session outcome is terminal.
pub fn activate_hotspot(state: &mut GameState, id: HotspotId) -> bool {
    if state.outcome != Outcome::Active {
        return false;
    }

    match id {
        HotspotId::Windchime => {
            state.flags.heard_chime = true;
            state.add_journal("風鈴が 4-2-3-1 の順に鳴った。茶室の引き出しに使えるかもしれない。");
            show(state, "風鈴", "風に揺れる風鈴が 4番・2番・3番・1番 の順に澄んだ音を立てた。");
        }
        HotspotId::Pond => {
            if !state.inventory.owns(ItemId::Stone) {
                state.inventory.acquire(ItemId::Stone);
                show_important(state, "池", "冷たい池のほとりで、なめらかな小石を見つけた。");
            } else {
                show(state, "池", "穏やかな水面が心を落ち着かせてくれる。");
            }
        }
        HotspotId::Bench => {
            if !state.inventory.owns(ItemId::Seed) {
                state.inventory.acquire(ItemId::Seed);
                show_important(state, "ベンチ", "ベンチの下から月光の花の種の小袋を見つけた。");
            } else {
                show(state, "ベンチ", "日だまりと木の香りが心地よいベンチだ。");
            }
        }
        HotspotId::Gate => resolve_gate(state),
        HotspotId::Cushion => {
            if !state.flags.found_note {
                state.flags.found_note = true;
                state.inventory.acquire(ItemId::Note);
                state.add_journal("メモ: 月光の花は静かな水と西の音に応える。引き出しの番号は風の順番。");
                show_important(state, "クッション", "クッションの下からメモを見つけた。");
            } else {
                show(state, "クッション", "ふかふかのクッションが心地よい。");
            }
        }
        HotspotId::Teatable => {
            show(state, "茶卓", "温かい茶碗からほのかな香りが立ちのぼる。");
        }
        HotspotId::Window => {
            show(state, "窓", "西の空が静かに輝いている。");
        }
        HotspotId::Drawer => resolve_drawer(state),
        HotspotId::Planter => resolve_planter(state),
        HotspotId::Bookshelf => {
            show(state, "本棚", "癒しの音楽と瞑想の本が並んでいる。");
        }
        HotspotId::Musicbox => {
            if state.planter == PlanterStage::Bloomed && !state.flags.got_key {
                state.flags.got_key = true;
                state.inventory.acquire(ItemId::Key);
                show_important(state, "オルゴール", "月光の花の光がオルゴールを目覚めさせた。金の鍵が現れた。");
            } else {
                show(state, "オルゴール", "オルゴールはまだ眠っているように静かだ。");
            }
        }
        HotspotId::Desk => resolve_desk(state),
    }
    true
}

fn resolve_gate(state: &mut GameState) {
    if state.flags.gate_opened {
        show_with_choices(
            state,
            "正門",
            "門はもう開いている。深く息を吸って、外へ出よう。",
            vec![ModalChoice {
                label: "脱出する".into(),
                secondary: false,
                action: ChoiceAction::Escape,
            }],
        );
        return;
    }

    let selected = state.inventory.selected();
    if selected == Some(ItemId::Charm) && !state.inventory.owns(ItemId::Key) {
        show(state, "正門", "お守りが温かく光っている。だが、まだ鍵が足りない。");
    } else if selected == Some(ItemId::Key) && state.inventory.owns(ItemId::Charm) {
        // Joint condition: both the key in hand and the charm owned,
        // consumed together.
        state.flags.gate_opened = true;
        state.inventory.consume(ItemId::Key);
        state.inventory.consume(ItemId::Charm);
        show_important(state, "正門", "金の鍵とお守りの光が重なり、門がゆっくりと開いた。");
    } else if selected == Some(ItemId::Key) {
        show(state, "正門", "鍵は合っている。だが、癒しのお守りが一緒でなければ開かないようだ。");
    } else {
        show(state, "正門", "門は固く閉ざされている。温かな鍵と癒しのお守りが必要そうだ。");
    }
}

fn resolve_drawer(state: &mut GameState) {
    if state.flags.drawer_unlocked {
        if !state.flags.drawer_emptied {
            state.flags.drawer_emptied = true;
            state.inventory.acquire(ItemId::Can);
            show_important(state, "引き出し", "引き出しの中からじょうろを見つけた。");
        } else {
            show(state, "引き出し", "空っぽの引き出しだ。");
        }
        return;
    }

    show_with_choices(
        state,
        "引き出し",
        "ほのかに光る数字の錠前が付いている。",
        vec![
            ModalChoice {
                label: "番号を入力".into(),
                secondary: false,
                action: ChoiceAction::OpenCodeEntry,
            },
            ModalChoice {
                label: "閉じる".into(),
                secondary: true,
                action: ChoiceAction::Close,
            },
        ],
    );
}

/// The planter's strictly ordered sequence. A later stage can never fire
/// before the earlier one completed — the match is on the stage itself.
fn resolve_planter(state: &mut GameState) {
    match state.planter {
        PlanterStage::Empty => {
            if state.inventory.selected() == Some(ItemId::Seed) {
                state.planter = PlanterStage::Planted;
                state.inventory.consume(ItemId::Seed);
                state.add_journal("種を植えた。次は静かな水が必要だ。");
                show_important(state, "植木鉢", "種を植えた。しっとりとした水を待っている。");
            } else {
                show(state, "植木鉢", "まだ空っぽの植木鉢だ。種が必要だ。");
            }
        }
        PlanterStage::Planted => {
            if state.inventory.selected() == Some(ItemId::Can) {
                state.planter = PlanterStage::Watered;
                state.inventory.consume(ItemId::Can);
                state.add_journal("月光の花が咲き始めた。オルゴールが応えるかもしれない。");
                show_important(state, "植木鉢", "やわらかな水を注ぐと、月光の花がほのかに咲き始めた。");
            } else {
                show(state, "植木鉢", "しっとりとした水をやれば花が育ちそうだ。");
            }
        }
        PlanterStage::Watered => {
            state.planter = PlanterStage::Bloomed;
            state.inventory.acquire(ItemId::Flower);
            show_important(state, "植木鉢", "月光の花が満開になった。淡い光がオルゴールの方へ流れていく。");
        }
        PlanterStage::Bloomed => {
            show(state, "植木鉢", "月光の花が静かな光を放っている。");
        }
    }
}

fn resolve_desk(state: &mut GameState) {
    match state.desk {
        DeskStage::Closed => {
            if state.inventory.selected() == Some(ItemId::Stone) {
                state.desk = DeskStage::Opened;
                state.inventory.consume(ItemId::Stone);
                show_important(state, "机", "小石を載せると箱がゆっくりと開いた。中に癒しのお守りが見える。");
            } else {
                show(state, "机", "机の上の箱は、なめらかな小石を載せると開く仕掛けのようだ。");
            }
        }
        DeskStage::Opened => {
            state.desk = DeskStage::Emptied;
            state.inventory.acquire(ItemId::Charm);
            show_important(state, "机", "癒しのお守りを手に入れた。");
        }
        DeskStage::Emptied => {
            show(state, "机", "整えられた机が心を落ち着かせてくれる。");
        }
    }
}

// ── Inventory selection ──────────────────────────────────────

pub fn toggle_select(state: &mut GameState, item: ItemId) -> bool {
    if state.outcome != Outcome::Active {
        return false;
    }
    state.inventory.toggle_select(item)
}

// ── Room navigation ──────────────────────────────────────────

/// Pure navigation; touches no puzzle state.
pub fn switch_room(state: &mut GameState, room: RoomId) -> bool {
    if state.outcome != Outcome::Active || state.room == room {
        return false;
    }
    state.room = room;
    state.add_log(&format!("{}へ移動した。", room_info(room).name), false);
    true
}

// ── Lock subpuzzle ───────────────────────────────────────────

/// Submit a drawer code. `None` (cancelled) and empty trimmed input are
/// "no submission": state untouched, no directive. A mismatch emits a
/// failure directive and permits unlimited retries.
pub fn submit_drawer_code(state: &mut GameState, code: Option<&str>) -> bool {
    if state.outcome != Outcome::Active {
        return false;
    }
    let Some(code) = code else {
        return false;
    };
    let code = code.trim();
    if code.is_empty() {
        return false;
    }

    if code == DRAWER_CODE {
        if !state.flags.drawer_unlocked {
            state.flags.drawer_unlocked = true;
            state.add_journal("引き出しの番号は 4-2-3-1 だった。");
        }
        show_important(state, "引き出し", "錠前が外れた。");
    } else {
        show(state, "引き出し", "番号が合わない。風の順番を思い出してみよう。");
    }
    true
}

// ── Keypad overlay ───────────────────────────────────────────

pub fn keypad_digit(state: &mut GameState, digit: char) -> bool {
    let Some(buf) = &mut state.code_entry else {
        return false;
    };
    if !digit.is_ascii_digit() || buf.len() >= CODE_LEN {
        return false;
    }
    buf.push(digit);
    true
}

pub fn keypad_backspace(state: &mut GameState) -> bool {
    let Some(buf) = &mut state.code_entry else {
        return false;
    };
    buf.pop().is_some()
}

/// Close the keypad without submitting. Treated as "no submission".
pub fn keypad_cancel(state: &mut GameState) -> bool {
    state.code_entry.take().is_some()
}

/// Submit the keypad buffer. An empty buffer closes the keypad with no
/// submission.
pub fn keypad_confirm(state: &mut GameState) -> bool {
    let Some(buf) = state.code_entry.take() else {
        return false;
    };
    submit_drawer_code(state, Some(buf.as_str()))
}

// ── Modal choices ────────────────────────────────────────────

pub fn close_modal(state: &mut GameState) -> bool {
    state.modal.take().is_some()
}

/// Execute the modal choice at `index`.
pub fn choose_modal(state: &mut GameState, index: usize) -> bool {
    let Some(modal) = &state.modal else {
        return false;
    };
    let Some(choice) = modal.choices.get(index) else {
        return false;
    };
    let action = choice.action;
    state.modal = None;

    match action {
        ChoiceAction::Close => {}
        ChoiceAction::OpenCodeEntry => {
            state.code_entry = Some(String::new());
        }
        ChoiceAction::Escape => {
            if state.outcome == Outcome::Active && state.flags.gate_opened {
                state.outcome = Outcome::Escaped;
                show_ending(state, "癒しの部屋から無事に抜け出した。穏やかさがそばにある。");
            }
        }
        ChoiceAction::Restart => restart(state),
    }
    true
}

// ── Countdown ────────────────────────────────────────────────

/// Advance the countdown by `delta_ticks` seconds. Decrements only while
/// the session is active; reaching zero forces the timeout ending.
/// Idempotent-safe after a terminal outcome.
pub fn tick(state: &mut GameState, delta_ticks: u32) {
    for _ in 0..delta_ticks {
        if state.outcome != Outcome::Active || state.time_left == 0 {
            return;
        }
        state.time_left -= 1;
        if state.time_left == 0 {
            state.outcome = Outcome::TimedOut;
            show_ending(state, "時間が尽きた。癒しの部屋は、あなたの再訪を待っている。");
            return;
        }
    }
}

// ── Restart ──────────────────────────────────────────────────

pub fn restart(state: &mut GameState) {
    *state = GameState::new();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Flags;

    fn fresh() -> GameState {
        GameState::new()
    }

    /// Drive a fresh session to the point where the gate can open:
    /// key and charm owned, key selected.
    fn session_with_key_and_charm() -> GameState {
        let mut s = fresh();
        // seed → planter
        activate_hotspot(&mut s, HotspotId::Bench);
        toggle_select(&mut s, ItemId::Seed);
        activate_hotspot(&mut s, HotspotId::Planter);
        // code → can → water
        submit_drawer_code(&mut s, Some("4231"));
        activate_hotspot(&mut s, HotspotId::Drawer);
        toggle_select(&mut s, ItemId::Can);
        activate_hotspot(&mut s, HotspotId::Planter);
        // bloom → key
        activate_hotspot(&mut s, HotspotId::Planter);
        activate_hotspot(&mut s, HotspotId::Musicbox);
        // stone → desk box → charm
        activate_hotspot(&mut s, HotspotId::Pond);
        toggle_select(&mut s, ItemId::Stone);
        activate_hotspot(&mut s, HotspotId::Desk);
        activate_hotspot(&mut s, HotspotId::Desk);
        toggle_select(&mut s, ItemId::Key);
        s
    }

    // ── Simple hotspots ─────────────────────────────────────

    #[test]
    fn windchime_sets_flag_and_hint() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Windchime);
        assert!(s.flags.heard_chime);
        assert!(s.journal.iter().any(|e| e.contains("4-2-3-1")));
    }

    #[test]
    fn windchime_repeat_keeps_single_hint() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Windchime);
        let count = s.journal.len();
        activate_hotspot(&mut s, HotspotId::Windchime);
        assert_eq!(s.journal.len(), count);
        // The message itself is re-shown
        assert!(s.modal.is_some());
    }

    #[test]
    fn pond_awards_stone_once() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Pond);
        assert!(s.inventory.owns(ItemId::Stone));
        activate_hotspot(&mut s, HotspotId::Pond);
        assert_eq!(s.inventory.items().len(), 1);
    }

    #[test]
    fn bench_awards_seed_once() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Bench);
        assert!(s.inventory.owns(ItemId::Seed));
        activate_hotspot(&mut s, HotspotId::Bench);
        assert_eq!(s.inventory.items().len(), 1);
    }

    #[test]
    fn cushion_grants_note_once() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Cushion);
        assert!(s.flags.found_note);
        assert!(s.inventory.owns(ItemId::Note));
        assert!(s.journal.iter().any(|e| e.starts_with("メモ:")));

        let journal_len = s.journal.len();
        activate_hotspot(&mut s, HotspotId::Cushion);
        assert_eq!(s.inventory.items().len(), 1);
        assert_eq!(s.journal.len(), journal_len);
    }

    #[test]
    fn flavor_hotspots_touch_no_state() {
        let mut s = fresh();
        for id in [HotspotId::Teatable, HotspotId::Window, HotspotId::Bookshelf] {
            let journal_len = s.journal.len();
            activate_hotspot(&mut s, id);
            assert!(s.inventory.items().is_empty());
            assert_eq!(s.journal.len(), journal_len);
            assert_eq!(s.planter, PlanterStage::Empty);
            assert_eq!(s.desk, DeskStage::Closed);
            assert!(s.modal.is_some());
        }
    }

    // ── Gate ────────────────────────────────────────────────

    #[test]
    fn gate_locked_without_items() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Gate);
        assert!(!s.flags.gate_opened);
        assert!(s.modal.as_ref().map(|m| m.choices.is_empty()).unwrap_or(false));
    }

    #[test]
    fn gate_charm_selected_without_key() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Pond);
        toggle_select(&mut s, ItemId::Stone);
        activate_hotspot(&mut s, HotspotId::Desk);
        activate_hotspot(&mut s, HotspotId::Desk);
        toggle_select(&mut s, ItemId::Charm);

        activate_hotspot(&mut s, HotspotId::Gate);
        assert!(!s.flags.gate_opened);
        assert!(s.inventory.owns(ItemId::Charm));
    }

    #[test]
    fn gate_key_selected_without_charm_stays_shut() {
        let mut s = session_with_key_and_charm();
        // Take the charm back out of the picture
        s.inventory.consume(ItemId::Charm);

        activate_hotspot(&mut s, HotspotId::Gate);
        assert!(!s.flags.gate_opened);
        assert!(s.inventory.owns(ItemId::Key));
    }

    #[test]
    fn gate_joint_condition_consumes_both() {
        let mut s = session_with_key_and_charm();
        assert!(s.inventory.owns(ItemId::Key));
        assert!(s.inventory.owns(ItemId::Charm));

        activate_hotspot(&mut s, HotspotId::Gate);
        assert!(s.flags.gate_opened);
        assert!(!s.inventory.owns(ItemId::Key));
        assert!(!s.inventory.owns(ItemId::Charm));
        assert!(s.inventory.selected().is_none());
    }

    #[test]
    fn gate_open_offers_escape_choice() {
        let mut s = session_with_key_and_charm();
        activate_hotspot(&mut s, HotspotId::Gate);
        activate_hotspot(&mut s, HotspotId::Gate);

        let modal = s.modal.as_ref().unwrap();
        assert_eq!(modal.choices.len(), 1);
        assert_eq!(modal.choices[0].action, ChoiceAction::Escape);

        choose_modal(&mut s, 0);
        assert_eq!(s.outcome, Outcome::Escaped);
    }

    #[test]
    fn escape_choice_ignored_while_gate_shut() {
        let mut s = fresh();
        // Forged directive: an escape choice without the gate open
        s.modal = Some(Modal::with_choices(
            "正門",
            "…",
            vec![ModalChoice {
                label: "脱出する".into(),
                secondary: false,
                action: ChoiceAction::Escape,
            }],
        ));
        choose_modal(&mut s, 0);
        assert_eq!(s.outcome, Outcome::Active);
    }

    // ── Planter ─────────────────────────────────────────────

    #[test]
    fn planter_demands_seed_first() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Empty);
    }

    #[test]
    fn planter_rejects_water_before_seed() {
        let mut s = fresh();
        s.flags.drawer_unlocked = true;
        activate_hotspot(&mut s, HotspotId::Drawer); // grab the can
        toggle_select(&mut s, ItemId::Can);

        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Empty);
        assert!(s.inventory.owns(ItemId::Can));
    }

    #[test]
    fn planter_full_sequence() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Bench);
        toggle_select(&mut s, ItemId::Seed);
        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Planted);
        assert!(!s.inventory.owns(ItemId::Seed));

        s.flags.drawer_unlocked = true;
        activate_hotspot(&mut s, HotspotId::Drawer);
        toggle_select(&mut s, ItemId::Can);
        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Watered);
        assert!(!s.inventory.owns(ItemId::Can));

        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Bloomed);
        assert!(s.inventory.owns(ItemId::Flower));

        // Further visits: flavor only
        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Bloomed);
        assert_eq!(
            s.inventory.items().iter().filter(|&&i| i == ItemId::Flower).count(),
            1
        );
    }

    #[test]
    fn planter_ignores_wrong_selection_mid_sequence() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Bench);
        toggle_select(&mut s, ItemId::Seed);
        activate_hotspot(&mut s, HotspotId::Planter);

        activate_hotspot(&mut s, HotspotId::Pond);
        toggle_select(&mut s, ItemId::Stone);
        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Planted);
        assert!(s.inventory.owns(ItemId::Stone));
    }

    // ── Musicbox ────────────────────────────────────────────

    #[test]
    fn musicbox_silent_before_bloom() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Musicbox);
        assert!(!s.flags.got_key);
        assert!(!s.inventory.owns(ItemId::Key));
    }

    #[test]
    fn musicbox_grants_key_once_after_bloom() {
        let mut s = fresh();
        s.planter = PlanterStage::Bloomed;
        activate_hotspot(&mut s, HotspotId::Musicbox);
        assert!(s.flags.got_key);
        assert!(s.inventory.owns(ItemId::Key));

        activate_hotspot(&mut s, HotspotId::Musicbox);
        assert_eq!(
            s.inventory.items().iter().filter(|&&i| i == ItemId::Key).count(),
            1
        );
    }

    // ── Desk ────────────────────────────────────────────────

    #[test]
    fn desk_box_needs_stone_selected() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Desk);
        assert_eq!(s.desk, DeskStage::Closed);

        activate_hotspot(&mut s, HotspotId::Pond);
        activate_hotspot(&mut s, HotspotId::Desk); // owned but not in hand
        assert_eq!(s.desk, DeskStage::Closed);

        toggle_select(&mut s, ItemId::Stone);
        activate_hotspot(&mut s, HotspotId::Desk);
        assert_eq!(s.desk, DeskStage::Opened);
        assert!(!s.inventory.owns(ItemId::Stone));
    }

    #[test]
    fn desk_grants_charm_then_flavor() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Pond);
        toggle_select(&mut s, ItemId::Stone);
        activate_hotspot(&mut s, HotspotId::Desk);
        activate_hotspot(&mut s, HotspotId::Desk);
        assert_eq!(s.desk, DeskStage::Emptied);
        assert!(s.inventory.owns(ItemId::Charm));

        activate_hotspot(&mut s, HotspotId::Desk);
        assert_eq!(
            s.inventory.items().iter().filter(|&&i| i == ItemId::Charm).count(),
            1
        );
    }

    // ── Drawer & lock ───────────────────────────────────────

    #[test]
    fn locked_drawer_offers_code_entry() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Drawer);
        let modal = s.modal.as_ref().unwrap();
        assert_eq!(modal.choices[0].action, ChoiceAction::OpenCodeEntry);
        assert!(modal.choices[1].secondary);

        choose_modal(&mut s, 0);
        assert_eq!(s.code_entry.as_deref(), Some(""));
    }

    #[test]
    fn wrong_code_then_right_code() {
        let mut s = fresh();
        assert!(submit_drawer_code(&mut s, Some("0000")));
        assert!(!s.flags.drawer_unlocked);
        assert!(s.modal.is_some());

        assert!(submit_drawer_code(&mut s, Some("4231")));
        assert!(s.flags.drawer_unlocked);
        assert!(s.journal.iter().any(|e| e.contains("4-2-3-1 だった")));
    }

    #[test]
    fn cancelled_and_empty_codes_are_no_submission() {
        let mut s = fresh();
        assert!(!submit_drawer_code(&mut s, None));
        assert!(!submit_drawer_code(&mut s, Some("")));
        assert!(!submit_drawer_code(&mut s, Some("   ")));
        assert!(!s.flags.drawer_unlocked);
        assert!(s.modal.is_none());
    }

    #[test]
    fn code_is_trimmed() {
        let mut s = fresh();
        submit_drawer_code(&mut s, Some("  4231  "));
        assert!(s.flags.drawer_unlocked);
    }

    #[test]
    fn drawer_grants_can_exactly_once() {
        let mut s = fresh();
        submit_drawer_code(&mut s, Some("4231"));
        activate_hotspot(&mut s, HotspotId::Drawer);
        assert!(s.inventory.owns(ItemId::Can));

        // Consume the can elsewhere, then revisit: no second can.
        s.inventory.consume(ItemId::Can);
        activate_hotspot(&mut s, HotspotId::Drawer);
        assert!(!s.inventory.owns(ItemId::Can));
    }

    #[test]
    fn keypad_flow() {
        let mut s = fresh();
        s.code_entry = Some(String::new());
        for d in ['4', '2', '3', '9'] {
            assert!(keypad_digit(&mut s, d));
        }
        assert!(!keypad_digit(&mut s, '1')); // buffer full
        assert!(keypad_backspace(&mut s));
        assert!(keypad_digit(&mut s, '1'));

        assert!(keypad_confirm(&mut s));
        assert!(s.code_entry.is_none());
        assert!(s.flags.drawer_unlocked);
    }

    #[test]
    fn keypad_cancel_leaves_state_untouched() {
        let mut s = fresh();
        s.code_entry = Some("42".into());
        assert!(keypad_cancel(&mut s));
        assert!(s.code_entry.is_none());
        assert!(!s.flags.drawer_unlocked);
        assert!(s.modal.is_none());
    }

    #[test]
    fn keypad_rejects_non_digits() {
        let mut s = fresh();
        s.code_entry = Some(String::new());
        assert!(!keypad_digit(&mut s, 'a'));
        assert_eq!(s.code_entry.as_deref(), Some(""));
    }

    // ── Countdown ───────────────────────────────────────────

    #[test]
    fn tick_counts_down() {
        let mut s = fresh();
        tick(&mut s, 3);
        assert_eq!(s.time_left, crate::game::state::START_SECONDS - 3);
        assert_eq!(s.outcome, Outcome::Active);
    }

    #[test]
    fn timeout_locks_the_session() {
        let mut s = fresh();
        s.time_left = 2;
        tick(&mut s, 5);
        assert_eq!(s.time_left, 0);
        assert_eq!(s.outcome, Outcome::TimedOut);

        // Everything is a no-op now.
        tick(&mut s, 10);
        assert_eq!(s.time_left, 0);
        assert!(!activate_hotspot(&mut s, HotspotId::Bench));
        assert!(!toggle_select(&mut s, ItemId::Seed));
        assert!(!switch_room(&mut s, RoomId::Tea));
        assert!(!submit_drawer_code(&mut s, Some("4231")));
        assert!(s.inventory.items().is_empty());
        assert!(!s.flags.drawer_unlocked);
    }

    #[test]
    fn tick_frozen_after_escape() {
        let mut s = session_with_key_and_charm();
        activate_hotspot(&mut s, HotspotId::Gate);
        activate_hotspot(&mut s, HotspotId::Gate);
        choose_modal(&mut s, 0);
        assert_eq!(s.outcome, Outcome::Escaped);

        let left = s.time_left;
        tick(&mut s, 30);
        assert_eq!(s.time_left, left);
    }

    // ── Navigation & restart ────────────────────────────────

    #[test]
    fn switch_room_moves_and_logs() {
        let mut s = fresh();
        assert!(switch_room(&mut s, RoomId::Tea));
        assert_eq!(s.room, RoomId::Tea);
        assert!(!switch_room(&mut s, RoomId::Tea)); // already there
    }

    #[test]
    fn switch_room_keeps_puzzle_state() {
        let mut s = fresh();
        activate_hotspot(&mut s, HotspotId::Bench);
        toggle_select(&mut s, ItemId::Seed);
        switch_room(&mut s, RoomId::Loft);
        assert!(s.inventory.owns(ItemId::Seed));
        assert_eq!(s.inventory.selected(), Some(ItemId::Seed));
    }

    #[test]
    fn restart_choice_resets_everything() {
        let mut s = fresh();
        s.time_left = 1;
        tick(&mut s, 1);
        assert_eq!(s.outcome, Outcome::TimedOut);

        choose_modal(&mut s, 0); // もう一度
        assert_eq!(s.outcome, Outcome::Active);
        assert_eq!(s.time_left, crate::game::state::START_SECONDS);
        assert!(s.inventory.items().is_empty());
    }

    // ── Monotonicity ────────────────────────────────────────

    #[test]
    fn flags_never_regress_over_a_full_run() {
        let mut s = session_with_key_and_charm();
        let before = s.flags.clone();
        assert!(before.drawer_unlocked && before.got_key);

        activate_hotspot(&mut s, HotspotId::Gate);
        for id in [
            HotspotId::Windchime, HotspotId::Pond, HotspotId::Bench, HotspotId::Planter,
            HotspotId::Cushion, HotspotId::Drawer, HotspotId::Musicbox, HotspotId::Desk,
        ] {
            activate_hotspot(&mut s, id);
        }
        assert_still_set(&before, &s.flags);
        assert!(s.flags.gate_opened);
    }

    fn assert_still_set(before: &Flags, after: &Flags) {
        assert!(!before.heard_chime || after.heard_chime);
        assert!(!before.found_note || after.found_note);
        assert!(!before.drawer_unlocked || after.drawer_unlocked);
        assert!(!before.drawer_emptied || after.drawer_emptied);
        assert!(!before.got_key || after.got_key);
        assert!(!before.gate_opened || after.gate_opened);
    }

    // ── End to end ──────────────────────────────────────────

    #[test]
    fn escape_end_to_end() {
        let mut s = fresh();

        activate_hotspot(&mut s, HotspotId::Bench);
        toggle_select(&mut s, ItemId::Seed);
        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Planted);
        assert!(!s.inventory.owns(ItemId::Seed));

        submit_drawer_code(&mut s, Some("4231"));
        activate_hotspot(&mut s, HotspotId::Drawer);
        toggle_select(&mut s, ItemId::Can);
        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Watered);
        assert!(!s.inventory.owns(ItemId::Can));

        activate_hotspot(&mut s, HotspotId::Planter);
        assert_eq!(s.planter, PlanterStage::Bloomed);
        assert!(s.inventory.owns(ItemId::Flower));

        activate_hotspot(&mut s, HotspotId::Musicbox);
        assert!(s.flags.got_key);
        assert!(s.inventory.owns(ItemId::Key));

        activate_hotspot(&mut s, HotspotId::Pond);
        toggle_select(&mut s, ItemId::Stone);
        activate_hotspot(&mut s, HotspotId::Desk);
        activate_hotspot(&mut s, HotspotId::Desk);
        assert!(s.inventory.owns(ItemId::Charm));

        toggle_select(&mut s, ItemId::Key);
        activate_hotspot(&mut s, HotspotId::Gate);
        assert!(s.flags.gate_opened);
        assert!(!s.inventory.owns(ItemId::Key));
        assert!(!s.inventory.owns(ItemId::Charm));

        activate_hotspot(&mut s, HotspotId::Gate);
        choose_modal(&mut s, 0);
        assert_eq!(s.outcome, Outcome::Escaped);
    }
}
