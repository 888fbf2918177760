//! Healing-room escape — all data structures, no logic.
//!
//! Catalogs (items, rooms, hotspots) are enums with static info tables.
//! Puzzle progress is a set of one-way flags plus two stage machines for
//! the strictly ordered sub-puzzles (planter, desk box).

// ── Items ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemId {
    Seed,
    Stone,
    Note,
    Can,
    Flower,
    Key,
    Charm,
}

pub struct ItemInfo {
    pub label: &'static str,
    /// One-glyph icon for the inventory list.
    pub icon: &'static str,
}

pub fn item_info(id: ItemId) -> ItemInfo {
    match id {
        ItemId::Seed => ItemInfo { label: "種の小袋", icon: "種" },
        ItemId::Stone => ItemInfo { label: "池の小石", icon: "石" },
        ItemId::Note => ItemInfo { label: "メモ", icon: "文" },
        ItemId::Can => ItemInfo { label: "じょうろ", icon: "水" },
        ItemId::Flower => ItemInfo { label: "月光の花", icon: "花" },
        ItemId::Key => ItemInfo { label: "金の鍵", icon: "鍵" },
        ItemId::Charm => ItemInfo { label: "癒しのお守り", icon: "守" },
    }
}

pub const ALL_ITEMS: &[ItemId] = &[
    ItemId::Seed, ItemId::Stone, ItemId::Note, ItemId::Can,
    ItemId::Flower, ItemId::Key, ItemId::Charm,
];

// ── Rooms ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomId {
    Garden,
    Tea,
    Loft,
}

pub struct RoomInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub hotspots: &'static [HotspotId],
    /// Keyboard shortcut for room navigation.
    pub nav_key: char,
}

pub fn room_info(id: RoomId) -> RoomInfo {
    match id {
        RoomId::Garden => RoomInfo {
            name: "庭の休憩室",
            description: "やわらかな光が差し込む庭の休憩室。\n風鈴の音がかすかに聞こえる。",
            hotspots: &[
                HotspotId::Windchime,
                HotspotId::Pond,
                HotspotId::Bench,
                HotspotId::Planter,
                HotspotId::Gate,
            ],
            nav_key: 'g',
        },
        RoomId::Tea => RoomInfo {
            name: "茶室",
            description: "湯気の残る静かな茶室。\n棚の引き出しには数字の錠前が付いている。",
            hotspots: &[
                HotspotId::Cushion,
                HotspotId::Teatable,
                HotspotId::Window,
                HotspotId::Drawer,
            ],
            nav_key: 't',
        },
        RoomId::Loft => RoomInfo {
            name: "屋根裏の書斎",
            description: "本と静けさに満ちた屋根裏の書斎。\n棚の上にオルゴールが置かれている。",
            hotspots: &[
                HotspotId::Bookshelf,
                HotspotId::Musicbox,
                HotspotId::Desk,
            ],
            nav_key: 'l',
        },
    }
}

pub const ALL_ROOMS: &[RoomId] = &[RoomId::Garden, RoomId::Tea, RoomId::Loft];

// ── Hotspots ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HotspotId {
    Windchime,
    Pond,
    Bench,
    Planter,
    Gate,
    Cushion,
    Teatable,
    Window,
    Drawer,
    Bookshelf,
    Musicbox,
    Desk,
}

pub struct HotspotInfo {
    pub label: &'static str,
}

pub fn hotspot_info(id: HotspotId) -> HotspotInfo {
    match id {
        HotspotId::Windchime => HotspotInfo { label: "風鈴" },
        HotspotId::Pond => HotspotInfo { label: "池" },
        HotspotId::Bench => HotspotInfo { label: "ベンチ" },
        HotspotId::Planter => HotspotInfo { label: "植木鉢" },
        HotspotId::Gate => HotspotInfo { label: "正門" },
        HotspotId::Cushion => HotspotInfo { label: "クッション" },
        HotspotId::Teatable => HotspotInfo { label: "茶卓" },
        HotspotId::Window => HotspotInfo { label: "窓" },
        HotspotId::Drawer => HotspotInfo { label: "引き出し" },
        HotspotId::Bookshelf => HotspotInfo { label: "本棚" },
        HotspotId::Musicbox => HotspotInfo { label: "オルゴール" },
        HotspotId::Desk => HotspotInfo { label: "机" },
    }
}

// ── Progress ──────────────────────────────────────────────────

/// One-way puzzle milestones. Set once, never cleared during a session.
#[derive(Clone, Debug, Default)]
pub struct Flags {
    pub heard_chime: bool,
    pub found_note: bool,
    pub drawer_unlocked: bool,
    /// The watering can has been taken out of the drawer (granted once).
    pub drawer_emptied: bool,
    pub got_key: bool,
    pub gate_opened: bool,
}

/// The planter sequence. Stages only ever advance, so watering before
/// planting is unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlanterStage {
    Empty,
    Planted,
    Watered,
    Bloomed,
}

/// The desk box: opened with the stone, then emptied of its charm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeskStage {
    Closed,
    Opened,
    Emptied,
}

// ── Outcome ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Active,
    Escaped,
    TimedOut,
}

// ── Inventory ─────────────────────────────────────────────────

/// Owned items plus at most one selected item (the "tool in hand").
///
/// Invariant: `selected`, if present, is a member of `owned`.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    owned: Vec<ItemId>,
    selected: Option<ItemId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owns(&self, item: ItemId) -> bool {
        self.owned.contains(&item)
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn items(&self) -> &[ItemId] {
        &self.owned
    }

    /// Add an item. Returns false (no change) if already owned.
    pub fn acquire(&mut self, item: ItemId) -> bool {
        if self.owns(item) {
            return false;
        }
        self.owned.push(item);
        true
    }

    /// Remove an item, clearing the selection if it pointed at it.
    /// Returns false (no change) if the item is not owned.
    pub fn consume(&mut self, item: ItemId) -> bool {
        let Some(pos) = self.owned.iter().position(|&i| i == item) else {
            return false;
        };
        self.owned.remove(pos);
        if self.selected == Some(item) {
            self.selected = None;
        }
        true
    }

    /// Select an owned item, or deselect it if it is already selected.
    /// Selecting a non-owned item is rejected. Returns true on change.
    pub fn toggle_select(&mut self, item: ItemId) -> bool {
        if self.selected == Some(item) {
            self.selected = None;
            return true;
        }
        if self.owns(item) {
            self.selected = Some(item);
            return true;
        }
        false
    }
}

// ── Modal (display directive) ─────────────────────────────────

/// What a modal choice does when chosen. A tagged variant instead of a
/// callback so the dispatch table stays exhaustively checkable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceAction {
    Close,
    OpenCodeEntry,
    Escape,
    Restart,
}

#[derive(Clone, Debug)]
pub struct ModalChoice {
    pub label: String,
    pub secondary: bool,
    pub action: ChoiceAction,
}

/// One display directive: a title, a message, and optional follow-up
/// choices. Exactly one is emitted per resolved operation.
#[derive(Clone, Debug)]
pub struct Modal {
    pub title: String,
    pub body: String,
    pub choices: Vec<ModalChoice>,
}

impl Modal {
    pub fn message(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(title: &str, body: &str, choices: Vec<ModalChoice>) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            choices,
        }
    }
}

// ── Log ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Oldest log entries are dropped past this count.
pub const LOG_MAX: usize = 50;

// ── Session constants ─────────────────────────────────────────

/// Seconds on the countdown at session start.
pub const START_SECONDS: u32 = 600;

// ── Root Game State ───────────────────────────────────────────

pub struct GameState {
    pub room: RoomId,
    pub outcome: Outcome,
    pub inventory: Inventory,
    pub flags: Flags,
    pub planter: PlanterStage,
    pub desk: DeskStage,
    /// Append-only, duplicate-free hint log.
    pub journal: Vec<String>,
    /// Rolling message history (every display directive lands here too).
    pub log: Vec<LogEntry>,
    /// Remaining seconds. Frozen once the outcome is terminal.
    pub time_left: u32,
    /// Currently shown display directive, if any.
    pub modal: Option<Modal>,
    /// Digit buffer of the drawer keypad overlay, if open.
    pub code_entry: Option<String>,
}

impl GameState {
    pub fn new() -> Self {
        let mut state = GameState {
            room: RoomId::Garden,
            outcome: Outcome::Active,
            inventory: Inventory::new(),
            flags: Flags::default(),
            planter: PlanterStage::Empty,
            desk: DeskStage::Closed,
            journal: Vec::new(),
            log: Vec::new(),
            time_left: START_SECONDS,
            modal: None,
            code_entry: None,
        };
        state.add_log("気がつくと、癒しの部屋の中にいた…", true);
        state.add_log("時間が尽きる前に正門から出よう。", false);
        state.add_journal("正門は鍵がかかっている。癒しのお守りと鍵が必要そうだ。");
        state
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_MAX {
            self.log.remove(0);
        }
    }

    /// Append a journal hint. Duplicates are swallowed; returns true if
    /// the entry was actually added.
    pub fn add_journal(&mut self, entry: &str) -> bool {
        if self.journal.iter().any(|e| e == entry) {
            return false;
        }
        self.journal.push(entry.to_string());
        true
    }

    /// Hotspot at `index` in the current room's list.
    pub fn hotspot_at(&self, index: usize) -> Option<HotspotId> {
        room_info(self.room).hotspots.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let s = GameState::new();
        assert_eq!(s.room, RoomId::Garden);
        assert_eq!(s.outcome, Outcome::Active);
        assert_eq!(s.time_left, START_SECONDS);
        assert_eq!(s.planter, PlanterStage::Empty);
        assert_eq!(s.desk, DeskStage::Closed);
        assert!(s.inventory.items().is_empty());
        assert!(s.inventory.selected().is_none());
        assert!(s.modal.is_none());
        assert!(s.code_entry.is_none());
        // Opening hint is seeded at session start
        assert_eq!(s.journal.len(), 1);
    }

    #[test]
    fn all_items_have_info() {
        for &id in ALL_ITEMS {
            let info = item_info(id);
            assert!(!info.label.is_empty());
            assert!(!info.icon.is_empty());
        }
    }

    #[test]
    fn rooms_cover_all_hotspots_once() {
        let mut seen: Vec<HotspotId> = Vec::new();
        for &room in ALL_ROOMS {
            for &h in room_info(room).hotspots {
                assert!(!seen.contains(&h), "{:?} listed twice", h);
                seen.push(h);
            }
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn nav_keys_unique() {
        let keys: Vec<char> = ALL_ROOMS.iter().map(|&r| room_info(r).nav_key).collect();
        for (i, k) in keys.iter().enumerate() {
            assert!(!keys[i + 1..].contains(k));
        }
    }

    #[test]
    fn acquire_is_idempotent() {
        let mut inv = Inventory::new();
        assert!(inv.acquire(ItemId::Seed));
        assert!(!inv.acquire(ItemId::Seed));
        assert_eq!(inv.items().len(), 1);
    }

    #[test]
    fn consume_clears_matching_selection() {
        let mut inv = Inventory::new();
        inv.acquire(ItemId::Seed);
        inv.toggle_select(ItemId::Seed);
        assert_eq!(inv.selected(), Some(ItemId::Seed));

        assert!(inv.consume(ItemId::Seed));
        assert!(inv.selected().is_none());
        assert!(!inv.owns(ItemId::Seed));
    }

    #[test]
    fn consume_keeps_unrelated_selection() {
        let mut inv = Inventory::new();
        inv.acquire(ItemId::Seed);
        inv.acquire(ItemId::Stone);
        inv.toggle_select(ItemId::Stone);

        inv.consume(ItemId::Seed);
        assert_eq!(inv.selected(), Some(ItemId::Stone));
    }

    #[test]
    fn consume_unowned_is_noop() {
        let mut inv = Inventory::new();
        assert!(!inv.consume(ItemId::Key));
    }

    #[test]
    fn toggle_select_rejects_unowned() {
        let mut inv = Inventory::new();
        assert!(!inv.toggle_select(ItemId::Key));
        assert!(inv.selected().is_none());
    }

    #[test]
    fn toggle_select_roundtrip() {
        let mut inv = Inventory::new();
        inv.acquire(ItemId::Key);
        assert!(inv.toggle_select(ItemId::Key));
        assert_eq!(inv.selected(), Some(ItemId::Key));
        assert!(inv.toggle_select(ItemId::Key));
        assert!(inv.selected().is_none());
    }

    #[test]
    fn journal_dedup() {
        let mut s = GameState::new();
        assert!(s.add_journal("hint"));
        assert!(!s.add_journal("hint"));
        assert_eq!(s.journal.iter().filter(|e| *e == "hint").count(), 1);
    }

    #[test]
    fn log_truncation() {
        let mut s = GameState::new();
        for i in 0..(LOG_MAX + 20) {
            s.add_log(&format!("msg {}", i), false);
        }
        assert!(s.log.len() <= LOG_MAX);
    }

    #[test]
    fn stage_order() {
        assert!(PlanterStage::Empty < PlanterStage::Planted);
        assert!(PlanterStage::Planted < PlanterStage::Watered);
        assert!(PlanterStage::Watered < PlanterStage::Bloomed);
        assert!(DeskStage::Closed < DeskStage::Opened);
        assert!(DeskStage::Opened < DeskStage::Emptied);
    }

    #[test]
    fn hotspot_at_current_room() {
        let s = GameState::new();
        assert_eq!(s.hotspot_at(0), Some(HotspotId::Windchime));
        assert_eq!(s.hotspot_at(4), Some(HotspotId::Gate));
        assert_eq!(s.hotspot_at(5), None);
    }
}
