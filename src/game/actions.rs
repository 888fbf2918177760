//! Semantic action IDs for click targets.

// ── Room scene ─────────────────────────────────────────────────
/// Hotspot base: + index into the current room's hotspot list.
pub const HOTSPOT_BASE: u16 = 10;
/// Room navigation tab base: + index into `ALL_ROOMS`.
pub const NAV_BASE: u16 = 30;
/// Inventory slot base: + index into the owned-items list.
pub const INV_BASE: u16 = 40;

// ── Modal overlay ──────────────────────────────────────────────
/// Modal choice base: + index into the modal's choices.
pub const CHOICE_BASE: u16 = 60;
pub const CLOSE_MODAL: u16 = 70;

// ── Keypad overlay ─────────────────────────────────────────────
/// Keypad digit base: + digit value 0-9.
pub const KEYPAD_DIGIT_BASE: u16 = 80;
pub const KEYPAD_BACK: u16 = 90;
pub const KEYPAD_SUBMIT: u16 = 91;
pub const KEYPAD_CANCEL: u16 = 92;

// ── Ending ─────────────────────────────────────────────────────
pub const RESTART: u16 = 99;
