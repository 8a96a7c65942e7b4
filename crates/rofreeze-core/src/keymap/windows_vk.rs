//! Windows Virtual Key (VK) code table keyed by human-readable name.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`,
//! `VK_F3 = 0x72`).  They are "virtual" because they represent *logical* keys
//! rather than physical scan codes: pressing the letter Q on any keyboard layout
//! always produces `VK_Q = 0x51`.
//!
//! The config file names keys (`save_point = "Q"`); the low-level hooks see VK
//! codes.  This table is the bridge.  Only keys a user could reasonably bind
//! as a hotkey or repeat key are listed.

/// Canonical `(name, vk)` pairs.  The first entry for a VK code is its display name.
pub(crate) const NAMED_KEYS: &[(&str, u8)] = &[
    // ── Editing / whitespace ─────────────────────────────────────────────────
    ("Backspace", 0x08),
    ("Tab", 0x09),
    ("Enter", 0x0D),
    ("Shift", 0x10),
    ("Ctrl", 0x11),
    ("Alt", 0x12),
    ("Pause", 0x13),
    ("CapsLock", 0x14),
    ("Escape", 0x1B),
    ("Space", 0x20),
    // ── Navigation ───────────────────────────────────────────────────────────
    ("PageUp", 0x21),
    ("PageDown", 0x22),
    ("End", 0x23),
    ("Home", 0x24),
    ("Left", 0x25),
    ("Up", 0x26),
    ("Right", 0x27),
    ("Down", 0x28),
    ("PrintScreen", 0x2C),
    ("Insert", 0x2D),
    ("Delete", 0x2E),
    // ── Numpad ───────────────────────────────────────────────────────────────
    ("Numpad0", 0x60),
    ("Numpad1", 0x61),
    ("Numpad2", 0x62),
    ("Numpad3", 0x63),
    ("Numpad4", 0x64),
    ("Numpad5", 0x65),
    ("Numpad6", 0x66),
    ("Numpad7", 0x67),
    ("Numpad8", 0x68),
    ("Numpad9", 0x69),
    // ── Locks ────────────────────────────────────────────────────────────────
    ("NumLock", 0x90),
    ("ScrollLock", 0x91),
];

/// Alternative spellings accepted when parsing.
pub(crate) const ALIASES: &[(&str, u8)] = &[
    ("Esc", 0x1B),
    ("Return", 0x0D),
    ("Control", 0x11),
    ("Menu", 0x12),
    ("Spacebar", 0x20),
    ("Del", 0x2E),
    ("Ins", 0x2D),
    ("PgUp", 0x21),
    ("PgDn", 0x22),
];

/// VK codes that need `KEYEVENTF_EXTENDEDKEY` when injected.
const EXTENDED_VKS: &[u8] = &[
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, // nav
    0x2C, 0x2D, 0x2E, // PrintScreen, Insert, Delete
    0x90, // NumLock
];

/// Looks up a VK code by case-insensitive name.
///
/// Handles the generated ranges (`A`–`Z`, `0`–`9`, `F1`–`F24`) before the
/// explicit tables.
pub(crate) fn vk_from_name(name: &str) -> Option<u8> {
    let name = name.trim();
    let bytes = name.as_bytes();

    // Single letter or digit: VK code equals the uppercase ASCII value.
    if bytes.len() == 1 {
        let c = bytes[0].to_ascii_uppercase();
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            return Some(c);
        }
    }

    // Function keys F1 (0x70) … F24 (0x87).
    if bytes.len() >= 2 && bytes[0].eq_ignore_ascii_case(&b'F') {
        if let Ok(n) = name[1..].parse::<u8>() {
            if (1..=24).contains(&n) {
                return Some(0x70 + n - 1);
            }
        }
    }

    NAMED_KEYS
        .iter()
        .chain(ALIASES.iter())
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, vk)| vk)
}

/// Returns the canonical display name for a VK code, if it has one.
pub(crate) fn name_from_vk(vk: u8) -> Option<String> {
    match vk {
        b'A'..=b'Z' | b'0'..=b'9' => Some((vk as char).to_string()),
        0x70..=0x87 => Some(format!("F{}", vk - 0x70 + 1)),
        _ => NAMED_KEYS
            .iter()
            .find(|&&(_, code)| code == vk)
            .map(|(n, _)| (*n).to_string()),
    }
}

pub(crate) fn is_extended(vk: u8) -> bool {
    EXTENDED_VKS.contains(&vk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map_to_uppercase_ascii() {
        assert_eq!(vk_from_name("Q"), Some(0x51));
        assert_eq!(vk_from_name("q"), Some(0x51));
        assert_eq!(vk_from_name("z"), Some(0x5A));
    }

    #[test]
    fn test_digits_map_to_ascii() {
        assert_eq!(vk_from_name("0"), Some(0x30));
        assert_eq!(vk_from_name("9"), Some(0x39));
    }

    #[test]
    fn test_function_keys_cover_f1_to_f24() {
        assert_eq!(vk_from_name("F1"), Some(0x70));
        assert_eq!(vk_from_name("f3"), Some(0x72));
        assert_eq!(vk_from_name("F24"), Some(0x87));
        assert_eq!(vk_from_name("F0"), None);
        assert_eq!(vk_from_name("F25"), None);
    }

    #[test]
    fn test_named_keys_and_aliases_are_case_insensitive() {
        assert_eq!(vk_from_name("space"), Some(0x20));
        assert_eq!(vk_from_name("ESC"), Some(0x1B));
        assert_eq!(vk_from_name("Return"), Some(0x0D));
        assert_eq!(vk_from_name("  Insert  "), Some(0x2D));
    }

    #[test]
    fn test_unknown_names_return_none() {
        assert_eq!(vk_from_name(""), None);
        assert_eq!(vk_from_name("Hyper"), None);
        assert_eq!(vk_from_name("?"), None);
    }

    #[test]
    fn test_every_named_key_round_trips_through_its_name() {
        for &(name, vk) in NAMED_KEYS {
            assert_eq!(vk_from_name(name), Some(vk), "lookup of {name}");
            assert_eq!(name_from_vk(vk).as_deref(), Some(name), "name of {vk:#04x}");
        }
    }

    #[test]
    fn test_navigation_keys_are_extended() {
        assert!(is_extended(0x25));
        assert!(is_extended(0x2E));
        assert!(!is_extended(0x51));
        assert!(!is_extended(0x20));
    }
}
