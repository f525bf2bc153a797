//! Virtual-key to scan-code mapping (US set-1 layout).
//!
//! Injected key events must carry scan codes so applications reading host
//! `code` values see real keys. Extended keys (the nav cluster, arrows and
//! right-side modifiers) additionally set the extended flag.

/// Scan code and extended flag for a virtual-key code.
///
/// Unknown VKs map to scan code 0 without the extended flag; hosts fall back
/// to VK-only interpretation for those.
#[must_use]
pub fn scan_code_for_vk(vk: u32) -> (u16, bool) {
    // Letters.
    const LETTERS: [u16; 26] = [
        0x1E, 0x30, 0x2E, 0x20, 0x12, 0x21, 0x22, 0x23, 0x17, 0x24, 0x25, 0x26, 0x32, 0x31, 0x18,
        0x19, 0x10, 0x13, 0x1F, 0x14, 0x16, 0x2F, 0x11, 0x2D, 0x15, 0x2C,
    ];
    // Digits 0-9 (0x30..=0x39): note scan row order 1..9,0.
    const DIGITS: [u16; 10] = [0x0B, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];

    match vk {
        0x41..=0x5A => (LETTERS[(vk - 0x41) as usize], false),
        0x30..=0x39 => (DIGITS[(vk - 0x30) as usize], false),
        0x70..=0x79 => ((0x3B + (vk - 0x70)) as u16, false), // F1-F10
        0x7A => (0x57, false),                               // F11
        0x7B => (0x58, false),                               // F12
        0x08 => (0x0E, false),                               // Backspace
        0x09 => (0x0F, false),                               // Tab
        0x0D => (0x1C, false),                               // Enter
        0x10 => (0x2A, false),                               // Shift (left)
        0x11 => (0x1D, false),                               // Ctrl (left)
        0x12 => (0x38, false),                               // Alt (left)
        0x14 => (0x3A, false),                               // CapsLock
        0x1B => (0x01, false),                               // Escape
        0x20 => (0x39, false),                               // Space
        0x21 => (0x49, true),                                // PageUp
        0x22 => (0x51, true),                                // PageDown
        0x23 => (0x4F, true),                                // End
        0x24 => (0x47, true),                                // Home
        0x25 => (0x4B, true),                                // Left
        0x26 => (0x48, true),                                // Up
        0x27 => (0x4D, true),                                // Right
        0x28 => (0x50, true),                                // Down
        0x2D => (0x52, true),                                // Insert
        0x2E => (0x53, true),                                // Delete
        0x5B => (0x5B, true),                                // LWin
        0x5C => (0x5C, true),                                // RWin
        0x5D => (0x5D, true),                                // Apps
        0xA1 => (0x36, false),                               // RShift
        0xA3 => (0x1D, true),                                // RCtrl
        0xA5 => (0x38, true),                                // RAlt
        0xBA => (0x27, false),                               // ;
        0xBB => (0x0D, false),                               // =
        0xBC => (0x33, false),                               // ,
        0xBD => (0x0C, false),                               // -
        0xBE => (0x34, false),                               // .
        0xBF => (0x35, false),                               // /
        0xC0 => (0x29, false),                               // `
        0xDB => (0x1A, false),                               // [
        0xDC => (0x2B, false),                               // backslash
        0xDD => (0x1B, false),                               // ]
        0xDE => (0x28, false),                               // '
        _ => (0, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(scan_code_for_vk(0x41), (0x1E, false)); // A
        assert_eq!(scan_code_for_vk(0x5A), (0x2C, false)); // Z
    }

    #[test]
    fn test_digits() {
        assert_eq!(scan_code_for_vk(0x31), (0x02, false)); // 1
        assert_eq!(scan_code_for_vk(0x30), (0x0B, false)); // 0
    }

    #[test]
    fn test_space_and_enter() {
        assert_eq!(scan_code_for_vk(0x20), (0x39, false));
        assert_eq!(scan_code_for_vk(0x0D), (0x1C, false));
    }

    #[test]
    fn test_arrows_are_extended() {
        for vk in 0x25..=0x28 {
            let (scan, extended) = scan_code_for_vk(vk);
            assert!(extended, "vk 0x{vk:02X} should be extended");
            assert_ne!(scan, 0);
        }
    }

    #[test]
    fn test_right_modifiers_extended() {
        assert_eq!(scan_code_for_vk(0xA3), (0x1D, true));
        assert_eq!(scan_code_for_vk(0xA5), (0x38, true));
        // Left-side counterparts are not extended.
        assert_eq!(scan_code_for_vk(0x11), (0x1D, false));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(scan_code_for_vk(0x70), (0x3B, false)); // F1
        assert_eq!(scan_code_for_vk(0x79), (0x44, false)); // F10
        assert_eq!(scan_code_for_vk(0x7A), (0x57, false)); // F11
        assert_eq!(scan_code_for_vk(0x7B), (0x58, false)); // F12
    }

    #[test]
    fn test_unknown_vk_maps_to_zero() {
        assert_eq!(scan_code_for_vk(0xFFFF), (0, false));
    }
}
