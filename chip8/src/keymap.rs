use sdl2::keyboard::Scancode;

/// Host keys for the hex keypad, row by row, matching `KEYPAD`.
/// Scancodes name physical positions, so the grid stays put on non-QWERTY layouts.
const HOST_KEYS: [[Scancode; 4]; 4] = [
    [Scancode::Num1, Scancode::Num2, Scancode::Num3, Scancode::Num4],
    [Scancode::Q, Scancode::W, Scancode::E, Scancode::R],
    [Scancode::A, Scancode::S, Scancode::D, Scancode::F],
    [Scancode::Z, Scancode::X, Scancode::C, Scancode::V],
];

/// The COSMAC VIP hex keypad
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
#[rustfmt::skip]
const KEYPAD: [[u8; 4]; 4] = [
    [0x1, 0x2, 0x3, 0xC],
    [0x4, 0x5, 0x6, 0xD],
    [0x7, 0x8, 0x9, 0xE],
    [0xA, 0x0, 0xB, 0xF],
];

/// Finds the keypad key sitting at the same grid position as `key`.
pub fn keymap(key: Scancode) -> Option<u8> {
    HOST_KEYS
        .iter()
        .zip(KEYPAD.iter())
        .flat_map(|(host_row, pad_row)| host_row.iter().zip(pad_row.iter()))
        .find(|(host, _)| **host == key)
        .map(|(_, pad)| *pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_keypad_once() {
        let mapped: Vec<u8> = [
            Scancode::Num1, Scancode::Num2, Scancode::Num3, Scancode::Num4,
            Scancode::Q, Scancode::W, Scancode::E, Scancode::R,
            Scancode::A, Scancode::S, Scancode::D, Scancode::F,
            Scancode::Z, Scancode::X, Scancode::C, Scancode::V,
        ]
        .iter()
        .filter_map(|&key| keymap(key))
        .collect();
        let mut sorted = mapped.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0x0..=0xF).collect::<Vec<u8>>());
        assert_eq!(mapped[..4], [0x1, 0x2, 0x3, 0xC]);
    }

    #[test]
    fn test_keymap_corners() {
        assert_eq!(keymap(Scancode::Num1), Some(0x1));
        assert_eq!(keymap(Scancode::Num4), Some(0xC));
        assert_eq!(keymap(Scancode::Z), Some(0xA));
        assert_eq!(keymap(Scancode::X), Some(0x0));
        assert_eq!(keymap(Scancode::V), Some(0xF));
    }

    #[test]
    fn test_keymap_ignores_other_keys() {
        assert_eq!(keymap(Scancode::Space), None);
        assert_eq!(keymap(Scancode::Num0), None);
    }
}
