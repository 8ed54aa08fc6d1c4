// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A physical keyboard key or mouse button.
///
/// Discriminants follow the Win32 virtual-key numbering, so every key fits
/// the input system's 256-entry state tables. Mouse buttons share the key
/// space, like they do in the virtual-key scheme.
///
/// The left/right modifier variants and the numpad digits are "extended"
/// keys: pressing one also drives its regular counterpart (see
/// [`Key::regular_alias`]), so code that does not care which shift was held
/// can simply query [`Key::Shift`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    /// The left mouse button.
    MouseLeft = 0x01,
    /// The right mouse button.
    MouseRight = 0x02,
    /// The middle mouse button.
    MouseMiddle = 0x04,
    /// The first extra mouse button, typically on the side.
    MouseFour = 0x05,
    /// The second extra mouse button.
    MouseFive = 0x06,
    /// The backspace key.
    Backspace = 0x08,
    /// The tab key.
    Tab = 0x09,
    /// The enter key.
    Enter = 0x0D,
    /// Either shift key. Driven as an alias of [`Key::LShift`] and [`Key::RShift`].
    Shift = 0x10,
    /// Either control key.
    Control = 0x11,
    /// Either alt key.
    Alt = 0x12,
    /// The escape key.
    Escape = 0x1B,
    /// The space bar.
    Space = 0x20,
    /// The `0` key on the main row. Also driven by [`Key::Numpad0`].
    Digit0 = 0x30,
    /// The `1` key on the main row.
    Digit1 = 0x31,
    /// The `2` key on the main row.
    Digit2 = 0x32,
    /// The `3` key on the main row.
    Digit3 = 0x33,
    /// The `4` key on the main row.
    Digit4 = 0x34,
    /// The `5` key on the main row.
    Digit5 = 0x35,
    /// The `6` key on the main row.
    Digit6 = 0x36,
    /// The `7` key on the main row.
    Digit7 = 0x37,
    /// The `8` key on the main row.
    Digit8 = 0x38,
    /// The `9` key on the main row.
    Digit9 = 0x39,
    /// The `A` key.
    A = 0x41,
    /// The `B` key.
    B = 0x42,
    /// The `C` key.
    C = 0x43,
    /// The `D` key.
    D = 0x44,
    /// The `E` key.
    E = 0x45,
    /// The `F` key.
    F = 0x46,
    /// The `G` key.
    G = 0x47,
    /// The `H` key.
    H = 0x48,
    /// The `I` key.
    I = 0x49,
    /// The `J` key.
    J = 0x4A,
    /// The `K` key.
    K = 0x4B,
    /// The `L` key.
    L = 0x4C,
    /// The `M` key.
    M = 0x4D,
    /// The `N` key.
    N = 0x4E,
    /// The `O` key.
    O = 0x4F,
    /// The `P` key.
    P = 0x50,
    /// The `Q` key.
    Q = 0x51,
    /// The `R` key.
    R = 0x52,
    /// The `S` key.
    S = 0x53,
    /// The `T` key.
    T = 0x54,
    /// The `U` key.
    U = 0x55,
    /// The `V` key.
    V = 0x56,
    /// The `W` key.
    W = 0x57,
    /// The `X` key.
    X = 0x58,
    /// The `Y` key.
    Y = 0x59,
    /// The `Z` key.
    Z = 0x5A,
    /// The `0` key on the numpad. Extended; also drives [`Key::Digit0`].
    Numpad0 = 0x60,
    /// The `1` key on the numpad.
    Numpad1 = 0x61,
    /// The `2` key on the numpad.
    Numpad2 = 0x62,
    /// The `3` key on the numpad.
    Numpad3 = 0x63,
    /// The `4` key on the numpad.
    Numpad4 = 0x64,
    /// The `5` key on the numpad.
    Numpad5 = 0x65,
    /// The `6` key on the numpad.
    Numpad6 = 0x66,
    /// The `7` key on the numpad.
    Numpad7 = 0x67,
    /// The `8` key on the numpad.
    Numpad8 = 0x68,
    /// The `9` key on the numpad.
    Numpad9 = 0x69,
    /// The numpad `*` key.
    Multiply = 0x6A,
    /// The numpad `+` key.
    Add = 0x6B,
    /// The numpad `-` key.
    Subtract = 0x6D,
    /// The numpad `.` key.
    Decimal = 0x6E,
    /// The numpad `/` key.
    Divide = 0x6F,
    /// The left shift key. Extended; also drives [`Key::Shift`].
    LShift = 0xA0,
    /// The right shift key. Extended; also drives [`Key::Shift`].
    RShift = 0xA1,
    /// The left control key. Extended; also drives [`Key::Control`].
    LControl = 0xA2,
    /// The right control key. Extended; also drives [`Key::Control`].
    RControl = 0xA3,
    /// The left alt key. Extended; also drives [`Key::Alt`].
    LAlt = 0xA4,
    /// The right alt key. Extended; also drives [`Key::Alt`].
    RAlt = 0xA5,
}

impl Key {
    /// Returns the key's code in the 256-entry key space.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the regular key an extended key also drives, or `None` for
    /// keys without an extended/regular split.
    ///
    /// Left/right modifier variants map to their generic modifier, numpad
    /// digits map to the main-row digits. The mapping is one-directional:
    /// a regular key never maps back to one of its extended variants.
    pub const fn regular_alias(self) -> Option<Key> {
        match self {
            Key::LShift | Key::RShift => Some(Key::Shift),
            Key::LControl | Key::RControl => Some(Key::Control),
            Key::LAlt | Key::RAlt => Some(Key::Alt),
            Key::Numpad0 => Some(Key::Digit0),
            Key::Numpad1 => Some(Key::Digit1),
            Key::Numpad2 => Some(Key::Digit2),
            Key::Numpad3 => Some(Key::Digit3),
            Key::Numpad4 => Some(Key::Digit4),
            Key::Numpad5 => Some(Key::Digit5),
            Key::Numpad6 => Some(Key::Digit6),
            Key::Numpad7 => Some(Key::Digit7),
            Key::Numpad8 => Some(Key::Digit8),
            Key::Numpad9 => Some(Key::Digit9),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_virtual_key_numbering() {
        assert_eq!(Key::MouseLeft.code(), 0x01);
        assert_eq!(Key::Space.code(), 0x20);
        assert_eq!(Key::Digit0.code(), 0x30);
        assert_eq!(Key::A.code(), 0x41);
        assert_eq!(Key::Numpad9.code(), 0x69);
        assert_eq!(Key::LShift.code(), 0xA0);
        assert_eq!(Key::RAlt.code(), 0xA5);
    }

    #[test]
    fn modifiers_alias_to_generic_variant() {
        assert_eq!(Key::LShift.regular_alias(), Some(Key::Shift));
        assert_eq!(Key::RShift.regular_alias(), Some(Key::Shift));
        assert_eq!(Key::LControl.regular_alias(), Some(Key::Control));
        assert_eq!(Key::RControl.regular_alias(), Some(Key::Control));
        assert_eq!(Key::LAlt.regular_alias(), Some(Key::Alt));
        assert_eq!(Key::RAlt.regular_alias(), Some(Key::Alt));
    }

    #[test]
    fn numpad_digits_alias_to_main_row() {
        assert_eq!(Key::Numpad0.regular_alias(), Some(Key::Digit0));
        assert_eq!(Key::Numpad5.regular_alias(), Some(Key::Digit5));
        assert_eq!(Key::Numpad9.regular_alias(), Some(Key::Digit9));
    }

    #[test]
    fn regular_keys_have_no_alias() {
        assert_eq!(Key::Shift.regular_alias(), None);
        assert_eq!(Key::Digit0.regular_alias(), None);
        assert_eq!(Key::A.regular_alias(), None);
        assert_eq!(Key::MouseLeft.regular_alias(), None);
        assert_eq!(Key::Multiply.regular_alias(), None);
    }
}
