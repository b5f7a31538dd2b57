//! Virtual key codes as reported by browser keyboard events.

pub const BACKSPACE: u32 = 8;
pub const TAB: u32 = 9;
pub const ENTER: u32 = 13;
pub const SHIFT: u32 = 16;
pub const ESCAPE: u32 = 27;
pub const SPACE: u32 = 32;
pub const LEFT: u32 = 37;
pub const UP: u32 = 38;
pub const RIGHT: u32 = 39;
pub const DOWN: u32 = 40;

/// Letter keys use their uppercase ASCII code.
pub const fn letter(c: char) -> u32 {
    c.to_ascii_uppercase() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_ascii() {
        assert_eq!(letter('a'), 65);
        assert_eq!(letter('W'), 87);
    }
}
