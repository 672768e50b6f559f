// Text avatars shown next to chat messages and in the online users list.

use std::fmt;


pub const AVATAR_INITIALS_LEN: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AvatarColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// Lowercase hex without the leading '#', e.g. "1f8a3c".
impl fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub fn avatar_initials(username: &str) -> String {
    username.chars().take(AVATAR_INITIALS_LEN).collect::<String>().to_uppercase()
}

// Stable color derived from the username. Hashes UTF-16 code units so that a JS page computing
// the same hash agrees with us.
pub fn avatar_color(username: &str) -> AvatarColor {
    let hash = username
        .encode_utf16()
        .fold(0i32, |hash, unit| i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash)));
    let [_, r, g, b] = (hash as u32).to_be_bytes();
    AvatarColor { r, g, b }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials() {
        assert_eq!(avatar_initials("magnus"), "MAG");
        assert_eq!(avatar_initials("al"), "AL");
        assert_eq!(avatar_initials("élise"), "ÉLI");
        assert_eq!(avatar_initials(""), "");
    }

    #[test]
    fn color_is_stable() {
        assert_eq!(avatar_color("magnus"), avatar_color("magnus"));
        assert_ne!(avatar_color("magnus"), avatar_color("hikaru"));
        assert_eq!(avatar_color("").to_string(), "000000");
        // 'a' = 97 = 0x61.
        assert_eq!(avatar_color("a").to_string(), "000061");
    }
}
