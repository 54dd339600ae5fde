//! IRC case-mapping used by the network indexes.
//!
//! Nicknames and channel names are indexed under their RFC 1459 lowercase
//! form, where `[]\~` are the uppercase forms of `{}|^`. Server names are
//! hostnames and fold with plain ASCII rules.

/// Lowercase a single character using RFC 1459 case mapping.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => (c as u8 + 32) as char,
        _ => c,
    }
}

/// Lowercase a nickname or channel name using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Fold a server name for lookup.
pub fn server_key(name: &str) -> String {
    name.to_ascii_lowercase()
}
