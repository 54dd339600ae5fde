//! UID generation for TS6-style user identifiers.

use crate::state::{Sid, Uid};
use std::sync::atomic::{AtomicU64, Ordering};

/// Generates UIDs for the pseudo-clients this process introduces.
///
/// Format: SID (3 chars) + client ID (6 chars base36) = 9 chars total,
/// e.g. `"00AAAAAAA"`. A services process owns no real user connections,
/// so numbering starts at `AAAAAA`.
pub struct UidGenerator {
    sid: Sid,
    counter: AtomicU64,
}

impl UidGenerator {
    pub fn new(sid: Sid) -> Self {
        Self {
            sid,
            counter: AtomicU64::new(0),
        }
    }

    /// Generate the next unique UID.
    pub fn next(&self) -> Uid {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.sid, base36_encode_6(n))
    }
}

/// Encode a number as a 6-character base36 string.
fn base36_encode_6(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut result = [b'A'; 6];

    for slot in result.iter_mut().rev() {
        *slot = CHARS[(n % 36) as usize];
        n /= 36;
    }

    String::from_utf8_lossy(&result).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_uids_start_at_aaaaaa() {
        let generator = UidGenerator::new("00A".to_string());
        assert_eq!(generator.next(), "00AAAAAAA");
        assert_eq!(generator.next(), "00AAAAAAB");
    }

    #[test]
    fn base36_rolls_over() {
        assert_eq!(base36_encode_6(35), "AAAAA9");
        assert_eq!(base36_encode_6(36), "AAAABA");
    }
}
