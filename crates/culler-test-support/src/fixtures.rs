//! Record builders for common torrent states.

use culler_torrent_core::TorrentRecord;

/// Torrent that is neither finished nor stalled.
#[must_use]
pub fn idle(id: i64, name: &str) -> TorrentRecord {
    TorrentRecord::new(id, name)
}

/// Torrent reported as stalled.
#[must_use]
pub fn stalled(id: i64, name: &str) -> TorrentRecord {
    TorrentRecord::new(id, name).stalled(true)
}

/// Torrent reported as finished.
#[must_use]
pub fn finished(id: i64, name: &str) -> TorrentRecord {
    TorrentRecord::new(id, name).finished(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_expected_flags() {
        assert!(!idle(1, "a").is_stalled && !idle(1, "a").is_finished);
        assert!(stalled(2, "b").is_stalled);
        assert!(finished(3, "c").is_finished);
        assert_eq!(finished(3, "c").name, "c");
    }
}
