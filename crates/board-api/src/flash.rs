//! # Flash Redirect Channel
//!
//! One message slot per session that survives exactly one redirect. A
//! write overwrites the slot; the first read empties it, so a message is
//! delivered at most once even when two requests race for it. Entries
//! older than the configured TTL are dropped on read, and every write
//! sweeps the expired slots of all sessions, so messages nobody comes back
//! for do not accumulate.

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::session::SessionId;
use crate::state::Store;

#[derive(Debug, Clone)]
struct FlashEntry {
    message: String,
    written_at: Instant,
}

/// All flash slots, keyed by session id.
#[derive(Debug, Clone)]
pub struct FlashStore {
    slots: Store<Uuid, FlashEntry>,
    ttl: Duration,
}

impl FlashStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Store::new(),
            ttl,
        }
    }

    /// Number of stored messages, expired or not.
    pub fn pending(&self) -> usize {
        self.slots.len()
    }

    fn sweep_expired(&self) -> usize {
        let ttl = self.ttl;
        self.slots.remove_where(|entry| entry.written_at.elapsed() > ttl)
    }

    /// The slot belonging to one session.
    pub fn channel(&self, session: SessionId) -> FlashChannel<'_> {
        FlashChannel {
            store: self,
            session,
        }
    }
}

/// Read/write handle on one session's flash slot.
#[derive(Debug, Clone, Copy)]
pub struct FlashChannel<'a> {
    store: &'a FlashStore,
    session: SessionId,
}

impl FlashChannel<'_> {
    /// Store `message` for the next read, replacing any unread message.
    pub fn write(&self, message: impl Into<String>) {
        let swept = self.store.sweep_expired();
        if swept > 0 {
            tracing::debug!(swept, "swept expired flash messages");
        }
        self.store.slots.insert(
            self.session.0,
            FlashEntry {
                message: message.into(),
                written_at: Instant::now(),
            },
        );
    }

    /// Take the pending message, if any. A second call returns `None`.
    pub fn read_once(&self) -> Option<String> {
        let entry = self.store.slots.remove(&self.session.0)?;
        if entry.written_at.elapsed() > self.store.ttl {
            tracing::debug!(session = %self.session.0, "discarding expired flash message");
            return None;
        }
        Some(entry.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionId {
        SessionId(Uuid::new_v4())
    }

    #[test]
    fn message_is_read_exactly_once() {
        let store = FlashStore::new(Duration::from_secs(60));
        let channel = store.channel(session());
        channel.write("Warning: 게시글을 찾을 수 없습니다.");
        assert_eq!(
            channel.read_once().as_deref(),
            Some("Warning: 게시글을 찾을 수 없습니다.")
        );
        assert_eq!(channel.read_once(), None);
    }

    #[test]
    fn write_overwrites_unread_message() {
        let store = FlashStore::new(Duration::from_secs(60));
        let channel = store.channel(session());
        channel.write("first");
        channel.write("second");
        assert_eq!(channel.read_once().as_deref(), Some("second"));
    }

    #[test]
    fn sessions_do_not_share_slots() {
        let store = FlashStore::new(Duration::from_secs(60));
        store.channel(session()).write("mine");
        assert_eq!(store.channel(session()).read_once(), None);
    }

    #[test]
    fn expired_message_is_discarded() {
        let store = FlashStore::new(Duration::ZERO);
        let channel = store.channel(session());
        channel.write("stale");
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(channel.read_once(), None);
        assert_eq!(channel.read_once(), None);
    }

    #[test]
    fn write_sweeps_unread_expired_messages() {
        let store = FlashStore::new(Duration::from_millis(1));
        for _ in 0..50 {
            store.channel(session()).write("never read");
        }
        std::thread::sleep(Duration::from_millis(5));
        store.channel(session()).write("fresh");
        assert_eq!(store.pending(), 1);
    }

    #[test]
    fn write_keeps_live_messages_of_other_sessions() {
        let store = FlashStore::new(Duration::from_secs(60));
        let first = session();
        store.channel(first).write("first");
        store.channel(session()).write("second");
        assert_eq!(store.pending(), 2);
        assert_eq!(store.channel(first).read_once().as_deref(), Some("first"));
    }

    #[test]
    fn concurrent_readers_receive_one_copy() {
        let store = FlashStore::new(Duration::from_secs(60));
        let id = session();
        store.channel(id).write("once");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.channel(id).read_once())
            })
            .collect();
        let delivered = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();
        assert_eq!(delivered, 1);
    }
}
