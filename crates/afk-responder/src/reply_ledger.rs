use std::collections::{HashMap, HashSet};

use afk_channel_match::SpaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Handle for an automatic-path claim on a space, returned by [`ReplyLedger::reserve`].
pub struct Reservation {
    space_id: SpaceId,
    token: u64,
}

impl Reservation {
    pub fn space_id(&self) -> SpaceId {
        self.space_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Spaces that already received the automatic notice. Process-lifetime only.
///
/// Entries claimed by an in-flight automatic send stay pending until the
/// claim is settled or released. Any administrative mutation of a pending
/// entry settles it, so a release never undoes an administrator's change.
pub struct ReplyLedger {
    replied: HashSet<SpaceId>,
    pending: HashMap<SpaceId, u64>,
    next_token: u64,
}

impl ReplyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: SpaceId) -> bool {
        self.replied.contains(&id)
    }

    pub fn is_pending(&self, id: SpaceId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Returns `true` when `id` was not present before. Settles a pending claim.
    pub fn insert(&mut self, id: SpaceId) -> bool {
        self.pending.remove(&id);
        self.replied.insert(id)
    }

    /// Returns `true` when `id` was present and is now removed.
    pub fn remove(&mut self, id: SpaceId) -> bool {
        self.pending.remove(&id);
        self.replied.remove(&id)
    }

    /// Removes every entry and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.replied.len();
        self.replied.clear();
        self.pending.clear();
        removed
    }

    /// Claims `id` for an automatic send. `None` when it is already recorded.
    pub fn reserve(&mut self, id: SpaceId) -> Option<Reservation> {
        if !self.replied.insert(id) {
            return None;
        }
        self.next_token = self.next_token.wrapping_add(1);
        self.pending.insert(id, self.next_token);
        Some(Reservation {
            space_id: id,
            token: self.next_token,
        })
    }

    /// Keeps the entry after a delivered send. Returns `false` when the claim
    /// was already settled by an administrative change.
    pub fn settle(&mut self, reservation: Reservation) -> bool {
        if !self.owns(reservation) {
            return false;
        }
        self.pending.remove(&reservation.space_id);
        true
    }

    /// Drops the entry after a failed send, only while the claim is still
    /// this reservation's. Returns `true` when the entry was removed.
    pub fn release(&mut self, reservation: Reservation) -> bool {
        if !self.owns(reservation) {
            return false;
        }
        self.pending.remove(&reservation.space_id);
        self.replied.remove(&reservation.space_id)
    }

    fn owns(&self, reservation: Reservation) -> bool {
        self.pending.get(&reservation.space_id) == Some(&reservation.token)
    }

    pub fn len(&self) -> usize {
        self.replied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replied.is_empty()
    }

    pub fn sorted_ids(&self) -> Vec<SpaceId> {
        let mut ids = self.replied.iter().copied().collect::<Vec<_>>();
        ids.sort();
        ids
    }
}
