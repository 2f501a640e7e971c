use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::models::PostReadReceipt;

/// Number of `post_ids` the user holds no receipt for.
pub fn compute_unread_count<'a>(
    user_id: i64,
    post_ids: &[i64],
    receipts: impl IntoIterator<Item = &'a PostReadReceipt>,
) -> usize {
    let read: HashSet<i64> = receipts
        .into_iter()
        .filter(|r| r.user_id == user_id)
        .map(|r| r.post_id)
        .collect();

    post_ids.iter().filter(|id| !read.contains(id)).count()
}

/// In-memory receipt table keyed by `(user_id, post_id)`. The first read time
/// is kept; later reads of the same pair change nothing.
#[derive(Debug, Clone, Default)]
pub struct ReadLedger {
    receipts: BTreeMap<(i64, i64), DateTime<Utc>>,
}

impl ReadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when a new receipt was recorded.
    pub fn mark_read(&mut self, user_id: i64, post_id: i64, read_at: DateTime<Utc>) -> bool {
        match self.receipts.entry((user_id, post_id)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(read_at);
                true
            }
        }
    }

    pub fn is_read(&self, user_id: i64, post_id: i64) -> bool {
        self.receipts.contains_key(&(user_id, post_id))
    }

    pub fn unread_count(&self, user_id: i64, post_ids: &[i64]) -> usize {
        post_ids
            .iter()
            .filter(|&&post_id| !self.is_read(user_id, post_id))
            .count()
    }

    pub fn receipts(&self) -> impl Iterator<Item = PostReadReceipt> + '_ {
        self.receipts
            .iter()
            .map(|(&(user_id, post_id), &read_at)| PostReadReceipt {
                user_id,
                post_id,
                read_at,
            })
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}
