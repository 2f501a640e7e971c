use std::collections::HashMap;

use crate::models::{CommentNode, ForumComment};

/// Nests the comments of one post under their parents.
///
/// Input is expected oldest first. A reply is attached only when its parent
/// was already seen; otherwise it is dropped together with anything replying
/// to it. Soft-deleted comments are skipped, so replies to them drop as well.
pub fn build_thread(comments: Vec<ForumComment>) -> Vec<CommentNode> {
    let mut slot_of: HashMap<i64, usize> = HashMap::new();
    let mut entries: Vec<(ForumComment, Vec<usize>)> = Vec::with_capacity(comments.len());
    let mut roots = Vec::new();

    for comment in comments.into_iter().filter(|c| !c.is_deleted) {
        let slot = entries.len();
        match comment.parent_id {
            None => roots.push(slot),
            Some(parent_id) => match slot_of.get(&parent_id) {
                Some(&parent_slot) => entries[parent_slot].1.push(slot),
                None => tracing::debug!(
                    comment_id = comment.id,
                    parent_id,
                    "dropping comment whose parent is not in the thread"
                ),
            },
        }
        slot_of.insert(comment.id, slot);
        entries.push((comment, Vec::new()));
    }

    // Replies always sit in later slots than their parent, so building from
    // the back has every reply ready before its parent needs it.
    let mut built: Vec<Option<CommentNode>> = (0..entries.len()).map(|_| None).collect();
    while let Some((comment, reply_slots)) = entries.pop() {
        let replies = reply_slots
            .into_iter()
            .filter_map(|slot| built[slot].take())
            .collect();
        built[entries.len()] = Some(CommentNode { comment, replies });
    }

    roots
        .into_iter()
        .filter_map(|slot| built[slot].take())
        .collect()
}

/// Total number of comments in a forest, replies included.
pub fn thread_size(forest: &[CommentNode]) -> usize {
    forest.iter().map(CommentNode::thread_size).sum()
}
