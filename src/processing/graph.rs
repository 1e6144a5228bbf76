use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::models::Message;

const PROGRESS_INTERVAL: usize = 10_000;

#[derive(Debug)]
pub(super) struct Node {
    pub(super) text: String,
    /// Ids of messages that replied to this one (edges run parent → replier).
    pub(super) replies: Vec<u64>,
    /// Whether this message was attached under a parent that exists in the graph.
    pub(super) has_parent: bool,
}

/// Reply graph over one batch of messages. Arena-style: nodes live in a map
/// keyed by message id, edges are id lists, so out-of-order and dangling
/// references never produce ownership cycles.
#[derive(Debug)]
pub struct ReplyGraph {
    pub(super) nodes: HashMap<u64, Node>,
    /// Ids in first-seen order, so extraction is deterministic for a given
    /// input order. May contain ids of nodes removed during cleanup.
    pub(super) order: Vec<u64>,
}

impl ReplyGraph {
    /// Builds the graph in a single pass over `messages`.
    ///
    /// Replies whose parent has not been seen yet wait in a pending bucket
    /// keyed by the awaited id and are attached when (if) the parent shows
    /// up, so children may arrive before their parents. A reply to an id
    /// that never appears simply stays unattached. After the pass, messages
    /// with no reply edges at all are dropped: they are neither questions
    /// nor answers.
    ///
    /// Duplicate ids are a data-integrity error; the caller decides whether
    /// to abort or re-run with fixed input.
    pub fn build<I>(messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = Message>,
    {
        let mut nodes: HashMap<u64, Node> = HashMap::new();
        let mut order: Vec<u64> = Vec::new();
        // Replies waiting for a parent not yet observed, keyed by the awaited id.
        let mut pending: HashMap<u64, Vec<u64>> = HashMap::new();
        let mut processed = 0usize;

        for msg in messages {
            if processed % PROGRESS_INTERVAL == 0 && processed > 0 {
                println!("📨 Processed {} messages", processed);
            }
            processed += 1;

            if nodes.contains_key(&msg.id) {
                bail!("duplicate message id {} in input", msg.id);
            }

            // A self-reply can never form a real thread; treat it as dangling.
            let reply_to = msg.reply_to_id.filter(|&target| target != msg.id);

            nodes.insert(
                msg.id,
                Node {
                    text: msg.text,
                    replies: Vec::new(),
                    has_parent: false,
                },
            );
            order.push(msg.id);

            if let Some(target) = reply_to {
                if nodes.contains_key(&target) {
                    attach(&mut nodes, target, msg.id);
                } else {
                    pending.entry(target).or_default().push(msg.id);
                }
            }

            if let Some(waiters) = pending.remove(&msg.id) {
                for waiter in waiters {
                    attach(&mut nodes, msg.id, waiter);
                }
            }
        }

        // Whatever is left in `pending` referenced parents that never
        // appeared; those messages just never gained a parent edge.

        // Isolated messages (no replies, not a reply to anything that
        // exists) carry no conversation.
        nodes.retain(|_, node| node.has_parent || !node.replies.is_empty());

        Ok(Self { nodes, order })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn attach(nodes: &mut HashMap<u64, Node>, parent: u64, child: u64) {
    if let Some(node) = nodes.get_mut(&parent) {
        node.replies.push(child);
    }
    if let Some(node) = nodes.get_mut(&child) {
        node.has_parent = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: u64, reply_to_id: Option<u64>, text: &str) -> Message {
        Message {
            id,
            reply_to_id,
            text: text.to_string(),
        }
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = ReplyGraph::build(Vec::new()).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_id_is_an_error() {
        let err = ReplyGraph::build(vec![
            msg(1, None, "first"),
            msg(1, None, "again"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate message id 1"));
    }

    #[test]
    fn isolated_messages_are_dropped() {
        let graph = ReplyGraph::build(vec![
            msg(1, None, "lonely"),
            msg(2, None, "question"),
            msg(3, Some(2), "answer"),
        ])
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert!(!graph.nodes.contains_key(&1));
    }

    #[test]
    fn child_before_parent_still_attaches() {
        let graph = ReplyGraph::build(vec![
            msg(5, Some(9), "answer seen first"),
            msg(9, None, "question seen later"),
        ])
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes[&9].replies, vec![5]);
        assert!(graph.nodes[&5].has_parent);
    }

    #[test]
    fn dangling_reference_leaves_message_isolated() {
        let graph = ReplyGraph::build(vec![
            msg(1, Some(999), "reply to nothing"),
            msg(2, None, "question"),
            msg(3, Some(2), "answer"),
        ])
        .unwrap();
        assert!(!graph.nodes.contains_key(&1));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn dangling_parent_with_live_replies_survives_as_root() {
        // 1 replies to a message we never see, but 2 replies to 1, so 1
        // stays in the graph with no parent edge.
        let graph = ReplyGraph::build(vec![
            msg(1, Some(999), "half-orphan"),
            msg(2, Some(1), "reply to the orphan"),
        ])
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert!(!graph.nodes[&1].has_parent);
        assert_eq!(graph.nodes[&1].replies, vec![2]);
    }

    #[test]
    fn self_reference_is_ignored() {
        let graph = ReplyGraph::build(vec![
            msg(1, Some(1), "talking to myself"),
            msg(2, None, "question"),
            msg(3, Some(2), "answer"),
        ])
        .unwrap();
        assert!(!graph.nodes.contains_key(&1));
    }

    #[test]
    fn self_reference_with_real_replies_is_kept() {
        let graph = ReplyGraph::build(vec![
            msg(1, Some(1), "self-reply that others answer"),
            msg(2, Some(1), "actual reply"),
        ])
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes[&1].replies, vec![2]);
        assert!(!graph.nodes[&1].has_parent);
    }
}
