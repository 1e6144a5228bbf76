use std::collections::HashSet;

use crate::models::QuestionAnswers;

use super::graph::ReplyGraph;

/// Walks every thread in the graph and emits one `QuestionAnswers` per root.
///
/// A root is a surviving message that is not itself attached under a parent.
/// Roots are visited in the order their messages were first seen, so the
/// output is stable for a given input order. Descendants are collected with
/// an explicit stack rather than recursion, so arbitrarily deep reply chains
/// cannot blow the stack, and a visited set keeps malformed reply loops from
/// spinning forever.
pub fn question_answer_pairs(graph: &ReplyGraph) -> Vec<QuestionAnswers> {
    let mut results = Vec::new();

    for &root_id in &graph.order {
        let Some(root) = graph.nodes.get(&root_id) else {
            continue; // removed as isolated
        };
        if root.has_parent {
            continue;
        }

        let mut visited: HashSet<u64> = HashSet::new();
        visited.insert(root_id);

        let mut stack: Vec<u64> = root.replies.iter().rev().copied().collect();
        let mut answers = Vec::new();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(node) = graph.nodes.get(&id) {
                answers.push(node.text.clone());
                stack.extend(node.replies.iter().rev().copied());
            }
        }

        results.push(QuestionAnswers {
            question: root.text.clone(),
            answers,
        });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    fn msg(id: u64, reply_to_id: Option<u64>, text: &str) -> Message {
        Message {
            id,
            reply_to_id,
            text: text.to_string(),
        }
    }

    fn pairs_for(messages: Vec<Message>) -> Vec<QuestionAnswers> {
        let graph = ReplyGraph::build(messages).unwrap();
        question_answer_pairs(&graph)
    }

    /// Sorts entries and answers so runs with different input orders can be
    /// compared for set equality.
    fn normalized(mut pairs: Vec<QuestionAnswers>) -> Vec<QuestionAnswers> {
        for pair in &mut pairs {
            pair.answers.sort();
        }
        pairs.sort_by(|a, b| a.question.cmp(&b.question));
        pairs
    }

    #[test]
    fn two_threads_from_the_worked_example() {
        let pairs = pairs_for(vec![
            msg(1, None, "Q1"),
            msg(2, Some(1), "A1"),
            msg(3, Some(2), "A2"),
            msg(4, None, "Q2"),
            msg(5, Some(4), "A3"),
        ]);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "Q1");
        assert_eq!(pairs[0].answers, vec!["A1", "A2"]);
        assert_eq!(pairs[1].question, "Q2");
        assert_eq!(pairs[1].answers, vec!["A3"]);
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        assert!(pairs_for(Vec::new()).is_empty());
    }

    #[test]
    fn every_emitted_pair_has_at_least_one_answer() {
        let pairs = pairs_for(vec![
            msg(1, None, "isolated"),
            msg(2, None, "Q"),
            msg(3, Some(2), "A"),
            msg(4, Some(77), "dangling"),
        ]);
        assert_eq!(pairs.len(), 1);
        for pair in &pairs {
            assert!(!pair.answers.is_empty());
        }
    }

    #[test]
    fn each_message_appears_exactly_once_across_output() {
        let pairs = pairs_for(vec![
            msg(1, None, "Q1"),
            msg(2, Some(1), "A1"),
            msg(3, Some(1), "A2"),
            msg(4, Some(3), "A3"),
            msg(5, None, "Q2"),
            msg(6, Some(5), "A4"),
        ]);
        let mut seen: Vec<&str> = Vec::new();
        for pair in &pairs {
            seen.push(&pair.question);
            for answer in &pair.answers {
                seen.push(answer);
            }
        }
        seen.sort();
        assert_eq!(seen, vec!["A1", "A2", "A3", "A4", "Q1", "Q2"]);
    }

    #[test]
    fn reversed_input_yields_the_same_pair_set() {
        let messages = vec![
            msg(1, None, "Q1"),
            msg(2, Some(1), "A1"),
            msg(3, Some(2), "A2"),
            msg(4, None, "Q2"),
            msg(5, Some(4), "A3"),
        ];
        let mut reversed = messages.clone();
        reversed.reverse();

        let forward = normalized(pairs_for(messages));
        let backward = normalized(pairs_for(reversed));
        assert_eq!(forward, backward);
    }

    #[test]
    fn extraction_is_idempotent() {
        let messages = vec![
            msg(1, None, "Q"),
            msg(2, Some(1), "A1"),
            msg(3, Some(1), "A2"),
        ];
        let graph = ReplyGraph::build(messages).unwrap();
        let first = question_answer_pairs(&graph);
        let second = question_answer_pairs(&graph);
        assert_eq!(first, second);
    }

    #[test]
    fn pure_reply_cycle_terminates_and_emits_nothing() {
        // A → B → C → A: no message is a root, so no thread is emitted,
        // but the build and walk must both terminate.
        let pairs = pairs_for(vec![
            msg(1, Some(3), "A"),
            msg(2, Some(1), "B"),
            msg(3, Some(2), "C"),
        ]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn reply_loop_does_not_leak_into_other_threads() {
        // Each message carries a single reply target, so a loop's members
        // all point inside the loop and no root can reach it. The loop must
        // neither hang the walk nor disturb the real thread.
        let with_loop = pairs_for(vec![
            msg(1, None, "Q"),
            msg(2, Some(1), "A1"),
            msg(3, Some(2), "A2"),
            msg(4, Some(5), "loop-a"),
            msg(5, Some(4), "loop-b"),
        ]);
        let without_loop = pairs_for(vec![
            msg(1, None, "Q"),
            msg(2, Some(1), "A1"),
            msg(3, Some(2), "A2"),
        ]);
        assert_eq!(normalized(with_loop), normalized(without_loop));
    }

    #[test]
    fn deep_chain_does_not_overflow_the_stack() {
        let mut messages = vec![msg(0, None, "root")];
        for id in 1..=50_000u64 {
            messages.push(msg(id, Some(id - 1), "reply"));
        }
        let pairs = pairs_for(messages);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answers.len(), 50_000);
    }

    #[test]
    fn children_arriving_before_parents_produce_the_same_threads() {
        let pairs = pairs_for(vec![
            msg(3, Some(2), "A2"),
            msg(2, Some(1), "A1"),
            msg(1, None, "Q"),
        ]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "Q");
        let mut answers = pairs[0].answers.clone();
        answers.sort();
        assert_eq!(answers, vec!["A1", "A2"]);
    }
}
