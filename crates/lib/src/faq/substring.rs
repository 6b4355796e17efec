//! # Substring Matcher
//!
//! The first-generation matching strategy: a case-sensitive containment
//! test of every FAQ key against the user's message, walked depth-first
//! over the source tree in declared order.
//!
//! This policy is intentionally permissive and order-dependent. The first
//! key (question or category label) found inside the user text wins, with
//! no scoring; "no match" is a valid outcome.

use super::FaqNode;

/// The outcome of a substring match: the matched key and its answer text.
///
/// For a category hit, `question` is the category label and `answer` is a
/// multi-line summary of the entries beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstringMatch {
    pub question: String,
    pub answer: String,
}

/// Finds the first FAQ key contained in `user_text`, in declared order.
///
/// Traversal is depth-first pre-order: each child key is tested before
/// descending into it, and siblings are visited in the order the JSON
/// document declares. Returns `None` when no key is contained in the
/// input.
pub fn match_substring(tree: &FaqNode, user_text: &str) -> Option<SubstringMatch> {
    let FaqNode::Category(children) = tree else {
        return None;
    };
    for (key, child) in children {
        if user_text.contains(key.as_str()) {
            let answer = match child {
                FaqNode::Leaf(answer) => answer.clone(),
                FaqNode::Category(_) => summarize(child),
            };
            return Some(SubstringMatch {
                question: key.clone(),
                answer,
            });
        }
        if let Some(hit) = match_substring(child, user_text) {
            return Some(hit);
        }
    }
    None
}

/// Composes a multi-line summary of a category's entries, one
/// `question：answer` line per leaf, in declared order.
fn summarize(node: &FaqNode) -> String {
    let mut lines = Vec::new();
    collect_lines(node, &mut lines);
    lines.join("\n")
}

fn collect_lines(node: &FaqNode, lines: &mut Vec<String>) {
    if let FaqNode::Category(children) = node {
        for (key, child) in children {
            match child {
                FaqNode::Leaf(answer) => lines.push(format!("{key}：{answer}")),
                FaqNode::Category(_) => collect_lines(child, lines),
            }
        }
    }
}
