//! Expectation resolver: which token category is syntactically valid next.
//!
//! The resolver maintains an explicit stack of open call contexts. A
//! callable token (function, keyword, or operator declaring expected
//! argument categories) pushes a frame; every other token supplies a
//! value to the innermost open frame. A frame that saturates pops and
//! supplies one value to its parent, so nested calls are modeled
//! directly instead of by a flat backward scan.
//!
//! The result is advisory only. It drives UI affordances (which pill
//! category is highlighted as expected) and must never block a drop:
//! any category may be placed at any position.

use crate::catalog::Category;
use crate::expression::PlacedToken;

/// One open call context: the callee's declared argument categories and
/// how many have been supplied so far.
#[derive(Debug, Clone)]
struct Frame {
    expects: Vec<Category>,
    filled: usize,
}

fn opens_call(token: &PlacedToken) -> bool {
    matches!(
        token.category(),
        Category::Function | Category::Keyword | Category::Operator
    ) && !token.spec.expects.is_empty()
}

/// Supply one produced value to the innermost open frame. A saturated
/// frame pops and counts as a value for its parent, cascading upward.
fn supply_value(stack: &mut Vec<Frame>) {
    while let Some(top) = stack.last_mut() {
        top.filled += 1;
        if top.filled < top.expects.len() {
            return;
        }
        stack.pop();
    }
}

/// Determine the category expected after `sequence`, or `None` when
/// nothing further is anticipated.
///
/// An empty sequence expects a `Keyword` (an expression line starts
/// with a keyword or, by extension, any expression-introducing token).
/// With no open call context, a trailing terminal token expects
/// nothing; otherwise `Keyword` is returned as a permissive fallback so
/// a new call can always be started.
pub fn next_expected(sequence: &[PlacedToken]) -> Option<Category> {
    if sequence.is_empty() {
        return Some(Category::Keyword);
    }

    let mut stack: Vec<Frame> = Vec::new();
    for token in sequence {
        if opens_call(token) {
            stack.push(Frame {
                expects: token.spec.expects.clone(),
                filled: 0,
            });
        } else {
            supply_value(&mut stack);
        }
    }

    match (stack.last(), sequence.last()) {
        (Some(top), _) => Some(top.expects[top.filled]),
        (None, Some(last)) if last.is_terminal() => None,
        _ => Some(Category::Keyword),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::expression::Expression;

    fn sequence(ids: &[&str]) -> Vec<PlacedToken> {
        let catalog = Catalog::standard();
        let mut expr = Expression::new();
        for id in ids {
            let spec = catalog.get(id).unwrap_or_else(|| panic!("no pill '{}'", id));
            expr.place(spec, 0).unwrap();
        }
        expr.lines()[0].clone()
    }

    // -- base cases --

    #[test]
    fn empty_sequence_expects_keyword() {
        assert_eq!(next_expected(&[]), Some(Category::Keyword));
    }

    #[test]
    fn open_call_reports_next_slot() {
        assert_eq!(
            next_expected(&sequence(&["filter"])),
            Some(Category::Condition)
        );
        assert_eq!(
            next_expected(&sequence(&["filter", "even?"])),
            Some(Category::Variable)
        );
    }

    #[test]
    fn saturated_call_with_terminal_tail_expects_nothing() {
        assert_eq!(next_expected(&sequence(&["filter", "even?", "x"])), None);
    }

    #[test]
    fn lone_terminal_token_expects_nothing() {
        assert_eq!(next_expected(&sequence(&["x"])), None);
    }

    #[test]
    fn non_terminal_tail_falls_back_to_keyword() {
        // A condition token has expects but does not open a call; a lone
        // one leaves no frame open and is not terminal.
        assert_eq!(
            next_expected(&sequence(&["even?"])),
            Some(Category::Keyword)
        );
    }

    // -- nesting --

    #[test]
    fn nested_call_fills_parent_on_completion() {
        // define x (list 1 2 3): the inner list frame absorbs the three
        // values, completes, and supplies define's second argument.
        let seq = sequence(&["define", "x", "list", "num-1", "num-1"]);
        assert_eq!(next_expected(&seq), Some(Category::ListValue));

        let seq = sequence(&["define", "x", "list", "num-1", "num-1", "num-0"]);
        assert_eq!(next_expected(&seq), None);
    }

    #[test]
    fn inner_frame_shadows_outer() {
        // foldr + ... : the operator opens a nested frame; its slots are
        // reported before foldr's remaining ones.
        let seq = sequence(&["foldr", "+"]);
        assert_eq!(next_expected(&seq), Some(Category::ListValue));
    }

    #[test]
    fn operator_chain_completes() {
        let seq = sequence(&["+", "num-1", "num-1"]);
        assert_eq!(next_expected(&seq), None);
    }
}
