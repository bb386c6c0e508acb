//! Rewrite engine — chained literal substitution over a rule snapshot.

use crate::rules::Rule;

/// Apply every rule, in order, to `original`.
///
/// Each rule performs a literal, non-overlapping, global replacement
/// (every occurrence, no regex, no escaping) on the output of the
/// previous rule, not on the original text. The chaining is deliberate
/// and preserved as observed behavior: a rule's replacement can introduce
/// text that a later rule then matches, so reordering rules changes the
/// result. Configure rules with that in mind.
///
/// Returns the rewritten text and whether it differs from the original.
/// A chain that happens to restore the original text counts as unchanged.
pub fn rewrite(original: &str, rules: &[Rule]) -> (String, bool) {
    let mut text = original.to_owned();
    for rule in rules {
        // An empty find would match between every character; the dialog
        // never stores one, but a hand-built rule must not wreck the post.
        if rule.find.is_empty() {
            continue;
        }
        text = text.replace(&rule.find, &rule.replace);
    }

    let changed = text != original;
    (text, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rule_set_is_a_noop() {
        let (text, changed) = rewrite("leave me alone", &[]);
        assert_eq!(text, "leave me alone");
        assert!(!changed);
    }

    #[test]
    fn single_rule_replaces_every_occurrence() {
        let rules = vec![Rule::new("foo", "bar")];
        let (text, changed) = rewrite("foo foo baz", &rules);
        assert_eq!(text, "bar bar baz");
        assert!(changed);
    }

    #[test]
    fn rules_cascade_in_order() {
        let rules = vec![Rule::new("a", "b"), Rule::new("b", "c")];
        let (text, changed) = rewrite("a", &rules);
        assert_eq!(text, "c");
        assert!(changed);
    }

    #[test]
    fn cascade_depends_on_rule_order() {
        // Same rules as above, opposite order: "b"->"c" runs first and
        // finds nothing, then "a"->"b" fires. No cascade.
        let rules = vec![Rule::new("b", "c"), Rule::new("a", "b")];
        let (text, changed) = rewrite("a", &rules);
        assert_eq!(text, "b");
        assert!(changed);
    }

    #[test]
    fn no_match_reports_unchanged() {
        let rules = vec![Rule::new("foo", "bar")];
        let (text, changed) = rewrite("nothing to see", &rules);
        assert_eq!(text, "nothing to see");
        assert!(!changed);
    }

    #[test]
    fn chain_restoring_the_original_counts_as_unchanged() {
        let rules = vec![Rule::new("a", "b"), Rule::new("b", "a")];
        let (text, changed) = rewrite("a", &rules);
        assert_eq!(text, "a");
        assert!(!changed);
    }

    #[test]
    fn replacement_is_single_pass_per_rule() {
        // str::replace scans once; the replacement is not rescanned by the
        // same rule, so a self-embedding rule cannot loop.
        let rules = vec![Rule::new("a", "aa")];
        let (text, changed) = rewrite("a a", &rules);
        assert_eq!(text, "aa aa");
        assert!(changed);
    }

    #[test]
    fn empty_replacement_deletes_matches() {
        let rules = vec![Rule::new("spam ", "")];
        let (text, changed) = rewrite("spam spam eggs", &rules);
        assert_eq!(text, "eggs");
        assert!(changed);
    }

    #[test]
    fn empty_find_is_skipped() {
        let rules = vec![Rule::new("", "x")];
        let (text, changed) = rewrite("abc", &rules);
        assert_eq!(text, "abc");
        assert!(!changed);
    }

    #[test]
    fn multibyte_text_is_handled() {
        let rules = vec![Rule::new("héllo", "hello")];
        let (text, changed) = rewrite("héllo wörld", &rules);
        assert_eq!(text, "hello wörld");
        assert!(changed);
    }

    #[test]
    fn overlapping_occurrences_do_not_double_fire() {
        let rules = vec![Rule::new("aa", "b")];
        let (text, changed) = rewrite("aaa", &rules);
        // Non-overlapping, left to right: "aa" + "a".
        assert_eq!(text, "ba");
        assert!(changed);
    }
}
