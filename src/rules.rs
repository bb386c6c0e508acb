//! Rule store — the ordered find/replace rule set shared process-wide.
//!
//! One store is shared by every dialog session and every channel post for
//! the life of the process: the deployment model is a single operator
//! administering a single channel. Rules are volatile; a restart starts
//! from an empty store.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

/// One literal find/replace substitution pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Literal text to search for. The dialog never produces an empty one.
    pub find: String,
    /// Replacement text. May be empty, which makes a deletion rule.
    pub replace: String,
}

impl Rule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// Ordered collection of substitution rules.
///
/// Keys are unique: upserting an existing `find` overwrites its `replace`
/// in place without moving the rule. Application order is insertion order,
/// and it matters — the rewrite engine chains each rule's output into the
/// next rule's input. There is no delete; the dialog never needs one.
///
/// Writers hold the lock only for the upsert and readers only long enough
/// to clone a snapshot, so the rewrite path can never observe a partially
/// applied change.
pub struct RuleStore {
    rules: RwLock<Vec<Rule>>,
}

impl RuleStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rules: RwLock::new(Vec::new()),
        })
    }

    /// Insert a rule, or overwrite the replacement of an existing `find`.
    pub async fn upsert(&self, find: impl Into<String>, replace: impl Into<String>) {
        let find = find.into();
        let replace = replace.into();

        let mut rules = self.rules.write().await;
        if let Some(existing) = rules.iter_mut().find(|r| r.find == find) {
            info!(find = %find, "Rule replacement overwritten");
            existing.replace = replace;
        } else {
            info!(find = %find, total = rules.len() + 1, "Rule added");
            rules.push(Rule { find, replace });
        }
    }

    /// Clone the current ordered rule sequence for the rewrite path.
    pub async fn snapshot(&self) -> Vec<Rule> {
        self.rules.read().await.clone()
    }

    /// Number of rules currently configured.
    pub async fn len(&self) -> usize {
        self.rules.read().await.len()
    }

    /// Check if no rules are configured.
    pub async fn is_empty(&self) -> bool {
        self.rules.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let store = RuleStore::new();
        assert!(store.is_empty().await);
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn upsert_keeps_insertion_order() {
        let store = RuleStore::new();
        store.upsert("a", "1").await;
        store.upsert("b", "2").await;
        store.upsert("c", "3").await;

        let rules = store.snapshot().await;
        assert_eq!(
            rules,
            vec![Rule::new("a", "1"), Rule::new("b", "2"), Rule::new("c", "3")]
        );
    }

    #[tokio::test]
    async fn overwrite_keeps_position_and_does_not_duplicate() {
        let store = RuleStore::new();
        store.upsert("x", "1").await;
        store.upsert("y", "other").await;
        store.upsert("x", "2").await;

        let rules = store.snapshot().await;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], Rule::new("x", "2"));
        assert_eq!(rules[1], Rule::new("y", "other"));
    }

    #[tokio::test]
    async fn snapshot_is_detached_from_later_mutations() {
        let store = RuleStore::new();
        store.upsert("a", "1").await;

        let before = store.snapshot().await;
        store.upsert("b", "2").await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn shared_handle_sees_writes_immediately() {
        let store = RuleStore::new();
        let reader = Arc::clone(&store);

        store.upsert("foo", "bar").await;
        let rules = reader.snapshot().await;
        assert_eq!(rules, vec![Rule::new("foo", "bar")]);
    }
}
