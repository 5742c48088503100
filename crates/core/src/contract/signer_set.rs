//! Deduplicated, ordered signer set
//!
//! The creator is always a member. Iteration order is the identities'
//! lexical order, so every replica writes the per-signer records in the same
//! sequence.

use std::collections::BTreeSet;

use crate::types::SignerId;

/// Signer set of one contract, creator included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerSet {
    creator: SignerId,
    signers: BTreeSet<SignerId>,
}

impl SignerSet {
    /// Start a set containing only the creator
    pub fn new(creator: SignerId) -> Self {
        let mut signers = BTreeSet::new();
        signers.insert(creator.clone());
        Self { creator, signers }
    }

    /// Build from the creator plus additional signers (duplicates collapse)
    pub fn with_signers<I>(creator: SignerId, others: I) -> Self
    where
        I: IntoIterator<Item = SignerId>,
    {
        let mut set = Self::new(creator);
        set.extend(others);
        set
    }

    /// Add signers; duplicates and the creator are ignored
    pub fn extend<I>(&mut self, others: I)
    where
        I: IntoIterator<Item = SignerId>,
    {
        self.signers.extend(others);
    }

    /// The contract creator
    pub fn creator(&self) -> &SignerId {
        &self.creator
    }

    /// Number of distinct signers, creator counted
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Always false: the creator is a member
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Membership test
    pub fn contains(&self, signer: &SignerId) -> bool {
        self.signers.contains(signer)
    }

    /// Iterate in lexical order
    pub fn iter(&self) -> impl Iterator<Item = &SignerId> {
        self.signers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_always_included() {
        let set = SignerSet::new(SignerId::new("alice"));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&SignerId::new("alice")));
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = SignerSet::with_signers(
            SignerId::new("alice"),
            ["bob", "alice", "bob", "carol"].into_iter().map(SignerId::from),
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_iteration_is_ordered() {
        let set = SignerSet::with_signers(
            SignerId::new("m"),
            ["z", "a"].into_iter().map(SignerId::from),
        );
        let order: Vec<&str> = set.iter().map(|s| s.as_str()).collect();
        assert_eq!(order, vec!["a", "m", "z"]);
    }
}
