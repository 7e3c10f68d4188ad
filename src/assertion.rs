//! A minimal `#assert`/`#if #...(...)` tester.
//!
//! The reference implementation's assertion machinery is a small
//! special-purpose macro namespace (predicate names mapped to lists of
//! answers); this module keeps only the part a constant-expression
//! evaluator needs, a yes/no test of whether a predicate was asserted.

use std::collections::HashSet;

/// Tracks which predicates have been `#assert`ed.
#[derive(Debug, Default, Clone)]
pub struct AssertionTable {
    predicates: HashSet<String>,
}

impl AssertionTable {
    /// An empty table: nothing asserted.
    pub fn new() -> Self {
        AssertionTable::default()
    }

    /// Record `#assert predicate (answer)`. This crate does not
    /// distinguish between different answers for the same predicate;
    /// it only tracks presence, which is all `#if #predicate` tests.
    pub fn assert(&mut self, predicate: impl Into<String>) {
        self.predicates.insert(predicate.into());
    }

    /// Remove a previously asserted predicate (`#unassert`).
    pub fn unassert(&mut self, predicate: &str) {
        self.predicates.remove(predicate);
    }

    /// True if `predicate` has been asserted.
    pub fn test(&self, predicate: &str) -> bool {
        self.predicates.contains(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assert_and_test() {
        let mut table = AssertionTable::new();
        assert!(!table.test("cpu(x86_64)"));
        table.assert("cpu(x86_64)");
        assert!(table.test("cpu(x86_64)"));
    }

    #[test]
    fn unassert_removes() {
        let mut table = AssertionTable::new();
        table.assert("machine(little_endian)");
        table.unassert("machine(little_endian)");
        assert!(!table.test("machine(little_endian)"));
    }
}
