//! Property-based tests

mod ledger_proptest;
