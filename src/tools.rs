//! Test support.
pub mod mock_ledger;
