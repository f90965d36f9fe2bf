//! # CLAWP tooling
//!
//! *Operational scripts and a status dashboard for the CLAWP token and its minting contract on BNB Smart Chain.*
//!
//! Three entry points, each holding its own connection to the chain:
//!
//! * `approve` lets the minting contract spend the treasury's tokens, once.
//! * `mint` pays the minting contract and reports the recipient's new balance.
//! * `dashboard` serves balances, mint progress and the agent onboarding command over HTTP.
//!
//! Contract calls go through the capability traits in [`contracts`], so the
//! workflows run unchanged against [`tools::mock_ledger::MockLedger`] in tests.

pub mod contracts;
pub mod dashboard;
pub mod model;
pub mod tools;
pub mod utils;
pub mod workflows;
