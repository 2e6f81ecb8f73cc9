//! Sonda - suite definitions
//!
//! The binary wires these Scope trees to the reqwest adapter; integration
//! tests run the same trees against stub clients.

pub mod suites;
