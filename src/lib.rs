//! Variation Ledger - contract variations with client e-signature
//!
//! A builder records variations (changes in scope, cost and schedule) against
//! a fixed-price contract, sends each one to the client as a single-use
//! signing link, and keeps the current contract price equal to the original
//! price plus every approved variation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
