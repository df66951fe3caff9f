//! Outbound adapters implementing domain ports for infrastructure.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic; the availability and
//! admission algorithms live in the domain.

pub mod persistence;
