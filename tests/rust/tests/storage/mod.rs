//! Storage facade integration tests
//!
//! Each test runs against a fresh in-memory database with the schema
//! applied, through the public `AuthStorage` surface.

mod grants;
