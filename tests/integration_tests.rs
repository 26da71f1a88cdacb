// tests/integration_tests.rs
//! End-to-end capture runs against the CPU reference renderer.

mod integration;
