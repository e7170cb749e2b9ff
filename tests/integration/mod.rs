//! Integration test modules.
//!
//! Each module focuses on one phase of the edit-card scenario.

pub mod close_tests;
pub mod load_tests;
pub mod movement_tests;
pub mod persistence_tests;
pub mod selection_tests;
pub mod suite_tests;
