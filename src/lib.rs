//! Moodreel library exports for testing

pub mod api;
pub mod core;
pub mod tui;
pub mod worker;

#[cfg(test)]
pub mod test_support;
