//! # Core Application Logic
//!
//! This module contains Moodreel's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │ ── spawns ───▶ │   Worker   │
//!          │ (ratatui)  │ ◀── Action ─── │ (backend)  │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action`/`Effect` enums and the `update()` reducer
//! - [`highlight`]: Prev/next navigation over the latest recommendations
//! - [`cache`]: Details and poster memoization
//! - [`message`]: Conversation entries
//! - [`session`]: Persisted session identifier
//! - [`config`]: Settings and their override hierarchy

pub mod action;
pub mod cache;
pub mod config;
pub mod highlight;
pub mod message;
pub mod session;
pub mod state;
