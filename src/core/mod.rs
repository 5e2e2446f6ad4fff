//! # Core Application Logic
//!
//! This module contains Triage's business logic.
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
//!                    │                         │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Analysis  │      │   Store    │
//!     │  Adapter   │      │  service   │      │  (history) │
//!     │ (ratatui)  │      │  (reqwest) │      │  (reqwest) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`input`]: Input buffer, validation, canned samples
//! - [`progress`]: Cosmetic staged-progress timer
//! - [`orchestrator`]: Performs the effects `update()` asks for
//! - [`history`]: Fire-and-forget persistence of completed analyses
//! - [`config`]: `~/.triage/config.toml` plus env/CLI overrides

pub mod action;
pub mod config;
pub mod history;
pub mod input;
pub mod orchestrator;
pub mod progress;
pub mod state;
