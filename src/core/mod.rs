//! # Core Application Logic
//!
//! This module contains the dashboard's business logic.
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
//!                    │  • Store (single owner) │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  LogService│      │  config    │
//!     │  Adapter   │      │  (fetch)   │      │  loading   │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: the `State` tree — all application state in one place
//! - [`action`]: the closed `Action` enum and the `update()` reducer
//! - [`store`]: the `Store` — exclusive owner of `State`
//! - [`command`]: the `:`-prompt command grammar
//! - [`config`]: TOML config + env + CLI resolution

pub mod action;
pub mod command;
pub mod config;
pub mod state;
pub mod store;
