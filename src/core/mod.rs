//! # Core Application Logic
//!
//! This module contains Pinboard's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • BoardView (view data)│
//!                    │  • Controller (intents) │
//!                    │  • Poller, Timeline     │
//!                    │                         │
//!                    │  I/O only via BoardApi  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    HTML    │      │  snapshot  │
//!     │  Adapter   │      │  renderer  │      │    CLI     │
//!     │ (ratatui)  │      │  (html.rs) │      │  (main.rs) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`view`]: `BoardView`, everything on screen in one place
//! - [`controller`]: `Controller`, one method per user operation
//! - [`request`]: `Request` / `Outcome`, the calls the controller hands out
//! - [`html`]: markup rendering with escaping
//! - [`poll`]: periodic refresh policy
//! - [`transition`]: deadline-ordered timed steps

pub mod config;
pub mod controller;
pub mod html;
pub mod poll;
pub mod prompt;
pub mod request;
pub mod session;
pub mod transition;
pub mod view;
