//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: app name, user, status line
//! - `MessageCard`: one board entry as lines
//! - `InputField`: bordered one-line text field
//! - `AlertBox`: modal notice
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components with persistent state kept in `TuiState`:
//! - `AuthFormState` / `AuthFormView`: login and registration form
//! - `MessageListState` / `MessageList`: selection and scrolling
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── alert.rs         (Modal notice)
//! ├── auth_form.rs     (Login / register)
//! ├── input_field.rs   (One-line input)
//! ├── message.rs       (Single entry renderer)
//! ├── message_list.rs  (Scrollable board)
//! └── title_bar.rs     (Top status bar)
//! ```

pub mod alert;
pub mod auth_form;
pub mod input_field;
pub mod message;
pub mod message_list;
mod title_bar;

pub use alert::AlertBox;
pub use auth_form::{AuthEvent, AuthFormState, AuthFormView};
pub use input_field::InputField;
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
