//! Interactive registry browser
//!
//! The model (`browser`, `state`, `list`, `detail`, `focus`) is plain Rust and
//! never draws; `view` and `components` render it with iocraft.

pub mod action_queue;
pub mod browser;
pub mod cell;
pub mod components;
pub mod cursor;
pub mod detail;
pub mod fetch;
pub mod focus;
pub mod handlers;
pub mod list;
pub mod search;
pub mod state;
pub mod theme;
pub mod view;

pub use action_queue::{Action, ActionQueue, Completion};
pub use browser::Browser;
pub use cell::{Cell, Subscription};
pub use cursor::Cursor;
pub use focus::{FocusRing, Pane};
pub use handlers::{Command, command_for_key};
pub use list::{ListController, ListKey, ListWindow};
pub use search::{FilterOutcome, filter};
pub use state::{SelectionState, StateGraph};
pub use theme::Theme;
pub use view::{BrowserTui, BrowserTuiProps};
