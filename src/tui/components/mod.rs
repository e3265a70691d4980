//! UI components for the registry browser

pub mod detail_pane;
pub mod footer;
pub mod header;
pub mod help_modal;
pub mod list_pane;
pub mod search_bar;
pub mod toast;

pub use detail_pane::{DetailPane, DetailPaneProps};
pub use footer::{Footer, FooterProps, Shortcut, shortcuts_for};
pub use header::{Header, HeaderProps};
pub use help_modal::{HelpModal, HelpModalProps};
pub use list_pane::{ListPane, ListPaneProps, ListRow};
pub use search_bar::{SearchBar, SearchBarProps};
pub use toast::{Toast, ToastLevel, render_toast};
