//! # TUI Components
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields and are rebuilt
//! every frame:
//! - `Header`: brand, Home/Chat navigation, session id, status
//! - `Footer`: attribution and key hints
//! - `MessageView`: one chat bubble with its movie cards
//! - `MovieCard`: one recommended movie on a single row
//! - `HighlightPanel`: the highlighted film with poster status
//! - `InfoPanel`: title, rating, genres and overview summary
//! - `AboutPage`: the Home page
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `InputBox`: the message composer
//! - `MessageList`: scrollable conversation with layout caching and a
//!   message/card cursor
//!
//! Components receive external data as props instead of reading `App`
//! directly, so each one can be rendered into a `TestBackend` in isolation.

pub mod about;
pub mod footer;
pub mod header;
pub mod highlight_panel;
pub mod info_panel;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod movie_card;

pub use about::AboutPage;
pub use footer::Footer;
pub use header::Header;
pub use highlight_panel::HighlightPanel;
pub use info_panel::InfoPanel;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
