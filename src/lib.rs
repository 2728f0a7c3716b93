//! Client for a chat board web application.
//!
//! [`forms::BoardClient`] submits the message, login and registration forms
//! over HTTP; [`listener::subscribe`] keeps the board region in sync with the
//! server's push endpoint. Both write to a shared [`page::Page`].

pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod listener;
pub mod page;
pub mod payload;
pub mod render;

pub use config::{ClientConfig, Endpoints};
pub use error::BoardError;
pub use forms::{AuthForm, AuthOutcome, BoardClient, MessageOutcome};
pub use listener::{subscribe, BoardUpdate, ListenerExit};
pub use page::{with_page, ElementId, Page, SharedPage};
