//! Search controller, session state, and related models

mod controller;
mod models;
mod session;

pub use controller::SearchController;
pub use models::{SearchError, SearchMode};
pub use session::{SearchSession, SessionStatus};
