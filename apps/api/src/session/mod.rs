pub mod handlers;
pub mod models;
pub mod store;

use thiserror::Error;
use uuid::Uuid;

pub use models::SessionView;
pub use store::{spawn_sweeper, SessionStore};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),
}
