pub mod catalog;
pub mod comments;
pub mod endpoints;
pub mod error;
pub mod reviews;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::router;
pub use state::{AppState, AppStateInner};
