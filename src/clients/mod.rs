pub mod api;
pub mod auth;

pub use api::ApiClient;
pub use auth::{AuthClient, SessionInfo, SessionPayload, SessionUser};
