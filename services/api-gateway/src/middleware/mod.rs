pub mod request_id;
pub mod user_context;

pub use request_id::request_id_middleware;
pub use user_context::{user_context_middleware, UserContext};
