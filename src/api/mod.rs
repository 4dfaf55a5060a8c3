pub mod cookies;
pub mod handlers;
pub mod response;
pub mod routes;

pub use routes::create_router;
