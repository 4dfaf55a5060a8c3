pub mod generator;
pub mod issuer;
pub mod session;

pub use issuer::TokenIssuer;
