pub mod claims;
pub mod errors;
pub mod service;

pub use claims::SessionClaims;
pub use errors::TokenError;
pub use service::TokenIdentity;
pub use service::TokenService;
