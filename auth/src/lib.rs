//! Authentication utilities library
//!
//! Provides the authentication infrastructure for the marketplace service:
//! - Password hashing (Argon2id)
//! - Stateless session tokens (signed JWT carrying `user_id:username`)
//!
//! The service defines its own HTTP-level guard and adapts these implementations.
//! Nothing here touches the web framework or storage.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::TokenService;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", 30);
//! let token = tokens.encode("user123", "alice").unwrap();
//! let identity = tokens.decode(&token).unwrap();
//! assert_eq!(identity.user_id, "user123");
//! assert_eq!(identity.username, "alice");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenError;
pub use token::TokenIdentity;
pub use token::TokenService;
