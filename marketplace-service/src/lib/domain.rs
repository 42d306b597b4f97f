pub mod car;
pub mod pagination;
pub mod user;
