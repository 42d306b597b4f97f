pub mod car;
pub mod user;

pub use car::PostgresCarRepository;
pub use user::PostgresUserRepository;
