pub mod images;
pub mod notifier;
pub mod repositories;
