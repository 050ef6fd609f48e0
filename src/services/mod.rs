pub mod application;
pub mod page;
