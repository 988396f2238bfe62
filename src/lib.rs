pub mod bot;
pub mod config;
pub mod html;
pub mod liveness;
pub mod monitor;
pub mod portal;
pub mod scheduler;
