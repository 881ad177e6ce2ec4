pub mod auth;
pub mod game;
pub mod guess;
pub mod pool;
pub mod user;
