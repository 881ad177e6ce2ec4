pub mod auth_handler;
pub mod backend_health_handler;
pub mod guess_handler;
pub mod pool_handler;
pub mod registration_handler;
pub mod user_handler;
