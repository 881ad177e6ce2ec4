pub mod guess_queries;
pub mod helpers;
pub mod pool_queries;
