use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod pools;
pub mod registration;
pub mod users;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login)
        .service(users::count_users)
        // Pool creation allows anonymous callers, so it sits outside the
        // authenticated scope and checks credentials itself.
        .service(pools::create_pool)
        .service(pools::count_pools);

    cfg.service(
        web::scope("/me")
            .wrap(AuthMiddleware)
            .service(users::me),
    );
    // Pool routes (require authentication)
    cfg.service(
        web::scope("/pools")
            .wrap(AuthMiddleware)
            .service(pools::join_pool)
            .service(pools::list_pools)
            .service(pools::get_pool)
            .service(pools::get_pool_games)
            .service(pools::submit_guess),
    );
}
