use actix_web::web;

use crate::handlers::balance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/balance")
            .route("", web::get().to(balance::get_my_balance))
            .route(
                "/refresh-earned",
                web::post().to(balance::refresh_earned_leave),
            )
            .route("/{user_id}", web::get().to(balance::get_user_balance)),
    );
}
