use actix_web::web;

use crate::handlers::substitution;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/substitutions")
            .route("", web::post().to(substitution::create_substitution))
            .route(
                "/received",
                web::get().to(substitution::get_received_substitutions),
            )
            .route("/sent", web::get().to(substitution::get_sent_substitutions))
            .route(
                "/{id}/accept",
                web::post().to(substitution::accept_substitution),
            )
            .route(
                "/{id}/reject",
                web::post().to(substitution::reject_substitution),
            ),
    );
}
