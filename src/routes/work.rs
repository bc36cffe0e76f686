use actix_web::web;

use crate::handlers::work;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/night-work")
            .route("", web::post().to(work::create_night_work))
            .route("", web::get().to(work::get_night_work))
            .route("/{id}", web::put().to(work::update_night_work))
            .route("/{id}", web::delete().to(work::delete_night_work)),
    );
    cfg.service(
        web::scope("/compensatory")
            .route("", web::post().to(work::create_compensatory_work))
            .route("", web::get().to(work::get_compensatory_work))
            .route("/{id}", web::put().to(work::update_compensatory_work)),
    );
}
