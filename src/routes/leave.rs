use actix_web::web;

use crate::handlers::leave;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leave")
            .route("", web::post().to(leave::create_leave_request))
            .route("", web::get().to(leave::get_leave_requests))
            .route("/counts", web::get().to(leave::get_leave_counts))
            .route(
                "/department-counts",
                web::get().to(leave::get_department_counts),
            )
            .route(
                "/pending-principal",
                web::get().to(leave::get_pending_principal),
            )
            .route("/{id}", web::get().to(leave::get_leave_request))
            .route("/{id}/approve-hod", web::post().to(leave::approve_as_hod))
            .route(
                "/{id}/approve-principal",
                web::post().to(leave::approve_as_principal),
            )
            .route("/{id}/reject", web::post().to(leave::reject_leave))
            .route("/{id}/cancel", web::post().to(leave::cancel_leave)),
    );
}
