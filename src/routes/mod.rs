use actix_web::web;

pub mod balance;
pub mod leave;
pub mod substitution;
pub mod work;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(leave::configure)
            .configure(balance::configure)
            .configure(work::configure)
            .configure(substitution::configure),
    );
}
