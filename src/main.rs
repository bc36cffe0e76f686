use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use leavedesk::database::{
    init_database,
    repositories::{
        CompensatoryWorkRepository, LeaveBalanceRepository, LeaveRequestRepository,
        NightWorkRepository, SubstitutionRepository, UserRepository,
    },
};
use leavedesk::{
    BalanceLedger, Config, CreditAccrualEngine, LeaveWorkflow, SubstitutionService, routes,
};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Leavedesk API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Leavedesk API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let leave_repository = LeaveRequestRepository::new(pool.clone());
    let balance_repository = LeaveBalanceRepository::new(pool.clone());
    let night_work_repository = NightWorkRepository::new(pool.clone());
    let compensatory_repository = CompensatoryWorkRepository::new(pool.clone());
    let substitution_repository = SubstitutionRepository::new(pool.clone());

    let ledger = BalanceLedger::new(balance_repository.clone());
    let accrual_engine = CreditAccrualEngine::new(
        pool.clone(),
        night_work_repository.clone(),
        balance_repository.clone(),
    );
    let workflow = LeaveWorkflow::new(
        pool.clone(),
        user_repository.clone(),
        leave_repository.clone(),
        substitution_repository.clone(),
        ledger.clone(),
    );
    let substitution_service = SubstitutionService::new(
        user_repository.clone(),
        substitution_repository.clone(),
    );

    let user_repo_data = web::Data::new(user_repository);
    let leave_repo_data = web::Data::new(leave_repository);
    let night_work_repo_data = web::Data::new(night_work_repository);
    let compensatory_repo_data = web::Data::new(compensatory_repository);
    let substitution_repo_data = web::Data::new(substitution_repository);
    let ledger_data = web::Data::new(ledger);
    let accrual_data = web::Data::new(accrual_engine);
    let workflow_data = web::Data::new(workflow);
    let substitution_service_data = web::Data::new(substitution_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(user_repo_data.clone())
            .app_data(leave_repo_data.clone())
            .app_data(night_work_repo_data.clone())
            .app_data(compensatory_repo_data.clone())
            .app_data(substitution_repo_data.clone())
            .app_data(ledger_data.clone())
            .app_data(accrual_data.clone())
            .app_data(workflow_data.clone())
            .app_data(substitution_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Actor-Id",
                    ])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await?;

    Ok(())
}
