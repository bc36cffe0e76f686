#![allow(dead_code)]

use actix_web::web;
use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use leavedesk::database::init_database;
use leavedesk::database::models::{
    Gender, LeaveRequestInput, LeaveType, NightWorkInput, Role, Substitution, SubstitutionInput,
    SubstitutionStatus, User, UserInput,
};
use leavedesk::database::repositories::{
    CompensatoryWorkRepository, LeaveBalanceRepository, LeaveRequestRepository,
    NightWorkRepository, SubstitutionRepository, UserRepository,
};
use leavedesk::{BalanceLedger, CreditAccrualEngine, LeaveWorkflow, SubstitutionService};

/// Test harness: a throwaway SQLite database plus the full set of
/// repositories and services wired the same way as in `main`.
pub struct TestContext {
    pub pool: SqlitePool,
    pub users: UserRepository,
    pub leaves: LeaveRequestRepository,
    pub balances: LeaveBalanceRepository,
    pub night_work: NightWorkRepository,
    pub compensatory: CompensatoryWorkRepository,
    pub substitutions: SubstitutionRepository,
    pub ledger: BalanceLedger,
    pub accrual: CreditAccrualEngine,
    pub workflow: LeaveWorkflow,
    pub substitution_service: SubstitutionService,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        let users = UserRepository::new(pool.clone());
        let leaves = LeaveRequestRepository::new(pool.clone());
        let balances = LeaveBalanceRepository::new(pool.clone());
        let night_work = NightWorkRepository::new(pool.clone());
        let compensatory = CompensatoryWorkRepository::new(pool.clone());
        let substitutions = SubstitutionRepository::new(pool.clone());

        let ledger = BalanceLedger::new(balances.clone());
        let accrual =
            CreditAccrualEngine::new(pool.clone(), night_work.clone(), balances.clone());
        let workflow = LeaveWorkflow::new(
            pool.clone(),
            users.clone(),
            leaves.clone(),
            substitutions.clone(),
            ledger.clone(),
        );
        let substitution_service =
            SubstitutionService::new(users.clone(), substitutions.clone());

        Ok(TestContext {
            pool,
            users,
            leaves,
            balances,
            night_work,
            compensatory,
            substitutions,
            ledger,
            accrual,
            workflow,
            substitution_service,
            _temp_dir: temp_dir,
        })
    }

    /// App-state closure for HTTP-level tests; mirrors the wiring in
    /// `main`.
    pub fn state(&self) -> impl Fn(&mut web::ServiceConfig) + Clone + use<> {
        let users = self.users.clone();
        let leaves = self.leaves.clone();
        let night_work = self.night_work.clone();
        let compensatory = self.compensatory.clone();
        let substitutions = self.substitutions.clone();
        let ledger = self.ledger.clone();
        let accrual = self.accrual.clone();
        let workflow = self.workflow.clone();
        let substitution_service = self.substitution_service.clone();

        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(users.clone()))
                .app_data(web::Data::new(leaves.clone()))
                .app_data(web::Data::new(night_work.clone()))
                .app_data(web::Data::new(compensatory.clone()))
                .app_data(web::Data::new(substitutions.clone()))
                .app_data(web::Data::new(ledger.clone()))
                .app_data(web::Data::new(accrual.clone()))
                .app_data(web::Data::new(workflow.clone()))
                .app_data(web::Data::new(substitution_service.clone()));
        }
    }

    pub async fn seed_user(
        &self,
        username: &str,
        role: Role,
        department: Option<&str>,
        gender: Gender,
    ) -> User {
        self.users
            .create(UserInput {
                username: username.to_string(),
                email: format!("{}@example.edu", username),
                role,
                department: department.map(|d| d.to_string()),
                gender,
                date_joined: Some(Utc::now()),
            })
            .await
            .expect("failed to seed user")
    }

    pub async fn seed_staff(&self, username: &str, department: &str) -> User {
        self.seed_user(username, Role::Staff, Some(department), Gender::Female)
            .await
    }

    pub async fn seed_hod(&self, username: &str, department: &str) -> User {
        self.seed_user(username, Role::Hod, Some(department), Gender::Male)
            .await
    }

    pub async fn seed_principal(&self, username: &str) -> User {
        self.seed_user(username, Role::Principal, None, Gender::Other)
            .await
    }

    /// A substitution already accepted by the peer, ready to gate a
    /// staff leave request.
    pub async fn accepted_substitution(&self, requester: &User, peer: &User) -> Substitution {
        let substitution = self
            .substitution_service
            .create(
                requester.id,
                SubstitutionInput {
                    requested_to: peer.id,
                    date: Utc::now().date_naive(),
                    period: "Morning".to_string(),
                    time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    class_label: Some("CS101".to_string()),
                    message: None,
                },
            )
            .await
            .expect("failed to create substitution");

        let accepted = self
            .substitution_service
            .accept(peer.id, substitution.id)
            .await
            .expect("failed to accept substitution");

        assert_eq!(accepted.status, SubstitutionStatus::Accepted);
        accepted
    }
}

pub fn leave_input(leave_type: LeaveType, substitution_id: Option<Uuid>) -> LeaveRequestInput {
    let start = Utc::now();
    LeaveRequestInput {
        leave_type,
        start_date: start,
        end_date: start + Duration::days(1),
        reason: "family commitment".to_string(),
        is_hourly: false,
        hours: 0,
        substitution_id,
    }
}

pub fn custom_leave_input(substitution_id: Option<Uuid>) -> LeaveRequestInput {
    let start = Utc::now();
    LeaveRequestInput {
        leave_type: LeaveType::Custom,
        start_date: start,
        end_date: start,
        reason: "appointment".to_string(),
        is_hourly: true,
        hours: 1,
        substitution_id,
    }
}

pub fn night_work_input(approved: bool) -> NightWorkInput {
    NightWorkInput {
        date: Utc::now().date_naive(),
        hours: 6,
        reason: "exam supervision".to_string(),
        approved,
    }
}
