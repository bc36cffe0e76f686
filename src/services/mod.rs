pub mod accrual;
pub mod actor;
pub mod ledger;
pub mod substitution;
pub mod workflow;

pub use accrual::CreditAccrualEngine;
pub use actor::Actor;
pub use ledger::BalanceLedger;
pub use substitution::SubstitutionService;
pub use workflow::LeaveWorkflow;
