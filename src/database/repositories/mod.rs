pub mod balance;
pub mod compensatory;
pub mod leave;
pub mod night_work;
pub mod substitution;
pub mod user;

// Re-export all repositories for easy importing
pub use balance::LeaveBalanceRepository;
pub use compensatory::CompensatoryWorkRepository;
pub use leave::LeaveRequestRepository;
pub use night_work::NightWorkRepository;
pub use substitution::SubstitutionRepository;
pub use user::UserRepository;
