pub mod balance;
pub mod leave;
pub(crate) mod macros;
pub mod substitution;
pub mod user;
pub mod work;

pub use balance::{BalanceKind, LeaveBalance};
pub use leave::{
    DepartmentCounts, LeaveCounts, LeaveRequest, LeaveRequestInput, LeaveStatus, LeaveType,
};
pub use substitution::{Substitution, SubstitutionInput, SubstitutionStatus};
pub use user::{Gender, Role, User, UserInput};
pub use work::{CompensatoryWork, CompensatoryWorkInput, NightWorkInput, NightWorkRecord};
