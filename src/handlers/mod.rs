pub mod balance;
pub mod leave;
pub mod shared;
pub mod substitution;
pub mod work;
