pub mod admin;
pub mod loan;
