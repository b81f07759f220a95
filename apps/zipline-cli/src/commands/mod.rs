pub mod balance;
pub mod compress;
pub mod history;
