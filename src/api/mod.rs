pub mod canteen;
pub mod daily_entry;
pub mod dashboard;
pub mod expense;
pub mod export;
pub mod leave;
pub mod payment;
pub mod payroll;
pub mod staff;
