pub mod canteen;
pub mod daily_entry;
pub mod expense;
pub mod leave;
pub mod payment;
pub mod payslip;
pub mod role;
pub mod staff;
