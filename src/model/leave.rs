use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct StaffLeave {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub staff_id: u64,

    #[schema(example = "2026-03-10", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-03-14", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "Family function", nullable = true)]
    pub reason: Option<String>,

    /// Paid leave does not reduce salary.
    #[schema(example = false)]
    pub is_paid_leave: bool,
}

impl StaffLeave {
    /// Days covered by this period, counting both endpoints.
    /// Inverted rows stored before interval validation existed yield 0.
    pub fn total_days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave(start: (i32, u32, u32), end: (i32, u32, u32)) -> StaffLeave {
        StaffLeave {
            id: 1,
            staff_id: 1,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            reason: None,
            is_paid_leave: false,
        }
    }

    #[test]
    fn total_days_is_inclusive() {
        assert_eq!(leave((2026, 3, 10), (2026, 3, 14)).total_days(), 5);
    }

    #[test]
    fn total_days_floors_at_zero_for_inverted_rows() {
        assert_eq!(leave((2026, 3, 14), (2026, 3, 10)).total_days(), 0);
    }
}
