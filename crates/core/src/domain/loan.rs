use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::equipment::EquipmentId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub equipment_id: EquipmentId,
    pub borrower_name: String,
    pub borrower_email: String,
    pub department: String,
    pub loan_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    #[serde(default)]
    pub actual_return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.actual_return_date.is_none()
    }

    /// Overdue only while still out: a late return is not counted.
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.is_active() && self.expected_return_date < as_of
    }

    pub fn status(&self, as_of: NaiveDate) -> LoanStatus {
        if !self.is_active() {
            LoanStatus::Returned
        } else if self.is_overdue(as_of) {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        }
    }

    pub fn days_overdue(&self, as_of: NaiveDate) -> i64 {
        if self.is_overdue(as_of) {
            (as_of - self.expected_return_date).num_days()
        } else {
            0
        }
    }
}
