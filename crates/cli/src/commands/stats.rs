use almox_core::config::LoadOptions;
use almox_core::domain::loan::{LoanId, LoanStatus};
use almox_core::inventory::{ContextProvider, InventoryContext};
use serde::Serialize;

use crate::commands::{load_application, CommandResult};

#[derive(Debug, Serialize)]
struct OverdueLoan {
    id: LoanId,
    equipment_name: Option<String>,
    borrower_name: String,
    department: String,
    expected_return_date: String,
    days_overdue: i64,
    status: LoanStatus,
}

#[derive(Debug, Serialize)]
struct StatsDetails {
    as_of: String,
    context: InventoryContext,
    overdue_loans: Vec<OverdueLoan>,
}

pub fn run(options: LoadOptions) -> CommandResult {
    let app = match load_application("stats", options) {
        Ok(app) => app,
        Err(failure) => return failure,
    };

    let as_of = app.provider.evaluation_date();
    let context = app.provider.snapshot();
    let inventory = app.provider.inventory();
    let overdue_loans = inventory
        .overdue_loans(as_of)
        .into_iter()
        .map(|loan| OverdueLoan {
            id: loan.id.clone(),
            equipment_name: inventory
                .find_equipment(&loan.equipment_id)
                .map(|item| item.name.clone()),
            borrower_name: loan.borrower_name.clone(),
            department: loan.department.clone(),
            expected_return_date: loan.expected_return_date.to_string(),
            days_overdue: loan.days_overdue(as_of),
            status: loan.status(as_of),
        })
        .collect();

    let message = format!(
        "{} equipment, {} available, {} on loan, {} overdue as of {as_of}",
        context.total, context.available, context.on_loan, context.overdue
    );

    CommandResult::success_with_details(
        "stats",
        message,
        Some(StatsDetails { as_of: as_of.to_string(), context, overdue_loans }),
    )
}
