use serde::{Deserialize, Serialize};

use crate::service::{find_mut, Apply, IdSequence, ServiceError};

use super::filter::{choice_admits, field_admits, patch_field};
use super::{search_matches, Choice, Entity, Filter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
    Waived,
}

/// A fee charged to a student. Amounts are in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub title: String,
    pub amount_due: u64,
    pub amount_paid: u64,
    pub due_date: String,
    pub status: FeeStatus,
}

impl Fee {
    pub fn outstanding(&self) -> u64 {
        self.amount_due.saturating_sub(self.amount_paid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeFilter {
    pub search: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<Choice<FeeStatus>>,
}

impl Filter for FeeFilter {
    fn merge(&mut self, patch: Self) {
        patch_field(&mut self.search, patch.search);
        patch_field(&mut self.student_id, patch.student_id);
        patch_field(&mut self.status, patch.status);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFee {
    pub student_id: String,
    pub student_name: String,
    pub title: String,
    pub amount_due: u64,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeeAction {
    Create(NewFee),
    RecordPayment { id: String, amount: u64 },
    Waive { id: String },
}

impl Entity for Fee {
    type Filter = FeeFilter;
    type Action = FeeAction;

    const KIND: &'static str = "fee";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, filter: &FeeFilter) -> bool {
        search_matches(
            filter.search.as_deref(),
            &[self.student_name.as_str(), &self.title, &self.id],
        ) && field_admits(&filter.student_id, &self.student_id)
            && choice_admits(&filter.status, &self.status)
    }
}

impl Apply for Fee {
    fn apply(
        records: &mut Vec<Self>,
        action: FeeAction,
        ids: &mut IdSequence,
    ) -> Result<Self, ServiceError> {
        match action {
            FeeAction::Create(new) => {
                if new.amount_due == 0 {
                    return Err(ServiceError::Validation("fee amount must be positive".into()));
                }
                let fee = Fee {
                    id: ids.next_id(),
                    student_id: new.student_id,
                    student_name: new.student_name,
                    title: new.title,
                    amount_due: new.amount_due,
                    amount_paid: 0,
                    due_date: new.due_date,
                    status: FeeStatus::Pending,
                };
                records.push(fee.clone());
                Ok(fee)
            }
            FeeAction::RecordPayment { id, amount } => {
                let fee = find_mut(records, &id)?;
                if matches!(fee.status, FeeStatus::Paid | FeeStatus::Waived) {
                    return Err(ServiceError::Conflict(format!(
                        "fee '{}' is already settled",
                        id
                    )));
                }
                if amount == 0 || amount > fee.outstanding() {
                    return Err(ServiceError::Validation(format!(
                        "payment of {} does not fit outstanding balance {}",
                        amount,
                        fee.outstanding()
                    )));
                }
                fee.amount_paid += amount;
                fee.status = if fee.outstanding() == 0 {
                    FeeStatus::Paid
                } else {
                    FeeStatus::Partial
                };
                Ok(fee.clone())
            }
            FeeAction::Waive { id } => {
                let fee = find_mut(records, &id)?;
                if fee.status == FeeStatus::Paid {
                    return Err(ServiceError::Conflict(format!("fee '{}' is already paid", id)));
                }
                fee.status = FeeStatus::Waived;
                Ok(fee.clone())
            }
        }
    }
}
