use serde::{Deserialize, Serialize};

use crate::service::{find_mut, Apply, IdSequence, ServiceError};

use super::filter::{choice_admits, field_admits, patch_field};
use super::{search_matches, Choice, Entity, Filter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveKind {
    Sick,
    Casual,
    Earned,
    Duty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: String,
    pub applicant_id: String,
    pub applicant_name: String,
    pub kind: LeaveKind,
    /// First day of leave, `YYYY-MM-DD`.
    pub from: String,
    /// Last day of leave, inclusive.
    pub to: String,
    pub reason: String,
    pub status: LeaveStatus,
    /// Approver's note or rejection reason.
    #[serde(default)]
    pub review_note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveFilter {
    pub search: Option<String>,
    pub applicant_id: Option<String>,
    pub status: Option<Choice<LeaveStatus>>,
}

impl Filter for LeaveFilter {
    fn merge(&mut self, patch: Self) {
        patch_field(&mut self.search, patch.search);
        patch_field(&mut self.applicant_id, patch.applicant_id);
        patch_field(&mut self.status, patch.status);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLeave {
    pub applicant_id: String,
    pub applicant_name: String,
    pub kind: LeaveKind,
    pub from: String,
    pub to: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeaveAction {
    Apply(NewLeave),
    Approve { id: String, note: Option<String> },
    Reject { id: String, reason: String },
    /// Withdrawn by the applicant while still pending.
    Cancel { id: String },
}

impl Entity for LeaveRequest {
    type Filter = LeaveFilter;
    type Action = LeaveAction;

    const KIND: &'static str = "leave request";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, filter: &LeaveFilter) -> bool {
        search_matches(
            filter.search.as_deref(),
            &[self.applicant_name.as_str(), &self.reason, &self.id],
        ) && field_admits(&filter.applicant_id, &self.applicant_id)
            && choice_admits(&filter.status, &self.status)
    }
}

fn review(
    records: &mut [LeaveRequest],
    id: &str,
    status: LeaveStatus,
    note: Option<String>,
) -> Result<LeaveRequest, ServiceError> {
    let leave = find_mut(records, id)?;
    if leave.status != LeaveStatus::Pending {
        return Err(ServiceError::Conflict(format!(
            "leave request '{}' is already {:?}",
            id, leave.status
        )));
    }
    leave.status = status;
    if note.is_some() {
        leave.review_note = note;
    }
    Ok(leave.clone())
}

impl Apply for LeaveRequest {
    fn apply(
        records: &mut Vec<Self>,
        action: LeaveAction,
        ids: &mut IdSequence,
    ) -> Result<Self, ServiceError> {
        match action {
            LeaveAction::Apply(new) => {
                if new.to < new.from {
                    return Err(ServiceError::Validation(format!(
                        "leave ends ({}) before it starts ({})",
                        new.to, new.from
                    )));
                }
                if new.reason.trim().is_empty() {
                    return Err(ServiceError::Validation("a reason is required".into()));
                }
                let leave = LeaveRequest {
                    id: ids.next_id(),
                    applicant_id: new.applicant_id,
                    applicant_name: new.applicant_name,
                    kind: new.kind,
                    from: new.from,
                    to: new.to,
                    reason: new.reason,
                    status: LeaveStatus::Pending,
                    review_note: None,
                };
                records.push(leave.clone());
                Ok(leave)
            }
            LeaveAction::Approve { id, note } => review(records, &id, LeaveStatus::Approved, note),
            LeaveAction::Reject { id, reason } => {
                if reason.trim().is_empty() {
                    return Err(ServiceError::Validation(
                        "a rejection reason is required".into(),
                    ));
                }
                review(records, &id, LeaveStatus::Rejected, Some(reason))
            }
            LeaveAction::Cancel { id } => review(records, &id, LeaveStatus::Cancelled, None),
        }
    }
}
