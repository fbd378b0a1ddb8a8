use serde::{Deserialize, Serialize};

use crate::service::{find_mut, replace, Apply, IdSequence, ServiceError};

use super::filter::{choice_admits, field_admits, patch_field};
use super::{search_matches, Choice, Entity, Filter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll_no: u32,
    pub class_id: String,
    pub guardian: String,
    pub status: StudentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentFilter {
    pub search: Option<String>,
    pub class_id: Option<String>,
    pub status: Option<Choice<StudentStatus>>,
}

impl Filter for StudentFilter {
    fn merge(&mut self, patch: Self) {
        patch_field(&mut self.search, patch.search);
        patch_field(&mut self.class_id, patch.class_id);
        patch_field(&mut self.status, patch.status);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub class_id: String,
    pub guardian: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudentAction {
    Enroll(NewStudent),
    Update(Student),
    Transfer { id: String, class_id: String },
    SetStatus { id: String, status: StudentStatus },
}

impl Entity for Student {
    type Filter = StudentFilter;
    type Action = StudentAction;

    const KIND: &'static str = "student";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, filter: &StudentFilter) -> bool {
        search_matches(
            filter.search.as_deref(),
            &[self.name.as_str(), &self.guardian, &self.id],
        ) && field_admits(&filter.class_id, &self.class_id)
            && choice_admits(&filter.status, &self.status)
    }
}

/// Next free roll number within a class.
fn next_roll_no(records: &[Student], class_id: &str) -> u32 {
    records
        .iter()
        .filter(|s| s.class_id == class_id)
        .map(|s| s.roll_no)
        .max()
        .unwrap_or(0)
        + 1
}

impl Apply for Student {
    fn apply(
        records: &mut Vec<Self>,
        action: StudentAction,
        ids: &mut IdSequence,
    ) -> Result<Self, ServiceError> {
        match action {
            StudentAction::Enroll(new) => {
                if new.name.trim().is_empty() {
                    return Err(ServiceError::Validation("student name is required".into()));
                }
                let student = Student {
                    id: ids.next_id(),
                    roll_no: next_roll_no(records, &new.class_id),
                    name: new.name,
                    class_id: new.class_id,
                    guardian: new.guardian,
                    status: StudentStatus::Active,
                };
                records.push(student.clone());
                Ok(student)
            }
            StudentAction::Update(student) => replace(records, student),
            StudentAction::Transfer { id, class_id } => {
                let roll_no = next_roll_no(records, &class_id);
                let student = find_mut(records, &id)?;
                if student.class_id == class_id {
                    return Ok(student.clone());
                }
                student.class_id = class_id;
                student.roll_no = roll_no;
                Ok(student.clone())
            }
            StudentAction::SetStatus { id, status } => {
                let student = find_mut(records, &id)?;
                student.status = status;
                Ok(student.clone())
            }
        }
    }
}
