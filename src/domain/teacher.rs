use serde::{Deserialize, Serialize};

use crate::service::{find_mut, replace, Apply, IdSequence, ServiceError};

use super::filter::{choice_admits, patch_field};
use super::{search_matches, Choice, Entity, Filter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeacherStatus {
    Active,
    OnLeave,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub status: TeacherStatus,
    /// Ids of classes this teacher is assigned to.
    #[serde(default)]
    pub class_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherFilter {
    pub search: Option<String>,
    pub subject: Option<String>,
    pub status: Option<Choice<TeacherStatus>>,
}

impl Filter for TeacherFilter {
    fn merge(&mut self, patch: Self) {
        patch_field(&mut self.search, patch.search);
        patch_field(&mut self.subject, patch.subject);
        patch_field(&mut self.status, patch.status);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTeacher {
    pub name: String,
    pub email: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeacherAction {
    Create(NewTeacher),
    Update(Teacher),
    AssignClass { id: String, class_id: String },
    SetStatus { id: String, status: TeacherStatus },
}

impl Entity for Teacher {
    type Filter = TeacherFilter;
    type Action = TeacherAction;

    const KIND: &'static str = "teacher";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, filter: &TeacherFilter) -> bool {
        search_matches(
            filter.search.as_deref(),
            &[self.name.as_str(), &self.email, &self.subject, &self.id],
        ) && filter
            .subject
            .as_deref()
            .map_or(true, |s| self.subject.eq_ignore_ascii_case(s))
            && choice_admits(&filter.status, &self.status)
    }
}

impl Apply for Teacher {
    fn apply(
        records: &mut Vec<Self>,
        action: TeacherAction,
        ids: &mut IdSequence,
    ) -> Result<Self, ServiceError> {
        match action {
            TeacherAction::Create(new) => {
                if new.name.trim().is_empty() {
                    return Err(ServiceError::Validation("teacher name is required".into()));
                }
                if records.iter().any(|t| t.email.eq_ignore_ascii_case(&new.email)) {
                    return Err(ServiceError::Conflict(format!(
                        "email '{}' is already registered",
                        new.email
                    )));
                }
                let teacher = Teacher {
                    id: ids.next_id(),
                    name: new.name,
                    email: new.email,
                    subject: new.subject,
                    status: TeacherStatus::Active,
                    class_ids: Vec::new(),
                };
                records.push(teacher.clone());
                Ok(teacher)
            }
            TeacherAction::Update(teacher) => replace(records, teacher),
            TeacherAction::AssignClass { id, class_id } => {
                let teacher = find_mut(records, &id)?;
                if !teacher.class_ids.contains(&class_id) {
                    teacher.class_ids.push(class_id);
                }
                Ok(teacher.clone())
            }
            TeacherAction::SetStatus { id, status } => {
                let teacher = find_mut(records, &id)?;
                teacher.status = status;
                Ok(teacher.clone())
            }
        }
    }
}
