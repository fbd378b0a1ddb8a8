use serde::{Deserialize, Serialize};

use crate::service::{find_mut, Apply, IdSequence, ServiceError};

use super::filter::{choice_admits, field_admits, patch_field};
use super::{search_matches, Choice, Entity, Filter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamStatus {
    Scheduled,
    Published,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub class_id: String,
    pub subject: String,
    pub date: String,
    pub max_marks: u32,
    pub status: ExamStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamFilter {
    pub search: Option<String>,
    pub class_id: Option<String>,
    pub status: Option<Choice<ExamStatus>>,
}

impl Filter for ExamFilter {
    fn merge(&mut self, patch: Self) {
        patch_field(&mut self.search, patch.search);
        patch_field(&mut self.class_id, patch.class_id);
        patch_field(&mut self.status, patch.status);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExam {
    pub title: String,
    pub class_id: String,
    pub subject: String,
    pub date: String,
    pub max_marks: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExamAction {
    Schedule(NewExam),
    Reschedule { id: String, date: String },
    /// Results released to students.
    Publish { id: String },
    Cancel { id: String },
}

impl Entity for Exam {
    type Filter = ExamFilter;
    type Action = ExamAction;

    const KIND: &'static str = "exam";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, filter: &ExamFilter) -> bool {
        search_matches(
            filter.search.as_deref(),
            &[self.title.as_str(), &self.subject, &self.id],
        ) && field_admits(&filter.class_id, &self.class_id)
            && choice_admits(&filter.status, &self.status)
    }
}

fn scheduled_mut<'a>(records: &'a mut [Exam], id: &str) -> Result<&'a mut Exam, ServiceError> {
    let exam = find_mut(records, id)?;
    if exam.status != ExamStatus::Scheduled {
        return Err(ServiceError::Conflict(format!(
            "exam '{}' is {:?}, not scheduled",
            id, exam.status
        )));
    }
    Ok(exam)
}

impl Apply for Exam {
    fn apply(
        records: &mut Vec<Self>,
        action: ExamAction,
        ids: &mut IdSequence,
    ) -> Result<Self, ServiceError> {
        match action {
            ExamAction::Schedule(new) => {
                if new.max_marks == 0 {
                    return Err(ServiceError::Validation("max marks must be positive".into()));
                }
                let exam = Exam {
                    id: ids.next_id(),
                    title: new.title,
                    class_id: new.class_id,
                    subject: new.subject,
                    date: new.date,
                    max_marks: new.max_marks,
                    status: ExamStatus::Scheduled,
                };
                records.push(exam.clone());
                Ok(exam)
            }
            ExamAction::Reschedule { id, date } => {
                let exam = scheduled_mut(records, &id)?;
                exam.date = date;
                Ok(exam.clone())
            }
            ExamAction::Publish { id } => {
                let exam = scheduled_mut(records, &id)?;
                exam.status = ExamStatus::Published;
                Ok(exam.clone())
            }
            ExamAction::Cancel { id } => {
                let exam = scheduled_mut(records, &id)?;
                exam.status = ExamStatus::Cancelled;
                Ok(exam.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::seed;

    #[test]
    fn published_exam_cannot_be_rescheduled() {
        let mut exams = seed::exams();
        let mut ids = IdSequence::after(&exams);
        let id = exams
            .iter()
            .find(|e| e.status == ExamStatus::Scheduled)
            .map(|e| e.id.clone())
            .unwrap();

        Exam::apply(&mut exams, ExamAction::Publish { id: id.clone() }, &mut ids).unwrap();
        let err = Exam::apply(
            &mut exams,
            ExamAction::Reschedule {
                id,
                date: "2024-12-01".into(),
            },
            &mut ids,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
