use serde::{Deserialize, Serialize};

use crate::service::{find_mut, replace, Apply, IdSequence, ServiceError};

use super::filter::patch_field;
use super::{search_matches, Entity, Filter};

/// A class section, e.g. grade 8 section B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: String,
    pub name: String,
    pub grade: u8,
    pub section: String,
    pub room: String,
    #[serde(default)]
    pub class_teacher_id: Option<String>,
    pub capacity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassFilter {
    pub search: Option<String>,
    pub grade: Option<u8>,
}

impl Filter for ClassFilter {
    fn merge(&mut self, patch: Self) {
        patch_field(&mut self.search, patch.search);
        patch_field(&mut self.grade, patch.grade);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClass {
    pub grade: u8,
    pub section: String,
    pub room: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassAction {
    Create(NewClass),
    Update(SchoolClass),
    AssignTeacher { id: String, teacher_id: String },
}

impl Entity for SchoolClass {
    type Filter = ClassFilter;
    type Action = ClassAction;

    const KIND: &'static str = "class";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, filter: &ClassFilter) -> bool {
        search_matches(
            filter.search.as_deref(),
            &[self.name.as_str(), &self.room, &self.id],
        ) && filter.grade.map_or(true, |g| g == self.grade)
    }
}

impl Apply for SchoolClass {
    fn apply(
        records: &mut Vec<Self>,
        action: ClassAction,
        ids: &mut IdSequence,
    ) -> Result<Self, ServiceError> {
        match action {
            ClassAction::Create(new) => {
                if !(1..=12).contains(&new.grade) {
                    return Err(ServiceError::Validation(format!(
                        "grade {} is outside 1-12",
                        new.grade
                    )));
                }
                let section = new.section.trim().to_uppercase();
                if records
                    .iter()
                    .any(|c| c.grade == new.grade && c.section == section)
                {
                    return Err(ServiceError::Conflict(format!(
                        "class {}-{} already exists",
                        new.grade, section
                    )));
                }
                let class = SchoolClass {
                    id: ids.next_id(),
                    name: format!("Grade {} - {}", new.grade, section),
                    grade: new.grade,
                    section,
                    room: new.room,
                    class_teacher_id: None,
                    capacity: new.capacity,
                };
                records.push(class.clone());
                Ok(class)
            }
            ClassAction::Update(class) => replace(records, class),
            ClassAction::AssignTeacher { id, teacher_id } => {
                let class = find_mut(records, &id)?;
                class.class_teacher_id = Some(teacher_id);
                Ok(class.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::seed;

    #[test]
    fn create_derives_name_and_rejects_duplicates() {
        let mut classes = seed::classes();
        let mut ids = IdSequence::after(&classes);
        let new = NewClass {
            grade: 11,
            section: "c".into(),
            room: "B-204".into(),
            capacity: 35,
        };
        let created = SchoolClass::apply(&mut classes, ClassAction::Create(new.clone()), &mut ids)
            .unwrap();
        assert_eq!(created.name, "Grade 11 - C");

        let err = SchoolClass::apply(&mut classes, ClassAction::Create(new), &mut ids).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn grade_filter() {
        let filter = ClassFilter {
            grade: Some(8),
            ..Default::default()
        };
        let hits: Vec<_> = seed::classes()
            .into_iter()
            .filter(|c| c.matches(&filter))
            .collect();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|c| c.grade == 8));
    }
}
