//! School administration entity model.
//!
//! Every entity type the stores synchronize implements [`Entity`], which ties
//! together its id, its closed filter struct and its closed set of write
//! actions.

mod class;
mod exam;
mod fee;
mod filter;
mod leave;
mod student;
mod teacher;

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use class::{ClassAction, ClassFilter, NewClass, SchoolClass};
pub use exam::{Exam, ExamAction, ExamFilter, ExamStatus, NewExam};
pub use fee::{Fee, FeeAction, FeeFilter, FeeStatus, NewFee};
pub use filter::{search_matches, Choice, Filter};
pub use leave::{LeaveAction, LeaveFilter, LeaveKind, LeaveRequest, LeaveStatus, NewLeave};
pub use student::{NewStudent, Student, StudentAction, StudentFilter, StudentStatus};
pub use teacher::{NewTeacher, Teacher, TeacherAction, TeacherFilter, TeacherStatus};

/// An entity type managed by a synchronization store.
pub trait Entity: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Filter parameterizing list fetches.
    type Filter: Filter;

    /// Write operations understood by the domain service.
    type Action: Debug + Clone + Send + Sync + 'static;

    /// Human-readable entity kind, used in logs and errors.
    const KIND: &'static str;

    /// Unique id within a store.
    fn id(&self) -> &str;

    /// Whether this entity belongs in a list fetched with `filter`.
    fn matches(&self, filter: &Self::Filter) -> bool;
}
