//! Application context owning one synchronization store per domain.
//!
//! Built once at startup from [`Config`] and passed to whatever needs it.
//! There is no global registry of stores.

use std::time::Duration;

use crate::config::{Config, SessionConfig};
use crate::domain::{
    Choice, Exam, Fee, LeaveFilter, LeaveRequest, LeaveStatus, SchoolClass, Student, Teacher,
};
use crate::service::{seed, Apply, MockService};
use crate::sync::{Notifier, SyncOptions, SyncStore};

pub type TeacherStore = SyncStore<Teacher, MockService<Teacher>>;
pub type ClassStore = SyncStore<SchoolClass, MockService<SchoolClass>>;
pub type StudentStore = SyncStore<Student, MockService<Student>>;
pub type ExamStore = SyncStore<Exam, MockService<Exam>>;
pub type FeeStore = SyncStore<Fee, MockService<Fee>>;
pub type LeaveStore = SyncStore<LeaveRequest, MockService<LeaveRequest>>;

/// Leave view holding every request awaiting review.
pub const PENDING_VIEW: &str = "pending";
/// Leave view holding the session user's own requests.
pub const MINE_VIEW: &str = "mine";

pub struct SchoolContext {
    session: SessionConfig,
    notifier: Notifier,
    teachers: TeacherStore,
    classes: ClassStore,
    students: StudentStore,
    exams: ExamStore,
    fees: FeeStore,
    leaves: LeaveStore,
}

impl SchoolContext {
    /// Build every store over seeded mock services.
    pub fn new(config: &Config) -> Self {
        let options = SyncOptions::from(&config.sync);
        let latency = Duration::from_millis(config.service.latency_ms);
        let base_url = config.service.base_url.as_str();
        let notifier = Notifier::new();

        let service = MockService::with_base_url(seed::leave_requests(), latency, base_url);
        let leaves = SyncStore::builder(service)
            .options(options)
            .notifier(notifier.clone())
            .view(
                PENDING_VIEW,
                LeaveFilter {
                    status: Some(Choice::Only(LeaveStatus::Pending)),
                    ..Default::default()
                },
            )
            .view(
                MINE_VIEW,
                LeaveFilter {
                    applicant_id: Some(config.session.user_id.clone()),
                    ..Default::default()
                },
            )
            .build();

        tracing::info!(
            base_url,
            latency_ms = config.service.latency_ms,
            discard_stale = options.discard_stale_responses,
            user_id = %config.session.user_id,
            "School context ready"
        );

        Self {
            session: config.session.clone(),
            teachers: plain_store(seed::teachers(), config, &notifier),
            classes: plain_store(seed::classes(), config, &notifier),
            students: plain_store(seed::students(), config, &notifier),
            exams: plain_store(seed::exams(), config, &notifier),
            fees: plain_store(seed::fees(), config, &notifier),
            leaves,
            notifier,
        }
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// Notice feed shared by every store.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn teachers(&self) -> &TeacherStore {
        &self.teachers
    }

    pub fn classes(&self) -> &ClassStore {
        &self.classes
    }

    pub fn students(&self) -> &StudentStore {
        &self.students
    }

    pub fn exams(&self) -> &ExamStore {
        &self.exams
    }

    pub fn fees(&self) -> &FeeStore {
        &self.fees
    }

    pub fn leaves(&self) -> &LeaveStore {
        &self.leaves
    }

    /// Clear every store: snapshots, views, selections, errors and filters.
    pub fn teardown(&self) {
        self.teachers.clear();
        self.classes.clear();
        self.students.clear();
        self.exams.clear();
        self.fees.clear();
        self.leaves.clear();
        tracing::debug!("School context torn down");
    }
}

/// A store without views over a seeded mock service.
fn plain_store<T: Apply>(
    records: Vec<T>,
    config: &Config,
    notifier: &Notifier,
) -> SyncStore<T, MockService<T>> {
    let service = MockService::with_base_url(
        records,
        Duration::from_millis(config.service.latency_ms),
        &config.service.base_url,
    );
    SyncStore::builder(service)
        .options(SyncOptions::from(&config.sync))
        .notifier(notifier.clone())
        .build()
}
