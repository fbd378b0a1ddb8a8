//! Deterministic demo datasets for the mock services.

use crate::domain::{
    Exam, ExamStatus, Fee, FeeStatus, LeaveKind, LeaveRequest, LeaveStatus, SchoolClass, Student,
    StudentStatus, Teacher, TeacherStatus,
};

fn teacher(id: &str, name: &str, subject: &str, status: TeacherStatus, class_ids: &[&str]) -> Teacher {
    let email = format!("{}@school.edu", name.to_lowercase().replace(' ', "."));
    Teacher {
        id: id.to_string(),
        name: name.to_string(),
        email,
        subject: subject.to_string(),
        status,
        class_ids: class_ids.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn teachers() -> Vec<Teacher> {
    vec![
        teacher("201", "Anita Sharma", "Mathematics", TeacherStatus::Active, &["301"]),
        teacher("202", "Rajesh Kumar", "Physics", TeacherStatus::Active, &["302"]),
        teacher("203", "Priya Sharma Joshi", "English", TeacherStatus::OnLeave, &["303"]),
        teacher("204", "Vikram Singh", "Chemistry", TeacherStatus::Active, &[]),
        teacher("205", "Fatima Khan", "Biology", TeacherStatus::Inactive, &[]),
    ]
}

#[allow(clippy::too_many_arguments)]
fn leave(
    id: &str,
    applicant: (&str, &str),
    kind: LeaveKind,
    from: &str,
    to: &str,
    reason: &str,
    status: LeaveStatus,
    review_note: Option<&str>,
) -> LeaveRequest {
    LeaveRequest {
        id: id.to_string(),
        applicant_id: applicant.0.to_string(),
        applicant_name: applicant.1.to_string(),
        kind,
        from: from.to_string(),
        to: to.to_string(),
        reason: reason.to_string(),
        status,
        review_note: review_note.map(str::to_string),
    }
}

pub fn leave_requests() -> Vec<LeaveRequest> {
    let anita = ("201", "Anita Sharma");
    vec![
        leave("101", anita, LeaveKind::Sick, "2024-03-11", "2024-03-12", "Fever", LeaveStatus::Pending, None),
        leave(
            "102",
            ("203", "Priya Sharma Joshi"),
            LeaveKind::Earned,
            "2024-03-01",
            "2024-03-15",
            "Family travel",
            LeaveStatus::Approved,
            Some("Substitute arranged"),
        ),
        leave(
            "103",
            ("202", "Rajesh Kumar"),
            LeaveKind::Casual,
            "2024-03-18",
            "2024-03-18",
            "Personal work",
            LeaveStatus::Pending,
            None,
        ),
        leave(
            "104",
            anita,
            LeaveKind::Casual,
            "2024-02-05",
            "2024-02-06",
            "Wedding in family",
            LeaveStatus::Rejected,
            Some("Board exams in progress"),
        ),
        leave(
            "105",
            ("204", "Vikram Singh"),
            LeaveKind::Duty,
            "2024-03-20",
            "2024-03-22",
            "Science olympiad escort",
            LeaveStatus::Pending,
            None,
        ),
    ]
}

fn class(id: &str, grade: u8, section: &str, room: &str, teacher: Option<&str>) -> SchoolClass {
    SchoolClass {
        id: id.to_string(),
        name: format!("Grade {} - {}", grade, section),
        grade,
        section: section.to_string(),
        room: room.to_string(),
        class_teacher_id: teacher.map(str::to_string),
        capacity: 40,
    }
}

pub fn classes() -> Vec<SchoolClass> {
    vec![
        class("301", 8, "A", "A-101", Some("201")),
        class("302", 8, "B", "A-102", Some("202")),
        class("303", 9, "A", "A-201", Some("203")),
        class("304", 10, "A", "A-301", None),
    ]
}

fn student(id: &str, name: &str, roll_no: u32, class_id: &str, guardian: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        roll_no,
        class_id: class_id.to_string(),
        guardian: guardian.to_string(),
        status: StudentStatus::Active,
    }
}

pub fn students() -> Vec<Student> {
    let mut students = vec![
        student("401", "Aarav Patel", 1, "301", "Nikhil Patel"),
        student("402", "Diya Menon", 2, "301", "Lakshmi Menon"),
        student("403", "Ishaan Gupta", 1, "302", "Sunita Gupta"),
        student("404", "Sara Ali", 1, "303", "Imran Ali"),
        student("405", "Vivaan Reddy", 2, "303", "Kavya Reddy"),
        student("406", "Zoya Sheikh", 1, "304", "Farhan Sheikh"),
    ];
    students[5].status = StudentStatus::Inactive;
    students
}

fn exam(id: &str, title: &str, class_id: &str, subject: &str, date: &str, status: ExamStatus) -> Exam {
    Exam {
        id: id.to_string(),
        title: title.to_string(),
        class_id: class_id.to_string(),
        subject: subject.to_string(),
        date: date.to_string(),
        max_marks: 100,
        status,
    }
}

pub fn exams() -> Vec<Exam> {
    vec![
        exam("501", "Unit Test 1", "301", "Mathematics", "2024-04-08", ExamStatus::Scheduled),
        exam("502", "Mid Term", "301", "Mathematics", "2024-02-12", ExamStatus::Published),
        exam("503", "Unit Test 1", "302", "Physics", "2024-04-09", ExamStatus::Scheduled),
        exam("504", "Mid Term", "303", "English", "2024-02-14", ExamStatus::Cancelled),
    ]
}

fn fee(
    id: &str,
    student: (&str, &str),
    title: &str,
    amount_due: u64,
    amount_paid: u64,
    due_date: &str,
    status: FeeStatus,
) -> Fee {
    Fee {
        id: id.to_string(),
        student_id: student.0.to_string(),
        student_name: student.1.to_string(),
        title: title.to_string(),
        amount_due,
        amount_paid,
        due_date: due_date.to_string(),
        status,
    }
}

pub fn fees() -> Vec<Fee> {
    vec![
        fee("601", ("401", "Aarav Patel"), "Term 1 tuition", 1_500_000, 1_500_000, "2024-01-15", FeeStatus::Paid),
        fee("602", ("402", "Diya Menon"), "Term 1 tuition", 1_500_000, 0, "2024-04-15", FeeStatus::Pending),
        fee("603", ("403", "Ishaan Gupta"), "Term 1 tuition", 1_500_000, 500_000, "2024-04-15", FeeStatus::Partial),
        fee("604", ("404", "Sara Ali"), "Transport", 300_000, 0, "2024-02-01", FeeStatus::Overdue),
        fee("605", ("405", "Vivaan Reddy"), "Lab charges", 200_000, 0, "2024-04-30", FeeStatus::Pending),
    ]
}
