//! Storage adapter boundary.
//!
//! The services never touch a database driver directly; they talk to these
//! traits. [`postgres::PgRepository`] is the production implementation, and an
//! in-memory implementation backs the test suite. Uniqueness is a *store*
//! guarantee: every implementation must make check-and-insert atomic (unique
//! index in Postgres, a single write lock in memory), so the services'
//! pre-checks are a courtesy for friendly errors, not the line of defense
//! against concurrent duplicates.

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::modules::courses::model::{Course, CoursePatch};
use crate::modules::departments::model::{Department, DepartmentPatch};
use crate::modules::enrollments::model::{Enrollment, EnrollmentPatch};
use crate::modules::instructors::model::{Instructor, InstructorPatch};
use crate::modules::sections::model::{ClassSection, SectionPatch};
use crate::modules::students::model::{Student, StudentPatch};

#[derive(Debug, Error)]
pub enum RepoError {
    /// A store-level uniqueness constraint rejected the write. Carries the
    /// constraint name for logging; callers translate this to a conflict.
    #[error("unique constraint {0} violated")]
    Conflict(String),
    /// The store is unreachable or timed out. Never retried automatically:
    /// a create is not idempotent.
    #[error("storage unavailable")]
    Unavailable(#[source] anyhow::Error),
    #[error("storage failure")]
    Other(#[source] anyhow::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

pub const DEFAULT_DEPARTMENT_LIMIT: i64 = 100;
pub const DEFAULT_INSTRUCTOR_LIMIT: i64 = 100;
pub const DEFAULT_STUDENT_LIMIT: i64 = 200;
pub const DEFAULT_COURSE_LIMIT: i64 = 200;
pub const DEFAULT_SECTION_LIMIT: i64 = 200;
pub const DEFAULT_ENROLLMENT_LIMIT: i64 = 200;

/// Cap used by the aggregation paths, which need to see whole collections.
pub const SCAN_LIMIT: i64 = 100_000;

#[derive(Clone, Debug, Default)]
pub struct DepartmentFilter {
    /// Case-insensitive substring match on name or id.
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct InstructorFilter {
    pub q: Option<String>,
    pub dept_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct StudentFilter {
    pub q: Option<String>,
    pub major_dept_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct CourseFilter {
    pub q: Option<String>,
    pub dept_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct SectionFilter {
    pub course_id: Option<String>,
    pub semester: Option<String>,
    pub instructor_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct EnrollmentFilter {
    pub student_id: Option<String>,
    pub section_id: Option<String>,
    pub semester: Option<String>,
    pub limit: Option<i64>,
}

#[async_trait]
pub trait DepartmentRepo: Send + Sync {
    async fn find_department(&self, id: &str) -> RepoResult<Option<Department>>;
    async fn list_departments(&self, filter: &DepartmentFilter) -> RepoResult<Vec<Department>>;
    async fn insert_department(&self, record: &Department) -> RepoResult<()>;
    async fn update_department(
        &self,
        id: &str,
        patch: &DepartmentPatch,
    ) -> RepoResult<Option<Department>>;
    async fn delete_department(&self, id: &str) -> RepoResult<bool>;
    async fn count_departments(&self) -> RepoResult<i64>;
}

#[async_trait]
pub trait InstructorRepo: Send + Sync {
    async fn find_instructor(&self, id: &str) -> RepoResult<Option<Instructor>>;
    async fn list_instructors(&self, filter: &InstructorFilter) -> RepoResult<Vec<Instructor>>;
    async fn insert_instructor(&self, record: &Instructor) -> RepoResult<()>;
    async fn update_instructor(
        &self,
        id: &str,
        patch: &InstructorPatch,
    ) -> RepoResult<Option<Instructor>>;
    async fn delete_instructor(&self, id: &str) -> RepoResult<bool>;
    async fn count_instructors(&self) -> RepoResult<i64>;
    async fn count_instructors_by_dept(&self, dept_id: &str) -> RepoResult<i64>;
    /// Case-insensitive email probe, optionally excluding one record (so an
    /// update that keeps its own email is not a self-conflict).
    async fn instructor_email_exists(&self, email: &str, exclude: Option<&str>)
    -> RepoResult<bool>;
}

#[async_trait]
pub trait StudentRepo: Send + Sync {
    async fn find_student(&self, id: &str) -> RepoResult<Option<Student>>;
    async fn list_students(&self, filter: &StudentFilter) -> RepoResult<Vec<Student>>;
    async fn insert_student(&self, record: &Student) -> RepoResult<()>;
    async fn update_student(&self, id: &str, patch: &StudentPatch) -> RepoResult<Option<Student>>;
    async fn delete_student(&self, id: &str) -> RepoResult<bool>;
    async fn count_students(&self) -> RepoResult<i64>;
    async fn count_students_by_major(&self, dept_id: &str) -> RepoResult<i64>;
    async fn student_email_exists(&self, email: &str, exclude: Option<&str>) -> RepoResult<bool>;
}

#[async_trait]
pub trait CourseRepo: Send + Sync {
    async fn find_course(&self, id: &str) -> RepoResult<Option<Course>>;
    async fn list_courses(&self, filter: &CourseFilter) -> RepoResult<Vec<Course>>;
    async fn insert_course(&self, record: &Course) -> RepoResult<()>;
    async fn update_course(&self, id: &str, patch: &CoursePatch) -> RepoResult<Option<Course>>;
    async fn delete_course(&self, id: &str) -> RepoResult<bool>;
    async fn count_courses(&self) -> RepoResult<i64>;
    async fn count_courses_by_dept(&self, dept_id: &str) -> RepoResult<i64>;
}

#[async_trait]
pub trait SectionRepo: Send + Sync {
    async fn find_section(&self, id: &str) -> RepoResult<Option<ClassSection>>;
    async fn list_sections(&self, filter: &SectionFilter) -> RepoResult<Vec<ClassSection>>;
    async fn insert_section(&self, record: &ClassSection) -> RepoResult<()>;
    async fn update_section(
        &self,
        id: &str,
        patch: &SectionPatch,
    ) -> RepoResult<Option<ClassSection>>;
    async fn delete_section(&self, id: &str) -> RepoResult<bool>;
    async fn count_sections(&self) -> RepoResult<i64>;
    async fn count_sections_by_course(&self, course_id: &str) -> RepoResult<i64>;
    async fn count_sections_by_instructor(&self, instructor_id: &str) -> RepoResult<i64>;
    async fn section_no_exists(
        &self,
        course_id: &str,
        semester: &str,
        section_no: &str,
        exclude: Option<&str>,
    ) -> RepoResult<bool>;
}

#[async_trait]
pub trait EnrollmentRepo: Send + Sync {
    async fn find_enrollment(&self, id: &str) -> RepoResult<Option<Enrollment>>;
    async fn find_enrollment_by_pair(
        &self,
        student_id: &str,
        section_id: &str,
    ) -> RepoResult<Option<Enrollment>>;
    async fn list_enrollments(&self, filter: &EnrollmentFilter) -> RepoResult<Vec<Enrollment>>;
    async fn insert_enrollment(&self, record: &Enrollment) -> RepoResult<()>;
    async fn update_enrollment(
        &self,
        id: &str,
        patch: &EnrollmentPatch,
    ) -> RepoResult<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: &str) -> RepoResult<bool>;
    async fn count_enrollments(&self) -> RepoResult<i64>;
    async fn count_enrollments_by_student(&self, student_id: &str) -> RepoResult<i64>;
    async fn count_enrollments_by_section(&self, section_id: &str) -> RepoResult<i64>;
}

/// The full storage surface the services depend on.
pub trait Repository:
    DepartmentRepo + InstructorRepo + StudentRepo + CourseRepo + SectionRepo + EnrollmentRepo
{
}

impl<T> Repository for T where
    T: DepartmentRepo + InstructorRepo + StudentRepo + CourseRepo + SectionRepo + EnrollmentRepo
{
}
