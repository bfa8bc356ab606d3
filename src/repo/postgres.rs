//! Postgres-backed repository.
//!
//! Queries are built at runtime; the unique indexes created by the
//! migrations are the authoritative uniqueness guard, and violations are
//! surfaced as [`RepoError::Conflict`] with the constraint name.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder};

use crate::modules::courses::model::{Course, CoursePatch};
use crate::modules::departments::model::{Department, DepartmentPatch};
use crate::modules::enrollments::model::{Enrollment, EnrollmentPatch};
use crate::modules::instructors::model::{Instructor, InstructorPatch};
use crate::modules::sections::model::{ClassSection, MeetingTime, SectionPatch};
use crate::modules::students::model::{Student, StudentPatch};

use super::{
    CourseFilter, CourseRepo, DEFAULT_COURSE_LIMIT, DEFAULT_DEPARTMENT_LIMIT,
    DEFAULT_ENROLLMENT_LIMIT, DEFAULT_INSTRUCTOR_LIMIT, DEFAULT_SECTION_LIMIT,
    DEFAULT_STUDENT_LIMIT, DepartmentFilter, DepartmentRepo, EnrollmentFilter, EnrollmentRepo,
    InstructorFilter, InstructorRepo, RepoError, RepoResult, SectionFilter, SectionRepo,
    StudentFilter, StudentRepo,
};

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepoError::Other(e.into()))
    }

    /// Wipes every collection. Used by the seed command before loading.
    pub async fn truncate_all(&self) -> RepoResult<()> {
        sqlx::query(
            "TRUNCATE departments, instructors, students, courses, class_sections, enrollments",
        )
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(map_sqlx)
    }
}

fn map_sqlx(err: sqlx::Error) -> RepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            RepoError::Conflict(constraint)
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepoError::Unavailable(err.into())
        }
        _ => RepoError::Other(err.into()),
    }
}

fn like_pattern(q: &str) -> String {
    format!("%{q}%")
}

#[derive(FromRow)]
struct DepartmentRow {
    id: String,
    name: String,
    office: Option<String>,
    phone: Option<String>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            office: row.office,
            phone: row.phone,
        }
    }
}

#[derive(FromRow)]
struct InstructorRow {
    id: String,
    full_name: String,
    email: String,
    dept_id: String,
    title: Option<String>,
}

impl From<InstructorRow> for Instructor {
    fn from(row: InstructorRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            dept_id: row.dept_id,
            title: row.title,
        }
    }
}

#[derive(FromRow)]
struct StudentRow {
    id: String,
    full_name: String,
    email: String,
    major_dept_id: String,
    year: i32,
    phone: Option<String>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            major_dept_id: row.major_dept_id,
            year: row.year,
            phone: row.phone,
        }
    }
}

#[derive(FromRow)]
struct CourseRow {
    id: String,
    title: String,
    credits: i32,
    dept_id: String,
    description: Option<String>,
    prereq_ids: Vec<String>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            credits: row.credits,
            dept_id: row.dept_id,
            description: row.description,
            prereq_ids: row.prereq_ids,
        }
    }
}

#[derive(FromRow)]
struct SectionRow {
    id: String,
    course_id: String,
    semester: String,
    section_no: String,
    instructor_id: String,
    capacity: Option<i32>,
    room: Option<String>,
    schedule: Json<Vec<MeetingTime>>,
}

impl From<SectionRow> for ClassSection {
    fn from(row: SectionRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            semester: row.semester,
            section_no: row.section_no,
            instructor_id: row.instructor_id,
            capacity: row.capacity,
            room: row.room,
            schedule: row.schedule.0,
        }
    }
}

#[derive(FromRow)]
struct EnrollmentRow {
    id: String,
    student_id: String,
    section_id: String,
    semester: String,
    midterm: Option<f64>,
    final_score: Option<f64>,
    bonus: Option<f64>,
    letter: Option<String>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            section_id: row.section_id,
            semester: row.semester,
            midterm: row.midterm,
            final_score: row.final_score,
            bonus: row.bonus,
            letter: row.letter,
        }
    }
}

const SECTION_COLUMNS: &str =
    "id, course_id, semester, section_no, instructor_id, capacity, room, schedule";

#[async_trait]
impl DepartmentRepo for PgRepository {
    async fn find_department(&self, id: &str) -> RepoResult<Option<Department>> {
        sqlx::query_as::<_, DepartmentRow>(
            "SELECT id, name, office, phone FROM departments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_sqlx)
    }

    async fn list_departments(&self, filter: &DepartmentFilter) -> RepoResult<Vec<Department>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id, name, office, phone FROM departments WHERE true");
        if let Some(q) = &filter.q {
            qb.push(" AND (id ILIKE ")
                .push_bind(like_pattern(q))
                .push(" OR name ILIKE ")
                .push_bind(like_pattern(q))
                .push(")");
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_DEPARTMENT_LIMIT));

        qb.build_query_as::<DepartmentRow>()
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx)
    }

    async fn insert_department(&self, record: &Department) -> RepoResult<()> {
        sqlx::query("INSERT INTO departments (id, name, office, phone) VALUES ($1, $2, $3, $4)")
            .bind(&record.id)
            .bind(&record.name)
            .bind(&record.office)
            .bind(&record.phone)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx)
    }

    async fn update_department(
        &self,
        id: &str,
        patch: &DepartmentPatch,
    ) -> RepoResult<Option<Department>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE departments SET ");
        let mut sets = qb.separated(", ");
        if let Some(name) = &patch.name {
            sets.push("name = ").push_bind_unseparated(name);
        }
        if let Some(office) = &patch.office {
            sets.push("office = ").push_bind_unseparated(office);
        }
        if let Some(phone) = &patch.phone {
            sets.push("phone = ").push_bind_unseparated(phone);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, name, office, phone");

        qb.build_query_as::<DepartmentRow>()
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx)
    }

    async fn delete_department(&self, id: &str) -> RepoResult<bool> {
        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(map_sqlx)
    }

    async fn count_departments(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }
}

#[async_trait]
impl InstructorRepo for PgRepository {
    async fn find_instructor(&self, id: &str) -> RepoResult<Option<Instructor>> {
        sqlx::query_as::<_, InstructorRow>(
            "SELECT id, full_name, email, dept_id, title FROM instructors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_sqlx)
    }

    async fn list_instructors(&self, filter: &InstructorFilter) -> RepoResult<Vec<Instructor>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, full_name, email, dept_id, title FROM instructors WHERE true",
        );
        if let Some(q) = &filter.q {
            qb.push(" AND (full_name ILIKE ")
                .push_bind(like_pattern(q))
                .push(" OR email ILIKE ")
                .push_bind(like_pattern(q))
                .push(")");
        }
        if let Some(dept_id) = &filter.dept_id {
            qb.push(" AND dept_id = ").push_bind(dept_id);
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_INSTRUCTOR_LIMIT));

        qb.build_query_as::<InstructorRow>()
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx)
    }

    async fn insert_instructor(&self, record: &Instructor) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO instructors (id, full_name, email, dept_id, title)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&record.id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.dept_id)
        .bind(&record.title)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(map_sqlx)
    }

    async fn update_instructor(
        &self,
        id: &str,
        patch: &InstructorPatch,
    ) -> RepoResult<Option<Instructor>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE instructors SET ");
        let mut sets = qb.separated(", ");
        if let Some(full_name) = &patch.full_name {
            sets.push("full_name = ").push_bind_unseparated(full_name);
        }
        if let Some(email) = &patch.email {
            sets.push("email = ").push_bind_unseparated(email);
        }
        if let Some(dept_id) = &patch.dept_id {
            sets.push("dept_id = ").push_bind_unseparated(dept_id);
        }
        if let Some(title) = &patch.title {
            sets.push("title = ").push_bind_unseparated(title);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, full_name, email, dept_id, title");

        qb.build_query_as::<InstructorRow>()
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx)
    }

    async fn delete_instructor(&self, id: &str) -> RepoResult<bool> {
        sqlx::query("DELETE FROM instructors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(map_sqlx)
    }

    async fn count_instructors(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM instructors")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn count_instructors_by_dept(&self, dept_id: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM instructors WHERE dept_id = $1")
            .bind(dept_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn instructor_email_exists(
        &self,
        email: &str,
        exclude: Option<&str>,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                 SELECT 1 FROM instructors
                 WHERE lower(email) = lower($1) AND ($2::text IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

#[async_trait]
impl StudentRepo for PgRepository {
    async fn find_student(&self, id: &str) -> RepoResult<Option<Student>> {
        sqlx::query_as::<_, StudentRow>(
            "SELECT id, full_name, email, major_dept_id, year, phone FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_sqlx)
    }

    async fn list_students(&self, filter: &StudentFilter) -> RepoResult<Vec<Student>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, full_name, email, major_dept_id, year, phone FROM students WHERE true",
        );
        if let Some(q) = &filter.q {
            qb.push(" AND (full_name ILIKE ")
                .push_bind(like_pattern(q))
                .push(" OR email ILIKE ")
                .push_bind(like_pattern(q))
                .push(")");
        }
        if let Some(major_dept_id) = &filter.major_dept_id {
            qb.push(" AND major_dept_id = ").push_bind(major_dept_id);
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_STUDENT_LIMIT));

        qb.build_query_as::<StudentRow>()
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx)
    }

    async fn insert_student(&self, record: &Student) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO students (id, full_name, email, major_dept_id, year, phone)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.major_dept_id)
        .bind(record.year)
        .bind(&record.phone)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(map_sqlx)
    }

    async fn update_student(&self, id: &str, patch: &StudentPatch) -> RepoResult<Option<Student>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE students SET ");
        let mut sets = qb.separated(", ");
        if let Some(full_name) = &patch.full_name {
            sets.push("full_name = ").push_bind_unseparated(full_name);
        }
        if let Some(email) = &patch.email {
            sets.push("email = ").push_bind_unseparated(email);
        }
        if let Some(major_dept_id) = &patch.major_dept_id {
            sets.push("major_dept_id = ")
                .push_bind_unseparated(major_dept_id);
        }
        if let Some(year) = patch.year {
            sets.push("year = ").push_bind_unseparated(year);
        }
        if let Some(phone) = &patch.phone {
            sets.push("phone = ").push_bind_unseparated(phone);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, full_name, email, major_dept_id, year, phone");

        qb.build_query_as::<StudentRow>()
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx)
    }

    async fn delete_student(&self, id: &str) -> RepoResult<bool> {
        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(map_sqlx)
    }

    async fn count_students(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn count_students_by_major(&self, dept_id: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students WHERE major_dept_id = $1")
            .bind(dept_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn student_email_exists(&self, email: &str, exclude: Option<&str>) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                 SELECT 1 FROM students
                 WHERE lower(email) = lower($1) AND ($2::text IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

#[async_trait]
impl CourseRepo for PgRepository {
    async fn find_course(&self, id: &str) -> RepoResult<Option<Course>> {
        sqlx::query_as::<_, CourseRow>(
            "SELECT id, title, credits, dept_id, description, prereq_ids
             FROM courses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_sqlx)
    }

    async fn list_courses(&self, filter: &CourseFilter) -> RepoResult<Vec<Course>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, title, credits, dept_id, description, prereq_ids FROM courses WHERE true",
        );
        if let Some(q) = &filter.q {
            qb.push(" AND (id ILIKE ")
                .push_bind(like_pattern(q))
                .push(" OR title ILIKE ")
                .push_bind(like_pattern(q))
                .push(")");
        }
        if let Some(dept_id) = &filter.dept_id {
            qb.push(" AND dept_id = ").push_bind(dept_id);
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_COURSE_LIMIT));

        qb.build_query_as::<CourseRow>()
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx)
    }

    async fn insert_course(&self, record: &Course) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO courses (id, title, credits, dept_id, description, prereq_ids)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(record.credits)
        .bind(&record.dept_id)
        .bind(&record.description)
        .bind(&record.prereq_ids)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(map_sqlx)
    }

    async fn update_course(&self, id: &str, patch: &CoursePatch) -> RepoResult<Option<Course>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE courses SET ");
        let mut sets = qb.separated(", ");
        if let Some(title) = &patch.title {
            sets.push("title = ").push_bind_unseparated(title);
        }
        if let Some(credits) = patch.credits {
            sets.push("credits = ").push_bind_unseparated(credits);
        }
        if let Some(dept_id) = &patch.dept_id {
            sets.push("dept_id = ").push_bind_unseparated(dept_id);
        }
        if let Some(description) = &patch.description {
            sets.push("description = ")
                .push_bind_unseparated(description);
        }
        if let Some(prereq_ids) = &patch.prereq_ids {
            sets.push("prereq_ids = ").push_bind_unseparated(prereq_ids);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, title, credits, dept_id, description, prereq_ids");

        qb.build_query_as::<CourseRow>()
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx)
    }

    async fn delete_course(&self, id: &str) -> RepoResult<bool> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(map_sqlx)
    }

    async fn count_courses(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn count_courses_by_dept(&self, dept_id: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE dept_id = $1")
            .bind(dept_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }
}

#[async_trait]
impl SectionRepo for PgRepository {
    async fn find_section(&self, id: &str) -> RepoResult<Option<ClassSection>> {
        sqlx::query_as::<_, SectionRow>(&format!(
            "SELECT {SECTION_COLUMNS} FROM class_sections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_sqlx)
    }

    async fn list_sections(&self, filter: &SectionFilter) -> RepoResult<Vec<ClassSection>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SECTION_COLUMNS} FROM class_sections WHERE true"
        ));
        if let Some(course_id) = &filter.course_id {
            qb.push(" AND course_id = ").push_bind(course_id);
        }
        if let Some(semester) = &filter.semester {
            qb.push(" AND semester = ").push_bind(semester);
        }
        if let Some(instructor_id) = &filter.instructor_id {
            qb.push(" AND instructor_id = ").push_bind(instructor_id);
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_SECTION_LIMIT));

        qb.build_query_as::<SectionRow>()
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx)
    }

    async fn insert_section(&self, record: &ClassSection) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO class_sections
                 (id, course_id, semester, section_no, instructor_id, capacity, room, schedule)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&record.id)
        .bind(&record.course_id)
        .bind(&record.semester)
        .bind(&record.section_no)
        .bind(&record.instructor_id)
        .bind(record.capacity)
        .bind(&record.room)
        .bind(Json(&record.schedule))
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(map_sqlx)
    }

    async fn update_section(
        &self,
        id: &str,
        patch: &SectionPatch,
    ) -> RepoResult<Option<ClassSection>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE class_sections SET ");
        let mut sets = qb.separated(", ");
        if let Some(course_id) = &patch.course_id {
            sets.push("course_id = ").push_bind_unseparated(course_id);
        }
        if let Some(semester) = &patch.semester {
            sets.push("semester = ").push_bind_unseparated(semester);
        }
        if let Some(section_no) = &patch.section_no {
            sets.push("section_no = ").push_bind_unseparated(section_no);
        }
        if let Some(instructor_id) = &patch.instructor_id {
            sets.push("instructor_id = ")
                .push_bind_unseparated(instructor_id);
        }
        if let Some(capacity) = patch.capacity {
            sets.push("capacity = ").push_bind_unseparated(capacity);
        }
        if let Some(room) = &patch.room {
            sets.push("room = ").push_bind_unseparated(room);
        }
        if let Some(schedule) = &patch.schedule {
            sets.push("schedule = ")
                .push_bind_unseparated(Json(schedule));
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {SECTION_COLUMNS}"));

        qb.build_query_as::<SectionRow>()
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx)
    }

    async fn delete_section(&self, id: &str) -> RepoResult<bool> {
        sqlx::query("DELETE FROM class_sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(map_sqlx)
    }

    async fn count_sections(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM class_sections")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn count_sections_by_course(&self, course_id: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM class_sections WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn count_sections_by_instructor(&self, instructor_id: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM class_sections WHERE instructor_id = $1",
        )
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn section_no_exists(
        &self,
        course_id: &str,
        semester: &str,
        section_no: &str,
        exclude: Option<&str>,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                 SELECT 1 FROM class_sections
                 WHERE course_id = $1 AND semester = $2 AND section_no = $3
                   AND ($4::text IS NULL OR id <> $4)
             )",
        )
        .bind(course_id)
        .bind(semester)
        .bind(section_no)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

#[async_trait]
impl EnrollmentRepo for PgRepository {
    async fn find_enrollment(&self, id: &str) -> RepoResult<Option<Enrollment>> {
        sqlx::query_as::<_, EnrollmentRow>(
            "SELECT id, student_id, section_id, semester, midterm, final_score, bonus, letter
             FROM enrollments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_sqlx)
    }

    async fn find_enrollment_by_pair(
        &self,
        student_id: &str,
        section_id: &str,
    ) -> RepoResult<Option<Enrollment>> {
        sqlx::query_as::<_, EnrollmentRow>(
            "SELECT id, student_id, section_id, semester, midterm, final_score, bonus, letter
             FROM enrollments WHERE student_id = $1 AND section_id = $2",
        )
        .bind(student_id)
        .bind(section_id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_sqlx)
    }

    async fn list_enrollments(&self, filter: &EnrollmentFilter) -> RepoResult<Vec<Enrollment>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, student_id, section_id, semester, midterm, final_score, bonus, letter
             FROM enrollments WHERE true",
        );
        if let Some(student_id) = &filter.student_id {
            qb.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(section_id) = &filter.section_id {
            qb.push(" AND section_id = ").push_bind(section_id);
        }
        if let Some(semester) = &filter.semester {
            qb.push(" AND semester = ").push_bind(semester);
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_ENROLLMENT_LIMIT));

        qb.build_query_as::<EnrollmentRow>()
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx)
    }

    async fn insert_enrollment(&self, record: &Enrollment) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO enrollments
                 (id, student_id, section_id, semester, midterm, final_score, bonus, letter)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&record.id)
        .bind(&record.student_id)
        .bind(&record.section_id)
        .bind(&record.semester)
        .bind(record.midterm)
        .bind(record.final_score)
        .bind(record.bonus)
        .bind(&record.letter)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(map_sqlx)
    }

    async fn update_enrollment(
        &self,
        id: &str,
        patch: &EnrollmentPatch,
    ) -> RepoResult<Option<Enrollment>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE enrollments SET ");
        let mut sets = qb.separated(", ");
        if let Some(student_id) = &patch.student_id {
            sets.push("student_id = ").push_bind_unseparated(student_id);
        }
        if let Some(section_id) = &patch.section_id {
            sets.push("section_id = ").push_bind_unseparated(section_id);
        }
        if let Some(semester) = &patch.semester {
            sets.push("semester = ").push_bind_unseparated(semester);
        }
        // Two-level options: the outer layer marks the field as touched, the
        // inner value may be NULL to clear a score.
        if let Some(midterm) = patch.midterm {
            sets.push("midterm = ").push_bind_unseparated(midterm);
        }
        if let Some(final_score) = patch.final_score {
            sets.push("final_score = ")
                .push_bind_unseparated(final_score);
        }
        if let Some(bonus) = patch.bonus {
            sets.push("bonus = ").push_bind_unseparated(bonus);
        }
        if let Some(letter) = &patch.letter {
            sets.push("letter = ").push_bind_unseparated(letter);
        }
        qb.push(" WHERE id = ").push_bind(id).push(
            " RETURNING id, student_id, section_id, semester, midterm, final_score, bonus, letter",
        );

        qb.build_query_as::<EnrollmentRow>()
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx)
    }

    async fn delete_enrollment(&self, id: &str) -> RepoResult<bool> {
        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(map_sqlx)
    }

    async fn count_enrollments(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn count_enrollments_by_student(&self, student_id: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments WHERE student_id = $1")
            .bind(student_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn count_enrollments_by_section(&self, section_id: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments WHERE section_id = $1")
            .bind(section_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }
}
