//! In-memory repository used by the test suite.
//!
//! Every collection lives behind a single `RwLock`, so check-and-insert is
//! atomic the same way a unique index makes it atomic in Postgres. Conflict
//! errors carry the same constraint names the migrations declare, keeping
//! error mapping identical across implementations.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::modules::courses::model::{Course, CoursePatch};
use crate::modules::departments::model::{Department, DepartmentPatch};
use crate::modules::enrollments::model::{Enrollment, EnrollmentPatch};
use crate::modules::instructors::model::{Instructor, InstructorPatch};
use crate::modules::sections::model::{ClassSection, SectionPatch};
use crate::modules::students::model::{Student, StudentPatch};

use super::{
    CourseFilter, CourseRepo, DEFAULT_COURSE_LIMIT, DEFAULT_DEPARTMENT_LIMIT,
    DEFAULT_ENROLLMENT_LIMIT, DEFAULT_INSTRUCTOR_LIMIT, DEFAULT_SECTION_LIMIT,
    DEFAULT_STUDENT_LIMIT, DepartmentFilter, DepartmentRepo, EnrollmentFilter, EnrollmentRepo,
    InstructorFilter, InstructorRepo, RepoError, RepoResult, SectionFilter, SectionRepo,
    StudentFilter, StudentRepo,
};

#[derive(Default)]
struct Collections {
    departments: Vec<Department>,
    instructors: Vec<Instructor>,
    students: Vec<Student>,
    courses: Vec<Course>,
    sections: Vec<ClassSection>,
    enrollments: Vec<Enrollment>,
}

#[derive(Default)]
pub struct MemRepository {
    data: RwLock<Collections>,
}

impl MemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn capped<T>(mut records: Vec<T>, limit: Option<i64>, default: i64) -> Vec<T> {
    let limit = limit.unwrap_or(default).max(0) as usize;
    records.truncate(limit);
    records
}

fn poisoned() -> RepoError {
    RepoError::Other(anyhow::anyhow!("repository lock poisoned"))
}

macro_rules! read {
    ($self:ident) => {
        $self.data.read().map_err(|_| poisoned())?
    };
}

macro_rules! write {
    ($self:ident) => {
        $self.data.write().map_err(|_| poisoned())?
    };
}

#[async_trait]
impl DepartmentRepo for MemRepository {
    async fn find_department(&self, id: &str) -> RepoResult<Option<Department>> {
        Ok(read!(self).departments.iter().find(|d| d.id == id).cloned())
    }

    async fn list_departments(&self, filter: &DepartmentFilter) -> RepoResult<Vec<Department>> {
        let data = read!(self);
        let mut records: Vec<Department> = data
            .departments
            .iter()
            .filter(|d| {
                filter
                    .q
                    .as_deref()
                    .map(|q| contains_ci(&d.id, q) || contains_ci(&d.name, q))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(capped(records, filter.limit, DEFAULT_DEPARTMENT_LIMIT))
    }

    async fn insert_department(&self, record: &Department) -> RepoResult<()> {
        let mut data = write!(self);
        if data.departments.iter().any(|d| d.id == record.id) {
            return Err(RepoError::Conflict("departments_pkey".to_string()));
        }
        data.departments.push(record.clone());
        Ok(())
    }

    async fn update_department(
        &self,
        id: &str,
        patch: &DepartmentPatch,
    ) -> RepoResult<Option<Department>> {
        let mut data = write!(self);
        let Some(record) = data.departments.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(office) = &patch.office {
            record.office = Some(office.clone());
        }
        if let Some(phone) = &patch.phone {
            record.phone = Some(phone.clone());
        }
        Ok(Some(record.clone()))
    }

    async fn delete_department(&self, id: &str) -> RepoResult<bool> {
        let mut data = write!(self);
        let before = data.departments.len();
        data.departments.retain(|d| d.id != id);
        Ok(data.departments.len() < before)
    }

    async fn count_departments(&self) -> RepoResult<i64> {
        Ok(read!(self).departments.len() as i64)
    }
}

#[async_trait]
impl InstructorRepo for MemRepository {
    async fn find_instructor(&self, id: &str) -> RepoResult<Option<Instructor>> {
        Ok(read!(self).instructors.iter().find(|i| i.id == id).cloned())
    }

    async fn list_instructors(&self, filter: &InstructorFilter) -> RepoResult<Vec<Instructor>> {
        let data = read!(self);
        let mut records: Vec<Instructor> = data
            .instructors
            .iter()
            .filter(|i| {
                filter
                    .q
                    .as_deref()
                    .map(|q| contains_ci(&i.full_name, q) || contains_ci(&i.email, q))
                    .unwrap_or(true)
                    && filter
                        .dept_id
                        .as_deref()
                        .map(|dept| i.dept_id == dept)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(capped(records, filter.limit, DEFAULT_INSTRUCTOR_LIMIT))
    }

    async fn insert_instructor(&self, record: &Instructor) -> RepoResult<()> {
        let mut data = write!(self);
        if data.instructors.iter().any(|i| i.id == record.id) {
            return Err(RepoError::Conflict("instructors_pkey".to_string()));
        }
        if data
            .instructors
            .iter()
            .any(|i| i.email.eq_ignore_ascii_case(&record.email))
        {
            return Err(RepoError::Conflict("instructors_unique_email".to_string()));
        }
        data.instructors.push(record.clone());
        Ok(())
    }

    async fn update_instructor(
        &self,
        id: &str,
        patch: &InstructorPatch,
    ) -> RepoResult<Option<Instructor>> {
        let mut data = write!(self);
        if let Some(email) = &patch.email {
            if data
                .instructors
                .iter()
                .any(|i| i.id != id && i.email.eq_ignore_ascii_case(email))
            {
                return Err(RepoError::Conflict("instructors_unique_email".to_string()));
            }
        }
        let Some(record) = data.instructors.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(full_name) = &patch.full_name {
            record.full_name = full_name.clone();
        }
        if let Some(email) = &patch.email {
            record.email = email.clone();
        }
        if let Some(dept_id) = &patch.dept_id {
            record.dept_id = dept_id.clone();
        }
        if let Some(title) = &patch.title {
            record.title = Some(title.clone());
        }
        Ok(Some(record.clone()))
    }

    async fn delete_instructor(&self, id: &str) -> RepoResult<bool> {
        let mut data = write!(self);
        let before = data.instructors.len();
        data.instructors.retain(|i| i.id != id);
        Ok(data.instructors.len() < before)
    }

    async fn count_instructors(&self) -> RepoResult<i64> {
        Ok(read!(self).instructors.len() as i64)
    }

    async fn count_instructors_by_dept(&self, dept_id: &str) -> RepoResult<i64> {
        Ok(read!(self)
            .instructors
            .iter()
            .filter(|i| i.dept_id == dept_id)
            .count() as i64)
    }

    async fn instructor_email_exists(
        &self,
        email: &str,
        exclude: Option<&str>,
    ) -> RepoResult<bool> {
        Ok(read!(self).instructors.iter().any(|i| {
            i.email.eq_ignore_ascii_case(email) && exclude.map(|e| i.id != e).unwrap_or(true)
        }))
    }
}

#[async_trait]
impl StudentRepo for MemRepository {
    async fn find_student(&self, id: &str) -> RepoResult<Option<Student>> {
        Ok(read!(self).students.iter().find(|s| s.id == id).cloned())
    }

    async fn list_students(&self, filter: &StudentFilter) -> RepoResult<Vec<Student>> {
        let data = read!(self);
        let mut records: Vec<Student> = data
            .students
            .iter()
            .filter(|s| {
                filter
                    .q
                    .as_deref()
                    .map(|q| contains_ci(&s.full_name, q) || contains_ci(&s.email, q))
                    .unwrap_or(true)
                    && filter
                        .major_dept_id
                        .as_deref()
                        .map(|major| s.major_dept_id == major)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(capped(records, filter.limit, DEFAULT_STUDENT_LIMIT))
    }

    async fn insert_student(&self, record: &Student) -> RepoResult<()> {
        let mut data = write!(self);
        if data.students.iter().any(|s| s.id == record.id) {
            return Err(RepoError::Conflict("students_pkey".to_string()));
        }
        if data
            .students
            .iter()
            .any(|s| s.email.eq_ignore_ascii_case(&record.email))
        {
            return Err(RepoError::Conflict("students_unique_email".to_string()));
        }
        data.students.push(record.clone());
        Ok(())
    }

    async fn update_student(&self, id: &str, patch: &StudentPatch) -> RepoResult<Option<Student>> {
        let mut data = write!(self);
        if let Some(email) = &patch.email {
            if data
                .students
                .iter()
                .any(|s| s.id != id && s.email.eq_ignore_ascii_case(email))
            {
                return Err(RepoError::Conflict("students_unique_email".to_string()));
            }
        }
        let Some(record) = data.students.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(full_name) = &patch.full_name {
            record.full_name = full_name.clone();
        }
        if let Some(email) = &patch.email {
            record.email = email.clone();
        }
        if let Some(major_dept_id) = &patch.major_dept_id {
            record.major_dept_id = major_dept_id.clone();
        }
        if let Some(year) = patch.year {
            record.year = year;
        }
        if let Some(phone) = &patch.phone {
            record.phone = Some(phone.clone());
        }
        Ok(Some(record.clone()))
    }

    async fn delete_student(&self, id: &str) -> RepoResult<bool> {
        let mut data = write!(self);
        let before = data.students.len();
        data.students.retain(|s| s.id != id);
        Ok(data.students.len() < before)
    }

    async fn count_students(&self) -> RepoResult<i64> {
        Ok(read!(self).students.len() as i64)
    }

    async fn count_students_by_major(&self, dept_id: &str) -> RepoResult<i64> {
        Ok(read!(self)
            .students
            .iter()
            .filter(|s| s.major_dept_id == dept_id)
            .count() as i64)
    }

    async fn student_email_exists(&self, email: &str, exclude: Option<&str>) -> RepoResult<bool> {
        Ok(read!(self).students.iter().any(|s| {
            s.email.eq_ignore_ascii_case(email) && exclude.map(|e| s.id != e).unwrap_or(true)
        }))
    }
}

#[async_trait]
impl CourseRepo for MemRepository {
    async fn find_course(&self, id: &str) -> RepoResult<Option<Course>> {
        Ok(read!(self).courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list_courses(&self, filter: &CourseFilter) -> RepoResult<Vec<Course>> {
        let data = read!(self);
        let mut records: Vec<Course> = data
            .courses
            .iter()
            .filter(|c| {
                filter
                    .q
                    .as_deref()
                    .map(|q| contains_ci(&c.id, q) || contains_ci(&c.title, q))
                    .unwrap_or(true)
                    && filter
                        .dept_id
                        .as_deref()
                        .map(|dept| c.dept_id == dept)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(capped(records, filter.limit, DEFAULT_COURSE_LIMIT))
    }

    async fn insert_course(&self, record: &Course) -> RepoResult<()> {
        let mut data = write!(self);
        if data.courses.iter().any(|c| c.id == record.id) {
            return Err(RepoError::Conflict("courses_pkey".to_string()));
        }
        data.courses.push(record.clone());
        Ok(())
    }

    async fn update_course(&self, id: &str, patch: &CoursePatch) -> RepoResult<Option<Course>> {
        let mut data = write!(self);
        let Some(record) = data.courses.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            record.title = title.clone();
        }
        if let Some(credits) = patch.credits {
            record.credits = credits;
        }
        if let Some(dept_id) = &patch.dept_id {
            record.dept_id = dept_id.clone();
        }
        if let Some(description) = &patch.description {
            record.description = Some(description.clone());
        }
        if let Some(prereq_ids) = &patch.prereq_ids {
            record.prereq_ids = prereq_ids.clone();
        }
        Ok(Some(record.clone()))
    }

    async fn delete_course(&self, id: &str) -> RepoResult<bool> {
        let mut data = write!(self);
        let before = data.courses.len();
        data.courses.retain(|c| c.id != id);
        Ok(data.courses.len() < before)
    }

    async fn count_courses(&self) -> RepoResult<i64> {
        Ok(read!(self).courses.len() as i64)
    }

    async fn count_courses_by_dept(&self, dept_id: &str) -> RepoResult<i64> {
        Ok(read!(self)
            .courses
            .iter()
            .filter(|c| c.dept_id == dept_id)
            .count() as i64)
    }
}

#[async_trait]
impl SectionRepo for MemRepository {
    async fn find_section(&self, id: &str) -> RepoResult<Option<ClassSection>> {
        Ok(read!(self).sections.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sections(&self, filter: &SectionFilter) -> RepoResult<Vec<ClassSection>> {
        let data = read!(self);
        let mut records: Vec<ClassSection> = data
            .sections
            .iter()
            .filter(|s| {
                filter
                    .course_id
                    .as_deref()
                    .map(|course| s.course_id == course)
                    .unwrap_or(true)
                    && filter
                        .semester
                        .as_deref()
                        .map(|semester| s.semester == semester)
                        .unwrap_or(true)
                    && filter
                        .instructor_id
                        .as_deref()
                        .map(|instructor| s.instructor_id == instructor)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(capped(records, filter.limit, DEFAULT_SECTION_LIMIT))
    }

    async fn insert_section(&self, record: &ClassSection) -> RepoResult<()> {
        let mut data = write!(self);
        if data.sections.iter().any(|s| s.id == record.id) {
            return Err(RepoError::Conflict("class_sections_pkey".to_string()));
        }
        if data.sections.iter().any(|s| {
            s.course_id == record.course_id
                && s.semester == record.semester
                && s.section_no == record.section_no
        }) {
            return Err(RepoError::Conflict("sections_unique_no".to_string()));
        }
        data.sections.push(record.clone());
        Ok(())
    }

    async fn update_section(
        &self,
        id: &str,
        patch: &SectionPatch,
    ) -> RepoResult<Option<ClassSection>> {
        let mut data = write!(self);
        let Some(existing) = data.sections.iter().find(|s| s.id == id) else {
            return Ok(None);
        };
        let course_id = patch.course_id.clone().unwrap_or(existing.course_id.clone());
        let semester = patch.semester.clone().unwrap_or(existing.semester.clone());
        let section_no = patch
            .section_no
            .clone()
            .unwrap_or(existing.section_no.clone());
        if data.sections.iter().any(|s| {
            s.id != id
                && s.course_id == course_id
                && s.semester == semester
                && s.section_no == section_no
        }) {
            return Err(RepoError::Conflict("sections_unique_no".to_string()));
        }

        let Some(record) = data.sections.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        record.course_id = course_id;
        record.semester = semester;
        record.section_no = section_no;
        if let Some(instructor_id) = &patch.instructor_id {
            record.instructor_id = instructor_id.clone();
        }
        if let Some(capacity) = patch.capacity {
            record.capacity = Some(capacity);
        }
        if let Some(room) = &patch.room {
            record.room = Some(room.clone());
        }
        if let Some(schedule) = &patch.schedule {
            record.schedule = schedule.clone();
        }
        Ok(Some(record.clone()))
    }

    async fn delete_section(&self, id: &str) -> RepoResult<bool> {
        let mut data = write!(self);
        let before = data.sections.len();
        data.sections.retain(|s| s.id != id);
        Ok(data.sections.len() < before)
    }

    async fn count_sections(&self) -> RepoResult<i64> {
        Ok(read!(self).sections.len() as i64)
    }

    async fn count_sections_by_course(&self, course_id: &str) -> RepoResult<i64> {
        Ok(read!(self)
            .sections
            .iter()
            .filter(|s| s.course_id == course_id)
            .count() as i64)
    }

    async fn count_sections_by_instructor(&self, instructor_id: &str) -> RepoResult<i64> {
        Ok(read!(self)
            .sections
            .iter()
            .filter(|s| s.instructor_id == instructor_id)
            .count() as i64)
    }

    async fn section_no_exists(
        &self,
        course_id: &str,
        semester: &str,
        section_no: &str,
        exclude: Option<&str>,
    ) -> RepoResult<bool> {
        Ok(read!(self).sections.iter().any(|s| {
            s.course_id == course_id
                && s.semester == semester
                && s.section_no == section_no
                && exclude.map(|e| s.id != e).unwrap_or(true)
        }))
    }
}

#[async_trait]
impl EnrollmentRepo for MemRepository {
    async fn find_enrollment(&self, id: &str) -> RepoResult<Option<Enrollment>> {
        Ok(read!(self).enrollments.iter().find(|e| e.id == id).cloned())
    }

    async fn find_enrollment_by_pair(
        &self,
        student_id: &str,
        section_id: &str,
    ) -> RepoResult<Option<Enrollment>> {
        Ok(read!(self)
            .enrollments
            .iter()
            .find(|e| e.student_id == student_id && e.section_id == section_id)
            .cloned())
    }

    async fn list_enrollments(&self, filter: &EnrollmentFilter) -> RepoResult<Vec<Enrollment>> {
        let data = read!(self);
        let mut records: Vec<Enrollment> = data
            .enrollments
            .iter()
            .filter(|e| {
                filter
                    .student_id
                    .as_deref()
                    .map(|student| e.student_id == student)
                    .unwrap_or(true)
                    && filter
                        .section_id
                        .as_deref()
                        .map(|section| e.section_id == section)
                        .unwrap_or(true)
                    && filter
                        .semester
                        .as_deref()
                        .map(|semester| e.semester == semester)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(capped(records, filter.limit, DEFAULT_ENROLLMENT_LIMIT))
    }

    async fn insert_enrollment(&self, record: &Enrollment) -> RepoResult<()> {
        let mut data = write!(self);
        if data.enrollments.iter().any(|e| e.id == record.id) {
            return Err(RepoError::Conflict("enrollments_pkey".to_string()));
        }
        if data
            .enrollments
            .iter()
            .any(|e| e.student_id == record.student_id && e.section_id == record.section_id)
        {
            return Err(RepoError::Conflict("enrollments_unique_pair".to_string()));
        }
        data.enrollments.push(record.clone());
        Ok(())
    }

    async fn update_enrollment(
        &self,
        id: &str,
        patch: &EnrollmentPatch,
    ) -> RepoResult<Option<Enrollment>> {
        let mut data = write!(self);
        let Some(existing) = data.enrollments.iter().find(|e| e.id == id) else {
            return Ok(None);
        };
        let student_id = patch
            .student_id
            .clone()
            .unwrap_or(existing.student_id.clone());
        let section_id = patch
            .section_id
            .clone()
            .unwrap_or(existing.section_id.clone());
        if data
            .enrollments
            .iter()
            .any(|e| e.id != id && e.student_id == student_id && e.section_id == section_id)
        {
            return Err(RepoError::Conflict("enrollments_unique_pair".to_string()));
        }

        let Some(record) = data.enrollments.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        record.student_id = student_id;
        record.section_id = section_id;
        if let Some(semester) = &patch.semester {
            record.semester = semester.clone();
        }
        if let Some(midterm) = patch.midterm {
            record.midterm = midterm;
        }
        if let Some(final_score) = patch.final_score {
            record.final_score = final_score;
        }
        if let Some(bonus) = patch.bonus {
            record.bonus = bonus;
        }
        if let Some(letter) = &patch.letter {
            record.letter = letter.clone();
        }
        Ok(Some(record.clone()))
    }

    async fn delete_enrollment(&self, id: &str) -> RepoResult<bool> {
        let mut data = write!(self);
        let before = data.enrollments.len();
        data.enrollments.retain(|e| e.id != id);
        Ok(data.enrollments.len() < before)
    }

    async fn count_enrollments(&self) -> RepoResult<i64> {
        Ok(read!(self).enrollments.len() as i64)
    }

    async fn count_enrollments_by_student(&self, student_id: &str) -> RepoResult<i64> {
        Ok(read!(self)
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id)
            .count() as i64)
    }

    async fn count_enrollments_by_section(&self, section_id: &str) -> RepoResult<i64> {
        Ok(read!(self)
            .enrollments
            .iter()
            .filter(|e| e.section_id == section_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(id: &str, name: &str) -> Department {
        Department {
            id: id.to_string(),
            name: name.to_string(),
            office: None,
            phone: None,
        }
    }

    fn student(id: &str, email: &str, major: &str) -> Student {
        Student {
            id: id.to_string(),
            full_name: format!("Student {id}"),
            email: email.to_string(),
            major_dept_id: major.to_string(),
            year: 1,
            phone: None,
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let repo = MemRepository::new();
        repo.insert_department(&department("CS", "Computer Science"))
            .await
            .unwrap();

        let err = repo
            .insert_department(&department("CS", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_insensitive() {
        let repo = MemRepository::new();
        repo.insert_student(&student("s1", "kim@uni.edu", "CS"))
            .await
            .unwrap();

        let err = repo
            .insert_student(&student("s2", "KIM@uni.edu", "CS"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(c) if c == "students_unique_email"));

        assert!(
            repo.student_email_exists("Kim@Uni.Edu", None).await.unwrap()
        );
        assert!(
            !repo
                .student_email_exists("kim@uni.edu", Some("s1"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn list_filters_by_substring_and_major() {
        let repo = MemRepository::new();
        repo.insert_student(&student("s1", "ada@uni.edu", "CS"))
            .await
            .unwrap();
        repo.insert_student(&student("s2", "grace@uni.edu", "MATH"))
            .await
            .unwrap();

        let by_major = repo
            .list_students(&StudentFilter {
                major_dept_id: Some("MATH".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_major.len(), 1);
        assert_eq!(by_major[0].id, "s2");

        let by_q = repo
            .list_students(&StudentFilter {
                q: Some("ADA".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_q.len(), 1);
        assert_eq!(by_q[0].id, "s1");
    }

    #[tokio::test]
    async fn update_enrollment_clears_scores_with_explicit_null() {
        let repo = MemRepository::new();
        repo.insert_enrollment(&Enrollment {
            id: "s1:sec1".to_string(),
            student_id: "s1".to_string(),
            section_id: "sec1".to_string(),
            semester: "2024S1".to_string(),
            midterm: Some(8.0),
            final_score: Some(9.0),
            bonus: None,
            letter: Some("A-".to_string()),
        })
        .await
        .unwrap();

        let updated = repo
            .update_enrollment(
                "s1:sec1",
                &EnrollmentPatch {
                    midterm: Some(None),
                    letter: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.midterm, None);
        assert_eq!(updated.final_score, Some(9.0));
        assert_eq!(updated.letter, None);
    }

    #[tokio::test]
    async fn section_slot_collision_detected_on_update() {
        let repo = MemRepository::new();
        for no in ["01", "02"] {
            repo.insert_section(&ClassSection {
                id: format!("sec{no}"),
                course_id: "CS101".to_string(),
                semester: "2024S1".to_string(),
                section_no: no.to_string(),
                instructor_id: "i1".to_string(),
                capacity: None,
                room: None,
                schedule: vec![],
            })
            .await
            .unwrap();
        }

        let err = repo
            .update_section(
                "sec02",
                &SectionPatch {
                    section_no: Some("01".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(c) if c == "sections_unique_no"));
    }
}
