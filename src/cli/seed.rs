//! Seed loader: wipes every collection and reloads it from a JSON document
//! of arrays, one array per collection.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::grading::{GradeScale, compute_grade};
use crate::modules::courses::model::Course;
use crate::modules::departments::model::Department;
use crate::modules::enrollments::model::Enrollment;
use crate::modules::instructors::model::Instructor;
use crate::modules::sections::model::ClassSection;
use crate::modules::students::model::Student;
use crate::repo::postgres::PgRepository;
use crate::repo::{
    CourseRepo, DepartmentRepo, EnrollmentRepo, InstructorRepo, SectionRepo, StudentRepo,
};

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    departments: Vec<Department>,
    #[serde(default)]
    instructors: Vec<Instructor>,
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    class_sections: Vec<ClassSection>,
    #[serde(default)]
    enrollments: Vec<Enrollment>,
}

/// Replaces the entire data set with the seed file's contents. Letters in
/// the file are ignored; the derived grade is recomputed on load.
pub async fn seed_from_file(
    repo: &PgRepository,
    scale: &GradeScale,
    path: &Path,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let seed: SeedFile = serde_json::from_str(&raw).context("seed file is not valid JSON")?;

    repo.truncate_all().await?;

    for record in &seed.departments {
        repo.insert_department(record).await?;
    }
    println!(
        "Loaded {} record(s) into 'departments'",
        seed.departments.len()
    );

    for record in &seed.instructors {
        repo.insert_instructor(record).await?;
    }
    println!(
        "Loaded {} record(s) into 'instructors'",
        seed.instructors.len()
    );

    for record in &seed.students {
        repo.insert_student(record).await?;
    }
    println!("Loaded {} record(s) into 'students'", seed.students.len());

    for record in &seed.courses {
        repo.insert_course(record).await?;
    }
    println!("Loaded {} record(s) into 'courses'", seed.courses.len());

    for record in &seed.class_sections {
        repo.insert_section(record).await?;
    }
    println!(
        "Loaded {} record(s) into 'class_sections'",
        seed.class_sections.len()
    );

    for record in &seed.enrollments {
        let mut record = record.clone();
        record.letter = compute_grade(scale, record.midterm, record.final_score, record.bonus)
            .map(|g| g.letter);
        repo.insert_enrollment(&record).await?;
    }
    println!(
        "Loaded {} record(s) into 'enrollments'",
        seed.enrollments.len()
    );

    Ok(())
}
