use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginDto, LoginResponse, MeResponse, OkResponse, UserInfo};
use crate::modules::courses::model::{Course, CreateCourseDto, UpdateCourseDto};
use crate::modules::departments::model::{
    CreateDepartmentDto, Department, UpdateDepartmentDto,
};
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, Enrollment, EnrollmentView, UpdateEnrollmentDto,
};
use crate::modules::instructors::model::{
    CreateInstructorDto, Instructor, UpdateInstructorDto,
};
use crate::modules::integrity::DeleteOutcome;
use crate::modules::reports::model::{CourseStatsReport, GpaDetail, GpaReport, LetterBucket};
use crate::modules::sections::model::{
    ClassSection, CreateSectionDto, MeetingTime, SectionView, UpdateSectionDto,
};
use crate::modules::stats::model::{
    CourseAverage, CourseEnrollmentCount, LetterCount, MajorCount, SectionAverage, SemesterCount,
    StatsResponse, StatsTotals,
};
use crate::modules::students::model::{CreateStudentDto, Student, UpdateStudentDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::departments::controller::list_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::instructors::controller::list_instructors,
        crate::modules::instructors::controller::get_instructor,
        crate::modules::instructors::controller::create_instructor,
        crate::modules::instructors::controller::update_instructor,
        crate::modules::instructors::controller::delete_instructor,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::sections::controller::list_sections,
        crate::modules::sections::controller::get_section,
        crate::modules::sections::controller::create_section,
        crate::modules::sections::controller::update_section,
        crate::modules::sections::controller::delete_section,
        crate::modules::enrollments::controller::list_enrollments,
        crate::modules::enrollments::controller::get_enrollment,
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::update_enrollment,
        crate::modules::enrollments::controller::delete_enrollment,
        crate::modules::stats::controller::get_stats,
        crate::modules::reports::controller::student_gpa,
        crate::modules::reports::controller::course_stats,
        crate::modules::reports::controller::enrollments_csv,
    ),
    components(
        schemas(
            LoginDto,
            LoginResponse,
            UserInfo,
            OkResponse,
            MeResponse,
            ErrorResponse,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            Instructor,
            CreateInstructorDto,
            UpdateInstructorDto,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            ClassSection,
            MeetingTime,
            SectionView,
            CreateSectionDto,
            UpdateSectionDto,
            Enrollment,
            EnrollmentView,
            CreateEnrollmentDto,
            UpdateEnrollmentDto,
            DeleteOutcome,
            StatsResponse,
            StatsTotals,
            MajorCount,
            SemesterCount,
            LetterCount,
            SectionAverage,
            CourseAverage,
            CourseEnrollmentCount,
            GpaReport,
            GpaDetail,
            CourseStatsReport,
            LetterBucket,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Admin login and session state"),
        (name = "Departments", description = "Department management"),
        (name = "Instructors", description = "Instructor management"),
        (name = "Students", description = "Student management"),
        (name = "Courses", description = "Course catalog management"),
        (name = "Sections", description = "Class section management"),
        (name = "Enrollments", description = "Enrollment and grade management"),
        (name = "Stats", description = "Cross-collection statistics"),
        (name = "Reports", description = "GPA, course and CSV reports")
    ),
    info(
        title = "Registrar API",
        version = "0.1.0",
        description = "University registrar REST API: departments, instructors, students, courses, class sections and enrollments with derived letter grades.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
