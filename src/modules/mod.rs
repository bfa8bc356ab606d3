pub mod auth;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod instructors;
pub mod integrity;
pub mod reports;
pub mod sections;
pub mod stats;
pub mod students;
