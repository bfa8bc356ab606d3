use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::validator::parse_time;
use crate::utils::strings::{clean, clean_opt, normalize_semester};

/// One recurring meeting slot of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_meeting_time"))]
pub struct MeetingTime {
    /// Day of week: `mon` through `sun`.
    pub day: String,
    /// Start of the slot, `HH:MM`.
    pub start: String,
    /// End of the slot, `HH:MM`, strictly after `start`.
    pub end: String,
}

fn validate_meeting_time(entry: &MeetingTime) -> Result<(), ValidationError> {
    const DAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
    if !DAYS.contains(&entry.day.to_ascii_lowercase().as_str()) {
        let mut error = ValidationError::new("day");
        error.message = Some("day must be one of mon, tue, wed, thu, fri, sat, sun".into());
        return Err(error);
    }
    let (Some(start), Some(end)) = (parse_time(&entry.start), parse_time(&entry.end)) else {
        let mut error = ValidationError::new("time");
        error.message = Some("start and end must be valid HH:MM times".into());
        return Err(error);
    };
    if start >= end {
        let mut error = ValidationError::new("time_order");
        error.message = Some("start must be before end".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassSection {
    pub id: String,
    pub course_id: String,
    pub semester: String,
    pub section_no: String,
    pub instructor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default)]
    pub schedule: Vec<MeetingTime>,
}

/// Section enriched with fields of its owning course, for list/read payloads.
/// The course fields are `null` when the reference is an orphan.
#[derive(Debug, Serialize, ToSchema)]
pub struct SectionView {
    #[serde(flatten)]
    pub section: ClassSection,
    pub course_title: Option<String>,
    pub course_dept_id: Option<String>,
    pub course_credits: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSectionDto {
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub course_id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub semester: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub section_no: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub instructor_id: String,
    #[validate(range(min = 0, message = "Capacity must be a non-negative number."))]
    pub capacity: Option<i32>,
    pub room: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub schedule: Vec<MeetingTime>,
}

impl CreateSectionDto {
    pub fn into_record(self) -> ClassSection {
        ClassSection {
            id: clean(&self.id),
            course_id: clean(&self.course_id),
            semester: normalize_semester(&self.semester),
            section_no: clean(&self.section_no),
            instructor_id: clean(&self.instructor_id),
            capacity: self.capacity,
            room: clean_opt(self.room),
            schedule: normalize_schedule(self.schedule),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSectionDto {
    pub id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub course_id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub semester: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub section_no: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub instructor_id: Option<String>,
    #[validate(range(min = 0, message = "Capacity must be a non-negative number."))]
    pub capacity: Option<i32>,
    pub room: Option<String>,
    #[validate(nested)]
    pub schedule: Option<Vec<MeetingTime>>,
}

#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub course_id: Option<String>,
    pub semester: Option<String>,
    pub section_no: Option<String>,
    pub instructor_id: Option<String>,
    pub capacity: Option<i32>,
    pub room: Option<String>,
    pub schedule: Option<Vec<MeetingTime>>,
}

impl SectionPatch {
    pub fn is_empty(&self) -> bool {
        self.course_id.is_none()
            && self.semester.is_none()
            && self.section_no.is_none()
            && self.instructor_id.is_none()
            && self.capacity.is_none()
            && self.room.is_none()
            && self.schedule.is_none()
    }
}

impl UpdateSectionDto {
    pub fn into_patch(self) -> SectionPatch {
        SectionPatch {
            course_id: self.course_id.map(|v| clean(&v)),
            semester: self.semester.map(|v| normalize_semester(&v)),
            section_no: self.section_no.map(|v| clean(&v)),
            instructor_id: self.instructor_id.map(|v| clean(&v)),
            capacity: self.capacity,
            room: clean_opt(self.room),
            schedule: self.schedule.map(normalize_schedule),
        }
    }
}

fn normalize_schedule(schedule: Vec<MeetingTime>) -> Vec<MeetingTime> {
    schedule
        .into_iter()
        .map(|entry| MeetingTime {
            day: entry.day.to_ascii_lowercase(),
            start: entry.start.trim().to_string(),
            end: entry.end.trim().to_string(),
        })
        .collect()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SectionListParams {
    pub course_id: Option<String>,
    pub semester: Option<String>,
    pub instructor_id: Option<String>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: &str, start: &str, end: &str) -> MeetingTime {
        MeetingTime {
            day: day.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn accepts_a_well_formed_slot() {
        assert!(slot("mon", "09:00", "10:30").validate().is_ok());
    }

    #[test]
    fn rejects_unknown_days_and_bad_times() {
        assert!(slot("monday", "09:00", "10:30").validate().is_err());
        assert!(slot("mon", "9am", "10:30").validate().is_err());
    }

    #[test]
    fn rejects_inverted_and_empty_ranges() {
        assert!(slot("fri", "11:00", "10:00").validate().is_err());
        assert!(slot("fri", "10:00", "10:00").validate().is_err());
    }
}
