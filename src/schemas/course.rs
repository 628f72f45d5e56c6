use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Course, Lesson, Unit};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: String,
    #[validate(range(min = 1, max = 32767, message = "grade must be positive"))]
    pub(crate) grade: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 32767, message = "grade must be positive"))]
    pub(crate) grade: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) grade: i32,
    pub(crate) created_by: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            grade: course.grade,
            created_by: course.created_by,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UnitCreate {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    #[serde(alias = "order")]
    #[validate(range(min = 0, message = "position must be non-negative"))]
    pub(crate) position: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UnitUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[serde(alias = "order")]
    #[validate(range(min = 0, message = "position must be non-negative"))]
    pub(crate) position: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UnitResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) position: i32,
    pub(crate) created_at: String,
}

impl UnitResponse {
    pub(crate) fn from_db(unit: Unit) -> Self {
        Self {
            id: unit.id,
            course_id: unit.course_id,
            title: unit.title,
            position: unit.position,
            created_at: format_primitive(unit.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LessonCreate {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    #[serde(alias = "order")]
    #[validate(range(min = 0, message = "position must be non-negative"))]
    pub(crate) position: i32,
    #[serde(default)]
    pub(crate) content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LessonUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[serde(alias = "order")]
    #[validate(range(min = 0, message = "position must be non-negative"))]
    pub(crate) position: Option<i32>,
    #[serde(default)]
    pub(crate) content: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) title: String,
    pub(crate) position: i32,
    pub(crate) content: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl LessonResponse {
    pub(crate) fn from_db(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            unit_id: lesson.unit_id,
            title: lesson.title,
            position: lesson.position,
            content: lesson.content,
            created_at: format_primitive(lesson.created_at),
            updated_at: format_primitive(lesson.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) course_id: String,
    pub(crate) enrolled_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseEnrollmentResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) enrolled_at: String,
}
