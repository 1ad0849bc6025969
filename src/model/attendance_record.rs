use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{course_info::CourseId, user_info::UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u32,
    pub course_id: CourseId,
    pub student_id: UserId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}
