use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::course_info::CourseId;

pub type MaterialId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Pdf,
    Video,
    Document,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementaryMaterial {
    pub id: MaterialId,
    pub course_id: CourseId,
    pub title: String,
    pub kind: MaterialKind,
    pub url: String,
    pub upload_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMaterial {
    pub course_id: Option<CourseId>,
    pub title: Option<String>,
    pub kind: Option<MaterialKind>,
    pub url: Option<String>,
    /// Defaults to the day of the upload
    pub upload_date: Option<NaiveDate>,
    pub size: Option<String>,
}
