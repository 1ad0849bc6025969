//! Records held by the stores and the request/response bodies of the routed views.

pub mod assignment_item;
pub mod attendance_record;
pub mod code_problem;
pub mod course_info;
pub mod notification;
pub mod request;
pub mod supplementary_material;
pub mod user_info;
