//! Read-only view of a classroom.
//!
//! Classrooms are created and managed by the classroom resource module. The
//! identity subsystem only needs to know that one exists before a student
//! profile can point at it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::ClassroomId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
}
