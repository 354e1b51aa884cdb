use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Workflow stages for a booking.
pub const STATUSES: &[&str] = &["pending", "confirmed", "completed", "cancelled"];

pub const DEFAULT_STATUS: &str = "pending";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_booking")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub mobile: Option<String>,
    pub email: String,
    pub event_type: String,
    pub event_date: Date,
    pub venue: Option<String>,
    pub guest_count: Option<i32>,
    pub budget: Option<String>,
    pub additional_info: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(status: &str) -> Result<(), ModelError> {
    if STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("unknown event status: {status}")))
    }
}
