use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const STATUSES: &[&str] = &["new", "read", "replied", "archived"];
pub const PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

pub const DEFAULT_STATUS: &str = "new";
pub const DEFAULT_PRIORITY: &str = "medium";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_message")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub response_content: Option<String>,
    pub responded_by: Option<String>,
    pub responded_at: Option<DateTimeWithTimeZone>,
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
        Err(ModelError::Validation(format!("unknown contact status: {status}")))
    }
}

pub fn validate_priority(priority: &str) -> Result<(), ModelError> {
    if PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("unknown contact priority: {priority}")))
    }
}
