use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "testimonial")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub event_type: String,
    pub rating: i32,
    pub testimonial: String,
    pub is_approved: bool,
    pub is_featured: bool,
    /// JSON array of `{ "path": ... }` objects
    pub images: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i32) -> Result<(), ModelError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ModelError::Validation("rating must be between 1 and 5".into()))
    }
}
