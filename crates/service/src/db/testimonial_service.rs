use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::testimonial;

use crate::errors::ServiceError;

/// Staff-entered testimonial; created unapproved unless stated otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestimonialInput {
    pub name: String,
    pub event_type: String,
    pub rating: i32,
    pub testimonial: String,
    #[serde(default)]
    pub images: Vec<TestimonialImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialImage {
    pub path: String,
}

/// Approval/feature toggle payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialStatusInput {
    #[serde(default)]
    pub is_approved: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialStats {
    pub total: u64,
    pub approved: u64,
    pub featured: u64,
}

pub async fn create_testimonial(
    db: &DatabaseConnection,
    input: CreateTestimonialInput,
) -> Result<testimonial::Model, ServiceError> {
    models::user::validate_name(&input.name)?;
    models::testimonial::validate_rating(input.rating)?;
    if input.testimonial.trim().is_empty() {
        return Err(ServiceError::Validation("testimonial text required".into()));
    }

    let now = Utc::now();
    let am = testimonial::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        event_type: Set(input.event_type.trim().to_string()),
        rating: Set(input.rating),
        testimonial: Set(input.testimonial),
        is_approved: Set(false),
        is_featured: Set(false),
        images: Set(serde_json::json!(input.images)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(testimonial_id = %created.id, "testimonial_created");
    Ok(created)
}

pub async fn list_testimonials(
    db: &DatabaseConnection,
    is_approved: Option<bool>,
    page: Pagination,
) -> Result<(Vec<testimonial::Model>, u64), ServiceError> {
    let mut query = testimonial::Entity::find().order_by_desc(testimonial::Column::CreatedAt);
    if let Some(approved) = is_approved {
        query = query.filter(testimonial::Column::IsApproved.eq(approved));
    }
    let (page_idx, per_page) = page.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((rows, total))
}

/// Approved and featured entries for the public carousel.
pub async fn featured_testimonials(
    db: &DatabaseConnection,
) -> Result<Vec<testimonial::Model>, ServiceError> {
    testimonial::Entity::find()
        .filter(testimonial::Column::IsApproved.eq(true))
        .filter(testimonial::Column::IsFeatured.eq(true))
        .order_by_desc(testimonial::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn set_testimonial_status(
    db: &DatabaseConnection,
    id: Uuid,
    input: TestimonialStatusInput,
) -> Result<Option<testimonial::Model>, ServiceError> {
    let Some(found) = testimonial::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
    else {
        return Ok(None);
    };
    let mut am: testimonial::ActiveModel = found.into();
    if let Some(approved) = input.is_approved {
        am.is_approved = Set(approved);
    }
    if let Some(featured) = input.is_featured {
        am.is_featured = Set(featured);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(testimonial_id = %updated.id, approved = updated.is_approved, featured = updated.is_featured, "testimonial_status_updated");
    Ok(Some(updated))
}

pub async fn testimonial_stats(db: &DatabaseConnection) -> Result<TestimonialStats, ServiceError> {
    let total = testimonial::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let approved = testimonial::Entity::find()
        .filter(testimonial::Column::IsApproved.eq(true))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let featured = testimonial::Entity::find()
        .filter(testimonial::Column::IsFeatured.eq(true))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(TestimonialStats { total, approved, featured })
}
