use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::event_booking;

use crate::errors::ServiceError;

/// Public booking form payload. `guestCount` arrives as a string from the
/// HTML form but numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    pub email: String,
    pub event_type: String,
    pub event_date: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub guest_count: Option<NumberOrString>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    Text(String),
}

fn parse_guest_count(value: Option<NumberOrString>) -> Result<Option<i32>, ServiceError> {
    match value {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| ServiceError::Validation("guest count out of range".into())),
        Some(NumberOrString::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i32>()
                .map(Some)
                .map_err(|_| ServiceError::Validation("guest count must be a number".into()))
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter<'a> {
    pub status: Option<&'a str>,
    pub event_type: Option<&'a str>,
}

/// Dashboard counters, camelCase on the wire.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: u64,
    pub pending_events: u64,
    pub confirmed_events: u64,
    pub completed_events: u64,
    pub cancelled_events: u64,
}

/// Create a booking from the public form; status always starts pending.
pub async fn create_booking(
    db: &DatabaseConnection,
    input: CreateBookingInput,
) -> Result<event_booking::Model, ServiceError> {
    models::user::validate_name(&input.name)?;
    models::user::validate_email(&input.email)?;
    if input.event_type.trim().is_empty() {
        return Err(ServiceError::Validation("event type required".into()));
    }
    let event_date = NaiveDate::parse_from_str(input.event_date.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::Validation("event date must be YYYY-MM-DD".into()))?;
    let guest_count = parse_guest_count(input.guest_count)?;

    let now = Utc::now();
    let am = event_booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        mobile: Set(input.mobile),
        email: Set(input.email.trim().to_string()),
        event_type: Set(input.event_type.trim().to_string()),
        event_date: Set(event_date),
        venue: Set(input.venue),
        guest_count: Set(guest_count),
        budget: Set(input.budget),
        additional_info: Set(input.additional_info),
        status: Set(event_booking::DEFAULT_STATUS.into()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(booking_id = %created.id, event_type = %created.event_type, "booking_created");
    Ok(created)
}

/// Newest-first listing with optional status/type filters.
pub async fn list_bookings(
    db: &DatabaseConnection,
    filter: BookingFilter<'_>,
    page: Pagination,
) -> Result<(Vec<event_booking::Model>, u64), ServiceError> {
    let mut query =
        event_booking::Entity::find().order_by_desc(event_booking::Column::CreatedAt);
    if let Some(status) = filter.status {
        models::event_booking::validate_status(status)?;
        query = query.filter(event_booking::Column::Status.eq(status));
    }
    if let Some(event_type) = filter.event_type {
        query = query.filter(event_booking::Column::EventType.eq(event_type));
    }
    let (page_idx, per_page) = page.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((rows, total))
}

pub async fn get_booking(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<event_booking::Model>, ServiceError> {
    event_booking::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Move a booking through its workflow; the status must come from the
/// closed set.
pub async fn update_booking_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: &str,
) -> Result<Option<event_booking::Model>, ServiceError> {
    models::event_booking::validate_status(status)?;
    let Some(found) = get_booking(db, id).await? else {
        return Ok(None);
    };
    let mut am: event_booking::ActiveModel = found.into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(booking_id = %updated.id, status = %updated.status, "booking_status_updated");
    Ok(Some(updated))
}

/// Counts by status for the admin dashboard.
pub async fn booking_stats(db: &DatabaseConnection) -> Result<EventStats, ServiceError> {
    let count = |status: &'static str| async move {
        event_booking::Entity::find()
            .filter(event_booking::Column::Status.eq(status))
            .count(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    };
    let total = event_booking::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(EventStats {
        total_events: total,
        pending_events: count("pending").await?,
        confirmed_events: count("confirmed").await?,
        completed_events: count("completed").await?,
        cancelled_events: count("cancelled").await?,
    })
}
