use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::contact_message;

use crate::errors::ServiceError;

/// Public contact form payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Admin update: status, priority and an optional response in one call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactInput {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContactFilter<'a> {
    pub status: Option<&'a str>,
    pub priority: Option<&'a str>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total: u64,
    pub new: u64,
    pub read: u64,
    pub replied: u64,
    pub archived: u64,
}

pub async fn create_contact(
    db: &DatabaseConnection,
    input: CreateContactInput,
) -> Result<contact_message::Model, ServiceError> {
    models::user::validate_name(&input.name)?;
    models::user::validate_email(&input.email)?;
    if input.subject.trim().is_empty() {
        return Err(ServiceError::Validation("subject required".into()));
    }
    if input.message.trim().is_empty() {
        return Err(ServiceError::Validation("message required".into()));
    }

    let now = Utc::now();
    let am = contact_message::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        email: Set(input.email.trim().to_string()),
        phone: Set(input.phone),
        subject: Set(input.subject.trim().to_string()),
        message: Set(input.message),
        status: Set(contact_message::DEFAULT_STATUS.into()),
        priority: Set(contact_message::DEFAULT_PRIORITY.into()),
        response_content: Set(None),
        responded_by: Set(None),
        responded_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(contact_id = %created.id, "contact_created");
    Ok(created)
}

pub async fn list_contacts(
    db: &DatabaseConnection,
    filter: ContactFilter<'_>,
    page: Pagination,
) -> Result<(Vec<contact_message::Model>, u64), ServiceError> {
    let mut query =
        contact_message::Entity::find().order_by_desc(contact_message::Column::CreatedAt);
    if let Some(status) = filter.status {
        models::contact_message::validate_status(status)?;
        query = query.filter(contact_message::Column::Status.eq(status));
    }
    if let Some(priority) = filter.priority {
        models::contact_message::validate_priority(priority)?;
        query = query.filter(contact_message::Column::Priority.eq(priority));
    }
    let (page_idx, per_page) = page.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((rows, total))
}

pub async fn get_contact(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<contact_message::Model>, ServiceError> {
    contact_message::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Apply an admin update. A response body records who answered and when.
pub async fn update_contact(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateContactInput,
    responder: &str,
) -> Result<Option<contact_message::Model>, ServiceError> {
    if let Some(status) = &input.status {
        models::contact_message::validate_status(status)?;
    }
    if let Some(priority) = &input.priority {
        models::contact_message::validate_priority(priority)?;
    }
    let Some(found) = get_contact(db, id).await? else {
        return Ok(None);
    };
    let mut am: contact_message::ActiveModel = found.into();
    if let Some(status) = input.status {
        am.status = Set(status);
    }
    if let Some(priority) = input.priority {
        am.priority = Set(priority);
    }
    if let Some(response) = input.response {
        am.response_content = Set(Some(response));
        am.responded_by = Set(Some(responder.to_string()));
        am.responded_at = Set(Some(Utc::now().into()));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(contact_id = %updated.id, status = %updated.status, "contact_updated");
    Ok(Some(updated))
}

pub async fn contact_stats(db: &DatabaseConnection) -> Result<ContactStats, ServiceError> {
    let count = |status: &'static str| async move {
        contact_message::Entity::find()
            .filter(contact_message::Column::Status.eq(status))
            .count(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    };
    let total = contact_message::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(ContactStats {
        total,
        new: count("new").await?,
        read: count("read").await?,
        replied: count("replied").await?,
        archived: count("archived").await?,
    })
}
