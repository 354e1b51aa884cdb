//! SeaORM-backed implementation of [`AuthRepository`].

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use common::pagination::Pagination;
use models::{user, user_credentials};

use crate::auth::domain::{AuthUser, Credentials, NewUser, UserListFilter, UserPatch};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

#[derive(Clone)]
pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: user::Model) -> Result<AuthUser, AuthError> {
    let role = m
        .role
        .parse()
        .map_err(|_| AuthError::Repository(format!("corrupt role value: {}", m.role)))?;
    let permissions = serde_json::from_value(m.permissions).unwrap_or_default();
    Ok(AuthUser {
        id: m.id,
        username: m.username,
        email: m.email,
        first_name: m.first_name,
        last_name: m.last_name,
        phone: m.phone,
        role,
        permissions,
        is_active: m.is_active,
        newsletter: m.newsletter,
        last_login: m.last_login.map(|t| t.with_timezone(&Utc)),
        created_at: m.created_at.with_timezone(&Utc),
    })
}

fn db_err(e: sea_orm::DbErr) -> AuthError {
    AuthError::Repository(e.to_string())
}

#[async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<AuthUser>, AuthError> {
        user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_domain)
            .transpose()
    }

    async fn create_user(&self, new: NewUser) -> Result<AuthUser, AuthError> {
        let now = Utc::now();
        let am = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new.username),
            email: Set(new.email),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            phone: Set(new.phone),
            role: Set(new.role.as_str().to_string()),
            permissions: Set(serde_json::json!(new.permissions)),
            is_active: Set(true),
            newsletter: Set(new.newsletter),
            last_login: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = am.insert(&self.db).await.map_err(db_err)?;
        to_domain(created)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<AuthUser>, AuthError> {
        let Some(found) = user::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        let mut am: user::ActiveModel = found.into();
        if let Some(v) = patch.first_name {
            am.first_name = Set(v);
        }
        if let Some(v) = patch.last_name {
            am.last_name = Set(v);
        }
        if let Some(v) = patch.email {
            am.email = Set(v);
        }
        if let Some(v) = patch.phone {
            am.phone = Set(Some(v));
        }
        if let Some(v) = patch.newsletter {
            am.newsletter = Set(v);
        }
        if let Some(v) = patch.is_active {
            am.is_active = Set(v);
        }
        if let Some(v) = patch.last_login {
            am.last_login = Set(Some(v.into()));
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(db_err)?;
        Ok(Some(to_domain(updated)?))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AuthError> {
        let res = user::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn list_users(
        &self,
        filter: UserListFilter,
        page: Pagination,
    ) -> Result<(Vec<AuthUser>, u64), AuthError> {
        let mut query = user::Entity::find().order_by_desc(user::Column::CreatedAt);
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(user::Column::IsActive.eq(active));
        }
        let (page_idx, per_page) = page.normalize();
        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await.map_err(db_err)?;
        let rows = paginator.fetch_page(page_idx).await.map_err(db_err)?;
        let users = rows.into_iter().map(to_domain).collect::<Result<Vec<_>, _>>()?;
        Ok((users, total))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let found = user_credentials::Entity::find()
            .filter(user_credentials::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(|c| Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(
        &self,
        user_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        let now = Utc::now();
        let existing = user_credentials::Entity::find()
            .filter(user_credentials::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let saved = if let Some(existing) = existing {
            let mut am: user_credentials::ActiveModel = existing.into();
            am.password_hash = Set(password_hash);
            am.password_algorithm = Set(password_algorithm);
            am.updated_at = Set(now.into());
            am.update(&self.db).await.map_err(db_err)?
        } else {
            let am = user_credentials::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                password_hash: Set(password_hash),
                password_algorithm: Set(password_algorithm),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            am.insert(&self.db).await.map_err(db_err)?
        };
        Ok(Credentials {
            user_id: saved.user_id,
            password_hash: saved.password_hash,
            password_algorithm: saved.password_algorithm,
        })
    }
}
