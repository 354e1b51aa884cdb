use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use common::pagination::Pagination;
use models::user::{validate_email, validate_name, validate_password, Role};

use super::domain::{
    AdminRegisterInput, AuthSession, AuthUser, ChangePasswordInput, LoginInput, NewUser,
    RegisterInput, UpdateProfileInput, UpdateSettingsInput, UserListFilter, UserPatch,
    split_full_name,
};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token;

/// Auth service configuration, passed in explicitly at startup.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_hours,
            password_algorithm: "argon2".into(),
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthSettings,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthSettings) -> Self {
        Self { repo, cfg }
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    fn verify_hash(stored: &str, password: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    }

    /// Self-service registration: role is always `user`, permissions empty,
    /// username mirrors the email.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        validate_name(&input.full_name)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if let Some(existing) = self.repo.find_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::DuplicateEmail);
        }

        let (first_name, last_name) = split_full_name(&input.full_name);
        let user = self
            .repo
            .create_user(NewUser {
                username: input.email.clone(),
                email: input.email.clone(),
                first_name,
                last_name,
                phone: None,
                role: Role::User,
                permissions: vec![],
                newsletter: input.newsletter,
            })
            .await?;

        let hash = self.hash_password(&input.password)?;
        self.repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Admin-issued registration. The HTTP layer gates this behind the admin
    /// role; the role string must still parse against the closed enumeration.
    #[instrument(skip(self, input), fields(email = %input.email, username = %input.username))]
    pub async fn admin_register(&self, input: AdminRegisterInput) -> Result<AuthUser, AuthError> {
        validate_name(&input.username)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        let role = match input.role.as_deref() {
            Some(raw) => raw.parse::<Role>()?,
            None => Role::Staff,
        };

        if self
            .repo
            .find_by_email_or_username(&input.email, &input.username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateEmail);
        }

        let user = self
            .repo
            .create_user(NewUser {
                username: input.username,
                email: input.email,
                first_name: input.first_name.unwrap_or_default(),
                last_name: input.last_name.unwrap_or_default(),
                phone: None,
                role,
                permissions: input.permissions,
                newsletter: false,
            })
            .await?;

        let hash = self.hash_password(&input.password)?;
        self.repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user.id, role = %user.role, "staff_user_created");
        Ok(user)
    }

    /// Authenticate credentials and issue a bearer token.
    ///
    /// Absent user and hash mismatch are indistinguishable to the caller;
    /// a deactivated account is reported separately even with a correct
    /// password.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !Self::verify_hash(&cred.password_hash, &input.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .repo
            .update_user(user.id, UserPatch { last_login: Some(chrono::Utc::now()), ..Default::default() })
            .await?
            .ok_or(AuthError::NotFound)?;

        let token = token::issue(&user, &self.cfg.jwt_secret, self.cfg.token_ttl_hours)?;
        info!(user_id = %user.id, "login_ok");
        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to its user.
    ///
    /// Tokens are stateless, so the user record is re-checked here: a token
    /// for a deleted or deactivated account stops working on the next
    /// request rather than at natural expiry.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = token::verify(token, &self.cfg.jwt_secret)?;
        let user = self
            .repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("user no longer exists".into()))?;
        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }
        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<AuthUser, AuthError> {
        self.repo.find_by_id(user_id).await?.ok_or(AuthError::NotFound)
    }

    /// Update the caller's own name/email/phone. An email change must not
    /// collide with a different user id; re-submitting the caller's own
    /// email is not a conflict.
    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<AuthUser, AuthError> {
        let mut patch = UserPatch::default();

        if let Some(full_name) = &input.full_name {
            validate_name(full_name)?;
            let (first, last) = split_full_name(full_name);
            patch.first_name = Some(first);
            patch.last_name = Some(last);
        }
        if let Some(email) = &input.email {
            validate_email(email)?;
            if let Some(existing) = self.repo.find_by_email(email).await? {
                if existing.id != user_id {
                    return Err(AuthError::EmailTaken);
                }
            }
            patch.email = Some(email.clone());
        }
        if let Some(phone) = input.phone {
            patch.phone = Some(phone);
        }

        self.repo
            .update_user(user_id, patch)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Phone and newsletter preference only.
    pub async fn update_settings(
        &self,
        user_id: Uuid,
        input: UpdateSettingsInput,
    ) -> Result<AuthUser, AuthError> {
        let patch = UserPatch {
            phone: input.phone,
            newsletter: input.newsletter,
            ..Default::default()
        };
        self.repo
            .update_user(user_id, patch)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Replace the stored hash after verifying the current password with the
    /// same comparison routine used at login.
    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn change_password(
        &self,
        user_id: Uuid,
        input: ChangePasswordInput,
    ) -> Result<(), AuthError> {
        validate_password(&input.new_password)?;

        let cred = self
            .repo
            .get_credentials(user_id)
            .await?
            .ok_or(AuthError::InvalidCurrentPassword)?;
        if !Self::verify_hash(&cred.password_hash, &input.current_password)? {
            return Err(AuthError::InvalidCurrentPassword);
        }

        let hash = self.hash_password(&input.new_password)?;
        self.repo
            .upsert_password(user_id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user_id, "password_changed");
        Ok(())
    }

    /// Hard delete of the caller's own record; credentials cascade.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), AuthError> {
        if !self.repo.delete_user(user_id).await? {
            return Err(AuthError::NotFound);
        }
        info!(user_id = %user_id, "account_deleted");
        Ok(())
    }

    /// Admin listing: newest-first, filterable, never exposes credentials.
    pub async fn list_users(
        &self,
        filter: UserListFilter,
        page: Pagination,
    ) -> Result<(Vec<AuthUser>, u64), AuthError> {
        self.repo.list_users(filter, page).await
    }

    /// Admin activation toggle.
    #[instrument(skip(self), fields(user_id = %user_id, is_active))]
    pub async fn set_active(&self, user_id: Uuid, is_active: bool) -> Result<AuthUser, AuthError> {
        let user = self
            .repo
            .update_user(user_id, UserPatch { is_active: Some(is_active), ..Default::default() })
            .await?
            .ok_or(AuthError::NotFound)?;
        info!(user_id = %user.id, is_active, "user_status_updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(Arc::new(MockAuthRepository::default()), AuthSettings::new("test-secret", 24))
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            full_name: "John Doe".into(),
            email: email.into(),
            password: "secret123".into(),
            newsletter: false,
        }
    }

    #[tokio::test]
    async fn register_splits_full_name_and_defaults_role() {
        let svc = svc();
        let user = svc.register(register_input("john@example.com")).await.unwrap();
        assert_eq!(user.first_name, "John");
        assert_eq!(user.last_name, "Doe");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.username, "john@example.com");
        assert!(user.permissions.is_empty());
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn duplicate_email_rejected_first_account_untouched() {
        let svc = svc();
        let first = svc.register(register_input("dup@example.com")).await.unwrap();
        let err = svc.register(register_input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));

        // first account still logs in
        let session = svc
            .login(LoginInput { email: "dup@example.com".into(), password: "secret123".into() })
            .await
            .unwrap();
        assert_eq!(session.user.id, first.id);
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let svc = svc();
        let mut input = register_input("short@example.com");
        input.password = "abc".into();
        assert!(matches!(svc.register(input).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn login_wrong_password_is_invalid_credentials() {
        let svc = svc();
        svc.register(register_input("a@example.com")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "a@example.com".into(), password: "wrong-pass".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_unknown_email_is_invalid_credentials() {
        let svc = svc();
        let err = svc
            .login(LoginInput { email: "ghost@example.com".into(), password: "whatever1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_deactivated_account_reported_even_with_correct_password() {
        let svc = svc();
        let user = svc.register(register_input("off@example.com")).await.unwrap();
        svc.set_active(user.id, false).await.unwrap();
        let err = svc
            .login(LoginInput { email: "off@example.com".into(), password: "secret123".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountDeactivated));
    }

    #[tokio::test]
    async fn login_updates_last_login_and_token_authenticates() {
        let svc = svc();
        svc.register(register_input("t@example.com")).await.unwrap();
        let session = svc
            .login(LoginInput { email: "t@example.com".into(), password: "secret123".into() })
            .await
            .unwrap();
        assert!(session.user.last_login.is_some());

        let resolved = svc.authenticate(&session.token).await.unwrap();
        assert_eq!(resolved.id, session.user.id);
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let svc = svc();
        svc.register(register_input("tok@example.com")).await.unwrap();
        let session = svc
            .login(LoginInput { email: "tok@example.com".into(), password: "secret123".into() })
            .await
            .unwrap();
        let mut tampered = session.token.clone();
        tampered.push('x');
        assert!(matches!(svc.authenticate(&tampered).await, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn token_for_deleted_user_stops_working() {
        let svc = svc();
        let user = svc.register(register_input("gone@example.com")).await.unwrap();
        let session = svc
            .login(LoginInput { email: "gone@example.com".into(), password: "secret123".into() })
            .await
            .unwrap();
        svc.delete_account(user.id).await.unwrap();
        assert!(matches!(svc.authenticate(&session.token).await, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn token_for_deactivated_user_stops_working() {
        let svc = svc();
        let user = svc.register(register_input("frozen@example.com")).await.unwrap();
        let session = svc
            .login(LoginInput { email: "frozen@example.com".into(), password: "secret123".into() })
            .await
            .unwrap();
        svc.set_active(user.id, false).await.unwrap();
        assert!(matches!(
            svc.authenticate(&session.token).await,
            Err(AuthError::AccountDeactivated)
        ));
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let svc = svc();
        let user = svc.register(register_input("pw@example.com")).await.unwrap();

        let err = svc
            .change_password(
                user.id,
                ChangePasswordInput { current_password: "wrong".into(), new_password: "newsecret1".into() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCurrentPassword));

        svc.change_password(
            user.id,
            ChangePasswordInput { current_password: "secret123".into(), new_password: "newsecret1".into() },
        )
        .await
        .unwrap();

        // old password no longer works, new one does
        let err = svc
            .login(LoginInput { email: "pw@example.com".into(), password: "secret123".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        svc.login(LoginInput { email: "pw@example.com".into(), password: "newsecret1".into() })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn profile_email_conflict_rules() {
        let svc = svc();
        let alice = svc.register(register_input("alice@example.com")).await.unwrap();
        svc.register(register_input("bob@example.com")).await.unwrap();

        // taking bob's email fails
        let err = svc
            .update_profile(
                alice.id,
                UpdateProfileInput { email: Some("bob@example.com".into()), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        // re-submitting her own email is not a conflict
        let updated = svc
            .update_profile(
                alice.id,
                UpdateProfileInput { email: Some("alice@example.com".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "alice@example.com");
    }

    #[tokio::test]
    async fn update_profile_resplits_full_name() {
        let svc = svc();
        let user = svc.register(register_input("n@example.com")).await.unwrap();
        let updated = svc
            .update_profile(
                user.id,
                UpdateProfileInput { full_name: Some("Mary Jane Watson".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Mary");
        assert_eq!(updated.last_name, "Jane Watson");
    }

    #[tokio::test]
    async fn settings_update_touches_only_phone_and_newsletter() {
        let svc = svc();
        let user = svc.register(register_input("s@example.com")).await.unwrap();
        let updated = svc
            .update_settings(
                user.id,
                UpdateSettingsInput { phone: Some("555-0100".into()), newsletter: Some(true) },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert!(updated.newsletter);
        assert_eq!(updated.email, "s@example.com");
    }

    #[tokio::test]
    async fn admin_register_checks_username_too() {
        let svc = svc();
        svc.admin_register(AdminRegisterInput {
            username: "planner".into(),
            email: "staff@example.com".into(),
            password: "secret123".into(),
            first_name: None,
            last_name: None,
            role: None,
            permissions: vec!["read_events".into()],
        })
        .await
        .unwrap();

        // same username, different email
        let err = svc
            .admin_register(AdminRegisterInput {
                username: "planner".into(),
                email: "other@example.com".into(),
                password: "secret123".into(),
                first_name: None,
                last_name: None,
                role: None,
                permissions: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn admin_register_rejects_unknown_role() {
        let svc = svc();
        let err = svc
            .admin_register(AdminRegisterInput {
                username: "mallory".into(),
                email: "mallory@example.com".into(),
                password: "secret123".into(),
                first_name: None,
                last_name: None,
                role: Some("superuser".into()),
                permissions: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn admin_register_defaults_to_staff() {
        let svc = svc();
        let user = svc
            .admin_register(AdminRegisterInput {
                username: "worker".into(),
                email: "worker@example.com".into(),
                password: "secret123".into(),
                first_name: Some("Worker".into()),
                last_name: None,
                role: None,
                permissions: vec![],
            })
            .await
            .unwrap();
        assert_eq!(user.role, Role::Staff);
    }

    #[tokio::test]
    async fn list_users_filters_and_paginates() {
        let svc = svc();
        for i in 0..3 {
            svc.register(register_input(&format!("u{i}@example.com"))).await.unwrap();
        }
        let admin = svc
            .admin_register(AdminRegisterInput {
                username: "boss".into(),
                email: "boss@example.com".into(),
                password: "secret123".into(),
                first_name: None,
                last_name: None,
                role: Some("admin".into()),
                permissions: vec![],
            })
            .await
            .unwrap();
        svc.set_active(admin.id, false).await.unwrap();

        let (all, total) = svc
            .list_users(UserListFilter::default(), Pagination { page: 1, per_page: 10 })
            .await
            .unwrap();
        assert_eq!(total, 4);
        // newest first
        assert_eq!(all.first().unwrap().id, admin.id);

        let (admins, total) = svc
            .list_users(
                UserListFilter { role: Some(Role::Admin), is_active: None },
                Pagination::default(),
            )
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(admins[0].id, admin.id);

        let (active, total) = svc
            .list_users(
                UserListFilter { role: None, is_active: Some(true) },
                Pagination::default(),
            )
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert!(active.iter().all(|u| u.is_active));

        let (page2, _) = svc
            .list_users(UserListFilter::default(), Pagination { page: 2, per_page: 3 })
            .await
            .unwrap();
        assert_eq!(page2.len(), 1);
    }

    #[tokio::test]
    async fn set_active_unknown_id_is_not_found() {
        let svc = svc();
        assert!(matches!(svc.set_active(Uuid::new_v4(), false).await, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn delete_account_removes_record() {
        let svc = svc();
        let user = svc.register(register_input("bye@example.com")).await.unwrap();
        svc.delete_account(user.id).await.unwrap();
        assert!(matches!(svc.profile(user.id).await, Err(AuthError::NotFound)));
        assert!(matches!(svc.delete_account(user.id).await, Err(AuthError::NotFound)));
    }
}
