//! Authentication service: credential verification and JWT issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Claims, LoginUser, RegisterUser, Role, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Verify credentials and issue a signed token
    pub async fn login(&self, login: LoginUser) -> AppResult<(User, String)> {
        let user = self
            .repository
            .users
            .find_by_email(&login.email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

        if Argon2::default()
            .verify_password(login.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.issue_token(&user)?;
        tracing::info!("User {} logged in", user.id);

        Ok((user, token))
    }

    /// Register a new customer account
    pub async fn register(&self, register: RegisterUser) -> AppResult<(User, String)> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(register.password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        let user = self
            .repository
            .users
            .create(&register.email, &password_hash, &register.name, Role::Customer)
            .await?;

        let token = self.issue_token(&user)?;
        tracing::info!("Registered user {} ({})", user.id, user.email);

        Ok((user, token))
    }

    /// Fetch the user behind a set of verified claims
    pub async fn current_user(&self, claims: &Claims) -> AppResult<User> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Authentication("Invalid token subject".to_string()))?;
        self.repository.users.get_by_id(id).await
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            exp: (now + Duration::hours(self.config.jwt_expiration_hours as i64)).timestamp(),
            iat: now.timestamp(),
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Token creation failed: {}", e)))
    }
}
