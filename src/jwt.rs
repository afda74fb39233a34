use crate::app_env;
use crate::domain::account::driven_ports::TokenIssuer;
use anyhow::{Context, anyhow};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, instrument};
use uuid::Uuid;

/// How long an issued token claims to be valid for. Expiry is not enforced on validation.
pub const TOKEN_LIFETIME_MINUTES: i64 = 5;

/// Claims carried by every bearer token this service issues
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "Id")]
    pub id: String,
    pub sub: String,
    pub email: String,
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Signing key, issuer, and audience shared by token issuance and validation
#[derive(Clone)]
pub struct JwtSettings {
    signing_key: String,
    issuer: String,
    audience: String,
}

impl JwtSettings {
    pub fn new(
        signing_key: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        JwtSettings {
            signing_key: signing_key.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Reads the settings from [app_env::JWT_KEY], [app_env::JWT_ISSUER], and [app_env::JWT_AUDIENCE]
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let read_var = |name: &str| {
            env::var(name).with_context(|| format!("reading the {name} environment variable"))
        };

        let signing_key = read_var(app_env::JWT_KEY)?;
        if signing_key.is_empty() {
            return Err(anyhow!("{} must not be empty", app_env::JWT_KEY));
        }

        Ok(Self::new(
            signing_key,
            read_var(app_env::JWT_ISSUER)?,
            read_var(app_env::JWT_AUDIENCE)?,
        ))
    }

    /// Signs a token for [subject] as though it were issued at [issued_at]
    pub fn issue_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id: "1".to_owned(),
            sub: subject.to_owned(),
            email: subject.to_owned(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + Duration::minutes(TOKEN_LIFETIME_MINUTES)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(self.signing_key.as_bytes()),
        )
    }

    /// Checks the token's signature, issuer, and audience and returns its claims.
    /// Expired tokens are still accepted.
    #[instrument(skip_all)]
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.signing_key.as_bytes()),
            &validation,
        )?;
        debug!(subject = %token_data.claims.sub, jti = %token_data.claims.jti, "bearer token accepted");

        Ok(token_data.claims)
    }
}

impl TokenIssuer for JwtSettings {
    fn issue_token(&self, subject: &str) -> Result<String, anyhow::Error> {
        self.issue_token_at(subject, Utc::now())
            .context("signing a bearer token")
    }
}
