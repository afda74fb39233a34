use crate::domain;
use serde::Deserialize;
use utoipa::ToSchema;

/// DTO for a login attempt
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct LoginRequest {
    #[schema(example = "Winston")]
    pub username: String,
    #[schema(example = "123")]
    pub password: String,
}

impl From<LoginRequest> for domain::account::LoginCredentials {
    fn from(value: LoginRequest) -> Self {
        domain::account::LoginCredentials {
            username: value.username,
            password: value.password,
        }
    }
}
