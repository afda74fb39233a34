use crate::domain::account::driven_ports::TokenIssuer;
use crate::domain::account::driving_ports::LoginError;
use derive_more::Display;
use tracing::warn;

/// The only account that can log in. There is no user store behind this API.
const DEMO_USERNAME: &str = "Winston";
const DEMO_PASSWORD: &str = "123";

#[derive(Display)]
#[display("login attempt for {}", username)]
#[cfg_attr(test, derive(Debug, Clone, PartialEq, Eq))]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    fn match_demo_account(&self) -> bool {
        self.username == DEMO_USERNAME && self.password == DEMO_PASSWORD
    }
}

pub mod driven_ports {
    /// Produces a signed bearer token that identifies [subject]
    pub trait TokenIssuer {
        fn issue_token(&self, subject: &str) -> Result<String, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum LoginError {
        #[error("The supplied username and password were not accepted.")]
        InvalidCredentials,
        #[error("failed to issue a token: {0}")]
        TokenFailure(#[source] anyhow::Error),
    }

    pub trait AccountPort {
        /// Checks the credentials and, if they're accepted, returns a bearer token for the user
        fn login(
            &self,
            credentials: &LoginCredentials,
            token_issuer: &impl TokenIssuer,
        ) -> Result<String, LoginError>;
    }
}

pub struct AccountService {}

impl driving_ports::AccountPort for AccountService {
    fn login(
        &self,
        credentials: &LoginCredentials,
        token_issuer: &impl TokenIssuer,
    ) -> Result<String, LoginError> {
        if !credentials.match_demo_account() {
            warn!("Rejected {credentials}");
            return Err(LoginError::InvalidCredentials);
        }

        token_issuer
            .issue_token(&credentials.username)
            .map_err(LoginError::TokenFailure)
    }
}
