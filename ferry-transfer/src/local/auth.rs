use ferry_core::{Credential, FerryConfig};

use crate::error::TransferError;
use crate::traits::Authenticator;

/// Issues credentials from a pre-shared token.
#[derive(Debug, Clone)]
pub struct LocalAuthenticator {
    token: Option<String>,
    ttl: chrono::Duration,
}

impl LocalAuthenticator {
    pub fn new(token: Option<String>, ttl: chrono::Duration) -> Self {
        LocalAuthenticator { token, ttl }
    }

    pub fn from_config(config: &FerryConfig) -> Self {
        LocalAuthenticator::new(config.token.clone(), config.token_ttl())
    }
}

impl Authenticator for LocalAuthenticator {
    fn authenticate(&mut self) -> Result<Credential, TransferError> {
        match &self.token {
            Some(token) => Ok(Credential::issue(token.clone(), self.ttl)),
            None => Err(TransferError::Auth(
                "no token configured; set `token` in ~/.ferry/config.yaml".to_string(),
            )),
        }
    }
}
