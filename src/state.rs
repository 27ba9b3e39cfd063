use std::sync::Arc;

use crate::auth::{JwtError, SessionTokens};
use crate::config::AppConfig;
use crate::database::{BootcampStore, UserStore};
use crate::services::Mailer;

/// Dependencies shared by every handler, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<SessionTokens>,
    pub users: Arc<dyn UserStore>,
    pub bootcamps: Arc<dyn BootcampStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        bootcamps: Arc<dyn BootcampStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, JwtError> {
        let tokens = SessionTokens::new(&config.security)?;
        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            users,
            bootcamps,
            mailer,
        })
    }
}
