//! Application state shared across handlers

use std::sync::Arc;

use crate::{password::PasswordStorage, repositories::UserStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore>,
    pub password_storage: PasswordStorage,
}

impl AppState {
    pub fn new(user_store: Arc<dyn UserStore>, password_storage: PasswordStorage) -> Self {
        Self {
            user_store,
            password_storage,
        }
    }
}
