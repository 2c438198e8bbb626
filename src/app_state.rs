use crate::store::SubscriberStore;
use secrecy::Secret;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriberStore>,
    pub admin_password_hash: Arc<Secret<String>>,
    pub export_dir: Arc<PathBuf>,
}
