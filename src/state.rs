use std::sync::Arc;

use crate::config::Config;
use crate::registration::RegistrationService;
use crate::store::SubmissionStore;
use crate::submission::IngestService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SubmissionStore>,
    pub ingest: IngestService,
    pub registration: RegistrationService,
}
