use std::sync::Arc;

use actix_web::web::{self, Data};
use chrono::Duration;

use crate::{
    auth::credentials::CredentialService,
    clock::Clock,
    repository::{AttendanceRepository, UserRepository},
    services::{directory::UserDirectory, ledger::AttendanceLedger},
};

/// Services shared by every worker. Built once at startup and cloned into each
/// actix `App`.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Data<CredentialService>,
    pub directory: Data<UserDirectory>,
    pub ledger: Data<AttendanceLedger>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        jwt_secret: &str,
        token_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let credentials = Arc::new(CredentialService::new(jwt_secret, token_ttl, clock.clone()));
        let directory = UserDirectory::new(users.clone(), credentials.clone());
        let ledger = AttendanceLedger::new(attendance, users, clock);

        Self {
            credentials: Data::from(credentials),
            directory: Data::new(directory),
            ledger: Data::new(ledger),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.credentials.clone())
            .app_data(self.directory.clone())
            .app_data(self.ledger.clone());
    }
}
