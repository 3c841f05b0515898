use guildforge::v1::token::IntegrityGuard;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AppConfig {
    /// Server config
    pub server: AppConfigServer,
}

#[derive(Deserialize)]
pub struct AppConfigServer {
    /// IP and port to server be published
    pub publish_on: String,

    /// Realm display name
    pub realm_name: String,

    /// Secret key badge tokens are signed with. Loaded once at startup,
    /// read-only afterwards.
    pub secret: String,

    /// Privileged payload returned from the master console
    pub flag: String,
}

#[derive(Clone)]
pub struct AppState {
    pub guard: &'static IntegrityGuard,
    pub realm_name: &'static str,
    pub flag: &'static str,
}
