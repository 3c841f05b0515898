use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use guildforge::v1::{
    api::{self, Response},
    badge::Badge,
};
use serde::Serialize;

use crate::app::AppState;

use super::extra::BadgeSession;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleData {
    pub forge_temperature: u32,
    pub active_contracts: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterConsoleResponse {
    pub message: &'static str,
    pub realm: &'static str,
    /// Guild of the badge holder
    pub forgemaster: String,
    pub rank: String,
    /// Privileged payload, configured at startup
    pub flag: &'static str,
    pub console_data: ConsoleData,
}

/// Error body of the forbidden console response. Carries the standard
/// error fields plus the verified non-admin badge the request presented,
/// so a denied caller sees who the server thinks they are.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleDenied {
    pub code: api::Error,
    pub detail: &'static str,
    pub current_badge: Badge,
}

#[derive(Serialize)]
pub struct ConsoleDeniedBody {
    pub error: ConsoleDenied,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleStatusResponse {
    pub has_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// The only privileged endpoint. The admin decision is read exclusively
/// off a badge that came out of a verified token; an unverifiable token
/// landed in `Unauthenticated` long before this point.
pub async fn master_console(
    session: BadgeSession,
    State(AppState {
        realm_name, flag, ..
    }): State<AppState>,
) -> axum::response::Response {
    let badge = match session {
        BadgeSession::Unauthenticated => {
            return Response::<MasterConsoleResponse>::Failture(
                api::Error::Unauthorized.detail("No guild badge found".into()),
            )
            .into_response()
        }
        BadgeSession::Authenticated(badge) => badge,
    };

    if !badge.is_admin() {
        let body = ConsoleDeniedBody {
            error: ConsoleDenied {
                code: api::Error::Forbidden,
                detail: "Admin privileges required",
                current_badge: badge,
            },
        };

        let mut response = Json(body).into_response();
        *response.status_mut() = StatusCode::FORBIDDEN;
        return response;
    }

    Response::Success(MasterConsoleResponse {
        message: "Welcome to the Master Forge Console",
        realm: realm_name,
        forgemaster: badge.guild_name,
        rank: badge.rank,
        flag,
        console_data: ConsoleData {
            forge_temperature: 2800,
            active_contracts: 42,
        },
    })
    .into_response()
}

/// Access report for the current badge. Always 200.
pub async fn console_status(session: BadgeSession) -> Response<ConsoleStatusResponse> {
    match session {
        BadgeSession::Unauthenticated => Response::Success(ConsoleStatusResponse {
            has_access: false,
            badge: None,
            reason: Some("No badge"),
        }),
        BadgeSession::Authenticated(badge) => {
            let has_access = badge.is_admin();

            Response::Success(ConsoleStatusResponse {
                has_access,
                reason: (!has_access).then_some("Badge is not admin"),
                badge: Some(badge),
            })
        }
    }
}
