use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    Json,
};
use guildforge::v1::{
    api::{self, Response},
    badge::{Badge, MAX_LEVEL},
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;

use super::extra::{self, BadgeSession, API_COOKIE_MAX_AGE};

/// Longest guild name / rank accepted on creation
pub(crate) const MAX_TEXT_LEN: usize = 64;

pub(crate) fn default_guild_name() -> String {
    "Apprentice Guild".into()
}
pub(crate) fn default_rank() -> String {
    "Novice".into()
}
pub(crate) fn default_level() -> u32 {
    1
}

/// Check caller-supplied badge attributes before construction.
pub(crate) fn validate_badge_input(
    guild_name: &str,
    rank: &str,
    level: u32,
) -> Result<(), &'static str> {
    if guild_name.trim().is_empty() || guild_name.chars().count() > MAX_TEXT_LEN {
        return Err("Guild name must be 1 to 64 characters");
    }
    if rank.trim().is_empty() || rank.chars().count() > MAX_TEXT_LEN {
        return Err("Rank must be 1 to 64 characters");
    }
    if level < 1 || level > MAX_LEVEL {
        return Err("Level must be between 1 and 10000");
    }

    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBadgeBody {
    #[serde(default = "default_guild_name")]
    pub guild_name: String,
    #[serde(default = "default_rank")]
    pub rank: String,
    #[serde(default = "default_level")]
    pub level: u32,
}

#[derive(Deserialize)]
pub struct ImportBadgeBody {
    #[serde(default)]
    pub token: String,
}

#[derive(Serialize)]
pub struct BadgeResponse {
    pub badge: Badge,
}

#[derive(Serialize)]
pub struct CreateBadgeResponse {
    pub badge: Badge,
    /// Signed badge token, also set as the `guildBadge` cookie
    pub token: String,
    pub hint: &'static str,
}

#[derive(Serialize)]
pub struct ExportBadgeResponse {
    /// The caller's current badge token
    pub token: String,
    pub badge: Badge,
    pub warning: &'static str,
}

pub async fn get_badge(session: BadgeSession) -> Response<BadgeResponse> {
    Response::Success(BadgeResponse {
        badge: session.badge_or_default(),
    })
}

pub async fn create_badge(
    State(AppState { guard, .. }): State<AppState>,
    Json(CreateBadgeBody {
        guild_name,
        rank,
        level,
    }): Json<CreateBadgeBody>,
) -> (HeaderMap, Response<CreateBadgeResponse>) {
    let mut headers = HeaderMap::new();

    if let Err(detail) = validate_badge_input(&guild_name, &rank, level) {
        return (
            headers,
            Response::Failture(api::Error::MalformedData.detail(detail.into())),
        );
    }

    let badge = Badge::custom(guild_name, rank, level);
    let token = guard.issue_token(&badge).to_string();

    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&extra::badge_cookie(&token, API_COOKIE_MAX_AGE))
            .expect("token strings are ascii"),
    );

    (
        headers,
        Response::Success(CreateBadgeResponse {
            badge,
            token,
            hint: "Use /api/badge/export to get your badge token",
        }),
    )
}

pub async fn export_badge(
    session: BadgeSession,
    State(AppState { guard, .. }): State<AppState>,
) -> Response<ExportBadgeResponse> {
    let badge = session.badge_or_default();
    let token = guard.issue_token(&badge).to_string();

    Response::Success(ExportBadgeResponse {
        token,
        badge,
        warning: "This token is integrity-protected. A hand-edited token will be rejected on import.",
    })
}

pub async fn import_badge(
    State(AppState { guard, .. }): State<AppState>,
    Json(ImportBadgeBody { token }): Json<ImportBadgeBody>,
) -> (HeaderMap, Response<BadgeResponse>) {
    let mut headers = HeaderMap::new();

    let token = token.trim();
    if token.is_empty() {
        return (
            headers,
            Response::Failture(api::Error::MalformedData.detail("Badge token is required".into())),
        );
    }

    // Verified before anything in it is looked at; failure details stay
    // in the log, the client only learns the token was rejected.
    let badge = match guard.open(token) {
        Ok(badge) => badge,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected badge token on import");
            return (
                headers,
                Response::Failture(api::Error::InvalidToken.detail("Badge token rejected".into())),
            );
        }
    };

    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&extra::badge_cookie(token, API_COOKIE_MAX_AGE))
            .expect("token strings are ascii"),
    );

    (headers, Response::Success(BadgeResponse { badge }))
}
