use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use guildforge::v1::badge::Badge;

use crate::app::AppState;

/// Name of the cookie carrying the badge token
pub const BADGE_COOKIE: &str = "guildBadge";

/// Cookie lifetime for tokens issued through the API, in seconds
pub const API_COOKIE_MAX_AGE: u32 = 86_400; // 24 hours
/// Cookie lifetime for tokens forged through the page flow, in seconds
pub const FORGE_COOKIE_MAX_AGE: u32 = 3_600; // 1 hour

/// Outcome of resolving the badge cookie for a single request.
///
/// There are exactly two states: either the cookie held a token whose
/// integrity tag verified and whose payload decoded, or it did not
/// (absent cookie included). A token that fails anywhere in between is
/// indistinguishable from no token at all.
pub enum BadgeSession {
    /// No cookie, or a token that failed verification or decoding
    Unauthenticated,
    /// Badge recovered from a verified token
    Authenticated(Badge),
}

impl BadgeSession {
    /// The resolved badge, or a fresh default one for unauthenticated
    /// requests.
    pub fn badge_or_default(self) -> Badge {
        match self {
            Self::Authenticated(badge) => badge,
            Self::Unauthenticated => Badge::default(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BadgeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token_str = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(find_badge_cookie);

        let Some(token_str) = token_str else {
            return Ok(Self::Unauthenticated);
        };

        match state.guard.open(token_str) {
            Ok(badge) => Ok(Self::Authenticated(badge)),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected badge token from cookie");
                Ok(Self::Unauthenticated)
            }
        }
    }
}

fn find_badge_cookie(header: &str) -> Option<&str> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == BADGE_COOKIE).then_some(value)
    })
}

/// `Set-Cookie` value carrying a badge token.
pub fn badge_cookie(token: &str, max_age: u32) -> String {
    format!("{BADGE_COOKIE}={token}; Path=/; Max-Age={max_age}; SameSite=Lax")
}

/// `Set-Cookie` value that removes the badge cookie.
pub fn clear_badge_cookie() -> String {
    format!("{BADGE_COOKIE}=; Path=/; Max-Age=0")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_badge_cookie_between_others() {
        let header = "theme=dark; guildBadge=gfb_abc; lang=en";
        assert_eq!(find_badge_cookie(header), Some("gfb_abc"));

        assert_eq!(find_badge_cookie("theme=dark; lang=en"), None);
        assert_eq!(find_badge_cookie("guildBadgeX=zzz"), None);
        assert_eq!(find_badge_cookie(""), None);
    }
}
