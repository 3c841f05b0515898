//! HTML surface: the realm landing page and the forge/clear badge flows.
//! Same badge semantics as the JSON API, rendered as a page instead.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use guildforge::v1::badge::Badge;
use serde::Deserialize;

use crate::{
    app::AppState,
    v1::{
        badge::{default_guild_name, default_level, default_rank, validate_badge_input},
        extra::{self, BadgeSession, FORGE_COOKIE_MAX_AGE},
    },
};

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/forge-badge", post(forge_badge))
        .route("/clear-badge", post(clear_badge))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForgeBadgeForm {
    #[serde(default = "default_guild_name")]
    guild_name: String,
    #[serde(default = "default_rank")]
    rank: String,
    #[serde(default = "default_level")]
    level: u32,
}

async fn index(
    session: BadgeSession,
    State(AppState { realm_name, .. }): State<AppState>,
) -> Html<String> {
    Html(render_index(
        realm_name,
        &session.badge_or_default(),
        None,
        None,
    ))
}

async fn forge_badge(
    State(AppState {
        guard, realm_name, ..
    }): State<AppState>,
    Form(ForgeBadgeForm {
        guild_name,
        rank,
        level,
    }): Form<ForgeBadgeForm>,
) -> (HeaderMap, Html<String>) {
    let mut headers = HeaderMap::new();

    if let Err(detail) = validate_badge_input(&guild_name, &rank, level) {
        let page = render_index(realm_name, &Badge::default(), None, Some(detail));
        return (headers, Html(page));
    }

    let badge = Badge::custom(guild_name, rank, level);
    let token = guard.issue_token(&badge).to_string();

    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&extra::badge_cookie(&token, FORGE_COOKIE_MAX_AGE))
            .expect("token strings are ascii"),
    );

    let page = render_index(realm_name, &badge, Some("Badge forged successfully!"), None);
    (headers, Html(page))
}

async fn clear_badge() -> (HeaderMap, Redirect) {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&extra::clear_badge_cookie()).expect("cookie value is ascii"),
    );

    (headers, Redirect::to("/"))
}

fn render_index(
    realm_name: &str,
    badge: &Badge,
    message: Option<&str>,
    error: Option<&str>,
) -> String {
    let notice = match (message, error) {
        (Some(m), _) => format!(r#"<p class="message">{}</p>"#, escape(m)),
        (_, Some(e)) => format!(r#"<p class="error">{}</p>"#, escape(e)),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{realm} — Guild Hall</title></head>
<body>
<h1>{realm}</h1>
{notice}
<section id="badge">
  <h2>Your guild badge</h2>
  <dl>
    <dt>Guild</dt><dd>{guild}</dd>
    <dt>Rank</dt><dd>{rank}</dd>
    <dt>Level</dt><dd>{level}</dd>
    <dt>Message</dt><dd>{msg}</dd>
  </dl>
</section>
<form method="post" action="/forge-badge">
  <input name="guildName" placeholder="Guild name" maxlength="64">
  <input name="rank" placeholder="Rank" maxlength="64">
  <input name="level" type="number" min="1" max="10000" value="1">
  <button type="submit">Forge badge</button>
</form>
<form method="post" action="/clear-badge">
  <button type="submit">Clear badge</button>
</form>
</body>
</html>"#,
        realm = escape(realm_name),
        notice = notice,
        guild = escape(&badge.guild_name),
        rank = escape(&badge.rank),
        level = badge.level,
        msg = escape(&badge.message),
    )
}

fn escape(v: &str) -> String {
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn escapes_badge_text() {
        let badge = Badge::custom("<script>alert(1)</script>".into(), "R&D".into(), 1);
        let page = render_index("Svartalfheim", &badge, None, None);

        assert!(!page.contains("<script>alert"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("R&amp;D"));
    }
}
