//! Server-rendered pages
//!
//! `GET /` shows the session's active view as plain HTML. Everything a page
//! can do beyond switching views goes through the JSON API.

use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;
use std::fmt::Write;

use crate::AppState;
use crate::auth::{CurrentUser, MaybeUser};
use crate::data::{FavoriteArtist, ListenEntry, Review};
use crate::error::AppError;
use crate::navigation::{FeedMode, View};
use crate::service::{FeedEntry, ListenListPage, Page, ProfilePage, RateTrackPage, ViewRouter};

pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/navigate", post(navigate_form))
}

/// Navigation form; `view` is one of feed, profile, rate_track, listen_list
#[derive(Debug, Deserialize)]
struct NavigateForm {
    view: String,
    #[serde(default)]
    mode: Option<FeedMode>,
    #[serde(default)]
    username: Option<String>,
}

impl NavigateForm {
    fn into_view(self, viewer: &str) -> Result<View, AppError> {
        match self.view.as_str() {
            "feed" => Ok(View::Feed {
                mode: self.mode.unwrap_or_default(),
            }),
            "profile" => Ok(View::Profile {
                username: self
                    .username
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| viewer.to_string()),
            }),
            "rate_track" => Ok(View::RateTrack),
            "listen_list" => Ok(View::ListenList),
            other => Err(AppError::Validation(format!("unknown view: {other}"))),
        }
    }
}

/// GET /
async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Response, AppError> {
    let Some(user) = user else {
        return Ok(Redirect::to("/login").into_response());
    };

    let ctx = user.context.lock().await;
    let page = ViewRouter::new(state.store.clone(), state.music.clone())
        .render(&ctx)
        .await?;

    Ok(render_page(user.username(), &page).into_response())
}

/// POST /navigate
async fn navigate_form(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<NavigateForm>,
) -> Result<Response, AppError> {
    let view = form.into_view(user.username())?;
    let mut ctx = user.context.lock().await;
    ViewRouter::new(state.store.clone(), state.music.clone())
        .navigate(&mut ctx, view)
        .await?;

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Rendering
// =============================================================================

/// Only remote http(s) images are embedded
fn image_tag(url: Option<&str>, alt: &str) -> String {
    match url {
        Some(url) if url.starts_with("https://") || url.starts_with("http://") => format!(
            r#"<img src="{}" alt="{}" width="100">"#,
            encode_double_quoted_attribute(url),
            encode_double_quoted_attribute(alt)
        ),
        _ => String::new(),
    }
}

fn nav_button(label: &str, fields: &[(&str, &str)]) -> String {
    let mut html =
        String::from(r#"<form method="post" action="/navigate" style="display:inline">"#);
    for (name, value) in fields {
        let _ = write!(
            html,
            r#"<input type="hidden" name="{}" value="{}">"#,
            name,
            encode_double_quoted_attribute(value)
        );
    }
    let _ = write!(html, r#"<button type="submit">{}</button></form>"#, encode_text(label));
    html
}

fn render_review(html: &mut String, review: &Review, liked: Option<bool>) {
    let _ = write!(
        html,
        r#"<div class="review">{}<p><b>{}</b> rated <b>{} - {}</b> {:.1}/5 on {}</p><p>{}</p><p>{} likes{}</p></div>"#,
        image_tag(review.image.as_deref(), &review.track),
        encode_text(&review.username),
        encode_text(&review.artist),
        encode_text(&review.track),
        review.rating,
        review.date,
        encode_text(&review.review),
        review.likes,
        match liked {
            Some(true) => " (liked)",
            _ => "",
        }
    );
}

fn render_feed(html: &mut String, mode: FeedMode, entries: &[FeedEntry]) {
    let title = match mode {
        FeedMode::Everyone => "Feed: everyone",
        FeedMode::Following => "Feed: following",
    };
    let _ = write!(html, "<h2>{title}</h2>");
    html.push_str(&nav_button("Everyone", &[("view", "feed"), ("mode", "everyone")]));
    html.push_str(&nav_button("Following", &[("view", "feed"), ("mode", "following")]));

    if entries.is_empty() {
        html.push_str("<p>No reviews yet.</p>");
    }
    for entry in entries {
        render_review(html, &entry.review, Some(entry.liked));
    }
}

fn render_favorite(html: &mut String, favorite: &Option<FavoriteArtist>) {
    match favorite {
        Some(artist) => {
            let _ = write!(
                html,
                "<li>{}{}</li>",
                image_tag(artist.image.as_deref(), &artist.name),
                encode_text(&artist.name)
            );
        }
        None => html.push_str("<li>-</li>"),
    }
}

fn render_profile(html: &mut String, page: &ProfilePage) {
    let _ = write!(
        html,
        "<h2>{}</h2><p>{} subscribers, {} reviews, mean rating {:.2}, {} tracks to listen</p>",
        encode_text(&page.username),
        page.subscribers,
        page.review_count,
        page.mean_rating,
        page.listen_count
    );
    match page.is_subscribed {
        Some(true) => html.push_str("<p>You are subscribed.</p>"),
        Some(false) => html.push_str("<p>You are not subscribed.</p>"),
        None => {}
    }

    html.push_str("<h3>Favorite artists</h3>");
    match &page.favorites {
        Some(favorites) => {
            html.push_str("<ol>");
            for favorite in favorites {
                render_favorite(html, favorite);
            }
            html.push_str("</ol>");
        }
        None => html.push_str("<p>None chosen yet.</p>"),
    }

    html.push_str("<h3>Recent reviews</h3>");
    for review in &page.recent_reviews {
        render_review(html, review, None);
    }
}

fn render_results(
    html: &mut String,
    results: &[crate::service::SearchResult],
    selected: Option<usize>,
) {
    if results.is_empty() {
        return;
    }
    html.push_str("<ol start=\"0\">");
    for (index, result) in results.iter().enumerate() {
        let marker = if Some(index) == selected { " (selected)" } else { "" };
        let _ = write!(html, "<li>{}{}</li>", encode_text(&result.label), marker);
    }
    html.push_str("</ol>");
}

fn render_rate(html: &mut String, page: &RateTrackPage) {
    html.push_str("<h2>Rate a track</h2>");
    render_results(html, &page.results, page.selected);
    if let Some(track) = &page.preview {
        let _ = write!(
            html,
            "<p>{}{}</p>",
            image_tag(track.cover.as_deref(), &track.title),
            encode_text(&track.label())
        );
    }
    let _ = write!(html, "<p>Default rating: {:.1}</p>", page.default_rating);
}

fn render_listen_entry(html: &mut String, entry: &ListenEntry) {
    let _ = write!(
        html,
        "<li>{}{} - {} (added {})</li>",
        image_tag(entry.image.as_deref(), &entry.track),
        encode_text(&entry.artist),
        encode_text(&entry.track),
        entry.added_date
    );
}

fn render_listen(html: &mut String, page: &ListenListPage) {
    html.push_str("<h2>To listen</h2>");
    render_results(html, &page.results, page.selected);
    if page.entries.is_empty() {
        html.push_str("<p>Your list is empty.</p>");
        return;
    }
    html.push_str("<ul>");
    for entry in &page.entries {
        render_listen_entry(html, entry);
    }
    html.push_str("</ul>");
}

fn render_page(username: &str, page: &Page) -> Html<String> {
    let mut body = String::new();
    match page {
        Page::Feed { mode, entries } => render_feed(&mut body, *mode, entries),
        Page::Profile(profile) => render_profile(&mut body, profile),
        Page::RateTrack(rate) => render_rate(&mut body, rate),
        Page::ListenList(listen) => render_listen(&mut body, listen),
    }

    let nav = [
        nav_button("Feed", &[("view", "feed")]),
        nav_button("My profile", &[("view", "profile"), ("username", username)]),
        nav_button("Rate a track", &[("view", "rate_track")]),
        nav_button("To listen", &[("view", "listen_list")]),
    ]
    .concat();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Beethoven</title></head>
<body>
    <header>
        <p>Logged in as <b>{user}</b></p>
        <nav>{nav}</nav>
        <form method="post" action="/navigate">
            <input type="hidden" name="view" value="profile">
            <input name="username" placeholder="Find a user">
            <button type="submit">Search</button>
        </form>
        <form method="post" action="/logout"><button type="submit">Log out</button></form>
    </header>
    <main>{body}</main>
</body>
</html>
"#,
        user = encode_text(username),
    ))
}
