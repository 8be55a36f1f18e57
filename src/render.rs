//! Page rendering.
//!
//! Every page is a `Serialize` context plus a hand-written HTML body. Browsers
//! get the HTML wrapped in the layout, clients sending
//! `Accept: application/json` get the context itself.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header::{ACCEPT, CONTENT_TYPE}, request::Parts},
    response::{IntoResponse, Response},
};
use pulldown_cmark::{Event, Parser};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{include_res, models::{Group, Post}, paginate::Page, posts::urls, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Html,
    Json,
}

impl<S: Send + Sync> FromRequestParts<S> for Format {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let wants_json = parts
            .headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));

        Ok(if wants_json { Format::Json } else { Format::Html })
    }
}

/// A finished response body. Cheap to clone so the page cache can hold it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        let mut response = self.body.into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        response
    }
}

pub trait Template: Serialize {
    fn title(&self) -> String;
    fn body(&self) -> String;
}

pub fn render<T: Template>(format: Format, page: &T) -> AppResult<Rendered> {
    Ok(match format {
        Format::Html => Rendered {
            content_type: "text/html; charset=utf-8",
            body: layout(&page.title(), &page.body()),
        },
        Format::Json => Rendered {
            content_type: "application/json",
            body: serde_json::to_string(page)?,
        },
    })
}

pub fn layout(title: &str, content: &str) -> String {
    include_res!(str, "/pages/layout.html")
        .replace("{year}", &OffsetDateTime::now_utc().year().to_string())
        .replace("{title}", &escape(title))
        .replace("{content}", content)
}

/// HTML-escapes `s`. Braces are escaped too so user text can never be
/// mistaken for a template placeholder.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders post and comment text as Markdown. Raw HTML is shown as text.
pub fn markdown(text: &str) -> String {
    let parser = Parser::new(text).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output.replace('{', "&#123;").replace('}', "&#125;")
}

pub fn group_link(group: Option<&Group>) -> String {
    match group {
        Some(group) => include_res!(str, "/pages/group_link.html")
            .replace("{group_url}", &urls::group(&group.slug))
            .replace("{title}", &escape(&group.title)),
        None => String::new(),
    }
}

pub fn image(reference: Option<&str>) -> String {
    match reference {
        Some(reference) => format!(r#"<img src="/media/{}" alt="">"#, escape(reference)),
        None => String::new(),
    }
}

pub fn post_card(post: &Post) -> String {
    include_res!(str, "/pages/post_card.html")
        .replace("{profile_url}", &urls::profile(&post.author.username))
        .replace("{detail_url}", &urls::detail(post.id))
        .replace("{created}", &post.created.date().to_string())
        .replace("{group}", &group_link(post.group.as_ref()))
        .replace("{image}", &image(post.image.as_deref()))
        .replace("{author}", &escape(&post.author.username))
        .replace("{text}", &markdown(&post.text))
}

pub fn post_list(page: &Page<Post>, path: &str) -> String {
    if page.items.is_empty() {
        return "<p>No posts yet.</p>".to_owned();
    }

    let mut cards = String::new();
    for post in &page.items {
        cards += &post_card(post);
    }
    cards + &paginator(page, path)
}

pub fn paginator<T>(page: &Page<T>, path: &str) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }

    let link = |number: i64, label: &str| format!(r#"<a href="{path}?page={number}">{label}</a>"#);
    let previous = if page.has_previous { link(page.number - 1, "&laquo; previous") } else { String::new() };
    let next = if page.has_next { link(page.number + 1, "next &raquo;") } else { String::new() };

    include_res!(str, "/pages/paginator.html")
        .replace("{previous}", &previous)
        .replace("{next}", &next)
        .replace("{number}", &page.number.to_string())
        .replace("{num_pages}", &page.num_pages.to_string())
}

/// `<ul>` of messages for one form field, empty when there are none.
pub fn field_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let items: String = errors.iter().map(|e| format!("<li>{}</li>", escape(e))).collect();
    format!(r#"<ul class="errors">{items}</ul>"#)
}
