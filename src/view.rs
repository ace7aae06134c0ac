//! Render and redirect instructions returned by the page handlers.
//!
//! Templates live outside this crate; a rendered [`View`] is the JSON envelope
//! `{"view": ..., "message": ..., "model": ...}` the template layer consumes.
//! A [`Redirect`] may carry a flash message. The flash is stored in the
//! session and removed by the next rendered view, so it is shown exactly once.

use actix_session::{Session, SessionExt, SessionMiddleware, storage::CookieSessionStore};
use actix_web::{
    HttpRequest, HttpResponse, Responder,
    body::BoxBody,
    cookie::Key,
    http::{StatusCode, header},
};
use serde::Serialize;
use tracing::warn;

const FLASH_KEY: &str = "flash_message";
pub const SESSION_COOKIE: &str = "employee_portal";

/// Cookie-backed session carrying the flash message between requests.
pub fn flash_session(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(secure)
        .cookie_http_only(true)
        .build()
}

pub struct View<T> {
    name: &'static str,
    model: T,
    status: StatusCode,
}

impl<T: Serialize> View<T> {
    pub fn new(name: &'static str, model: T) -> Self {
        Self {
            name,
            model,
            status: StatusCode::OK,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    view: &'a str,
    message: Option<String>,
    model: &'a T,
}

impl<T: Serialize> Responder for View<T> {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        let message = take_flash(&req.get_session());

        HttpResponse::build(self.status).json(Envelope {
            view: self.name,
            message,
            model: &self.model,
        })
    }
}

/// `303 See Other`, optionally leaving a message for the next page.
pub struct Redirect {
    location: String,
    message: Option<String>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Responder for Redirect {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        if let Some(message) = self.message
            && let Err(e) = req.get_session().insert(FLASH_KEY, message)
        {
            warn!(error = %e, "Failed to store flash message");
        }

        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, self.location))
            .finish()
    }
}

/// Reads and clears the pending flash message.
fn take_flash(session: &Session) -> Option<String> {
    match session.remove_as::<String>(FLASH_KEY)? {
        Ok(message) => Some(message),
        Err(raw) => {
            warn!(raw = %raw, "Discarding unreadable flash message");
            None
        }
    }
}
