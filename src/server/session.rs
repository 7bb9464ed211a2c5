//! Cookie binding between browsers and [`Session`]s.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::session::new_session_id;
use crate::auth::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "kommo_bridge_sid";

/// A session resolved for one request.
#[derive(Debug)]
pub struct BoundSession {
    pub id: String,
    pub session: Session,
    /// True when the browser has to be sent a new cookie.
    pub fresh: bool,
}

impl BoundSession {
    /// Look up the cookie's session, or start a new one.
    pub fn resolve(jar: &CookieJar, store: &dyn SessionStore) -> Self {
        if let Some(id) = session_id(jar) {
            if let Some(session) = store.get(&id) {
                return Self {
                    id,
                    session,
                    fresh: false,
                };
            }
        }
        Self {
            id: new_session_id(),
            session: Session::default(),
            fresh: true,
        }
    }

    /// Persist the session and, when new, add its cookie to `jar`.
    pub fn commit(self, store: &dyn SessionStore, jar: CookieJar) -> CookieJar {
        store.put(&self.id, self.session);
        if self.fresh {
            jar.add(session_cookie(self.id))
        } else {
            jar
        }
    }

    /// Forget the session after a completed round trip and clear the cookie.
    pub fn finish(self, store: &dyn SessionStore, jar: CookieJar) -> CookieJar {
        store.remove(&self.id);
        if self.fresh {
            jar
        } else {
            jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        }
    }
}

/// Session id carried by the request, if any.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
