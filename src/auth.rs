use actix_session::Session;
use actix_web::{http::header, HttpResponse};
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

const SESSION_USER: &str = "user";
const SESSION_FLASH: &str = "flash";

/// Registration as admin requires this internal verification code.
pub const ADMIN_SECRET_CODE: &str = "SALON2026";

/// Session identity: one logged-in account, any of the three roles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionUser {
    pub id_user: i64,
    pub username: String,
    pub role: String,
}

/// One-shot message surfaced on the next rendered page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn sign_in(session: &Session, user: &SessionUser) {
    session.renew();
    if let Err(err) = session.insert(SESSION_USER, user) {
        log::error!("Failed to store session identity: {err}");
    }
}

pub fn sign_out(session: &Session) {
    session.purge();
}

pub fn current_user(session: &Session) -> Option<SessionUser> {
    session.get::<SessionUser>(SESSION_USER).ok().flatten()
}

/// Central authorization check: any logged-in account.
pub fn require_login(session: &Session) -> Result<SessionUser, HttpResponse> {
    current_user(session).ok_or_else(|| redirect("/login"))
}

/// Central authorization check: logged in with exactly the given role.
pub fn require_role(session: &Session, role: &str) -> Result<SessionUser, HttpResponse> {
    match current_user(session) {
        Some(user) if user.role == role => Ok(user),
        _ => Err(redirect("/login")),
    }
}

pub fn flash(session: &Session, level: &str, message: impl Into<String>) {
    let entry = Flash {
        level: level.to_string(),
        message: message.into(),
    };
    if let Err(err) = session.insert(SESSION_FLASH, entry) {
        log::error!("Failed to store flash message: {err}");
    }
}

pub fn take_flash(session: &Session) -> Option<Flash> {
    let entry = session.get::<Flash>(SESSION_FLASH).ok().flatten();
    if entry.is_some() {
        session.remove(SESSION_FLASH);
    }
    entry
}

pub fn redirect(to: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, to.to_string()))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("rahasia123").unwrap();
        assert_ne!(hash, "rahasia123");
        assert!(verify_password("rahasia123", &hash));
        assert!(!verify_password("rahasia124", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
