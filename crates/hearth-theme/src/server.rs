//! Server-side helpers: seed the theme attribute before first paint.

use std::borrow::Cow;

use crate::ThemePreference;

/// Storage key and cookie name for the preference.
pub const PREFERENCE_KEY: &str = "theme-preference";

/// One year, in seconds.
pub const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

const EMPTY_THEME_ATTR: &str = "data-theme=\"\"";

/// `Set-Cookie`-style string persisting `preference`.
pub fn preference_cookie(preference: ThemePreference) -> String {
    format!("{PREFERENCE_KEY}={preference};path=/;max-age={COOKIE_MAX_AGE};SameSite=Lax")
}

/// Value of `name` in a `Cookie` request header.
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

/// Fills the first empty `data-theme=""` attribute with the stored theme.
///
/// Only an exact `light` or `dark` is applied; `system`, garbage, or no
/// value leaves the page untouched so the client decides.
pub fn seed_document_theme<'a>(html: &'a str, stored: Option<&str>) -> Cow<'a, str> {
    match stored {
        Some(theme @ ("light" | "dark")) if html.contains(EMPTY_THEME_ATTR) => {
            Cow::Owned(html.replacen(EMPTY_THEME_ATTR, &format!("data-theme=\"{theme}\""), 1))
        }
        _ => Cow::Borrowed(html),
    }
}

/// [`seed_document_theme`] straight from a `Cookie` header.
pub fn seed_from_cookie_header<'a>(html: &'a str, cookie_header: Option<&str>) -> Cow<'a, str> {
    let stored = cookie_header.and_then(|h| read_cookie(h, PREFERENCE_KEY));
    seed_document_theme(html, stored)
}
