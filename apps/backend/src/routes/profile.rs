//! Profile scoping middleware

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

/// Header naming the profile whose sets a request reads and writes.
pub const PROFILE_HEADER: &str = "x-profile-id";

/// Profile context stored in request extensions. `None` means no profile:
/// set listings are empty and saves are dropped.
#[derive(Clone, Debug, Default)]
pub struct ProfileContext {
    pub profile: Option<String>,
}

impl ProfileContext {
    pub fn as_deref(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

/// Extracts the profile id header into a [`ProfileContext`].
pub async fn profile_middleware(mut request: Request<Body>, next: Next) -> Response {
    let profile = request
        .headers()
        .get(PROFILE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    request.extensions_mut().insert(ProfileContext { profile });
    next.run(request).await
}
