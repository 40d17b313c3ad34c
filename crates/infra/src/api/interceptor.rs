//! Bearer header injection for authenticated requests

use labgate_core::TokenStore;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;

/// Attaches `Authorization: Bearer <token>` from the token store.
#[derive(Clone)]
pub struct BearerInterceptor {
    tokens: TokenStore,
}

impl BearerInterceptor {
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }

    /// Decorate `builder` with the stored access token, if there is one.
    ///
    /// Returns the token that was attached so a later 401 can be matched
    /// against the token currently stored. Without a token the request goes
    /// out unauthenticated.
    pub fn apply(&self, builder: RequestBuilder) -> (RequestBuilder, Option<String>) {
        match self.tokens.access_token() {
            Some(token) => (with_bearer(builder, &token), Some(token)),
            None => (builder, None),
        }
    }
}

pub(crate) fn with_bearer(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header(AUTHORIZATION, format!("Bearer {}", token))
}
