//! Application constants
//!
//! Storage keys and endpoint paths shared by the token store, the public
//! client and the host application.

// Persisted storage keys
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const REMEMBER_ME_KEY: &str = "rememberMe";
pub const REMEMBERED_EMAIL_KEY: &str = "rememberedEmail";

/// Every key `clear_all` removes from both storage scopes.
pub const SESSION_KEYS: [&str; 4] =
    [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, REMEMBER_ME_KEY, REMEMBERED_EMAIL_KEY];

// Public (token-free) endpoints
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const REFRESH_PATH: &str = "/api/auth/refresh";
pub const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";

/// Where the host navigates after the session has been invalidated.
pub const LOGIN_ENTRY_POINT: &str = "/login";

// Transport defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_STORAGE_PATH: &str = "labgate-session.json";

// Event fan-out
pub const SESSION_EVENT_CAPACITY: usize = 32;
