//! Test configuration constants.
//!
//! These values are placeholders for tests and never real credentials.

/// Plain text password every fixture user is created with.
pub static TEST_PASSWORD: &str = "correct horse battery staple";

/// Secret used to sign remember-me cookies in tests. Long enough to pass config validation.
pub static TEST_COOKIE_SECRET: &str = "test-cookie-secret-0123456789abcdef";
