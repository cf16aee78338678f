//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with extractors built from a [`TestContext`], the way the
//! tower-sessions layer would hand them the session and cookie jar.


use blocks_auth_test_utils::prelude::*;
