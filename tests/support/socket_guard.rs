//! Skips wiremock-based tests where a localhost socket cannot be bound.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_SOCKET_TESTS_VAR: &str = "BOOTH_REQUIRE_SOCKET_TESTS";

#[must_use]
pub fn socket_tests_required() -> bool {
    std::env::var(REQUIRE_SOCKET_TESTS_VAR)
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
#[must_use]
pub fn should_skip_socket_bound_test() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[socket-bound-test] cannot bind localhost socket at {}:{}",
        location.file(),
        location.line()
    );
    assert!(
        !socket_tests_required(),
        "{message}. Unset {REQUIRE_SOCKET_TESTS_VAR} to allow skipping."
    );

    eprintln!("{message}. Skipping; set {REQUIRE_SOCKET_TESTS_VAR}=1 to fail instead.");
    true
}

#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let skip = should_skip_socket_bound_test();
    async move {
        if skip {
            None
        } else {
            Some(MockServer::start().await)
        }
    }
}
