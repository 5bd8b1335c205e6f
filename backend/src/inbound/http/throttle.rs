//! Per-request throttle enforcement for handlers.

use std::time::Duration;

use actix_web::HttpRequest;
use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{ThrottleDecision, ThrottleScope};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::RETRY_AFTER_DETAIL;
use crate::inbound::http::state::HttpState;

const UNKNOWN_PARTITION: &str = "unknown";

/// Partition key for a request: the peer IP address.
fn client_partition(request: &HttpRequest) -> String {
    request
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_PARTITION.to_owned())
}

fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// Admit the request or fail with [`crate::domain::ErrorCode::RateLimited`].
pub(crate) fn enforce(
    state: &HttpState,
    scope: ThrottleScope,
    request: &HttpRequest,
) -> ApiResult<()> {
    match state.throttle.check(scope, &client_partition(request)) {
        ThrottleDecision::Allowed { .. } => Ok(()),
        ThrottleDecision::Limited { retry_after } => Err(Error::rate_limited(
            "too many requests; retry later",
        )
        .with_details(json!({ RETRY_AFTER_DETAIL: whole_seconds(retry_after) }))),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Duration::from_secs(30), 30)]
    #[case(Duration::from_millis(29_001), 30)]
    #[case(Duration::from_millis(500), 1)]
    fn retry_after_rounds_up(#[case] duration: Duration, #[case] expected: u64) {
        assert_eq!(whole_seconds(duration), expected);
    }

    #[rstest]
    fn partition_uses_peer_ip() {
        let request = actix_web::test::TestRequest::default()
            .peer_addr("203.0.113.7:51000".parse().expect("socket addr"))
            .to_http_request();
        assert_eq!(client_partition(&request), "203.0.113.7");
    }

    #[rstest]
    fn partition_without_peer_is_shared() {
        let request = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(client_partition(&request), UNKNOWN_PARTITION);
    }
}
