//! Retry with exponential backoff for transient RPC failures on read paths.
//!
//! Forked nodes lazily fetch state from the upstream archive node, so a read
//! can fail on an upstream hiccup even though the fork itself is healthy.
//! State-changing transactions are never retried.

use rand::Rng;
use std::{fmt::Display, future::Future, time::Duration};
use tracing::{debug, warn};

const INITIAL_DELAY_MS: u64 = 100;
const MAX_DELAY_MS: u64 = 10_000;
const MAX_RETRIES: usize = 5;

/// HTTP statuses an upstream returns while overloaded or restarting.
const TRANSIENT_HTTP_STATUSES: [&str; 4] = ["429", "502", "503", "504"];

pub(crate) fn is_transient_error(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    // Revert data is arbitrary hex and never transient.
    if msg.contains("revert") {
        return false;
    }

    msg.contains("connection")
        || msg.contains("timeout")
        || msg.contains("timed out")
        || msg.contains("rate limit")
        || msg.contains("too many requests")
        || msg.contains("temporarily unavailable")
        || msg.contains("reset by peer")
        || msg.contains("broken pipe")
        || has_word(&msg, "eof")
        || http_status(&msg).is_some_and(|status| TRANSIENT_HTTP_STATUSES.contains(&status))
}

fn words(msg: &str) -> impl Iterator<Item = &str> {
    msg.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
}

fn has_word(msg: &str, word: &str) -> bool {
    words(msg).any(|w| w == word)
}

/// Status code of an HTTP transport error, e.g. `HTTP error 503 with body: ..`.
fn http_status(msg: &str) -> Option<&str> {
    let words = words(msg).collect::<Vec<_>>();
    words
        .iter()
        .enumerate()
        .filter(|(_, word)| matches!(**word, "http" | "status"))
        .find_map(|(i, _)| {
            words[i + 1..]
                .iter()
                .find(|word| !matches!(**word, "error" | "code"))
                .filter(|code| code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit()))
                .copied()
        })
}

fn compute_delay(attempt: usize) -> Duration {
    let base_delay = INITIAL_DELAY_MS.saturating_mul(1 << attempt.min(10));
    let capped_delay = base_delay.min(MAX_DELAY_MS);
    let jitter = rand::thread_rng().gen_range(0..=capped_delay / 4);
    Duration::from_millis(capped_delay + jitter)
}

pub async fn with_retry<F, Fut, T, E>(operation_name: &str, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                if !is_transient_error(&err.to_string()) {
                    debug!(
                        operation = %operation_name,
                        error = %err,
                        "Non-transient error, not retrying"
                    );
                    return Err(err);
                }

                if attempt >= MAX_RETRIES {
                    warn!(
                        operation = %operation_name,
                        attempts = %attempt,
                        error = %err,
                        "Max retries exceeded"
                    );
                    return Err(err);
                }

                let delay = compute_delay(attempt);
                warn!(
                    operation = %operation_name,
                    attempt = %(attempt + 1),
                    max_attempts = %MAX_RETRIES,
                    delay_ms = %delay.as_millis(),
                    error = %err,
                    "Transient RPC error, retrying"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_case::test_case;

    #[test_case("error sending request: connection refused", true; "connection refused")]
    #[test_case("HTTP error 429 with body: Too Many Requests", true; "rate limited")]
    #[test_case("request timed out", true; "timeout")]
    #[test_case("HTTP error 503 Service Unavailable", true; "upstream unavailable")]
    #[test_case("execution reverted: not-master", false; "revert")]
    #[test_case("invalid opcode", false; "invalid opcode")]
    #[test_case("unexpected eof while reading response", true; "truncated response")]
    #[test_case("HTTP status 502 Bad Gateway", true; "bad gateway")]
    #[test_case(
        "error code 3: execution reverted, data: \"0x4290502eof\"",
        false;
        "revert data with status digits"
    )]
    #[test_case("nonce 4295 too low", false; "digits outside an http status")]
    #[test_case("custom error 0x5020429eofe0", false; "error data without revert wording")]
    #[test_case("HTTP error 400 with body: bad request", false; "client error")]
    fn classifies_upstream_failures(msg: &str, transient: bool) {
        assert_eq!(is_transient_error(msg), transient);
    }

    #[test]
    fn delay_is_capped() {
        for attempt in 0..20 {
            let delay = compute_delay(attempt);
            assert!(delay <= Duration::from_millis(MAX_DELAY_MS + MAX_DELAY_MS / 4));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_then_succeeds() {
        let calls = AtomicUsize::new(0);
        let result: Result<u64, String> = with_retry("flaky", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("connection reset by peer".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_retry_reverts() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), String> = with_retry("revert", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("execution reverted".to_string()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
