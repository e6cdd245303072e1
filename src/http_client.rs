//! Transport plumbing for talking to the record store over ureq.
//!
//! Every exchange goes through one shared agent and comes back as a [`Reply`]
//! whose body was read under a byte cap. Reads may be retried through
//! [`RetryConfig::run`]; mutations are sent once.

use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

use crate::record_service::ServiceError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Spreadsheet uploads can be slow to push.
const WRITE_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("unicorn-board/", env!("CARGO_PKG_VERSION"));

/// Backoff policy for idempotent reads (records and prediction).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, the first one included.
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryConfig {
    /// A single attempt with no waiting.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Run `request` until it succeeds, fails permanently or attempts run out.
    ///
    /// Only transport failures and 5xx replies are retried.
    pub(crate) fn run<T>(
        &self,
        mut request: impl FnMut() -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut attempt = 1;
        loop {
            match request() {
                Err(err) if attempt < self.max_attempts && err.is_retryable() => {
                    let delay = self.delay_after(attempt);
                    tracing::debug!("Attempt {attempt} failed ({err}); retrying in {delay:?}");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Wait before the attempt following `attempt`: doubles each time, capped.
    fn delay_after(&self, attempt: usize) -> Duration {
        let doublings = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        2u32.checked_pow(doublings)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// One finished exchange with its body read.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    Success(String),
    /// Non-2xx status. Error bodies that could not be read carry the read error.
    Failure { code: u16, body: String },
}

pub(crate) fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
    })
}

/// Turn a ureq result into a [`Reply`], reading at most `max_bytes` of body.
pub(crate) fn read_reply(
    result: Result<ureq::Response, ureq::Error>,
    max_bytes: usize,
) -> Result<Reply, ServiceError> {
    match result {
        Ok(response) => read_body(response, max_bytes)
            .map(Reply::Success)
            .map_err(ServiceError::Transport),
        Err(ureq::Error::Status(code, response)) => {
            let body = read_body(response, max_bytes).unwrap_or_else(|err| err);
            Ok(Reply::Failure { code, body })
        }
        Err(ureq::Error::Transport(err)) => Err(ServiceError::Transport(err.to_string())),
    }
}

fn read_body(response: ureq::Response, max_bytes: usize) -> Result<String, String> {
    let declared = response
        .header("Content-Length")
        .and_then(|length| length.parse::<u64>().ok());
    if let Some(length) = declared
        && length > max_bytes as u64
    {
        return Err(format!("Response too large: {length} bytes"));
    }
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| err.to_string())?;
    if bytes.len() > max_bytes {
        return Err(format!("Response exceeded {max_bytes} bytes"));
    }
    String::from_utf8(bytes).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn exchange(response: &str, max_bytes: usize) -> Result<Reply, ServiceError> {
        let url = serve_once(response.to_string());
        read_reply(agent().get(&url).call(), max_bytes)
    }

    #[test]
    fn declared_length_over_cap_is_a_transport_error() {
        let result = exchange("HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nok", 10);
        assert!(matches!(result, Err(ServiceError::Transport(msg)) if msg.contains("too large")));
    }

    #[test]
    fn undeclared_body_is_cut_at_the_cap() {
        let body = "x".repeat(64);
        let result = exchange(
            &format!("HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n{body}"),
            16,
        );
        assert!(matches!(result, Err(ServiceError::Transport(msg)) if msg.contains("exceeded")));
    }

    #[test]
    fn error_status_keeps_its_body() {
        let body = r#"{"error":"nope"}"#;
        let reply = exchange(
            &format!(
                "HTTP/1.1 400 Bad Request\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            ),
            64,
        )
        .unwrap();
        assert_eq!(
            reply,
            Reply::Failure {
                code: 400,
                body: body.to_string()
            }
        );
    }

    #[test]
    fn run_retries_server_errors_until_success() {
        let mut attempts = 0;
        let policy = RetryConfig {
            max_attempts: 4,
            ..RetryConfig::none()
        };
        let result = policy.run(|| {
            attempts += 1;
            if attempts < 3 {
                Err(ServiceError::Status {
                    code: 502,
                    message: String::new(),
                })
            } else {
                Ok(attempts)
            }
        });
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn run_gives_up_on_client_errors() {
        let mut attempts = 0;
        let policy = RetryConfig {
            max_attempts: 4,
            ..RetryConfig::none()
        };
        let result: Result<(), _> = policy.run(|| {
            attempts += 1;
            Err(ServiceError::Rejected("bad".into()))
        });
        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }

    #[test]
    fn delay_doubles_up_to_the_cap() {
        let policy = RetryConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(350));
        assert_eq!(policy.delay_after(64), Duration::from_millis(350));
    }
}
