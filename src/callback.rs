/// Provider callback parsing and a one-shot local listener
use crate::error::{OAuthError, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const OAUTH_TOKEN_KEY: &str = "oauth_token";
const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
const OAUTH_PROBLEM_KEY: &str = "oauth_problem";

/// Parameters the provider appends to the callback URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub oauth_token: String,
    pub oauth_verifier: String,
}

impl CallbackParams {
    pub fn new(oauth_token: impl Into<String>, oauth_verifier: impl Into<String>) -> Self {
        Self {
            oauth_token: oauth_token.into(),
            oauth_verifier: oauth_verifier.into(),
        }
    }

    /// Parse a callback query string (with or without the leading `?`)
    ///
    /// # Example
    ///
    /// ```
    /// use yahoo_oauth1::callback::CallbackParams;
    ///
    /// let params = CallbackParams::from_query("?oauth_token=t1&oauth_verifier=v%201").unwrap();
    /// assert_eq!(params.oauth_token, "t1");
    /// assert_eq!(params.oauth_verifier, "v 1");
    /// ```
    pub fn from_query(query: &str) -> Result<Self> {
        let mut params = parse_query_params(query.trim_start_matches('?'));

        if let Some(problem) = params.remove(OAUTH_PROBLEM_KEY) {
            return Err(OAuthError::Protocol(format!(
                "provider reported oauth_problem={}",
                problem
            )));
        }

        let oauth_token = params
            .remove(OAUTH_TOKEN_KEY)
            .ok_or_else(|| OAuthError::MissingField(OAUTH_TOKEN_KEY.into()))?;
        let oauth_verifier = params
            .remove(OAUTH_VERIFIER_KEY)
            .ok_or_else(|| OAuthError::MissingField(OAUTH_VERIFIER_KEY.into()))?;

        Ok(Self {
            oauth_token,
            oauth_verifier,
        })
    }
}

/// Local HTTP listener that receives the provider redirect
///
/// Meant for command-line tools that have no web server of their own.
pub struct CallbackListener {
    listener: TcpListener,
    port: u16,
}

impl CallbackListener {
    /// Bind to a random available port on the loopback interface
    pub fn new() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        // Polled so the deadline in `wait_for_callback` is honoured
        listener.set_nonblocking(true)?;

        Ok(Self { listener, port })
    }

    /// Callback URI to register with the provider
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/callback", self.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Block until the provider redirects to `/callback` or `timeout` passes
    pub fn wait_for_callback(&self, timeout: Duration) -> Result<CallbackParams> {
        let deadline = Instant::now() + timeout;

        loop {
            if Instant::now() > deadline {
                return Err(OAuthError::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "timeout waiting for callback",
                )));
            }

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!(%peer, "callback connection accepted");
                    stream.set_nonblocking(false)?;
                    if let Some(result) = self.handle_request(stream)? {
                        return Ok(result);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn handle_request(&self, stream: TcpStream) -> Result<Option<CallbackParams>> {
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;

        // Drain headers so closing the socket does not reset the connection
        let mut header = String::new();
        while reader.read_line(&mut header)? > 0 && !header.trim_end().is_empty() {
            header.clear();
        }

        // GET /callback?oauth_token=...&oauth_verifier=... HTTP/1.1
        let mut parts = request_line.split_whitespace();
        let target = match (parts.next(), parts.next()) {
            (Some(_), Some(target)) => target,
            _ => {
                send_response(stream, "400 Bad Request", "Invalid request")?;
                return Ok(None);
            }
        };

        if !target.starts_with("/callback") {
            send_response(stream, "404 Not Found", "Not found")?;
            return Ok(None);
        }

        let query = target.split_once('?').map(|(_, q)| q).unwrap_or("");
        match CallbackParams::from_query(query) {
            Ok(params) => {
                send_response(
                    stream,
                    "200 OK",
                    "Authorization complete. You can close this window.",
                )?;
                Ok(Some(params))
            }
            Err(e) => {
                warn!(error = %e, "rejected callback");
                send_response(stream, "400 Bad Request", &format!("Authorization failed: {}", e))?;
                Err(e)
            }
        }
    }
}

fn parse_query_params(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn send_response(mut stream: TcpStream, status: &str, message: &str) -> Result<()> {
    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Sign-in</title></head>\n<body><p>{}</p></body>\n</html>",
        message
    );

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        html.len(),
        html
    );

    stream.write_all(response.as_bytes())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::thread;

    #[test]
    fn test_listener_creation() {
        let listener = CallbackListener::new().unwrap();
        assert!(listener.port() > 0);
        assert!(listener.redirect_uri().starts_with("http://127.0.0.1:"));
        assert!(listener.redirect_uri().ends_with("/callback"));
    }

    #[test]
    fn test_query_param_parsing() {
        let params = CallbackParams::from_query("oauth_token=abc123&oauth_verifier=xyz789").unwrap();
        assert_eq!(params, CallbackParams::new("abc123", "xyz789"));
    }

    #[test]
    fn test_query_param_url_decoding() {
        let params =
            CallbackParams::from_query("oauth_token=abc%20123&oauth_verifier=xyz%2F789").unwrap();
        assert_eq!(params.oauth_token, "abc 123");
        assert_eq!(params.oauth_verifier, "xyz/789");
    }

    #[test]
    fn test_missing_verifier() {
        let err = CallbackParams::from_query("oauth_token=abc").unwrap_err();
        assert!(matches!(err, OAuthError::MissingField(field) if field == "oauth_verifier"));
    }

    #[test]
    fn test_oauth_problem_reported() {
        let err = CallbackParams::from_query("oauth_problem=user_refused").unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_wait_for_callback_round_trip() {
        let listener = CallbackListener::new().unwrap();
        let port = listener.port();

        let browser = thread::spawn(move || {
            // Unrelated request first; the listener must keep waiting
            let mut favicon = TcpStream::connect(("127.0.0.1", port)).unwrap();
            favicon
                .write_all(b"GET /favicon.ico HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .unwrap();
            let mut ignored = String::new();
            favicon.read_to_string(&mut ignored).unwrap();
            assert!(ignored.starts_with("HTTP/1.1 404"));

            let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
            stream
                .write_all(b"GET /callback?oauth_token=tok&oauth_verifier=ver HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        });

        let params = listener.wait_for_callback(Duration::from_secs(5)).unwrap();
        let response = browser.join().unwrap();

        assert_eq!(params, CallbackParams::new("tok", "ver"));
        assert!(response.starts_with("HTTP/1.1 200 OK"));
    }

    #[test]
    fn test_wait_for_callback_times_out() {
        let listener = CallbackListener::new().unwrap();
        let err = listener
            .wait_for_callback(Duration::from_millis(100))
            .unwrap_err();
        assert!(matches!(err, OAuthError::Io(e) if e.kind() == std::io::ErrorKind::TimedOut));
    }
}
