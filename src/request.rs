//! Blocking HTTP requests for workflow scripts

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::Method;
use std::time::Duration;

use crate::error::{Error, Result};

/// Transport options for [`http_request`]
///
/// Unset options, and options set to an empty string, fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// HTTP method, GET when unset
    pub method: Option<String>,
    /// Follow redirects and return the final body
    pub follow_redirects: Option<bool>,
    /// Open a new connection instead of reusing a pooled one
    pub fresh_connection: Option<bool>,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    /// The options every request starts from
    pub fn defaults() -> Self {
        Self {
            follow_redirects: Some(true),
            fresh_connection: Some(true),
            ..Self::default()
        }
    }

    /// Overlay `other` on `self`, ignoring unset and empty values
    pub fn merge(mut self, other: &RequestOptions) -> Self {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        if let Some(method) = non_empty(&other.method) {
            self.method = Some(method);
        }
        if let Some(follow) = other.follow_redirects {
            self.follow_redirects = Some(follow);
        }
        if let Some(fresh) = other.fresh_connection {
            self.fresh_connection = Some(fresh);
        }
        if let Some(timeout) = other.timeout {
            self.timeout = Some(timeout);
        }
        if let Some(agent) = non_empty(&other.user_agent) {
            self.user_agent = Some(agent);
        }
        if let Some(body) = non_empty(&other.body) {
            self.body = Some(body);
        }
        self.headers.extend(
            other
                .headers
                .iter()
                .filter(|(name, value)| !name.is_empty() && !value.is_empty())
                .cloned(),
        );
        self
    }
}

/// Issue a request and return the response body
pub fn http_request(url: &str, options: &RequestOptions) -> Result<String> {
    let options = RequestOptions::defaults().merge(options);
    let method = parse_method(options.method.as_deref())?;

    let mut builder = Client::builder().redirect(if options.follow_redirects.unwrap_or(true) {
        Policy::default()
    } else {
        Policy::none()
    });
    if options.fresh_connection.unwrap_or(true) {
        builder = builder.pool_max_idle_per_host(0);
    }
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(agent) = &options.user_agent {
        builder = builder.user_agent(agent.as_str());
    }
    let client = builder.build()?;

    log::debug!("{} {}", method, url);

    let mut request = client.request(method, url);
    for (name, value) in &options.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(body) = options.body {
        request = request.body(body);
    }

    Ok(request.send()?.text()?)
}

fn parse_method(method: Option<&str>) -> Result<Method> {
    match method {
        Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::InvalidMethod(m.to_string())),
        None => Ok(Method::GET),
    }
}
