use std::time::Duration;

use reqwest::{
    Client,
    Response,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::prelude::*;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Build a client which authenticates every request with the bearer token.
pub fn try_new(token: &str) -> Result<Client> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
        .context("the token is not a valid header value")?;
    authorization.set_sensitive(true);
    let headers = HeaderMap::from_iter([
        (AUTHORIZATION, authorization),
        (ACCEPT, HeaderValue::from_static("application/json")),
    ]);
    Ok(Client::builder().default_headers(headers).timeout(TIMEOUT).build()?)
}

/// Read the response body, failing with the raw body on a non-success status.
pub async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await.context("failed to read the response body")?;
    if status.is_success() { Ok(body) } else { Err(Failure::Status { status, body }.into()) }
}
