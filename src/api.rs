// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! HTTP client for the remote API.
//!
//! None of the services call this yet; all data lives in the local store.
//! Each request sleeps for the configured latency first.

use crate::config::Config;
use crate::error::ApiError;
use crate::store::{self, SharedStore, keys};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{error, trace};

const UA: &str = concat!(
    "pocketledger/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/pocketledger)"
);

pub struct ApiClient {
    client: Client,
    base_url: String,
    latency: Duration,
    store: SharedStore,
}

impl ApiClient {
    pub fn new(config: &Config, store: SharedStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(UA)
            .build()?;
        Ok(ApiClient {
            client,
            base_url: config.api_base_url.clone(),
            latency: config.api_latency,
            store,
        })
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// JSON content type plus a bearer token when one is stored.
    pub fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let token: Option<String> = store::load(self.store.as_ref(), keys::AUTH_TOKEN)?;
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if let Ok(v) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, v);
            }
        }
        Ok(headers)
    }

    fn request<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        std::thread::sleep(self.latency);
        let resp = builder.headers(self.headers()?).send().map_err(|e| {
            error!("API request failed: {}", e);
            ApiError::from(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            error!("API request failed with status {}", status);
            return Err(ApiError::Status(status));
        }
        Ok(resp.json()?)
    }

    fn builder(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        trace!("{} {}", method, url);
        self.client.request(method, url)
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(self.builder(Method::GET, endpoint))
    }

    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(self.builder(Method::POST, endpoint).json(body))
    }

    pub fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(self.builder(Method::PUT, endpoint).json(body))
    }

    pub fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(self.builder(Method::DELETE, endpoint))
    }
}

/// Stores the bearer token sent with API requests; an empty token clears it.
pub fn set_auth_token(store: &SharedStore, token: &str) -> Result<(), ApiError> {
    if token.is_empty() {
        store.remove(keys::AUTH_TOKEN)?;
    } else {
        store::save(store.as_ref(), keys::AUTH_TOKEN, token)?;
    }
    Ok(())
}
