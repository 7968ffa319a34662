use log::{debug, trace, warn};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::action::Action;
use crate::config::Config;
use crate::error::{ApiError, Error, Result};
use crate::types::JsonObject;

/// Largest page MangoPay serves.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Pagination {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(1, 10)
    }
}

/// Handle on the MangoPay API. Clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct MangoPay {
    config: Config,
    http: reqwest::Client,
}

struct Prepared {
    method: Method,
    url: String,
    body: Option<JsonObject>,
}

impl MangoPay {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(MangoPay { config, http })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn prepare(&self, action: Action, mut data: JsonObject) -> Result<Prepared> {
        let endpoint = action.endpoint();
        let path = endpoint.resolve(action, &mut data)?;
        let url = format!("{}{}", self.config.api_root(), path);
        let body = if endpoint.method == Method::GET {
            None
        } else {
            Some(data)
        };
        Ok(Prepared {
            method: endpoint.method,
            url,
            body,
        })
    }

    /// Sends `action` and decodes the answer, blocking the current thread.
    ///
    /// Path values are taken out of `data`; for anything but GET the rest
    /// of `data` is the JSON body.
    pub fn request<T: DeserializeOwned>(&self, action: Action, data: JsonObject) -> Result<T> {
        self.request_with_query(action, data, &[])
    }

    pub async fn async_request<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
    ) -> Result<T> {
        self.async_request_with_query(action, data, &[]).await
    }

    fn request_with_query<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        query: &[(String, String)],
    ) -> Result<T> {
        let prepared = self.prepare(action, data)?;
        debug!("{:?}: {} {}", action, prepared.method, prepared.url);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()?;
        let mut request = client
            .request(prepared.method, prepared.url.as_str())
            .basic_auth(&self.config.client_id, Some(&self.config.passphrase))
            .query(query);
        if let Some(body) = &prepared.body {
            trace!("{:?} body: {}", action, Value::Object(body.clone()));
            request = request.json(body);
        }
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        decode(action, status, &text)
    }

    async fn async_request_with_query<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        query: &[(String, String)],
    ) -> Result<T> {
        let prepared = self.prepare(action, data)?;
        debug!("{:?}: {} {}", action, prepared.method, prepared.url);
        let mut request = self
            .http
            .request(prepared.method, prepared.url.as_str())
            .basic_auth(&self.config.client_id, Some(&self.config.passphrase))
            .query(query);
        if let Some(body) = &prepared.body {
            trace!("{:?} body: {}", action, Value::Object(body.clone()));
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode(action, status, &text)
    }

    /// Fetches one page of a list action.
    pub fn list_page<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        pagination: Pagination,
    ) -> Result<Vec<T>> {
        self.list_chunk(action, data, pagination, &[])
    }

    pub async fn async_list_page<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        pagination: Pagination,
    ) -> Result<Vec<T>> {
        self.list_chunk_async(action, data, pagination, &[]).await
    }

    /// Fetches every page of a list action.
    pub fn list<T: DeserializeOwned>(&self, action: Action, data: JsonObject) -> Result<Vec<T>> {
        self.list_filtered(action, data, &[])
    }

    pub async fn async_list<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
    ) -> Result<Vec<T>> {
        self.async_list_filtered(action, data, &[]).await
    }

    pub(crate) fn list_filtered<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        filters: &[(String, String)],
    ) -> Result<Vec<T>> {
        let mut objects: Vec<T> = Vec::new();
        let mut page = 1;
        loop {
            let pagination = Pagination::new(page, MAX_PER_PAGE);
            let chunk: Vec<T> = self.list_chunk(action, data.clone(), pagination, filters)?;
            let short = chunk.len() < MAX_PER_PAGE as usize;
            objects.extend(chunk);
            if short {
                break;
            }
            page += 1;
        }
        Ok(objects)
    }

    pub(crate) async fn async_list_filtered<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        filters: &[(String, String)],
    ) -> Result<Vec<T>> {
        let mut objects: Vec<T> = Vec::new();
        let mut page = 1;
        loop {
            let pagination = Pagination::new(page, MAX_PER_PAGE);
            let chunk: Vec<T> = self
                .list_chunk_async(action, data.clone(), pagination, filters)
                .await?;
            let short = chunk.len() < MAX_PER_PAGE as usize;
            objects.extend(chunk);
            if short {
                break;
            }
            page += 1;
        }
        Ok(objects)
    }

    fn list_chunk<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        pagination: Pagination,
        filters: &[(String, String)],
    ) -> Result<Vec<T>> {
        if !action.is_list() {
            return Err(Error::NotAList(action));
        }
        let mut query = pagination.to_query();
        query.extend_from_slice(filters);
        self.request_with_query(action, data, &query)
    }

    async fn list_chunk_async<T: DeserializeOwned>(
        &self,
        action: Action,
        data: JsonObject,
        pagination: Pagination,
        filters: &[(String, String)],
    ) -> Result<Vec<T>> {
        if !action.is_list() {
            return Err(Error::NotAList(action));
        }
        let mut query = pagination.to_query();
        query.extend_from_slice(filters);
        self.async_request_with_query(action, data, &query).await
    }

    /// Posts a form outside of the API root, without credentials, and
    /// returns the raw answer. Used by the card tokenization server.
    pub(crate) fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        debug!("POST {}", url);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()?;
        let response = client.post(url).form(form).send()?;
        let status = response.status();
        let text = response.text()?;
        check_status(status, text)
    }

    pub(crate) async fn async_post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        debug!("POST {}", url);
        let response = self.http.post(url).form(form).send().await?;
        let status = response.status();
        let text = response.text().await?;
        check_status(status, text)
    }
}

fn check_status(status: StatusCode, text: String) -> Result<String> {
    if status.is_success() {
        Ok(text)
    } else {
        Err(ApiError::new(status.as_u16(), text).into())
    }
}

fn decode<T: DeserializeOwned>(action: Action, status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        let err = ApiError::new(status.as_u16(), body.to_string());
        warn!("{:?} rejected: {}", action, err);
        return Err(err.into());
    }
    trace!("{:?} response: {}", action, body);
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(body)?)
}
