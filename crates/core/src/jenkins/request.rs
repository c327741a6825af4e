// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol-correct requests for every remote operation

use super::model::Crumb;
use super::multipart::Multipart;
use crate::context::ExternalJobId;
use crate::descriptor::{ProjectRef, RunDescriptor};
use crate::error::CiError;
use std::fmt;
use url::Url;

/// Build parameter carrying the run's external id
pub const EXTERNAL_JOB_ID_PARAM: &str = "externalJobId";

/// Path of the test tree artifact below a build
const TEST_TREE_ARTIFACT: &[&str] = &["artifact", "target", "squashTA", "test-tree", "testTree.json"];

/// Multipart field holding the suite file
const SUITE_FILE_FIELD: &str = "file0";

/// Name of the file parameter the job reads the suite from
const SUITE_FILE_NAME: &str = "testsuite.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A fully prepared request; the transport only adds credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.body = Some(RequestBody {
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    /// Attach a CSRF crumb, when there is one
    pub fn with_crumb(self, crumb: Option<&Crumb>) -> Self {
        match crumb {
            Some(c) => self.with_header(c.field.clone(), c.value.clone()),
            None => self,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What came back from one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The response itself on 2xx, the mapped error otherwise
    pub fn ensure_success(self, target: &str) -> Result<Self, CiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CiError::from_status(self.status, &self.body, target))
        }
    }
}

/// Builds requests against one server's base URL
#[derive(Debug, Clone)]
pub struct RequestFactory {
    base: Url,
}

impl RequestFactory {
    pub fn new(base_url: &str) -> Result<Self, CiError> {
        let base = Url::parse(base_url)
            .map_err(|e| CiError::InvalidConfig(format!("server url `{}`: {}", base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CiError::InvalidConfig(format!(
                "server url `{}` must be http or https",
                base_url
            )));
        }
        Ok(Self { base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Base URL with extra path segments, each percent-encoded
    fn url(&self, segments: &[&str], query: Option<&str>) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.set_query(query);
        url.into()
    }

    fn job_url(&self, project: &ProjectRef, rest: &[&str], query: Option<&str>) -> String {
        let mut segments = vec!["job", project.name()];
        segments.extend_from_slice(rest);
        self.url(&segments, query)
    }

    pub fn job_listing(&self) -> HttpRequest {
        HttpRequest::get(self.url(&["api", "json"], Some("tree=jobs[name,color]")))
    }

    pub fn crumb(&self) -> HttpRequest {
        HttpRequest::get(self.url(&["crumbIssuer", "api", "json"], None))
    }

    /// Start a build that only lists the job's tests
    pub fn trigger_listing(&self, project: &ProjectRef, external_id: &ExternalJobId) -> HttpRequest {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("operation", "list")
            .append_pair(EXTERNAL_JOB_ID_PARAM, &external_id.0)
            .finish();
        HttpRequest::post(self.job_url(project, &["buildWithParameters"], None))
            .with_body("application/x-www-form-urlencoded", form.into_bytes())
    }

    /// Start a build that executes the descriptor's tests
    pub fn trigger_execution(
        &self,
        descriptor: &RunDescriptor,
        external_id: &ExternalJobId,
    ) -> Result<HttpRequest, CiError> {
        let mut parameters = vec![
            serde_json::json!({"name": SUITE_FILE_NAME, "file": SUITE_FILE_FIELD}),
            serde_json::json!({"name": "operation", "value": "run"}),
            serde_json::json!({"name": EXTERNAL_JOB_ID_PARAM, "value": external_id.0}),
        ];
        if let Some(node) = descriptor.node() {
            parameters.push(serde_json::json!({"name": "executor", "value": node}));
        }
        let blob = serde_json::json!({ "parameter": parameters }).to_string();

        let multipart = Multipart::new()
            .file(
                SUITE_FILE_FIELD,
                SUITE_FILE_NAME,
                "application/json",
                descriptor.to_suite_json()?,
            )
            .text("json", blob);
        let content_type = multipart.content_type();

        Ok(
            HttpRequest::post(self.job_url(descriptor.project(), &["build"], None))
                .with_body(content_type, multipart.into_bytes()),
        )
    }

    pub fn queue_item(&self, id: u64) -> HttpRequest {
        let id = id.to_string();
        HttpRequest::get(self.url(&["queue", "item", id.as_str(), "api", "json"], None))
    }

    pub fn builds(&self, project: &ProjectRef) -> HttpRequest {
        HttpRequest::get(self.job_url(
            project,
            &["api", "json"],
            Some("tree=builds[number,building,result,actions[parameters[name,value]]]"),
        ))
    }

    pub fn build(&self, project: &ProjectRef, number: u64) -> HttpRequest {
        let number = number.to_string();
        HttpRequest::get(self.job_url(
            project,
            &[number.as_str(), "api", "json"],
            Some("tree=number,building,result"),
        ))
    }

    pub fn test_list(&self, project: &ProjectRef, number: u64) -> HttpRequest {
        let number = number.to_string();
        let mut rest = vec![number.as_str()];
        rest.extend_from_slice(TEST_TREE_ARTIFACT);
        HttpRequest::get(self.job_url(project, &rest, None))
    }

    pub fn test_report(&self, project: &ProjectRef, number: u64) -> HttpRequest {
        let number = number.to_string();
        HttpRequest::get(self.job_url(
            project,
            &[number.as_str(), "testReport", "api", "json"],
            Some("tree=suites[cases[className,name,status]]"),
        ))
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
