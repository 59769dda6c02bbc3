//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use fbads_core::{AdsError, AdsResult, FileContent, FileRef, HttpRequest, HttpResponse, Method, Transport};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> AdsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AdsError::transport)?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> AdsResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            query,
            form,
            files,
        } = request;

        let builder = match method {
            Method::Get => self.client.get(&url).query(&query),
            Method::Delete => self.client.delete(&url).query(&query),
            Method::Post if files.is_empty() => self.client.post(&url).form(&form),
            Method::Post => self.client.post(&url).multipart(multipart_form(form, files).await?),
        };

        let response = builder.send().await.map_err(AdsError::transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(AdsError::transport)?;
        Ok(HttpResponse { status, body })
    }
}

async fn multipart_form(fields: Vec<(String, String)>, files: Vec<(String, FileRef)>) -> AdsResult<Form> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    for (name, file) in files {
        form = form.part(name, file_part(file).await?);
    }
    Ok(form)
}

async fn file_part(file: FileRef) -> AdsResult<Part> {
    let bytes = match file.content {
        FileContent::Bytes(bytes) => bytes,
        FileContent::Path(path) => tokio::fs::read(&path).await.map_err(AdsError::transport)?,
    };

    let mut part = Part::bytes(bytes);
    if let Some(filename) = file.filename {
        part = part.file_name(filename);
    }
    if let Some(content_type) = file.content_type {
        part = part
            .mime_str(&content_type)
            .map_err(|e| AdsError::precondition(format!("invalid content type {}: {}", content_type, e)))?;
    }
    if !file.headers.is_empty() {
        part = part.headers(part_headers(&file.headers)?);
    }
    Ok(part)
}

fn part_headers(headers: &[(String, String)]) -> AdsResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AdsError::precondition(format!("invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| AdsError::precondition(format!("invalid header value for {}: {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_headers_valid() {
        let headers = vec![("X-Upload-Id".to_string(), "42".to_string())];
        let map = part_headers(&headers).unwrap();
        assert_eq!(map.get("x-upload-id").unwrap(), "42");
    }

    #[test]
    fn test_part_headers_invalid_name() {
        let headers = vec![("bad header".to_string(), "1".to_string())];
        assert!(matches!(
            part_headers(&headers),
            Err(AdsError::Precondition { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_part_missing_path_is_transport_error() {
        let file = FileRef {
            filename: Some("x.png".to_string()),
            content: FileContent::Path("/definitely/not/here.png".into()),
            content_type: Some("image/png".to_string()),
            headers: Vec::new(),
        };
        assert!(matches!(file_part(file).await, Err(AdsError::Transport(_))));
    }

    #[tokio::test]
    async fn test_file_part_rejects_bad_mime() {
        let file = FileRef {
            filename: None,
            content: FileContent::Bytes(vec![1, 2, 3]),
            content_type: Some("not a mime".to_string()),
            headers: Vec::new(),
        };
        assert!(matches!(file_part(file).await, Err(AdsError::Precondition { .. })));
    }
}
