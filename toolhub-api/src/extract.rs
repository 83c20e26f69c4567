//! Request extractors
//!
//! - [`RequestContext`]: locale and base URL of the current request, passed
//!   explicitly into serialization
//! - [`JsonBody`]: JSON body whose rejections use the API error format

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts, HeaderMap},
    Json,
};
use serde::Deserialize;
use toolhub_common::serializers::SerializeContext;
use toolhub_common::{BaseUrl, Locale, MediaStorage};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// Per-request serialization inputs
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub locale: Locale,
    pub base: Option<BaseUrl>,
}

impl RequestContext {
    /// Resolve locale and base URL from request parts
    ///
    /// Locale: `?lang=` first, then `Accept-Language`, then English.
    /// Base URL: the configured public URL, else the forwarded/`Host` headers.
    pub fn from_parts(parts: &Parts, configured_base: Option<&BaseUrl>) -> Self {
        let query_locale = Query::<LangQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.lang)
            .and_then(|lang| Locale::from_code(&lang));

        let locale = query_locale
            .or_else(|| {
                parts
                    .headers
                    .get(header::ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(Locale::from_accept_language)
            })
            .unwrap_or_default();

        let base = configured_base
            .cloned()
            .or_else(|| base_from_headers(&parts.headers));

        Self { locale, base }
    }

    pub fn serializer<'a>(&'a self, storage: &'a dyn MediaStorage) -> SerializeContext<'a> {
        SerializeContext::new(storage, self.base.as_ref(), self.locale)
    }
}

/// First value of a possibly comma separated forwarding header
fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn base_from_headers(headers: &HeaderMap) -> Option<BaseUrl> {
    let scheme = first_header_value(headers, "x-forwarded-proto").unwrap_or("http");
    let host = first_header_value(headers, "x-forwarded-host")
        .or_else(|| first_header_value(headers, header::HOST.as_str()))?;
    BaseUrl::from_host(scheme, host)
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state.config.public_base_url.as_ref()))
    }
}

/// `Json<T>` with API-formatted 400 rejections
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = HttpRequest::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_locale_sources() {
        let ctx = RequestContext::from_parts(&parts("/api/tools?lang=ka", &[]), None);
        assert_eq!(ctx.locale, Locale::Ka);

        let ctx = RequestContext::from_parts(&parts("/api/tools?lang=ge", &[("accept-language", "en")]), None);
        assert_eq!(ctx.locale, Locale::Ka);

        let ctx = RequestContext::from_parts(
            &parts("/api/tools", &[("accept-language", "ka-GE,ka;q=0.9,en;q=0.8")]),
            None,
        );
        assert_eq!(ctx.locale, Locale::Ka);

        let ctx = RequestContext::from_parts(&parts("/api/tools?lang=fr", &[]), None);
        assert_eq!(ctx.locale, Locale::En);
    }

    #[test]
    fn test_base_url_sources() {
        let configured = BaseUrl::parse("https://tools.example.ge").unwrap();

        let ctx = RequestContext::from_parts(&parts("/", &[("host", "localhost:5740")]), Some(&configured));
        assert_eq!(ctx.base.as_ref().map(|b| b.as_str()), Some("https://tools.example.ge"));

        let ctx = RequestContext::from_parts(&parts("/", &[("host", "localhost:5740")]), None);
        assert_eq!(ctx.base.as_ref().map(|b| b.as_str()), Some("http://localhost:5740"));

        let ctx = RequestContext::from_parts(
            &parts(
                "/",
                &[
                    ("host", "10.0.0.5:5740"),
                    ("x-forwarded-proto", "https"),
                    ("x-forwarded-host", "api.example.ge, proxy.local"),
                ],
            ),
            None,
        );
        assert_eq!(ctx.base.as_ref().map(|b| b.as_str()), Some("https://api.example.ge"));

        let ctx = RequestContext::from_parts(&parts("/", &[]), None);
        assert_eq!(ctx.base, None);
    }

    #[test]
    fn test_malformed_host_gives_no_base() {
        for host in ["evil.com?x=", "a@evil.com", "h:notaport", "[::1"] {
            let ctx = RequestContext::from_parts(&parts("/", &[("host", host)]), None);
            assert_eq!(ctx.base, None, "host {:?}", host);
        }

        let ctx = RequestContext::from_parts(
            &parts("/", &[("host", "localhost:5740"), ("x-forwarded-host", "evil.com#x")]),
            None,
        );
        assert_eq!(ctx.base, None);
    }

    #[test]
    fn test_first_accept_language_tag_decides() {
        let ctx = RequestContext::from_parts(&parts("/", &[("accept-language", "fr, ka")]), None);
        assert_eq!(ctx.locale, Locale::En);

        let ctx = RequestContext::from_parts(&parts("/", &[("accept-language", "ka-GE, en")]), None);
        assert_eq!(ctx.locale, Locale::Ka);
    }
}
