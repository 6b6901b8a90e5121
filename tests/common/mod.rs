#![allow(dead_code)]

use ott_errors::error::{ClientError, ErrorCode, LegacyHttpError, UnifiedError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

pub fn meta(value: Value) -> serde_json::Map<String, Value> {
    value
        .as_object()
        .cloned()
        .expect("meta fixture must be a JSON object")
}

pub fn api(status: u16, code: Option<ErrorCode>, meta_value: Option<Value>) -> ClientError {
    UnifiedError::builder()
        .status(status)
        .maybe_code(code)
        .maybe_meta(meta_value.map(meta))
        .build()
        .into()
}

pub fn legacy(status: u16, headers: &[(&str, &str)], body: Option<Value>) -> ClientError {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    let err = LegacyHttpError::new(status, map);
    match body {
        Some(body) => err.with_body(body).into(),
        None => err.into(),
    }
}
