//! Stateless HTTP request builder and response parser for the apartments API.
//!
//! # Design
//! `ApartmentClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`. The round-trip itself happens elsewhere
//! (`Api` for Rust hosts, the native host through the C ABI).

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Apartment, ApartmentInput, Stats};

/// Stateless client for the apartments API.
#[derive(Debug, Clone)]
pub struct ApartmentClient {
    base_url: String,
}

impl ApartmentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/apartments".to_string())
    }

    pub fn build_create(&self, input: &ApartmentInput) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, "/apartments".to_string(), input)
    }

    pub fn build_update(&self, id: i64, input: &ApartmentInput) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Put, format!("/apartments/{id}"), input)
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("/apartments/{id}"))
    }

    pub fn build_stats(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/apartments/stats".to_string())
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Apartment>, ApiError> {
        decode(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Apartment, ApiError> {
        decode(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Apartment, ApiError> {
        decode(response)
    }

    /// The success body is ignored, whatever it holds.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_stats(&self, response: HttpResponse) -> Result<Stats, ApiError> {
        decode(response)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_body(
        &self,
        method: HttpMethod,
        path: String,
        input: &ApartmentInput,
    ) -> Result<HttpRequest, ApiError> {
        // serde_json writes non-finite floats as `null`.
        if !input.loyer.is_finite() {
            return Err(ApiError::Serialization(format!(
                "loyer must be a finite number, got {}",
                input.loyer
            )));
        }
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Any 2xx passes; anything else becomes `ApiError::Service`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_failure(response.status, &response.body))
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApartmentClient {
        ApartmentClient::new("http://localhost:3000")
    }

    fn input() -> ApartmentInput {
        ApartmentInput {
            num_app: "101".to_string(),
            design: "Studio".to_string(),
            loyer: 800.0,
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_produces_correct_request() {
        let req = client().build_list();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/apartments");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_produces_correct_request() {
        let req = client().build_create(&input()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/apartments");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["numApp"], "101");
        assert_eq!(body["design"], "Studio");
        assert_eq!(body["loyer"], 800.0);
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_targets_id() {
        let req = client().build_update(42, &input()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/apartments/42");
        assert!(req.body.is_some());
    }

    #[test]
    fn build_rejects_non_finite_rent() {
        let mut bad = input();
        bad.loyer = f64::NAN;
        let err = client().build_create(&bad).unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));

        bad.loyer = f64::INFINITY;
        let err = client().build_update(1, &bad).unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }

    #[test]
    fn build_delete_produces_correct_request() {
        let req = client().build_delete(3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/apartments/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_stats_produces_correct_request() {
        let req = client().build_stats();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/apartments/stats");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApartmentClient::new("http://localhost:3000/");
        assert_eq!(client.build_list().path, "http://localhost:3000/apartments");
    }

    #[test]
    fn parse_list_keeps_service_order() {
        let body = r#"[
            {"id":2,"numApp":"B","design":"T3","loyer":2500},
            {"id":1,"numApp":"A","design":"Studio","loyer":700}
        ]"#;
        let apartments = client().parse_list(response(200, body)).unwrap();
        assert_eq!(apartments.len(), 2);
        assert_eq!(apartments[0].id, Some(2));
        assert_eq!(apartments[1].num_app, "A");
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_create_accepts_any_2xx() {
        let body = r#"{"id":5,"numApp":"101","design":"Studio","loyer":800}"#;
        for status in [200, 201] {
            let apartment = client().parse_create(response(status, body)).unwrap();
            assert_eq!(apartment.id, Some(5));
        }
    }

    #[test]
    fn parse_create_wrong_status_uses_service_message() {
        let err = client()
            .parse_create(response(400, r#"{"message":"numApp is required"}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Service { status: 400, ref message } if message == "numApp is required"
        ));
    }

    #[test]
    fn parse_update_not_found() {
        let err = client().parse_update(response(404, "")).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn parse_delete_ignores_body() {
        assert!(client().parse_delete(response(204, "")).is_ok());
        assert!(client().parse_delete(response(200, "garbage")).is_ok());
    }

    #[test]
    fn parse_delete_failure() {
        let err = client().parse_delete(response(500, "boom")).unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn parse_stats_success() {
        let stats = client()
            .parse_stats(response(200, r#"{"total":6300,"min":800,"max":5500}"#))
            .unwrap();
        assert_eq!(stats, Stats { total: 6300.0, min: 800.0, max: 5500.0 });
    }
}
