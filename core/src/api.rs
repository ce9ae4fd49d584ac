//! One call per operation: build, execute, parse.

use tracing::{debug, error};

use crate::client::ApartmentClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Apartment, ApartmentInput, Stats};

/// An `ApartmentClient` paired with the transport that carries its requests.
///
/// No retries and no local caching: each method is exactly one round-trip.
/// Failures are logged here and returned unchanged.
#[derive(Debug, Clone)]
pub struct Api<T> {
    client: ApartmentClient,
    transport: T,
}

impl Api<UreqTransport> {
    pub fn connect(base_url: &str) -> Self {
        Self::new(ApartmentClient::new(base_url), UreqTransport::new())
    }
}

impl<T: Transport> Api<T> {
    pub fn new(client: ApartmentClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn list(&self) -> Result<Vec<Apartment>, ApiError> {
        let request = self.client.build_list();
        self.round_trip(request)
            .and_then(|response| self.client.parse_list(response))
            .inspect_err(|err| error!(error = %err, "error fetching apartments"))
    }

    pub fn create(&self, input: &ApartmentInput) -> Result<Apartment, ApiError> {
        self.client
            .build_create(input)
            .and_then(|request| self.round_trip(request))
            .and_then(|response| self.client.parse_create(response))
            .inspect_err(|err| error!(error = %err, num_app = %input.num_app, "error adding apartment"))
    }

    pub fn update(&self, id: i64, input: &ApartmentInput) -> Result<Apartment, ApiError> {
        self.client
            .build_update(id, input)
            .and_then(|request| self.round_trip(request))
            .and_then(|response| self.client.parse_update(response))
            .inspect_err(|err| error!(error = %err, id, "error updating apartment"))
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        let request = self.client.build_delete(id);
        self.round_trip(request)
            .and_then(|response| self.client.parse_delete(response))
            .inspect_err(|err| error!(error = %err, id, "error deleting apartment"))
    }

    pub fn stats(&self) -> Result<Stats, ApiError> {
        let request = self.client.build_stats();
        self.round_trip(request)
            .and_then(|response| self.client.parse_stats(response))
            .inspect_err(|err| error!(error = %err, "error fetching apartment stats"))
    }

    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
