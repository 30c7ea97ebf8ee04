//! HTTP-backed edition registry.
//!
//! Maps the [`EditionRegistry`] contract onto the content service's REST
//! surface through the resilient client. Lifecycle actions are POSTs
//! against the edition id; the service's storage enforces uniqueness of
//! the active flag and performs the activate swap atomically (a partial
//! unique index on the active column, not two independent writes).

use async_trait::async_trait;
use http::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, ContentClient, Envelope, RequestOptions};
use crate::edition::{Edition, EditionId, NewEdition, Transition};
use crate::interfaces::edition_registry::{EditionRegistry, RegistryError, Result};

/// Edition registry over the remote content service.
pub struct RemoteRegistry {
    client: ContentClient,
    options: RequestOptions,
}

impl RemoteRegistry {
    pub fn new(client: ContentClient) -> Self {
        Self {
            client,
            options: RequestOptions::default(),
        }
    }

    /// Tie every call issued by this registry to a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.options = RequestOptions::cancellable(token);
        self
    }

    /// Unwrap the envelope's business outcome.
    ///
    /// Rejections come back as 200s with `success = false` and a null
    /// `data`, so the payload is deserialized as optional and only
    /// unwrapped on success.
    fn unwrap_envelope<T>(envelope: Envelope<Option<T>>) -> Result<T> {
        if !envelope.success {
            return Err(RegistryError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "operation rejected without a message".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| RegistryError::Rejected("response envelope missing data".to_string()))
    }

    /// Map a 404 into the registry's not-found signal; everything else
    /// crosses as a client error.
    fn map_client(err: ClientError, what: impl Into<String>) -> RegistryError {
        match err {
            ClientError::Status { status, .. } if status == StatusCode::NOT_FOUND => {
                RegistryError::NotFound(what.into())
            }
            other => RegistryError::Client(other),
        }
    }
}

#[async_trait]
impl EditionRegistry for RemoteRegistry {
    async fn create(&self, draft: NewEdition) -> Result<Edition> {
        let body = serde_json::to_value(&draft).map_err(ClientError::Decode)?;
        let envelope: Envelope<Option<Edition>> = self
            .client
            .post("editions", Some(body), &self.options)
            .await?;
        Self::unwrap_envelope(envelope)
    }

    async fn get(&self, id: EditionId) -> Result<Edition> {
        // The service exposes year lookup, not id lookup; scan the list.
        self.list()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| RegistryError::NotFound(format!("edition {id}")))
    }

    async fn by_year(&self, year: i32) -> Result<Edition> {
        let envelope: Envelope<Option<Edition>> = self
            .client
            .get(&format!("editions/{year}"), &self.options)
            .await
            .map_err(|e| Self::map_client(e, format!("edition year {year}")))?;
        Self::unwrap_envelope(envelope)
    }

    async fn active(&self) -> Result<Option<Edition>> {
        Ok(self.list().await?.into_iter().find(|e| e.is_active_edition))
    }

    async fn list(&self) -> Result<Vec<Edition>> {
        let envelope: Envelope<Option<Vec<Edition>>> =
            self.client.get("editions", &self.options).await?;
        Self::unwrap_envelope(envelope)
    }

    async fn transition(&self, id: EditionId, transition: Transition) -> Result<Edition> {
        let resource = format!("editions/{id}/{}", transition.action());
        let envelope: Envelope<Option<Edition>> = self
            .client
            .post(&resource, None, &self.options)
            .await
            .map_err(|e| Self::map_client(e, format!("edition {id}")))?;
        Self::unwrap_envelope(envelope)
    }

    async fn activate(&self, id: EditionId) -> Result<Edition> {
        let envelope: Envelope<Option<Edition>> = self
            .client
            .post(&format!("editions/{id}/activate"), None, &self.options)
            .await
            .map_err(|e| Self::map_client(e, format!("edition {id}")))?;
        Self::unwrap_envelope(envelope)
    }

    async fn delete(&self, id: EditionId) -> Result<()> {
        // Deletion acknowledgements carry no payload, so only the
        // success flag matters here.
        let envelope: Envelope<Option<serde_json::Value>> = self
            .client
            .delete(&format!("editions/{id}"), &self.options)
            .await
            .map_err(|e| Self::map_client(e, format!("edition {id}")))?;
        if !envelope.success {
            return Err(RegistryError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "operation rejected without a message".to_string()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::client::{Transport, TransportFault, TransportRequest, TransportResponse};
    use crate::edition::EditionStatus;
    use crate::utils::retry::RetryConfig;

    struct RecordingTransport {
        script: Mutex<VecDeque<TransportResponse>>,
        seen: Mutex<Vec<(http::Method, String)>>,
        calls: AtomicU32,
    }

    impl RecordingTransport {
        fn new(script: Vec<TransportResponse>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                seen: Mutex::new(Vec::new()),
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> std::result::Result<TransportResponse, TransportFault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((request.method, request.resource));
            Ok(self.script.lock().unwrap().pop_front().expect("unscripted call"))
        }
    }

    fn response(status: u16, body: serde_json::Value) -> TransportResponse {
        TransportResponse {
            status: http::StatusCode::from_u16(status).unwrap(),
            body: body.to_string().into_bytes(),
        }
    }

    fn edition_json(id: i64, year: i32, status: &str, active: bool) -> serde_json::Value {
        json!({
            "id": id,
            "year": year,
            "edition_number": (year - 2000),
            "name": format!("Conference {year}"),
            "slug": format!("conference-{year}"),
            "status": status,
            "is_active_edition": active
        })
    }

    fn registry(script: Vec<TransportResponse>) -> (RemoteRegistry, Arc<RecordingTransport>) {
        let transport = RecordingTransport::new(script);
        let client = ContentClient::with_transport(transport.clone(), RetryConfig::none());
        (RemoteRegistry::new(client), transport)
    }

    #[tokio::test]
    async fn by_year_hits_the_year_endpoint() {
        let (registry, transport) = registry(vec![response(
            200,
            json!({"success": true, "data": edition_json(7, 2026, "published", true)}),
        )]);

        let edition = registry.by_year(2026).await.unwrap();
        assert_eq!(edition.year, 2026);
        assert_eq!(edition.status, EditionStatus::Published);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0], (http::Method::GET, "editions/2026".to_string()));
    }

    #[tokio::test]
    async fn by_year_maps_404_to_not_found() {
        let (registry, _) = registry(vec![response(404, json!({"message": "no such edition"}))]);

        let err = registry.by_year(2099).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn transition_posts_the_action_endpoint() {
        let (registry, transport) = registry(vec![response(
            200,
            json!({"success": true, "data": edition_json(7, 2026, "archived", false)}),
        )]);

        let edition = registry
            .transition(EditionId(7), Transition::Archive)
            .await
            .unwrap();
        assert_eq!(edition.status, EditionStatus::Archived);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            (http::Method::POST, "editions/7/archive".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_envelope_surfaces_the_message() {
        let (registry, _) = registry(vec![response(
            200,
            json!({"success": false, "data": null, "message": "year already exists"}),
        )]);

        let err = registry
            .create(NewEdition {
                year: 2026,
                edition_number: 26,
                name: "Conference 2026".into(),
                slug: "conference-2026".into(),
                conference_date: None,
                theme: None,
            })
            .await
            .unwrap_err();

        match err {
            RegistryError::Rejected(message) => assert_eq!(message, "year already exists"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn active_scans_the_list() {
        let (registry, transport) = registry(vec![response(
            200,
            json!({
                "success": true,
                "data": [
                    edition_json(1, 2025, "archived", false),
                    edition_json(2, 2026, "published", true)
                ],
                "meta": {"total": 2}
            }),
        )]);

        let active = registry.active().await.unwrap().unwrap();
        assert_eq!(active.year, 2026);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0], (http::Method::GET, "editions".to_string()));
    }

    #[tokio::test]
    async fn delete_issues_delete_on_the_id() {
        let (registry, transport) = registry(vec![response(
            200,
            json!({"success": true, "data": null}),
        )]);

        registry.delete(EditionId(9)).await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0], (http::Method::DELETE, "editions/9".to_string()));
    }
}
