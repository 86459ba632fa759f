//! Transport client against a mock HTTP server

#[cfg(test)]
mod tests {
    use crate::common::mock_api::{MockApi, created, rejected, too_slow};
    use customer_uploader::config::{ApiConfig, default_create_customer_path};
    use customer_uploader::config::default_create_address_path;
    use customer_uploader::core::transport::{AddressCreated, ApiEnvelope, NewAddress, NewCustomer};
    use customer_uploader::{
        ApiEndpoints, ApiRequest, CustomerApi, LocationType, TransportClient, TransportError,
    };
    use reqwest::StatusCode;
    use serde_json::{Value, json};
    use std::time::Duration;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    fn new_customer(first_name: &str) -> NewCustomer {
        NewCustomer {
            first_name: first_name.to_string(),
            last_name: "Quispe".to_string(),
            email: None,
            phone_no: Some("+51987654321".to_string()),
            password: "45896321".to_string(),
        }
    }

    fn new_address(customer_id: i64) -> NewAddress {
        NewAddress {
            customer_id,
            name: "Ana Quispe".to_string(),
            email: None,
            phone_no: None,
            address: "Av. Arequipa 123".to_string(),
            house_no: "123".to_string(),
            latitude: -12.0464,
            longitude: -77.0428,
            loc_type: LocationType::Work,
        }
    }

    fn endpoints(config: &ApiConfig) -> ApiEndpoints {
        ApiEndpoints::new(TransportClient::new(config).unwrap(), config)
    }

    // ==================== Successful calls ====================

    #[tokio::test]
    async fn test_create_customer_returns_remote_id() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .and(header("authorization", "Bearer test-token"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "api_key": "test-key",
                "first_name": "Ana",
                "password": "45896321",
            })))
            .respond_with(created("Customer added", json!({ "customer_id": 7554656 })))
            .expect(1)
            .mount(&api.server)
            .await;

        let id = endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap();
        assert_eq!(id, 7554656);
    }

    #[tokio::test]
    async fn test_absent_optional_fields_are_not_sent() {
        let api = MockApi::start().await;
        api.customers_ok(1).await;

        endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap();

        let bodies = api.bodies(&default_create_customer_path()).await;
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].get("email").is_none());
        assert_eq!(bodies[0]["phone_no"], "+51987654321");
    }

    #[tokio::test]
    async fn test_address_payload_carries_location_code() {
        let api = MockApi::start().await;
        api.addresses_ok(55).await;

        let id = endpoints(&api.config())
            .create_address(&new_address(10))
            .await
            .unwrap();
        assert_eq!(id, 55);

        let bodies = api.bodies(&default_create_address_path()).await;
        assert_eq!(bodies[0]["loc_type"], 1);
        assert_eq!(bodies[0]["customer_id"], 10);
        assert_eq!(bodies[0]["name"], "Ana Quispe");
    }

    #[tokio::test]
    async fn test_address_reply_echoing_customer_id_yields_address_id() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_address_path()))
            .respond_with(created("Address added", json!({ "id": 88, "customer_id": 10 })))
            .mount(&api.server)
            .await;

        let id = endpoints(&api.config())
            .create_address(&new_address(10))
            .await
            .unwrap();
        assert_eq!(id, 88);
    }

    #[tokio::test]
    async fn test_raw_json_body_is_sent_unchanged() {
        let api = MockApi::start().await;
        let payload = json!({
            "api_key": "test-key",
            "customer_id": 7,
            "nested": { "tags": ["vip", "migrated"], "score": 1.5 },
        });
        Mock::given(method("POST"))
            .and(path("/open/admin/customer/note"))
            .and(body_json(payload.clone()))
            .respond_with(created("ok", json!({ "id": 3 })))
            .expect(1)
            .mount(&api.server)
            .await;

        let client = TransportClient::new(&api.config()).unwrap();
        let request = ApiRequest::post("/open/admin/customer/note").raw_json(payload.clone());
        let reply: Option<ApiEnvelope<AddressCreated>> = client.request(request).await.unwrap();
        assert_eq!(reply.unwrap().data.id, 3);

        let bodies = api.bodies("/open/admin/customer/note").await;
        assert_eq!(bodies, [payload]);
    }

    #[tokio::test]
    async fn test_get_appends_query_parameters() {
        let api = MockApi::start().await;
        Mock::given(method("GET"))
            .and(path("/open/admin/customer/view"))
            .and(query_param("customer_id", "42"))
            .respond_with(created("ok", json!({ "id": 42 })))
            .expect(1)
            .mount(&api.server)
            .await;

        let client = TransportClient::new(&api.config()).unwrap();
        let envelope: Option<ApiEnvelope<AddressCreated>> = client
            .get("/open/admin/customer/view", &[("customer_id", "42")])
            .await
            .unwrap();
        assert_eq!(envelope.unwrap().data.id, 42);
    }

    #[tokio::test]
    async fn test_no_content_yields_none() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&api.server)
            .await;

        let client = TransportClient::new(&api.config()).unwrap();
        let request = ApiRequest::post("/ping").expect_status(StatusCode::NO_CONTENT);
        let body: Option<Value> = client.request(request).await.unwrap();
        assert!(body.is_none());
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_error_status_keeps_code_and_body() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .respond_with(rejected("Email already registered"))
            .mount(&api.server)
            .await;

        let err = endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "http_status");
        assert_eq!(err.status_code(), Some(422));
        match &err {
            TransportError::HttpStatus { body, url, .. } => {
                assert!(body.contains("Email already registered"));
                assert!(url.ends_with(&default_create_customer_path()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("422"));
    }

    #[tokio::test]
    async fn test_unexpected_success_code_is_rejected() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "created",
                "data": { "customer_id": 5 },
            })))
            .mount(&api.server)
            .await;

        let err = endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::HttpStatus { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_response_shape_error() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&api.server)
            .await;

        let err = endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "response_shape");
        assert_eq!(err.status_code(), Some(200));
    }

    #[tokio::test]
    async fn test_missing_identifier_is_response_shape_error() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .respond_with(created("Customer added", json!({})))
            .mount(&api.server)
            .await;

        let err = endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "response_shape");
    }

    #[tokio::test]
    async fn test_address_reply_with_only_customer_id_is_response_shape_error() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_address_path()))
            .respond_with(created("Address added", json!({ "customer_id": 10 })))
            .mount(&api.server)
            .await;

        let err = endpoints(&api.config())
            .create_address(&new_address(10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "response_shape");
    }

    #[tokio::test]
    async fn test_empty_body_on_creation_is_response_shape_error() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .respond_with(ResponseTemplate::new(200))
            .mount(&api.server)
            .await;

        let err = endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "response_shape");
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let api = MockApi::start().await;
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .respond_with(too_slow())
            .mount(&api.server)
            .await;

        let err = endpoints(&api.config())
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap_err();
        match err {
            TransportError::Timeout { timeout, .. } => assert_eq!(timeout, Duration::from_secs(1)),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_connection_failure() {
        // Nothing listens on port 1
        let config = ApiConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));

        let err = endpoints(&config)
            .create_customer(&new_customer("Ana"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "connection_failure");
        assert!(err.status_code().is_none());
    }
}
