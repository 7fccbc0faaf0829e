use std::time::Duration;
use streams_client::{Client, ClientConfig};
use streams_core::host::{CacheDirective, InstanceApi, ListRequest, SizeLookup};
use streams_core::ServiceError;
use streams_models::{CreateInstanceRequest, InstanceStatus, InstanceType};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn instance_json(id: &str, name: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "status": status,
        "owner": "alice",
        "cloud_provider": "aws",
        "region": "us-east-1",
        "instance_type": "developer",
        "created_at": "2022-01-31T10:00:00Z",
        "updated_at": "2022-01-31T10:05:00Z"
    })
}

fn list_json(items: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "kind": "KafkaRequestList",
        "page": 1,
        "size": items.len(),
        "total": items.len(),
        "items": items
    })
}

fn list_request(cache: CacheDirective) -> ListRequest {
    ListRequest {
        page: 1,
        per_page: 10,
        order_by: "created_at desc".to_string(),
        search: String::new(),
        cache,
    }
}

fn client(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(server.uri()).with_token(Some("secret".to_string())))
        .expect("client")
}

#[tokio::test]
async fn test_list_sends_paging_order_and_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/kafkas_mgmt/v1/kafkas"))
        .and(query_param("page", "2"))
        .and(query_param("size", "20"))
        .and(query_param("orderBy", "name asc"))
        .and(query_param("search", "(name like %orders%)"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(vec![instance_json(
            "id-1",
            "orders",
            "ready",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let request = ListRequest {
        page: 2,
        per_page: 20,
        order_by: "name asc".to_string(),
        search: "(name like %orders%)".to_string(),
        cache: CacheDirective::Bypass,
    };
    let list = client(&server).list_instances(&request).await.unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.items[0].name, "orders");
    assert_eq!(list.items[0].status, InstanceStatus::Ready);
    assert_eq!(list.items[0].instance_type, Some(InstanceType::Developer));
}

#[tokio::test]
async fn test_empty_search_is_omitted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/kafkas_mgmt/v1/kafkas"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(Vec::new())))
        .expect(1)
        .mount(&server)
        .await;

    let list = client(&server)
        .list_instances(&list_request(CacheDirective::Bypass))
        .await
        .unwrap();
    assert!(list.items.is_empty());
}

#[tokio::test]
async fn test_poll_requests_are_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/kafkas_mgmt/v1/kafkas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(vec![instance_json(
            "id-1",
            "orders",
            "provisioning",
        )])))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let poll = list_request(CacheDirective::MaxAge(Duration::from_secs(60)));

    client.list_instances(&poll).await.unwrap();
    client.list_instances(&poll).await.unwrap();
    assert_eq!(client.cache().len(), 1);

    // explicit loads always reach the server
    client
        .list_instances(&list_request(CacheDirective::Bypass))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unauthorized_error_body_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/kafkas_mgmt/v1/kafkas"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "kind": "Error",
            "id": "11",
            "code": "KAFKAS-MGMT-11",
            "reason": "User 'bob' is not authorized to access the service",
            "operation_id": "op-1"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_instances(&list_request(CacheDirective::Bypass))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(
        err,
        ServiceError::Server {
            status: 403,
            code: Some("KAFKAS-MGMT-11".to_string()),
            reason: Some("User 'bob' is not authorized to access the service".to_string()),
        }
    );
}

#[tokio::test]
async fn test_error_without_body_uses_status_reason() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/kafkas_mgmt/v1/kafkas/id-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).delete_instance("id-1", true).await.unwrap_err();
    assert_eq!(err.reason(), Some("Internal Server Error"));
    assert_eq!(err.code(), None);
}

#[tokio::test]
async fn test_delete_is_asynchronous() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/kafkas_mgmt/v1/kafkas/id-1"))
        .and(query_param("async", "true"))
        .respond_with(ResponseTemplate::new(202).set_body_json(instance_json(
            "id-1",
            "orders",
            "deprovision",
        )))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_instance("id-1", true).await.unwrap();
}

#[tokio::test]
async fn test_sizes_match_instance_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/kafkas_mgmt/v1/instance_types/aws/us-east-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "instance_types": [
                {
                    "id": "standard",
                    "display_name": "Standard",
                    "sizes": [{ "id": "x1", "display_name": "1" }]
                },
                {
                    "id": "developer",
                    "display_name": "Trial",
                    "sizes": [{ "id": "x1", "display_name": "1", "trial_duration_hours": 48 }]
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let sizes = client
        .get_sizes(InstanceType::Developer, "aws", "us-east-1")
        .await
        .unwrap();
    assert_eq!(sizes.len(), 1);
    assert_eq!(sizes[0].trial_duration_hours, 48);

    let sizes = client
        .get_sizes(InstanceType::Standard, "aws", "us-east-1")
        .await
        .unwrap();
    assert!(sizes.is_empty());
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_single_instance_reads_are_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/kafkas_mgmt/v1/kafkas/id-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(instance_json("id-1", "orders", "ready")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    client.get_instance("id-1").await.unwrap();
    let instance = client.get_instance("id-1").await.unwrap();

    assert_eq!(instance.name, "orders");
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_create_and_transfer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/kafkas_mgmt/v1/kafkas"))
        .and(query_param("async", "true"))
        .and(body_json(serde_json::json!({
            "name": "orders",
            "cloud_provider": "aws",
            "region": "us-east-1"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(instance_json(
            "id-1",
            "orders",
            "accepted",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/kafkas_mgmt/v1/kafkas/id-1"))
        .and(body_json(serde_json::json!({ "owner": "bob" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(instance_json(
            "id-1",
            "orders",
            "accepted",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let created = client
        .create_instance(&CreateInstanceRequest {
            name: "orders".to_string(),
            cloud_provider: "aws".to_string(),
            region: "us-east-1".to_string(),
            plan: None,
        })
        .await
        .unwrap();
    assert_eq!(created.status, InstanceStatus::Accepted);

    client.change_owner("id-1", "bob").await.unwrap();
}
