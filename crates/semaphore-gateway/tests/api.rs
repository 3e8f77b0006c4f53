use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use ethers::abi::Token;
use ethers::types::{Address, U256};
use semaphore_gateway::chain::{
    StubChainClient, StubFailure, GET_GROUP_ADMIN, GET_MERKLE_TREE_DEPTH, HAS_MEMBER, REMOVE_MEMBER,
    UPDATE_GROUP_MERKLE_TREE_DURATION, VERIFIER, VERIFY_PROOF,
};
use semaphore_gateway::{router, ApiConfig, AppState, SemaphoreService};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const BASE: &str = "/api/v1/semaphore";

fn app(stub: &Arc<StubChainClient>) -> Router {
    app_with(stub, ApiConfig::default())
}

fn app_with(stub: &Arc<StubChainClient>, config: ApiConfig) -> Router {
    let state = AppState::new(SemaphoreService::new(stub.clone()));
    router(state, &config)
}

async fn send(app: Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn api(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn proof(points: usize) -> Value {
    json!({
        "merkleTreeDepth": "20",
        "merkleTreeRoot": "18446744073709551617",
        "nullifier": "7",
        "message": "8",
        "scope": "9",
        "points": (1..=points).map(|i| i.to_string()).collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn add_member_returns_created() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/members"),
        Some(json!({"groupId": "1", "identityCommitment": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body.get("message").is_none());
    assert!(body["timestamp"].is_i64());
    assert_eq!(body["data"]["groupId"], "1");
    assert_eq!(body["data"]["identityCommitment"], "123");

    let tx = &body["data"]["transaction"];
    assert_eq!(tx["status"], "success");
    assert!(tx["hash"].as_str().unwrap().starts_with("0x"));
    assert_eq!(tx["hash"].as_str().unwrap().len(), 66);
    assert!(tx["blockNumber"].is_string());
    assert!(tx["gasUsed"].is_string());
}

#[tokio::test]
async fn create_group_rejects_bad_admin() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/groups"),
        Some(json!({"admin": "not-an-address"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation error");
    assert_eq!(body["data"]["details"][0]["field"], "admin");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn create_group_returns_event_group_id() {
    let stub = Arc::new(StubChainClient::new());
    stub.set_group_counter(U256::from(5u64));

    let (status, body) = send(app(&stub), Method::POST, &api("/groups"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["groupId"], "5");
    assert!(body["data"].get("admin").is_none());

    let admin = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/groups"),
        Some(json!({"admin": admin, "merkleTreeDuration": "3600"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["groupId"], "6");
    assert_eq!(body["data"]["admin"], admin);
    assert_eq!(body["data"]["merkleTreeDuration"], "3600");
}

#[tokio::test]
async fn create_group_duration_without_admin_is_rejected() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/groups"),
        Some(json!({"merkleTreeDuration": "3600"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["details"][0]["field"], "merkleTreeDuration");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn has_member_false() {
    let stub = Arc::new(StubChainClient::new().with_read(HAS_MEMBER, vec![Token::Bool(false)]));
    let (status, body) = send(
        app(&stub),
        Method::GET,
        &api("/members/check?groupId=1&identityCommitment=2"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hasMember"], false);
    assert_eq!(body["data"]["groupId"], "1");
    assert_eq!(body["data"]["identityCommitment"], "2");
}

#[tokio::test]
async fn member_query_requires_both_params() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(app(&stub), Method::GET, &api("/members/index?groupId=x"), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["data"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn empty_batch_is_rejected_before_chain() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/members/batch"),
        Some(json!({"groupId": "1", "identityCommitments": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["details"][0]["field"], "identityCommitments");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn batch_add_reports_count() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/members/batch"),
        Some(json!({"groupId": "1", "identityCommitments": ["10", "20", "30"]})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["count"], 3);
    assert_eq!(body["data"]["identityCommitments"], json!(["10", "20", "30"]));
}

#[tokio::test]
async fn reverted_write_is_success_with_message() {
    let stub = Arc::new(StubChainClient::new());
    stub.revert_writes(true);

    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/members"),
        Some(json!({"groupId": "1", "identityCommitment": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Transaction reverted on-chain");
    assert_eq!(body["data"]["transaction"]["status"], "reverted");
}

#[tokio::test]
async fn reverted_create_group_is_server_error() {
    let stub = Arc::new(StubChainClient::new());
    stub.revert_writes(true);

    let (status, body) = send(app(&stub), Method::POST, &api("/groups"), Some(json!({}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to create group");
}

#[tokio::test]
async fn remove_member_forwards_siblings_in_order() {
    let stub = Arc::new(StubChainClient::new());
    let (status, _) = send(
        app(&stub),
        Method::DELETE,
        &api("/members"),
        Some(json!({
            "groupId": "1",
            "identityCommitment": "5",
            "merkleProofSiblings": ["30", "10", "20"],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let writes = stub.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].signature, REMOVE_MEMBER);
    assert_eq!(
        writes[0].args[2],
        Token::Array(vec![
            Token::Uint(30u64.into()),
            Token::Uint(10u64.into()),
            Token::Uint(20u64.into()),
        ])
    );
}

#[tokio::test]
async fn update_member_reports_every_violation() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(app(&stub), Method::PUT, &api("/members"), Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["data"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["groupId", "identityCommitment", "newIdentityCommitment", "merkleProofSiblings"]
    );
}

#[tokio::test]
async fn update_member_returns_old_and_new() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::PUT,
        &api("/members"),
        Some(json!({
            "groupId": "1",
            "identityCommitment": "5",
            "newIdentityCommitment": "6",
            "merkleProofSiblings": ["1"],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["oldIdentityCommitment"], "5");
    assert_eq!(body["data"]["newIdentityCommitment"], "6");
}

#[tokio::test]
async fn malformed_json_names_body() {
    let stub = Arc::new(StubChainClient::new());
    let request = Request::builder()
        .method(Method::POST)
        .uri(api("/members"))
        .header("content-type", "application/json")
        .body(Body::from("{\"groupId\": "))
        .unwrap();

    let response = app(&stub).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["details"][0]["field"], "body");
}

#[tokio::test]
async fn group_info_and_not_found() {
    let admin = Address::from_low_u64_be(0xbeef);
    let stub = Arc::new(
        StubChainClient::new()
            .with_read(GET_GROUP_ADMIN, vec![Token::Address(admin)])
            .with_read(GET_MERKLE_TREE_DEPTH, vec![Token::Uint(20u64.into())]),
    );

    let (status, body) = send(app(&stub), Method::GET, &api("/groups/7"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "7");
    assert_eq!(body["data"]["merkleTreeDepth"], "20");
    assert_eq!(body["data"]["merkleTreeSize"], "0");
    assert_eq!(
        body["data"]["admin"],
        ethers::utils::to_checksum(&admin, None)
    );

    let empty = Arc::new(StubChainClient::new());
    let (status, body) = send(app(&empty), Method::GET, &api("/groups/7"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn group_id_path_must_be_decimal() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(app(&stub), Method::GET, &api("/groups/0x10"), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["details"][0]["field"], "groupId");
}

#[tokio::test]
async fn group_counter() {
    let stub = Arc::new(StubChainClient::new());
    stub.set_group_counter(U256::from(12u64));

    let (status, body) = send(app(&stub), Method::GET, &api("/groups/counter"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalGroups"], "12");
    assert_eq!(body["data"]["nextGroupId"], "12");
}

#[tokio::test]
async fn group_admin_lifecycle() {
    let stub = Arc::new(StubChainClient::new());
    let new_admin = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

    let (status, body) = send(
        app(&stub),
        Method::PUT,
        &api("/groups/3/admin"),
        Some(json!({"newAdmin": new_admin})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["newAdmin"], new_admin);

    let (status, body) = send(app(&stub), Method::POST, &api("/groups/3/accept-admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["groupId"], "3");
    assert_eq!(stub.writes().len(), 2);
}

#[tokio::test]
async fn update_merkle_tree_duration() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::PUT,
        &api("/groups/3/merkle-tree-duration"),
        Some(json!({"newMerkleTreeDuration": "7200"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["newMerkleTreeDuration"], "7200");
    assert_eq!(stub.writes()[0].signature, UPDATE_GROUP_MERKLE_TREE_DURATION);
}

#[tokio::test]
async fn verify_proof_reads_without_transaction() {
    let stub = Arc::new(StubChainClient::new().with_read(VERIFY_PROOF, vec![Token::Bool(true)]));
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/proofs/verify"),
        Some(json!({"groupId": "1", "proof": proof(8)})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isValid"], true);
    assert_eq!(body["data"]["proof"]["nullifier"], "7");
    assert!(stub.writes().is_empty());
}

#[tokio::test]
async fn validate_proof_submits_transaction() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/proofs/validate"),
        Some(json!({"groupId": "1", "proof": proof(8)})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["scope"], "9");
    assert_eq!(body["data"]["transaction"]["status"], "success");
    assert_eq!(stub.writes().len(), 1);
}

#[tokio::test]
async fn proof_needs_eight_points() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/proofs/validate"),
        Some(json!({"groupId": "1", "proof": proof(7)})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["details"][0]["field"], "proof.points");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn estimation_revert_is_bad_request() {
    let stub = Arc::new(StubChainClient::new());
    stub.fail_writes(StubFailure::Reverted("execution reverted: Semaphore__GroupDoesNotExist()".into()));

    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/members"),
        Some(json!({"groupId": "99", "identityCommitment": "1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Semaphore__GroupDoesNotExist"));
}

#[tokio::test]
async fn transport_failure_hides_detail() {
    let stub = Arc::new(StubChainClient::new());
    stub.fail_reads(StubFailure::Transport("connection refused to 10.1.2.3:8545".into()));

    let (status, body) = send(app(&stub), Method::GET, &api("/verifier"), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Blockchain request failed");
    assert!(!body.to_string().contains("10.1.2.3"));
}

#[tokio::test]
async fn confirmation_timeout_is_server_error() {
    let stub = Arc::new(StubChainClient::new());
    stub.fail_confirmations(StubFailure::Timeout);

    let (status, body) = send(
        app(&stub),
        Method::POST,
        &api("/members"),
        Some(json!({"groupId": "1", "identityCommitment": "1"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("not confirmed"));
}

#[tokio::test]
async fn verifier_and_account() {
    let verifier = Address::from_low_u64_be(0xfeed);
    let stub = Arc::new(StubChainClient::new().with_read(VERIFIER, vec![Token::Address(verifier)]));

    let (status, body) = send(app(&stub), Method::GET, &api("/verifier"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verifierAddress"], ethers::utils::to_checksum(&verifier, None));

    let (status, body) = send(app(&stub), Method::GET, &api("/account"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], "1000000000000000000");
    assert_eq!(body["data"]["chainId"], 31337);
}

#[tokio::test]
async fn health_is_served_at_root_and_base() {
    let stub = Arc::new(StubChainClient::new());

    for path in ["/health".to_string(), api("/health")] {
        let (status, body) = send(app(&stub), Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "healthy");
    }
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn unknown_route_is_enveloped_404() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(app(&stub), Method::GET, "/api/v2/nothing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn responses_carry_request_id() {
    let stub = Arc::new(StubChainClient::new());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app(&stub).oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

fn assert_error_envelope(body: &Value) {
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_i64());
    assert!(body.get("data").is_some());
}

#[tokio::test]
async fn oversized_body_is_enveloped() {
    let stub = Arc::new(StubChainClient::new());
    let config = ApiConfig {
        max_body_size: 1024,
        ..ApiConfig::default()
    };

    let (status, body) = send(
        app_with(&stub, config),
        Method::POST,
        &api("/members"),
        Some(json!({"groupId": "1", "identityCommitment": "1".repeat(4096)})),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_error_envelope(&body);
    assert_eq!(body["message"], "Request body too large");
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn wrong_method_is_enveloped() {
    let stub = Arc::new(StubChainClient::new());
    let request = Request::builder()
        .method(Method::GET)
        .uri(api("/members"))
        .body(Body::empty())
        .unwrap();

    let response = app(&stub).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key("allow"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_error_envelope(&body);
    assert_eq!(body["message"], "Method not allowed");
}

#[tokio::test]
async fn request_timeout_is_server_error() {
    let stub = Arc::new(StubChainClient::new());
    stub.delay_confirmations(Duration::from_secs(10));
    let config = ApiConfig {
        request_timeout_secs: 1,
        ..ApiConfig::default()
    };

    let (status, body) = send(
        app_with(&stub, config),
        Method::POST,
        &api("/members"),
        Some(json!({"groupId": "1", "identityCommitment": "1"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(&body);
    assert_eq!(body["message"], "Request timed out");
}

#[tokio::test]
async fn undecodable_path_is_enveloped() {
    let stub = Arc::new(StubChainClient::new());
    let (status, body) = send(app(&stub), Method::GET, &api("/groups/%FF"), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
    assert!(stub.calls().is_empty());
}
