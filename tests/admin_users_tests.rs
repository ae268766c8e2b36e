//! Integration tests for user administration.
//!
//! These tests drive the client against a mock admin API and verify the exact
//! requests sent for each operation: method, path, headers and body.

use keycloak_admin::{
    AdminConfig, FieldMapping, HttpError, KeycloakAdmin, ResourceError, ServerUrl,
};
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERS_PATH: &str = "/auth/admin/realms/realm-name/users";
const USER_PATH: &str = "/auth/admin/realms/realm-name/users/user-id";

/// Creates an admin client pointed at the mock server with a token set.
fn create_test_admin(server: &MockServer) -> KeycloakAdmin {
    let config = AdminConfig::builder()
        .server_url(ServerUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    let admin = KeycloakAdmin::new(config).unwrap();
    admin.set_token("some-token").unwrap();
    admin
}

/// Mounts a GET for the test user that must be hit exactly `times` times.
async fn mount_user_fetch(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path(USER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-id",
            "username": "my-username",
            "firstName": "my-first-name",
            "enabled": true
        })))
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Collection operations
// ============================================================================

#[tokio::test]
async fn test_create_sends_mapped_sorted_body_and_returns_location_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .and(header("Authorization", "Bearer some-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(
            r#"{"credentials":[{"some":"value"}],"email":"my-email","enabled":true,"firstName":"my-first-name","lastName":"my-last-name","username":"my-username"}"#,
        ))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", format!("{}{USERS_PATH}/new-id", server.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let users = admin.realms().by_name("realm-name").users();

    let id = users
        .create(&json!({
            "username": "my-username",
            "credentials": [{"some": "value"}],
            "first_name": "my-first-name",
            "last_name": "my-last-name",
            "email": "my-email",
            "enabled": true
        }))
        .await
        .unwrap();

    assert_eq!(id, "new-id");
}

#[tokio::test]
async fn test_create_reads_id_from_body_without_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/admin/realms/realm-name/groups"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "group-id"})))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let id = admin
        .realms()
        .by_name("realm-name")
        .groups()
        .create(&json!({"name": "admins"}))
        .await
        .unwrap();

    assert_eq!(id, "group-id");
}

#[tokio::test]
async fn test_create_without_identifier_is_unacknowledged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let result = admin
        .realms()
        .by_name("realm-name")
        .users()
        .create(&json!({"username": "my-username"}))
        .await;

    assert!(matches!(
        result,
        Err(ResourceError::CreateAcknowledgement { status: 201, .. })
    ));
}

#[tokio::test]
async fn test_create_conflict_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(
            ResponseTemplate::new(409).set_body_string(r#"{"errorMessage":"User exists"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let err = admin
        .realms()
        .by_name("realm-name")
        .users()
        .create(&json!({"username": "taken"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.body(), Some(r#"{"errorMessage":"User exists"}"#));
}

#[tokio::test]
async fn test_all_lists_collection_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(header("Authorization", "Bearer some-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "b", "username": "second"},
            {"id": "a", "username": "first"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let users = admin
        .realms()
        .by_name("realm-name")
        .users()
        .all(None)
        .await
        .unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], "b");
    assert_eq!(users[1]["id"], "a");
}

#[tokio::test]
async fn test_all_passes_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("search", "jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut query = HashMap::new();
    query.insert("search".to_string(), "jdoe".to_string());

    let users = admin
        .realms()
        .by_name("realm-name")
        .users()
        .all(Some(query))
        .await
        .unwrap();

    assert!(users.is_empty());
}

#[tokio::test]
async fn test_count_reads_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/count")))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let count = admin
        .realms()
        .by_name("realm-name")
        .users()
        .count(None)
        .await
        .unwrap();

    assert_eq!(count, 42);
}

// ============================================================================
// Item reads
// ============================================================================

#[tokio::test]
async fn test_get_fetches_item() {
    let server = MockServer::start().await;
    mount_user_fetch(&server, 1).await;

    let admin = create_test_admin(&server);
    let user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    let fields = user.get().await.unwrap();
    assert_eq!(fields["username"], "my-username");
    assert!(!user.state().is_loaded());
}

#[tokio::test]
async fn test_it_fetches_once() {
    let server = MockServer::start().await;
    mount_user_fetch(&server, 1).await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    assert_eq!(user.it().await.unwrap()["firstName"], "my-first-name");
    assert_eq!(user.it().await.unwrap()["username"], "my-username");
}

#[tokio::test]
async fn test_reload_fetches_again() {
    let server = MockServer::start().await;
    mount_user_fetch(&server, 2).await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    user.it().await.unwrap();
    user.set("email", "pending@example.com").unwrap();
    user.reload().await.unwrap();

    assert!(!user.state().is_dirty());
    assert!(user.state().get("email").is_none());
}

#[tokio::test]
async fn test_item_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/admin/realms/realm-name/users/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("missing")
        .unwrap();

    let err = user.it().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!user.state().is_loaded());
}

// ============================================================================
// Item writes
// ============================================================================

#[tokio::test]
async fn test_update_sends_dirty_fields_with_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(USER_PATH))
        .and(header("Authorization", "Bearer some-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(
            r#"{"credentials":[{"some":"value"}],"email":"my-email","enabled":true,"firstName":"my-first-name","id":"user-id","lastName":"my-last-name"}"#,
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(USER_PATH))
        .and(body_string(r#"{"id":"user-id"}"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    user.update(&json!({
        "credentials": [{"some": "value"}],
        "first_name": "my-first-name",
        "last_name": "my-last-name",
        "email": "my-email",
        "enabled": true
    }))
    .await
    .unwrap();

    assert!(!user.state().is_dirty());
    assert_eq!(user.state().get("lastName"), Some(&json!("my-last-name")));

    // Nothing assigned since the last flush
    user.update(&json!({})).await.unwrap();
}

#[tokio::test]
async fn test_update_after_load_sends_only_assigned_fields() {
    let server = MockServer::start().await;
    mount_user_fetch(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path(USER_PATH))
        .and(body_string(r#"{"enabled":false,"id":"user-id"}"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    user.it().await.unwrap();
    user.update(&json!({"enabled": false})).await.unwrap();

    assert_eq!(user.state().get("username"), Some(&json!("my-username")));
    assert_eq!(user.state().get("enabled"), Some(&json!(false)));
}

#[tokio::test]
async fn test_set_then_save() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(USER_PATH))
        .and(body_string(
            r#"{"emailVerified":true,"id":"user-id","requiredActions":["UPDATE_PASSWORD"]}"#,
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    user.set("email_verified", &true).unwrap();
    user.set("required_actions", &["UPDATE_PASSWORD"]).unwrap();
    user.save().await.unwrap();

    assert!(!user.state().is_dirty());
}

#[tokio::test]
async fn test_failed_update_leaves_state_and_token_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(USER_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();
    user.set("email", "kept@example.com").unwrap();
    let before = user.state().clone();

    let err = user
        .update(&json!({"first_name": "discarded"}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResourceError::Http(HttpError::Response(ref e)) if e.code == 500 && e.body == "boom"
    ));
    assert_eq!(user.state(), &before);
    assert!(user.state().get("firstName").is_none());
    assert_eq!(
        admin.auth().authorization().as_deref(),
        Some("Bearer some-token")
    );
}

#[tokio::test]
async fn test_update_rejects_identifier_reassignment_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    let result = user.update(&json!({"id": "other-id"})).await;
    assert!(matches!(
        result,
        Err(ResourceError::IdentifierReassignment { .. })
    ));
    assert!(!user.state().is_dirty());
}

#[tokio::test]
async fn test_delete_user() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(USER_PATH))
        .and(header("Authorization", "Bearer some-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap()
        .delete()
        .await
        .unwrap();
}

// ============================================================================
// Relationships
// ============================================================================

#[tokio::test]
async fn test_delete_group_leaves_state_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{USER_PATH}/groups/group-id")))
        .and(header("Authorization", "Bearer some-token"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let mut user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();
    user.set("email", "pending@example.com").unwrap();
    let before = user.state().clone();

    user.delete_group("group-id").await.unwrap();

    assert_eq!(user.state(), &before);
}

#[tokio::test]
async fn test_add_group_and_list_groups() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{USER_PATH}/groups/group-id")))
        .and(body_string("{}"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{USER_PATH}/groups")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "group-id", "name": "admins", "path": "/admins"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    user.add_group("group-id").await.unwrap();
    let groups = user.groups().await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "admins");
}

#[tokio::test]
async fn test_realm_role_mappings() {
    let server = MockServer::start().await;
    let mappings = format!("{USER_PATH}/role-mappings/realm");
    Mock::given(method("GET"))
        .and(path(mappings.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "r1", "name": "viewer"}])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(mappings.as_str()))
        .and(body_string(r#"[{"id":"r2","name":"editor"}]"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(mappings.as_str()))
        .and(body_string(r#"[{"id":"r1","name":"viewer"}]"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    let roles = user.realm_role_mappings().await.unwrap();
    assert_eq!(roles[0]["name"], "viewer");

    user.add_realm_roles(&[json!({"id": "r2", "name": "editor"})])
        .await
        .unwrap();
    user.delete_realm_roles(&[json!({"id": "r1", "name": "viewer"})])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_password() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{USER_PATH}/reset-password")))
        .and(body_string(
            r#"{"temporary":false,"type":"password","value":"s3cret"}"#,
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let user = admin
        .realms()
        .by_name("realm-name")
        .users()
        .by_id("user-id")
        .unwrap();

    user.reset_password(&json!({"type": "password", "value": "s3cret", "temporary": false}))
        .await
        .unwrap();
}

// ============================================================================
// Authentication and configuration
// ============================================================================

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    admin.clear_token();

    let result = admin
        .realms()
        .by_name("realm-name")
        .users()
        .all(None)
        .await;

    assert!(matches!(
        result,
        Err(ResourceError::Http(HttpError::InvalidRequest(_)))
    ));
}

#[tokio::test]
async fn test_replaced_token_applies_to_existing_nodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(header("Authorization", "Bearer rotated-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let users = admin.realms().by_name("realm-name").users();

    admin.set_token("rotated-token").unwrap();
    users.all(None).await.unwrap();
}

#[tokio::test]
async fn test_identity_mapping_sends_names_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/realm-name/users"))
        .and(body_string(r#"{"first_name":"x","username":"u"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = AdminConfig::builder()
        .server_url(ServerUrl::new(server.uri()).unwrap())
        .api_root("/admin")
        .field_mapping(FieldMapping::identity())
        .build()
        .unwrap();
    let admin = KeycloakAdmin::new(config).unwrap();
    admin.set_token("some-token").unwrap();

    let id = admin
        .realms()
        .by_name("realm-name")
        .users()
        .create(&json!({"username": "u", "first_name": "x"}))
        .await
        .unwrap();

    assert_eq!(id, "u1");
}

#[tokio::test]
async fn test_segments_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/admin/realms/my%20realm/users/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a/b"})))
        .expect(1)
        .mount(&server)
        .await;

    let admin = create_test_admin(&server);
    let user = admin
        .realms()
        .by_name("my realm")
        .users()
        .by_id("a/b")
        .unwrap();

    assert_eq!(user.get().await.unwrap()["id"], "a/b");
}
