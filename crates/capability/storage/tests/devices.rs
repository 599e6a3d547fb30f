use domain::CallerContext;
use iot_storage::{DeviceCreate, DeviceStore, InMemoryDeviceStore, Page, StorageError};
use uuid::Uuid;

fn caller() -> CallerContext {
    CallerContext::new(Uuid::new_v4(), Some(1), None)
}

fn node(user_id: Option<Uuid>) -> DeviceCreate {
    DeviceCreate {
        user_id,
        organization_id: Some(1),
        kind: "node".to_string(),
        name: Some("soil-probe".to_string()),
        metadata: None,
        is_configured: false,
        thing_uuid: None,
        thing_secret: None,
        parent_id: None,
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let store = InMemoryDeviceStore::new();
    let ctx = caller();
    let created = store
        .create_device(node(Some(ctx.user_id)))
        .await
        .expect("create");

    let fetched = store.get_device(&ctx, created.id).await.expect("get");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.uuid, created.uuid);
    assert_eq!(fetched.name.as_deref(), Some("soil-probe"));
    assert_eq!(fetched.kind, "node");
    assert_eq!(fetched.user_id, Some(ctx.user_id));
}

#[tokio::test]
async fn get_missing_is_not_found_before_permission() {
    let store = InMemoryDeviceStore::new();
    let err = store.get_device(&caller(), 42).await.expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn get_foreign_device_is_permission_denied() {
    let store = InMemoryDeviceStore::new();
    let owner = caller();
    let created = store
        .create_device(node(Some(owner.user_id)))
        .await
        .expect("create");

    let err = store
        .get_device(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn list_devices_empty_is_not_found() {
    let store = InMemoryDeviceStore::new();
    let err = store
        .list_devices(&caller(), Page::default())
        .await
        .expect_err("empty");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn list_devices_only_returns_callers_rows() {
    let store = InMemoryDeviceStore::new();
    let alice = caller();
    let bob = caller();
    store
        .create_device(node(Some(alice.user_id)))
        .await
        .expect("create");
    store
        .create_device(node(Some(bob.user_id)))
        .await
        .expect("create");

    let devices = store
        .list_devices(&alice, Page::default())
        .await
        .expect("list");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].user_id, Some(alice.user_id));
}

#[tokio::test]
async fn metadata_replace_is_wholesale() {
    let store = InMemoryDeviceStore::new();
    let ctx = caller();
    let mut input = node(Some(ctx.user_id));
    input.metadata = Some(serde_json::json!({ "longitude": 13.4, "latitude": 52.5 }));
    let created = store.create_device(input).await.expect("create");

    let updated = store
        .update_metadata(&ctx, created.id, serde_json::json!({ "floor": 3 }))
        .await
        .expect("update");
    // 不做合并：旧键消失
    assert_eq!(updated.metadata, Some(serde_json::json!({ "floor": 3 })));
}

#[tokio::test]
async fn metadata_update_checks_owner_after_presence() {
    let store = InMemoryDeviceStore::new();
    let owner = caller();
    let created = store
        .create_device(node(Some(owner.user_id)))
        .await
        .expect("create");

    let err = store
        .update_metadata(&caller(), created.id, serde_json::json!({}))
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));

    let err = store
        .update_metadata(&owner, 404, serde_json::json!({}))
        .await
        .expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn link_claims_exactly_once() {
    let store = InMemoryDeviceStore::new();
    let unclaimed = store.create_device(node(None)).await.expect("create");

    let alice = caller();
    let linked = store.link_to_user(&alice, unclaimed.id).await.expect("link");
    assert_eq!(linked.user_id, Some(alice.user_id));

    // 第二次认领（无论本人还是他人）都被拒绝
    let err = store
        .link_to_user(&alice, unclaimed.id)
        .await
        .expect_err("relink");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
    let err = store
        .link_to_user(&caller(), unclaimed.id)
        .await
        .expect_err("steal");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn link_missing_is_not_found() {
    let store = InMemoryDeviceStore::new();
    let err = store.link_to_user(&caller(), 7).await.expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn delete_revalidates_ownership() {
    let store = InMemoryDeviceStore::new();
    let owner = caller();
    let created = store
        .create_device(node(Some(owner.user_id)))
        .await
        .expect("create");

    let err = store
        .delete_device(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));

    store.delete_device(&owner, created.id).await.expect("delete");
    let err = store.get_device(&owner, created.id).await.expect_err("gone");
    assert!(matches!(err, StorageError::NotFound(_)));
}
