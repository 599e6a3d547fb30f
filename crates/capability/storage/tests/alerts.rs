use domain::CallerContext;
use iot_storage::{
    AlertCreate, AlertStore, DeviceCreate, DeviceStore, InMemoryAlertStore, InMemoryDeviceStore,
    Page, StorageError,
};
use uuid::Uuid;

fn caller() -> CallerContext {
    CallerContext::new(Uuid::new_v4(), None, None)
}

fn stores() -> (InMemoryDeviceStore, InMemoryAlertStore) {
    let device_store = InMemoryDeviceStore::new();
    let alert_store = InMemoryAlertStore::new(device_store.devices());
    (device_store, alert_store)
}

fn alert(name: &str, status: &str, device_id: Option<i64>) -> AlertCreate {
    AlertCreate {
        name: name.to_string(),
        comparator: "greater".to_string(),
        threshold: 30.5,
        status: status.to_string(),
        check_external_id: "check-1".to_string(),
        check_message_template: "${r._value} over threshold".to_string(),
        device_id,
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let (_, alert_store) = stores();
    let ctx = caller();
    let created = alert_store
        .create_alert(&ctx, alert("hot", "enabled", None))
        .await
        .expect("create");

    let fetched = alert_store.get_alert(&ctx, created.id).await.expect("get");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "hot");
    assert_eq!(fetched.comparator, "greater");
    assert_eq!(fetched.threshold, 30.5);
    assert_eq!(fetched.status, "enabled");
}

#[tokio::test]
async fn alert_name_must_be_unique() {
    let (_, alert_store) = stores();
    let ctx = caller();
    alert_store
        .create_alert(&ctx, alert("hot", "enabled", None))
        .await
        .expect("create");
    let err = alert_store
        .create_alert(&caller(), alert("hot", "disabled", None))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StorageError::BadRequest(_)));
}

#[tokio::test]
async fn get_missing_is_permission_denied() {
    // 此操作的检查顺序有意反转：缺失与归属他人同样报 403
    let (_, alert_store) = stores();
    let err = alert_store
        .get_alert(&caller(), 42)
        .await
        .expect_err("missing");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn get_foreign_is_permission_denied() {
    let (_, alert_store) = stores();
    let owner = caller();
    let created = alert_store
        .create_alert(&owner, alert("hot", "enabled", None))
        .await
        .expect("create");
    let err = alert_store
        .get_alert(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn enable_twice_is_conflict() {
    let (_, alert_store) = stores();
    let ctx = caller();
    let created = alert_store
        .create_alert(&ctx, alert("hot", "disabled", None))
        .await
        .expect("create");

    let enabled = alert_store
        .enable_alert(&ctx, created.id)
        .await
        .expect("enable");
    assert_eq!(enabled.status, "enabled");

    let err = alert_store
        .enable_alert(&ctx, created.id)
        .await
        .expect_err("second enable");
    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn disable_twice_is_conflict() {
    let (_, alert_store) = stores();
    let ctx = caller();
    let created = alert_store
        .create_alert(&ctx, alert("hot", "enabled", None))
        .await
        .expect("create");

    alert_store
        .disable_alert(&ctx, created.id)
        .await
        .expect("disable");
    let err = alert_store
        .disable_alert(&ctx, created.id)
        .await
        .expect_err("second disable");
    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn transition_checks_presence_then_owner_then_state() {
    let (_, alert_store) = stores();
    let owner = caller();
    let created = alert_store
        .create_alert(&owner, alert("hot", "enabled", None))
        .await
        .expect("create");

    let err = alert_store
        .enable_alert(&owner, 9999)
        .await
        .expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));

    // 归属检查先于幂等防护：他人即使迁移到同态也报 403
    let err = alert_store
        .enable_alert(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn list_filters_by_device_with_ownership() {
    let (device_store, alert_store) = stores();
    let ctx = caller();
    let device = device_store
        .create_device(DeviceCreate {
            user_id: Some(ctx.user_id),
            organization_id: None,
            kind: "gateway".to_string(),
            name: None,
            metadata: None,
            is_configured: false,
            thing_uuid: None,
            thing_secret: None,
            parent_id: None,
        })
        .await
        .expect("device");
    alert_store
        .create_alert(&ctx, alert("on-device", "enabled", Some(device.id)))
        .await
        .expect("create");
    alert_store
        .create_alert(&ctx, alert("elsewhere", "enabled", None))
        .await
        .expect("create");

    let alerts = alert_store
        .list_alerts(&ctx, Page::default(), Some(device.id))
        .await
        .expect("list");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].name, "on-device");

    let err = alert_store
        .list_alerts(&caller(), Page::default(), Some(device.id))
        .await
        .expect_err("foreign device");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn list_empty_is_not_found() {
    let (_, alert_store) = stores();
    let err = alert_store
        .list_alerts(&caller(), Page::default(), None)
        .await
        .expect_err("empty");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn delete_checks_presence_then_owner() {
    let (_, alert_store) = stores();
    let owner = caller();
    let created = alert_store
        .create_alert(&owner, alert("hot", "enabled", None))
        .await
        .expect("create");

    let err = alert_store
        .delete_alert(&owner, 9999)
        .await
        .expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));
    let err = alert_store
        .delete_alert(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
    alert_store
        .delete_alert(&owner, created.id)
        .await
        .expect("delete");
}
