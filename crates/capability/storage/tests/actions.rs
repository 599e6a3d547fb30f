use domain::CallerContext;
use iot_storage::{
    ActionCreate, ActionStore, DeviceCreate, DeviceStore, InMemoryActionStore,
    InMemoryDeviceStore, StorageError,
};
use uuid::Uuid;

fn caller() -> CallerContext {
    CallerContext::new(Uuid::new_v4(), None, None)
}

fn stores() -> (InMemoryDeviceStore, InMemoryActionStore) {
    let device_store = InMemoryDeviceStore::new();
    let action_store = InMemoryActionStore::new(device_store.devices());
    (device_store, action_store)
}

async fn device_for(store: &InMemoryDeviceStore, user_id: Uuid) -> i64 {
    store
        .create_device(DeviceCreate {
            user_id: Some(user_id),
            organization_id: None,
            kind: "node".to_string(),
            name: None,
            metadata: None,
            is_configured: false,
            thing_uuid: None,
            thing_secret: None,
            parent_id: None,
        })
        .await
        .expect("device")
        .id
}

#[tokio::test]
async fn create_requires_device_ownership() {
    let (device_store, action_store) = stores();
    let owner = caller();
    let device_id = device_for(&device_store, owner.user_id).await;

    let created = action_store
        .create_action(
            &owner,
            ActionCreate {
                device_id,
                values: vec!["on".to_string(), "off".to_string()],
            },
        )
        .await
        .expect("create");
    assert_eq!(created.status, "pending");
    assert!(created.is_enabled);

    let err = action_store
        .create_action(
            &caller(),
            ActionCreate {
                device_id,
                values: vec![],
            },
        )
        .await
        .expect_err("foreign device");
    assert!(matches!(err, StorageError::PermissionDenied(_)));

    let err = action_store
        .create_action(
            &owner,
            ActionCreate {
                device_id: 9999,
                values: vec![],
            },
        )
        .await
        .expect_err("missing device");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn toggle_flips_through_device_chain() {
    let (device_store, action_store) = stores();
    let owner = caller();
    let device_id = device_for(&device_store, owner.user_id).await;
    let created = action_store
        .create_action(
            &owner,
            ActionCreate {
                device_id,
                values: vec!["restart".to_string()],
            },
        )
        .await
        .expect("create");

    let toggled = action_store
        .toggle_action(&owner, created.id)
        .await
        .expect("toggle");
    assert!(!toggled.is_enabled);
    let toggled = action_store
        .toggle_action(&owner, created.id)
        .await
        .expect("toggle back");
    assert!(toggled.is_enabled);

    // 设备链归属他人 → 403；缺失 → 404
    let err = action_store
        .toggle_action(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
    let err = action_store
        .toggle_action(&owner, 9999)
        .await
        .expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn get_and_delete_follow_device_chain() {
    let (device_store, action_store) = stores();
    let owner = caller();
    let device_id = device_for(&device_store, owner.user_id).await;
    let created = action_store
        .create_action(
            &owner,
            ActionCreate {
                device_id,
                values: vec!["calibrate".to_string()],
            },
        )
        .await
        .expect("create");

    let fetched = action_store.get_action(&owner, created.id).await.expect("get");
    assert_eq!(fetched.values, vec!["calibrate".to_string()]);

    let err = action_store
        .delete_action(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
    action_store
        .delete_action(&owner, created.id)
        .await
        .expect("delete");
    let err = action_store
        .get_action(&owner, created.id)
        .await
        .expect_err("gone");
    assert!(matches!(err, StorageError::NotFound(_)));
}
