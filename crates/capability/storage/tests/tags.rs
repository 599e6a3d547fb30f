use domain::CallerContext;
use iot_storage::{
    DeviceCreate, DeviceStore, InMemoryDeviceStore, InMemoryTagStore, Page, StorageError,
    TagCreate, TagStore,
};
use uuid::Uuid;

fn caller() -> CallerContext {
    CallerContext::new(Uuid::new_v4(), None, None)
}

fn stores() -> (InMemoryDeviceStore, InMemoryTagStore) {
    let device_store = InMemoryDeviceStore::new();
    let tag_store = InMemoryTagStore::new(device_store.devices());
    (device_store, tag_store)
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

fn tag(name: &str, device_id: Option<i64>) -> TagCreate {
    TagCreate {
        name: name.to_string(),
        label: name.to_uppercase(),
        target: None,
        unit: Some("C".to_string()),
        multiplier: Some(0.1),
        mask: None,
        graphed: false,
        channel_uuid: None,
        device_id,
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let (device_store, tag_store) = stores();
    let ctx = caller();
    let device_id = device_for(&device_store, ctx.user_id).await;
    let created = tag_store
        .create_tag(&ctx, tag("temp1", Some(device_id)))
        .await
        .expect("create");

    let fetched = tag_store.get_tag(&ctx, created.id).await.expect("get");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "temp1");
    assert_eq!(fetched.user_id, ctx.user_id);
    assert_eq!(fetched.device_id, Some(device_id));
}

#[tokio::test]
async fn tag_name_must_be_unique() {
    let (_, tag_store) = stores();
    let ctx = caller();
    tag_store
        .create_tag(&ctx, tag("temp1", None))
        .await
        .expect("create");
    let err = tag_store
        .create_tag(&ctx, tag("temp1", None))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StorageError::BadRequest(_)));
}

#[tokio::test]
async fn create_on_foreign_device_is_denied() {
    let (device_store, tag_store) = stores();
    let owner = caller();
    let device_id = device_for(&device_store, owner.user_id).await;

    let err = tag_store
        .create_tag(&caller(), tag("temp1", Some(device_id)))
        .await
        .expect_err("foreign device");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn bulk_create_is_atomic() {
    let (device_store, tag_store) = stores();
    let ctx = caller();
    let device_id = device_for(&device_store, ctx.user_id).await;
    tag_store
        .create_tag(&ctx, tag("taken", None))
        .await
        .expect("create");

    // 第二条与既有名称冲突：整批不落库
    let err = tag_store
        .create_tags(
            &ctx,
            vec![tag("fresh", Some(device_id)), tag("taken", Some(device_id))],
        )
        .await
        .expect_err("batch");
    assert!(matches!(err, StorageError::BadRequest(_)));
    let err = tag_store
        .list_tags(&ctx, Page::default(), Some(device_id))
        .await
        .expect_err("nothing persisted");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn bulk_create_rejects_duplicates_within_batch() {
    let (_, tag_store) = stores();
    let ctx = caller();
    let err = tag_store
        .create_tags(&ctx, vec![tag("dup", None), tag("dup", None)])
        .await
        .expect_err("batch dup");
    assert!(matches!(err, StorageError::BadRequest(_)));
}

#[tokio::test]
async fn list_with_device_filter_checks_device_ownership() {
    let (device_store, tag_store) = stores();
    let owner = caller();
    let device_id = device_for(&device_store, owner.user_id).await;
    tag_store
        .create_tag(&owner, tag("temp1", Some(device_id)))
        .await
        .expect("create");

    // 设备归属他人 → 403，设备不存在 → 403
    let err = tag_store
        .list_tags(&caller(), Page::default(), Some(device_id))
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
    let err = tag_store
        .list_tags(&owner, Page::default(), Some(9999))
        .await
        .expect_err("missing device");
    assert!(matches!(err, StorageError::PermissionDenied(_)));

    let tags = tag_store
        .list_tags(&owner, Page::default(), Some(device_id))
        .await
        .expect("list");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "temp1");
}

#[tokio::test]
async fn list_empty_is_not_found() {
    let (_, tag_store) = stores();
    let err = tag_store
        .list_tags(&caller(), Page::default(), None)
        .await
        .expect_err("empty");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn set_graphed_flips_flag_with_ownership() {
    let (_, tag_store) = stores();
    let ctx = caller();
    let created = tag_store
        .create_tag(&ctx, tag("temp1", None))
        .await
        .expect("create");
    assert!(!created.graphed);

    let updated = tag_store
        .set_graphed(&ctx, created.id, true)
        .await
        .expect("update");
    assert!(updated.graphed);

    let err = tag_store
        .set_graphed(&caller(), created.id, false)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
}

#[tokio::test]
async fn bulk_delete_discloses_partial_count() {
    let (_, tag_store) = stores();
    let alice = caller();
    let bob = caller();
    let t1 = tag_store.create_tag(&alice, tag("t1", None)).await.expect("t1");
    let t2 = tag_store.create_tag(&bob, tag("t2", None)).await.expect("t2");
    let t3 = tag_store.create_tag(&alice, tag("t3", None)).await.expect("t3");

    let err = tag_store
        .delete_tags(&alice, &[t1.id, t2.id, t3.id])
        .await
        .expect_err("partial");
    match err {
        StorageError::PartialDelete { requested, deleted } => {
            assert_eq!(requested, 3);
            assert_eq!(deleted, 2);
        }
        other => panic!("expected PartialDelete, got {other:?}"),
    }

    // 他人的行未被删除；调用方命中的行已删
    tag_store.get_tag(&bob, t2.id).await.expect("bob keeps t2");
    let err = tag_store.get_tag(&alice, t1.id).await.expect_err("t1 gone");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn bulk_delete_full_match_succeeds() {
    let (_, tag_store) = stores();
    let ctx = caller();
    let t1 = tag_store.create_tag(&ctx, tag("t1", None)).await.expect("t1");
    let t2 = tag_store.create_tag(&ctx, tag("t2", None)).await.expect("t2");

    let deleted = tag_store
        .delete_tags(&ctx, &[t1.id, t2.id])
        .await
        .expect("delete");
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn delete_single_checks_presence_then_owner() {
    let (_, tag_store) = stores();
    let ctx = caller();
    let created = tag_store
        .create_tag(&ctx, tag("t1", None))
        .await
        .expect("create");

    let err = tag_store.delete_tag(&ctx, 9999).await.expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));
    let err = tag_store
        .delete_tag(&caller(), created.id)
        .await
        .expect_err("foreign");
    assert!(matches!(err, StorageError::PermissionDenied(_)));
    tag_store.delete_tag(&ctx, created.id).await.expect("delete");
}
