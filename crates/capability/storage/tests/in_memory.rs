use iot_storage::{
    GroupStore, InMemoryGroupStore, InMemoryOrganizationStore, OrganizationStore, Page,
    StorageError,
};

#[tokio::test]
async fn organization_create_then_get_round_trips() {
    let store = InMemoryOrganizationStore::new();
    let created = store.create_organization("Acme").await.expect("create");

    let fetched = store
        .get_organization(created.id)
        .await
        .expect("query")
        .expect("organization");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Acme");
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn organization_name_must_be_unique() {
    let store = InMemoryOrganizationStore::new();
    store.create_organization("Acme").await.expect("create");
    let err = store
        .create_organization("Acme")
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StorageError::BadRequest(_)));
}

#[tokio::test]
async fn organization_list_paginates_in_id_order() {
    let store = InMemoryOrganizationStore::new();
    for name in ["a", "b", "c", "d"] {
        store.create_organization(name).await.expect("create");
    }
    let page = store
        .list_organizations(Page::new(2, 1))
        .await
        .expect("list");
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "b");
    assert_eq!(page[1].name, "c");
}

#[tokio::test]
async fn organization_update_and_delete_by_id() {
    let store = InMemoryOrganizationStore::new();
    let created = store.create_organization("Acme").await.expect("create");

    let updated = store
        .update_organization(created.id, "Acme Corp")
        .await
        .expect("update")
        .expect("organization");
    assert_eq!(updated.name, "Acme Corp");

    let removed = store
        .delete_organization(created.id)
        .await
        .expect("delete")
        .expect("organization");
    assert_eq!(removed.id, created.id);
    assert!(store
        .get_organization(created.id)
        .await
        .expect("query")
        .is_none());

    // 再删一次：返回 None 而不是错误
    assert!(store
        .delete_organization(created.id)
        .await
        .expect("delete")
        .is_none());
}

#[tokio::test]
async fn group_name_must_be_unique() {
    let store = InMemoryGroupStore::new();
    store.create_group("Ops", Some(1)).await.expect("create");
    let err = store
        .create_group("Ops", Some(2))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StorageError::BadRequest(_)));
}

#[tokio::test]
async fn group_update_missing_returns_none() {
    let store = InMemoryGroupStore::new();
    assert!(store
        .update_group(99, "renamed")
        .await
        .expect("update")
        .is_none());
    assert!(store.delete_group(99).await.expect("delete").is_none());
}
