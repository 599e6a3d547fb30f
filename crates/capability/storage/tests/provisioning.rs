//! 端到端建档场景：组织 → 分组 → 用户 → 设备 → 标签 → 列表。

use domain::CallerContext;
use iot_storage::{
    DeviceCreate, DeviceStore, GroupStore, InMemoryDeviceStore, InMemoryGroupStore,
    InMemoryOrganizationStore, InMemoryTagStore, InMemoryUserStore, OrganizationStore, Page,
    TagCreate, TagStore, UserCreate, UserStore,
};

#[tokio::test]
async fn provision_org_group_user_device_tag_then_list() {
    let organization_store = InMemoryOrganizationStore::new();
    let group_store = InMemoryGroupStore::new();
    let user_store = InMemoryUserStore::new();
    let device_store = InMemoryDeviceStore::new();
    let tag_store = InMemoryTagStore::new(device_store.devices());

    let organization = organization_store
        .create_organization("Acme")
        .await
        .expect("organization");
    let group = group_store
        .create_group("Ops", Some(organization.id))
        .await
        .expect("group");
    let user = user_store
        .create_user(UserCreate {
            email: "ops@acme.example".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            organization_id: Some(organization.id),
            group_id: Some(group.id),
        })
        .await
        .expect("user");

    let ctx = CallerContext::new(user.id, user.organization_id, user.group_id);
    let device = device_store
        .create_device(DeviceCreate {
            user_id: Some(user.id),
            organization_id: Some(organization.id),
            kind: "node".to_string(),
            name: Some("field-node".to_string()),
            metadata: None,
            is_configured: false,
            thing_uuid: None,
            thing_secret: None,
            parent_id: None,
        })
        .await
        .expect("device");

    tag_store
        .create_tag(
            &ctx,
            TagCreate {
                name: "temp1".to_string(),
                label: "Temperature".to_string(),
                target: None,
                unit: Some("C".to_string()),
                multiplier: None,
                mask: None,
                graphed: true,
                channel_uuid: None,
                device_id: Some(device.id),
            },
        )
        .await
        .expect("tag");

    let tags = tag_store
        .list_tags(&ctx, Page::default(), Some(device.id))
        .await
        .expect("list");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "temp1");
    assert_eq!(tags[0].user_id, user.id);
    assert_eq!(tags[0].device_id, Some(device.id));
}
