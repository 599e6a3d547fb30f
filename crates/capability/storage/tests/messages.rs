use domain::CallerContext;
use iot_storage::{
    InMemoryMessageStore, InMemoryNotificationStore, MessageCreate, MessageFilter, MessageStore,
    NotificationCreate, NotificationStore, Page,
};
use uuid::Uuid;

fn caller() -> CallerContext {
    CallerContext::new(Uuid::new_v4(), None, None)
}

fn reading(tag_id: i64, user_id: Uuid, value: f64) -> MessageCreate {
    MessageCreate {
        channel_id: "channel-1".to_string(),
        publisher: "thing-1".to_string(),
        protocol: Some("http".to_string()),
        subtopic: None,
        base_name: "urn:dev:".to_string(),
        base_unit: "C".to_string(),
        base_value: 0.0,
        base_time: 1_700_000_000,
        name: "temperature".to_string(),
        unit: "C".to_string(),
        value,
        time: 1_700_000_100,
        string_value: None,
        bool_value: None,
        data_value: None,
        sum_value: None,
        device_id: Some(1),
        tag_id: Some(tag_id),
        user_id: Some(user_id),
    }
}

#[tokio::test]
async fn create_stamps_ownership_foreign_keys() {
    let store = InMemoryMessageStore::new();
    let ctx = caller();
    let created = store
        .create_message(reading(7, ctx.user_id, 21.5))
        .await
        .expect("create");
    assert_eq!(created.tag_id, Some(7));
    assert_eq!(created.user_id, Some(ctx.user_id));
    assert_eq!(created.channel_id, "channel-1");
    assert_eq!(created.value, 21.5);
}

#[tokio::test]
async fn list_by_typed_filter() {
    let store = InMemoryMessageStore::new();
    let ctx = caller();
    store
        .create_message(reading(1, ctx.user_id, 20.0))
        .await
        .expect("create");
    store
        .create_message(reading(1, ctx.user_id, 21.0))
        .await
        .expect("create");
    store
        .create_message(reading(2, ctx.user_id, 22.0))
        .await
        .expect("create");

    let by_tag = store
        .list_messages(MessageFilter::Tag(1))
        .await
        .expect("by tag");
    assert_eq!(by_tag.len(), 2);

    let by_channel = store
        .list_messages(MessageFilter::Channel("channel-1".to_string()))
        .await
        .expect("by channel");
    assert_eq!(by_channel.len(), 3);

    // 无行不报错：空列表
    let none = store
        .list_messages(MessageFilter::Tag(99))
        .await
        .expect("empty");
    assert!(none.is_empty());
}

#[tokio::test]
async fn notifications_filter_by_device_and_alert() {
    let store = InMemoryNotificationStore::new();
    let ctx = caller();
    for (device_id, alert_id) in [(Some(1), Some(10)), (Some(1), Some(11)), (Some(2), Some(10))] {
        store
            .create_notification(NotificationCreate {
                message: "threshold crossed".to_string(),
                level: "crit".to_string(),
                check_id: "check-1".to_string(),
                endpoint_id: "endpoint-1".to_string(),
                rule_id: "rule-1".to_string(),
                alert_id,
                device_id,
                user_id: Some(ctx.user_id),
            })
            .await
            .expect("create");
    }

    let all = store
        .list_notifications(&ctx, Page::default(), None, None)
        .await
        .expect("all");
    assert_eq!(all.len(), 3);

    let device_one = store
        .list_notifications(&ctx, Page::default(), Some(1), None)
        .await
        .expect("device");
    assert_eq!(device_one.len(), 2);

    let both = store
        .list_notifications(&ctx, Page::default(), Some(1), Some(10))
        .await
        .expect("both");
    assert_eq!(both.len(), 1);

    // 其他用户看不到，空结果按空列表返回（宽松策略）
    let foreign = store
        .list_notifications(&caller(), Page::default(), None, None)
        .await
        .expect("foreign");
    assert!(foreign.is_empty());
}
