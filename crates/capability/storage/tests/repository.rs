//! 通用仓库契约：内存表 + 类型化过滤谓词。

use chrono::Utc;
use iot_storage::{Page, Record, Table, TagFilter, TagRecord};
use uuid::Uuid;

fn tag(id: i64, name: &str, owner: Uuid) -> TagRecord {
    let now = Utc::now();
    TagRecord {
        id,
        uuid: Uuid::new_v4(),
        name: name.to_string(),
        label: name.to_uppercase(),
        target: None,
        unit: None,
        multiplier: None,
        mask: None,
        graphed: false,
        channel_uuid: None,
        user_id: owner,
        device_id: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn insert_assigns_sequential_ids() {
    let table: Table<TagRecord> = Table::new();
    let owner = Uuid::new_v4();
    let first = table.insert(|id| tag(id, "a", owner));
    let second = table.insert(|id| tag(id, "b", owner));
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(table.get(1).expect("row").name, "a");
}

#[test]
fn find_matches_typed_predicates() {
    let table: Table<TagRecord> = Table::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    table.insert(|id| tag(id, "a", alice));
    table.insert(|id| tag(id, "b", alice));
    table.insert(|id| tag(id, "c", bob));

    assert_eq!(table.find(&TagFilter::Owner(alice)).len(), 2);
    assert_eq!(
        table
            .find_one(&TagFilter::Name("c".to_string()))
            .expect("row")
            .user_id,
        bob
    );
    // 无行不报错：None / 空列表
    assert!(table.find_one(&TagFilter::Name("zzz".to_string())).is_none());
    assert!(table.find(&TagFilter::Owner(Uuid::new_v4())).is_empty());
}

#[test]
fn unique_filters_are_declared_per_column() {
    // id/uuid/name 建立在唯一列上；owner/device 不是
    assert!(TagRecord::filter_is_unique(&TagFilter::Id(1)));
    assert!(TagRecord::filter_is_unique(&TagFilter::Uuid(Uuid::new_v4())));
    assert!(TagRecord::filter_is_unique(&TagFilter::Name("a".to_string())));
    assert!(!TagRecord::filter_is_unique(&TagFilter::Owner(Uuid::new_v4())));
    assert!(!TagRecord::filter_is_unique(&TagFilter::Device(1)));
}

#[test]
fn list_pages_in_id_order() {
    let table: Table<TagRecord> = Table::new();
    let owner = Uuid::new_v4();
    for name in ["a", "b", "c", "d", "e"] {
        table.insert(|id| tag(id, name, owner));
    }
    let page = table.list(Page::new(2, 2));
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "c");
    assert_eq!(page[1].name, "d");
    // 越界 offset 返回空
    assert!(table.list(Page::new(10, 99)).is_empty());
}

#[test]
fn update_applies_only_when_present() {
    let table: Table<TagRecord> = Table::new();
    let owner = Uuid::new_v4();
    let created = table.insert(|id| tag(id, "a", owner));

    let updated = table
        .update(created.id, |row| row.graphed = true)
        .expect("row");
    assert!(updated.graphed);
    assert!(table.update(99, |row| row.graphed = true).is_none());
}

#[test]
fn remove_returns_snapshot() {
    let table: Table<TagRecord> = Table::new();
    let owner = Uuid::new_v4();
    let created = table.insert(|id| tag(id, "a", owner));

    let removed = table.remove(created.id).expect("row");
    assert_eq!(removed.name, "a");
    assert!(table.get(created.id).is_none());
    assert!(table.remove(created.id).is_none());
}
