use api_contract::{CreateDeviceRequest, CreateTagRequest, DeleteTagsRequest};

#[test]
fn create_device_request_is_camel_case() {
    let body = serde_json::json!({
        "kind": "node",
        "name": "soil-probe",
        "isConfigured": true,
        "parentId": 7
    });
    let request: CreateDeviceRequest = serde_json::from_value(body).expect("deserialize");
    assert_eq!(request.kind, "node");
    assert_eq!(request.is_configured, Some(true));
    assert_eq!(request.parent_id, Some(7));
}

#[test]
fn create_tag_request_optional_fields_default() {
    let body = serde_json::json!({
        "name": "temp1",
        "label": "Temperature"
    });
    let request: CreateTagRequest = serde_json::from_value(body).expect("deserialize");
    assert!(request.device_id.is_none());
    assert!(request.graphed.is_none());
    assert!(request.mask.is_none());
}

#[test]
fn delete_tags_request_reads_id_list() {
    let body = serde_json::json!({ "tagIds": [1, 2, 3] });
    let request: DeleteTagsRequest = serde_json::from_value(body).expect("deserialize");
    assert_eq!(request.tag_ids, vec![1, 2, 3]);
}
