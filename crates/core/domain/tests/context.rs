use domain::{AlertState, CallerContext, DeviceKind};
use uuid::Uuid;

#[test]
fn caller_context_builds() {
    let user_id = Uuid::new_v4();
    let ctx = CallerContext::new(user_id, Some(1), Some(2));

    assert_eq!(ctx.user_id, user_id);
    assert_eq!(ctx.organization_id, Some(1));
    assert_eq!(ctx.group_id, Some(2));
}

#[test]
fn default_context_is_nil() {
    let ctx = CallerContext::default();
    assert!(ctx.user_id.is_nil());
    assert!(ctx.organization_id.is_none());
}

#[test]
fn kinds_round_trip_strings() {
    assert_eq!("gateway".parse::<DeviceKind>().expect("kind"), DeviceKind::Gateway);
    assert_eq!(DeviceKind::Node.as_str(), "node");
    assert!("router".parse::<DeviceKind>().is_err());
    assert_eq!("enabled".parse::<AlertState>().expect("state"), AlertState::Enabled);
}
