use std::path::PathBuf;

use hausplan::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    for validation in [Error::EmptyMemberName, Error::NoMembers, Error::MissingTitleOrDate] {
        assert_eq!(validation.exit_code(), exit_codes::USER_ERROR);
        assert!(validation.is_validation());
    }

    let op = Error::OperationFailed("boom".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
    assert!(!op.is_validation());

    let lock = Error::LockFailed(PathBuf::from("/tmp/wohnheim-tracker.json.lock"));
    assert_eq!(lock.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn validation_messages_are_user_facing() {
    assert_eq!(Error::NoMembers.to_string(), "Create members first.");
    assert_eq!(
        Error::MissingTitleOrDate.to_string(),
        "Title and date are required."
    );
}

#[test]
fn json_error_includes_code() {
    let err = Error::MemberNotFound("Zoe".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert!(json.error.contains("Member not found"));
    assert_eq!(json.details, Some(serde_json::json!({ "member": "Zoe" })));
}
