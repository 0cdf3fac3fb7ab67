use serde_json::Value;
use todo::error::{exit_codes, Error, JsonError};

#[test]
fn exit_code_user_error() {
    for err in [
        Error::InvalidArgument("bad input".to_string()),
        Error::IndexOutOfRange { index: 4, len: 2 },
        Error::NothingToUndo,
        Error::NothingToRedo,
    ] {
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR, "{err}");
    }
}

#[test]
fn exit_code_operation_failed() {
    let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    assert_eq!(err.kind(), "operation_failed");

    let err = Error::from(serde_json::from_str::<Value>("{").unwrap_err());
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn details_include_index_and_len() {
    let err = Error::IndexOutOfRange { index: 4, len: 2 };
    let details = err.details().expect("details");
    assert_eq!(details["index"], Value::from(4));
    assert_eq!(details["len"], Value::from(2));
    assert_eq!(err.to_string(), "No task at index 4 (list has 2 tasks)");
}

#[test]
fn json_error_includes_details() {
    let err = Error::InvalidConfig("bad config".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert_eq!(json.kind, "user_error");
    let details = json.details.expect("details");
    assert_eq!(details["message"], Value::String("bad config".to_string()));
}

#[test]
fn json_error_omits_missing_details() {
    let json = JsonError::from(&Error::NothingToUndo);
    let value = serde_json::to_value(&json).expect("serialize");
    assert_eq!(value["message"], "Nothing to undo");
    assert!(value.get("details").is_none());
}
