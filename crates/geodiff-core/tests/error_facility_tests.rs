#![allow(clippy::unwrap_used, clippy::expect_used)]

use geodiff_core::errors::{ExError, ExErrorKind, GeoDiffError};
use geodiff_core::{ChangeAction, EntityType, InvalidAction, InvalidActionReason};

#[test]
fn test_missing_timestamp_names_entity() {
    let ex_err: ExError = GeoDiffError::MissingTimestamp {
        entity_type: EntityType::Line,
        entity_id: 31,
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingField);
    assert_eq!(ex_err.code(), "ERR_MISSING_FIELD");
    assert_eq!(ex_err.message(), "Entity(Line) 31 does not have a timestamp set.");
}

#[test]
fn test_wrong_version_reports_both_versions() {
    let invalid = InvalidAction {
        action: ChangeAction::Modify,
        entity_type: EntityType::Point,
        entity_id: 5,
        reason: InvalidActionReason::WrongVersion { existing: 2, new: 7 },
    };

    let ex_err: ExError = GeoDiffError::InvalidAction(invalid).into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidAction);
    assert_eq!(ex_err.op(), Some("validate_action"));
    assert!(ex_err.message().contains("existing = 2, new = 7"));
    assert!(ex_err.to_string().contains("(entity: Point 5)"));
}

#[test]
fn test_unknown_strings_are_invalid_input() {
    let parse_errors: Vec<ExError> = vec![
        "upsert".parse::<ChangeAction>().unwrap_err().into(),
        "area".parse::<EntityType>().unwrap_err().into(),
        "shout"
            .parse::<geodiff_core::InvalidActionsMode>()
            .unwrap_err()
            .into(),
    ];

    for err in parse_errors {
        assert_eq!(err.kind(), ExErrorKind::InvalidInput, "{err}");
    }
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::MissingField, "ERR_MISSING_FIELD"),
        (ExErrorKind::InvalidAction, "ERR_INVALID_ACTION"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::AlreadyExists, "ERR_ALREADY_EXISTS"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::ConstraintViolation, "ERR_CONSTRAINT_VIOLATION"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
