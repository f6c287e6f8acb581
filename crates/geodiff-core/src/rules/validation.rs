use serde::{Deserialize, Serialize};

use crate::model::{ChangeAction, EntitySnapshot, EntityType};

/// Why a claimed action contradicts the stored entity state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidActionReason {
    /// Create for an entity that is already stored
    AlreadyExists,
    /// Modify or Delete for an entity with no stored version
    DoesNotExist,
    /// Modify whose version does not directly follow the stored one
    WrongVersion { existing: i64, new: i64 },
}

/// A validation failure naming the entity and the rule it broke
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidAction {
    pub action: ChangeAction,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub reason: InvalidActionReason,
}

impl std::fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} - ", self.entity_type, self.entity_id)?;
        match (self.action, self.reason) {
            (_, InvalidActionReason::AlreadyExists) => {
                f.write_str("Trying to create entity that already exists!")
            }
            (ChangeAction::Delete, InvalidActionReason::DoesNotExist) => {
                f.write_str("Trying to delete entity that does not exist!")
            }
            (_, InvalidActionReason::DoesNotExist) => {
                f.write_str("Trying to modify entity that does not exist!")
            }
            (_, InvalidActionReason::WrongVersion { existing, new }) => write!(
                f,
                "Trying to modify entity with wrong version (existing = {}, new = {})",
                existing, new
            ),
        }
    }
}

/// Outcome of validating one change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionVerdict {
    Valid,
    Invalid(InvalidAction),
}

impl ActionVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ActionVerdict::Valid)
    }
}

/// Decide the verdict from the stored version (if any) and the new version.
///
/// Total over all inputs.
pub fn classify_action(
    action: ChangeAction,
    existing_version: Option<i64>,
    new_version: i64,
) -> Option<InvalidActionReason> {
    match (action, existing_version) {
        (ChangeAction::Create, Some(_)) => Some(InvalidActionReason::AlreadyExists),
        (ChangeAction::Create, None) => None,
        (ChangeAction::Modify, None) | (ChangeAction::Delete, None) => {
            Some(InvalidActionReason::DoesNotExist)
        }
        (ChangeAction::Modify, Some(existing)) if existing.checked_add(1) != Some(new_version) => {
            Some(InvalidActionReason::WrongVersion {
                existing,
                new: new_version,
            })
        }
        (ChangeAction::Modify, Some(_)) | (ChangeAction::Delete, Some(_)) => None,
    }
}

/// Check that `action` is consistent with the entity's last known version.
///
/// The verdict is data; applying the invalid-actions policy is the caller's
/// concern (see [`crate::policy::InvalidActionsMode`]).
pub fn validate_action(
    action: ChangeAction,
    previous: Option<&EntitySnapshot>,
    next: &EntitySnapshot,
) -> ActionVerdict {
    match classify_action(action, previous.map(|p| p.version), next.version) {
        None => ActionVerdict::Valid,
        Some(reason) => ActionVerdict::Invalid(InvalidAction {
            action,
            entity_type: next.entity_type,
            entity_id: next.entity_id,
            reason,
        }),
    }
}
