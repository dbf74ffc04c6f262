use pizzaria_core::{GroupDraft, OptionGroup, OptionItem};
use uuid::Uuid;

use crate::{OperationError, Result};

/// State threaded through an option group saga.
///
/// Each step fills in what it wrote, and the same value comes back to the step
/// on compensation, so the undo knows exactly which rows to touch.
#[derive(Debug, Clone)]
pub struct GroupSagaData {
    /// Target of an update; `None` when a new group is being created.
    pub group_id: Option<Uuid>,
    pub draft: GroupDraft,

    pub group: Option<OptionGroup>,
    pub items: Vec<OptionItem>,

    pub previous_group: Option<OptionGroup>,
    pub previous_items: Vec<OptionItem>,
}

impl GroupSagaData {
    #[must_use]
    pub fn for_new_group(draft: GroupDraft) -> Self {
        Self {
            group_id: None,
            draft,
            group: None,
            items: Vec::new(),
            previous_group: None,
            previous_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn for_existing_group(group_id: Uuid, draft: GroupDraft) -> Self {
        Self {
            group_id: Some(group_id),
            ..Self::for_new_group(draft)
        }
    }

    pub(crate) fn group(&self) -> Result<&OptionGroup> {
        self.group
            .as_ref()
            .ok_or(OperationError::MissingSagaState("the written option group"))
    }

    pub(crate) fn target_id(&self) -> Result<Uuid> {
        self.group_id
            .ok_or(OperationError::MissingSagaState("the target group id"))
    }
}
