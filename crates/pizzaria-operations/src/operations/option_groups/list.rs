use std::collections::HashMap;
use std::sync::Arc;

use pizzaria_core::{GroupWithItems, OptionGroup, OptionItem};
use pizzaria_store::{Collection, Filter, Ordering, RecordStore};
use uuid::Uuid;

use crate::records::from_rows;
use crate::{OperationError, Result};

/// Every group with its items, as the storefront shows them.
pub struct ListGroupsOperation<S: ?Sized> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> ListGroupsOperation<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Groups are ordered by display order, then name. A group whose items
    /// were never written is returned with an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn execute(&self) -> Result<Vec<GroupWithItems>> {
        let rows = self
            .store
            .select(
                Collection::OptionGroups,
                &Filter::all(),
                Some(&Ordering::asc("nome")),
            )
            .map_err(|e| OperationError::store("list option groups", e))?;
        let mut groups: Vec<OptionGroup> = from_rows(Collection::OptionGroups, rows)?;
        groups.sort_by_key(|group| group.display_order);

        let rows = self
            .store
            .select(Collection::OptionItems, &Filter::all(), None)
            .map_err(|e| OperationError::store("list option items", e))?;
        let mut items_by_group: HashMap<Uuid, Vec<OptionItem>> = HashMap::new();
        for item in from_rows::<OptionItem>(Collection::OptionItems, rows)? {
            items_by_group.entry(item.group_id).or_default().push(item);
        }

        Ok(groups
            .into_iter()
            .map(|group| {
                let items = items_by_group.remove(&group.id).unwrap_or_default();
                GroupWithItems::new(group, items)
            })
            .collect())
    }
}

pub struct GetGroupOperation<S: ?Sized> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> GetGroupOperation<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns `OperationError::GroupNotFound` for an unknown id.
    pub fn execute(&self, group_id: Uuid) -> Result<GroupWithItems> {
        let rows = self
            .store
            .select(
                Collection::OptionGroups,
                &Filter::eq("id", group_id.to_string()),
                None,
            )
            .map_err(|e| OperationError::store(format!("read option group {group_id}"), e))?;
        let group = from_rows::<OptionGroup>(Collection::OptionGroups, rows)?
            .into_iter()
            .next()
            .ok_or(OperationError::GroupNotFound(group_id))?;

        let rows = self
            .store
            .select(
                Collection::OptionItems,
                &Filter::eq("grupo_id", group_id.to_string()),
                None,
            )
            .map_err(|e| OperationError::store(format!("read items of option group {group_id}"), e))?;
        Ok(GroupWithItems::new(
            group,
            from_rows(Collection::OptionItems, rows)?,
        ))
    }
}
