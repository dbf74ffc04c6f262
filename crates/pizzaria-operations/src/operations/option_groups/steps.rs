use std::marker::PhantomData;
use std::sync::Arc;

use pizzaria_core::{OptionGroup, OptionItem};
use pizzaria_saga::SagaStep;
use pizzaria_store::{Collection, Filter, Ordering, RecordStore, StoreError};
use tracing::{debug, info};

use super::context::GroupSagaContext;
use super::saga_data::GroupSagaData;
use crate::OperationError;
use crate::records::{from_row, from_rows, item_row, to_row};

/// Unique violations on a group write mean the name is taken.
fn group_write_error(name: &str, action: String, source: StoreError) -> OperationError {
    if source.is_unique_violation() {
        OperationError::DuplicateGroupName {
            name: name.to_string(),
            source,
        }
    } else {
        OperationError::store(action, source)
    }
}

macro_rules! stateless_step {
    ($name:ident) => {
        pub struct $name<S: ?Sized> {
            _marker: PhantomData<fn() -> Arc<S>>,
        }

        impl<S: ?Sized> $name<S> {
            #[must_use]
            pub fn new() -> Self {
                Self {
                    _marker: PhantomData,
                }
            }
        }

        impl<S: ?Sized> Default for $name<S> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

stateless_step!(InsertGroupStep);
stateless_step!(UpdateGroupStep);
stateless_step!(DeleteItemsStep);
stateless_step!(InsertItemsStep);

impl<S> SagaStep for InsertGroupStep<S>
where
    S: RecordStore + ?Sized + 'static,
{
    type Input = GroupSagaData;
    type Output = GroupSagaData;
    type Context = GroupSagaContext<S>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "insert_option_group"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        mut input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let row = to_row(Collection::OptionGroups, &input.draft)?;
        let stored = ctx
            .store()
            .insert(Collection::OptionGroups, row)
            .map_err(|e| {
                group_write_error(&input.draft.name, "insert option group".to_string(), e)
            })?;
        let group: OptionGroup = from_row(Collection::OptionGroups, stored)?;

        info!(group_id = %group.id, name = %group.name, "inserted option group");
        input.group_id = Some(group.id);
        input.group = Some(group);
        Ok(input)
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        let group_id = output.group()?.id;
        debug!(%group_id, "deleting option group created by a failed write");
        ctx.store()
            .delete(
                Collection::OptionGroups,
                &Filter::eq("id", group_id.to_string()),
            )
            .map_err(|e| OperationError::store(format!("delete option group {group_id}"), e))?;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete the created option group".to_string()
    }
}

impl<S> SagaStep for UpdateGroupStep<S>
where
    S: RecordStore + ?Sized + 'static,
{
    type Input = GroupSagaData;
    type Output = GroupSagaData;
    type Context = GroupSagaContext<S>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "update_option_group"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        mut input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let group_id = input.target_id()?;
        let filter = Filter::eq("id", group_id.to_string());

        let previous = ctx
            .store()
            .select(Collection::OptionGroups, &filter, None)
            .map_err(|e| OperationError::store(format!("read option group {group_id}"), e))?
            .into_iter()
            .next()
            .ok_or(OperationError::GroupNotFound(group_id))?;
        input.previous_group = Some(from_row(Collection::OptionGroups, previous)?);

        let patch = to_row(Collection::OptionGroups, &input.draft)?;
        let updated = ctx
            .store()
            .update(Collection::OptionGroups, patch, &filter)
            .map_err(|e| {
                group_write_error(
                    &input.draft.name,
                    format!("update option group {group_id}"),
                    e,
                )
            })?
            .into_iter()
            .next()
            .ok_or(OperationError::GroupNotFound(group_id))?;

        info!(%group_id, name = %input.draft.name, "updated option group");
        input.group = Some(from_row(Collection::OptionGroups, updated)?);
        Ok(input)
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        let Some(previous) = output.previous_group else {
            return Ok(());
        };
        debug!(group_id = %previous.id, "restoring option group row");
        let patch = to_row(Collection::OptionGroups, &previous)?;
        ctx.store()
            .update(
                Collection::OptionGroups,
                patch,
                &Filter::eq("id", previous.id.to_string()),
            )
            .map_err(|e| OperationError::store(format!("restore option group {}", previous.id), e))?;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "restore the previous option group fields".to_string()
    }
}

impl<S> SagaStep for DeleteItemsStep<S>
where
    S: RecordStore + ?Sized + 'static,
{
    type Input = GroupSagaData;
    type Output = GroupSagaData;
    type Context = GroupSagaContext<S>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "delete_option_items"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        mut input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let group_id = input.target_id()?;
        let filter = Filter::eq("grupo_id", group_id.to_string());

        let rows = ctx
            .store()
            .select(Collection::OptionItems, &filter, Some(&Ordering::asc("ordem")))
            .map_err(|e| OperationError::store(format!("read items of option group {group_id}"), e))?;
        input.previous_items = from_rows(Collection::OptionItems, rows)?;

        let removed = ctx
            .store()
            .delete(Collection::OptionItems, &filter)
            .map_err(|e| {
                OperationError::store(format!("delete items of option group {group_id}"), e)
            })?;
        debug!(%group_id, removed, "deleted previous option items");
        Ok(input)
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        if output.previous_items.is_empty() {
            return Ok(());
        }
        let group_id = output.target_id()?;
        let rows = output
            .previous_items
            .iter()
            .map(|item: &OptionItem| to_row(Collection::OptionItems, item))
            .collect::<crate::Result<Vec<_>>>()?;
        debug!(%group_id, count = rows.len(), "reinserting previous option items");
        ctx.store()
            .insert_many(Collection::OptionItems, rows)
            .map_err(|e| {
                OperationError::store(
                    format!("reinsert previous items of option group {group_id}"),
                    e,
                )
            })?;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "reinsert the previous option items".to_string()
    }
}

impl<S> SagaStep for InsertItemsStep<S>
where
    S: RecordStore + ?Sized + 'static,
{
    type Input = GroupSagaData;
    type Output = GroupSagaData;
    type Context = GroupSagaContext<S>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "insert_option_items"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        mut input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let group_id = input.group()?.id;
        let rows = input
            .draft
            .items
            .iter()
            .map(|item| item_row(group_id, item))
            .collect::<crate::Result<Vec<_>>>()?;

        let stored = ctx
            .store()
            .insert_many(Collection::OptionItems, rows)
            .map_err(|e| {
                OperationError::store(format!("insert items of option group {group_id}"), e)
            })?;
        input.items = from_rows(Collection::OptionItems, stored)?;

        info!(%group_id, count = input.items.len(), "inserted option items");
        Ok(input)
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        let group_id = output.group()?.id;
        ctx.store()
            .delete(
                Collection::OptionItems,
                &Filter::eq("grupo_id", group_id.to_string()),
            )
            .map_err(|e| {
                OperationError::store(format!("delete items of option group {group_id}"), e)
            })?;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete the inserted option items".to_string()
    }
}

#[cfg(test)]
mod tests {
    use pizzaria_core::{GroupDraft, ItemDraft, SelectionMode};
    use pizzaria_store::{FaultInjectingStore, InMemoryStore, StoreErrorCode, StoreOp};

    use super::*;
    use crate::FailureKind;

    fn draft(name: &str, items: &[&str]) -> GroupDraft {
        GroupDraft {
            name: name.to_string(),
            selection_mode: SelectionMode::MultiOptional,
            min_selections: None,
            max_selections: Some(3),
            instruction: None,
            display_order: 0,
            active: true,
            items: items
                .iter()
                .enumerate()
                .map(|(i, name)| ItemDraft {
                    name: Some((*name).to_string()),
                    additional_price: 2.0,
                    original_product_id: None,
                    selected_by_default: false,
                    display_order: i32::try_from(i).expect("small index"),
                    active: true,
                })
                .collect(),
        }
    }

    fn context(store: InMemoryStore) -> GroupSagaContext<InMemoryStore> {
        GroupSagaContext::new(Arc::new(store))
    }

    #[test]
    fn insert_group_records_the_assigned_id() -> anyhow::Result<()> {
        let ctx = context(InMemoryStore::new());

        let data = InsertGroupStep::new()
            .execute(&ctx, GroupSagaData::for_new_group(draft("Adicionais", &[])))?;

        let group = data.group.expect("group recorded");
        assert_eq!(data.group_id, Some(group.id));
        assert_eq!(group.max_selections, Some(3));
        assert_eq!(ctx.store().count(Collection::OptionGroups), 1);
        Ok(())
    }

    #[test]
    fn insert_group_compensation_deletes_only_that_group() -> anyhow::Result<()> {
        let ctx = context(InMemoryStore::new());
        let step = InsertGroupStep::new();
        step.execute(&ctx, GroupSagaData::for_new_group(draft("Borda", &[])))?;
        let created = step.execute(&ctx, GroupSagaData::for_new_group(draft("Molho", &[])))?;

        step.compensate(&ctx, created)?;

        let remaining = ctx
            .store()
            .select(Collection::OptionGroups, &Filter::all(), None)?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["nome"], "Borda");
        Ok(())
    }

    #[test]
    fn duplicate_group_name_is_a_conflict() -> anyhow::Result<()> {
        let ctx = context(InMemoryStore::new());
        let step = InsertGroupStep::new();
        step.execute(&ctx, GroupSagaData::for_new_group(draft("Borda", &[])))?;

        let err = step
            .execute(&ctx, GroupSagaData::for_new_group(draft("Borda", &[])))
            .expect_err("name is taken");

        assert_eq!(err.kind(), FailureKind::Conflict);
        Ok(())
    }

    #[test]
    fn insert_items_attaches_the_group_id() -> anyhow::Result<()> {
        let ctx = context(InMemoryStore::new());
        let data = InsertGroupStep::new().execute(
            &ctx,
            GroupSagaData::for_new_group(draft("Adicionais", &["Bacon", "Milho"])),
        )?;
        let group_id = data.group_id.expect("group inserted");

        let data = InsertItemsStep::new().execute(&ctx, data)?;

        assert_eq!(data.items.len(), 2);
        assert!(data.items.iter().all(|item| item.group_id == group_id));
        Ok(())
    }

    #[test]
    fn insert_items_compensation_keeps_the_group() -> anyhow::Result<()> {
        let ctx = context(InMemoryStore::new());
        let step = InsertItemsStep::new();
        let data = InsertGroupStep::new().execute(
            &ctx,
            GroupSagaData::for_new_group(draft("Adicionais", &["Bacon", "Milho"])),
        )?;
        let data = step.execute(&ctx, data)?;
        assert_eq!(ctx.store().count(Collection::OptionItems), 2);

        step.compensate(&ctx, data)?;

        assert_eq!(ctx.store().count(Collection::OptionItems), 0);
        assert_eq!(ctx.store().count(Collection::OptionGroups), 1);
        Ok(())
    }

    #[test]
    fn insert_items_without_a_group_is_missing_state() {
        let ctx = context(InMemoryStore::new());

        let err = InsertItemsStep::new()
            .execute(&ctx, GroupSagaData::for_new_group(draft("Adicionais", &["Bacon"])))
            .expect_err("no group was written");

        assert!(matches!(err, OperationError::MissingSagaState(_)));
        assert_eq!(ctx.store().count(Collection::OptionItems), 0);
    }

    #[test]
    fn update_group_of_unknown_id_is_not_found() {
        let ctx = context(InMemoryStore::new());
        let missing = uuid::Uuid::new_v4();

        let err = UpdateGroupStep::new()
            .execute(
                &ctx,
                GroupSagaData::for_existing_group(missing, draft("Borda", &[])),
            )
            .expect_err("group does not exist");

        assert!(matches!(err, OperationError::GroupNotFound(id) if id == missing));
    }

    #[test]
    fn update_compensation_restores_previous_fields() -> anyhow::Result<()> {
        let ctx = context(InMemoryStore::new());
        let created = InsertGroupStep::new()
            .execute(&ctx, GroupSagaData::for_new_group(draft("Borda", &[])))?;
        let group_id = created.group_id.expect("group inserted");
        let step = UpdateGroupStep::new();

        let updated = step.execute(
            &ctx,
            GroupSagaData::for_existing_group(group_id, draft("Borda recheada", &[])),
        )?;
        step.compensate(&ctx, updated)?;

        let rows = ctx.store().select(
            Collection::OptionGroups,
            &Filter::eq("id", group_id.to_string()),
            None,
        )?;
        assert_eq!(rows[0]["nome"], "Borda");
        Ok(())
    }

    #[test]
    fn delete_items_compensation_reinserts_with_original_ids() -> anyhow::Result<()> {
        let ctx = context(InMemoryStore::new());
        let created = InsertGroupStep::new().execute(
            &ctx,
            GroupSagaData::for_new_group(draft("Adicionais", &["Bacon", "Milho"])),
        )?;
        let created = InsertItemsStep::new().execute(&ctx, created)?;
        let group_id = created.group_id.expect("group inserted");
        let step = DeleteItemsStep::new();

        let deleted = step.execute(
            &ctx,
            GroupSagaData::for_existing_group(group_id, draft("Adicionais", &[])),
        )?;
        assert_eq!(ctx.store().count(Collection::OptionItems), 0);
        step.compensate(&ctx, deleted)?;

        let rows = ctx
            .store()
            .select(Collection::OptionItems, &Filter::all(), None)?;
        let ids: Vec<_> = rows.iter().map(|row| row["id"].clone()).collect();
        let original: Vec<_> = created
            .items
            .iter()
            .map(|item| serde_json::Value::String(item.id.to_string()))
            .collect();
        assert_eq!(ids, original);
        Ok(())
    }

    #[test]
    fn failed_compensating_delete_names_the_group() -> anyhow::Result<()> {
        let store = FaultInjectingStore::new(InMemoryStore::new()).fail_next(
            StoreOp::Delete,
            Collection::OptionGroups,
            StoreErrorCode::Unavailable,
        );
        let ctx = GroupSagaContext::new(Arc::new(store));
        let step = InsertGroupStep::new();
        let created = step.execute(&ctx, GroupSagaData::for_new_group(draft("Borda", &[])))?;
        let group_id = created.group_id.expect("group inserted");

        let err = step.compensate(&ctx, created).expect_err("delete is failing");

        assert!(err.to_string().contains(&group_id.to_string()));
        Ok(())
    }
}
