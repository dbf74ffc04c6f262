use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::Result;
use crate::collection::Collection;
use crate::error::{StoreError, StoreErrorCode};
use crate::query::{Filter, Ordering, Row};
use crate::store::RecordStore;

type Tables = HashMap<Collection, Vec<Row>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnDelete {
    Cascade,
    Restrict,
}

#[derive(Debug)]
struct ForeignKey {
    column: &'static str,
    references: Collection,
    on_delete: OnDelete,
}

struct TableSchema {
    unique: &'static [&'static str],
    not_null: &'static [&'static str],
    foreign_keys: &'static [ForeignKey],
}

const ITEM_FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        column: "grupo_id",
        references: Collection::OptionGroups,
        on_delete: OnDelete::Cascade,
    },
    ForeignKey {
        column: "produto_original_id",
        references: Collection::Products,
        on_delete: OnDelete::Restrict,
    },
];

fn schema(collection: Collection) -> TableSchema {
    match collection {
        Collection::Products => TableSchema {
            unique: &["id"],
            not_null: &["nome", "preco"],
            foreign_keys: &[],
        },
        Collection::OptionGroups => TableSchema {
            unique: &["id", "nome"],
            not_null: &["nome", "tipo_selecao"],
            foreign_keys: &[],
        },
        Collection::OptionItems => TableSchema {
            unique: &["id"],
            not_null: &["grupo_id", "preco_adicional"],
            foreign_keys: ITEM_FOREIGN_KEYS,
        },
    }
}

fn column_defaults(collection: Collection) -> Vec<(&'static str, Value)> {
    match collection {
        Collection::Products => vec![("descricao", Value::Null), ("ativo", json!(true))],
        Collection::OptionGroups => vec![
            ("min_selecoes", Value::Null),
            ("max_selecoes", Value::Null),
            ("instrucao", Value::Null),
            ("ordem", json!(0)),
            ("ativo", json!(true)),
        ],
        Collection::OptionItems => vec![
            ("nome", Value::Null),
            ("preco_adicional", json!(0)),
            ("produto_original_id", Value::Null),
            ("selecionado_padrao", json!(false)),
            ("ordem", json!(0)),
            ("ativo", json!(true)),
        ],
    }
}

/// Foreign keys in other collections that point at `collection`.
fn referencing(collection: Collection) -> impl Iterator<Item = (Collection, &'static ForeignKey)> {
    Collection::ALL.into_iter().flat_map(move |child| {
        schema(child)
            .foreign_keys
            .iter()
            .filter(move |fk| fk.references == collection)
            .map(move |fk| (child, fk))
    })
}

fn rows_of(tables: &Tables, collection: Collection) -> &[Row] {
    tables.get(&collection).map_or(&[], Vec::as_slice)
}

fn present<'r>(row: &'r Row, column: &str) -> Option<&'r Value> {
    row.get(column).filter(|v| !v.is_null())
}

/// Process-local store with the hosted database's constraints.
///
/// Rows keep insertion order. Every write validates against a snapshot and is
/// applied whole or not at all.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self, collection: Collection) -> usize {
        rows_of(&self.tables.read(), collection).len()
    }

    fn prepare(collection: Collection, mut row: Row) -> Row {
        if present(&row, "id").is_none() {
            row.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
        }
        for (column, default) in column_defaults(collection) {
            row.entry(column).or_insert(default);
        }
        row
    }

    fn check_row(tables: &Tables, collection: Collection, row: &Row, others: &[&Row]) -> Result<()> {
        let table = collection.table_name();
        let schema = schema(collection);

        for column in schema.not_null {
            if present(row, column).is_none() {
                return Err(StoreError::new(
                    StoreErrorCode::NotNullViolation,
                    format!(
                        "null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"
                    ),
                ));
            }
        }

        for column in schema.unique {
            let Some(value) = present(row, column) else {
                continue;
            };
            if others.iter().any(|other| other.get(*column) == Some(value)) {
                return Err(StoreError::new(
                    StoreErrorCode::UniqueViolation,
                    format!(
                        "duplicate key value violates unique constraint \"{table}_{column}_key\""
                    ),
                ));
            }
        }

        for fk in schema.foreign_keys {
            let Some(value) = present(row, fk.column) else {
                continue;
            };
            let exists = rows_of(tables, fk.references)
                .iter()
                .any(|parent| parent.get("id") == Some(value));
            if !exists {
                return Err(StoreError::new(
                    StoreErrorCode::ForeignKeyViolation,
                    format!(
                        "insert or update on table \"{table}\" violates foreign key constraint \"{table}_{}_fkey\"",
                        fk.column
                    ),
                ));
            }
        }

        Ok(())
    }

    fn delete_matching(tables: &mut Tables, collection: Collection, filter: &Filter) -> Result<usize> {
        let (doomed, kept): (Vec<Row>, Vec<Row>) = tables
            .remove(&collection)
            .unwrap_or_default()
            .into_iter()
            .partition(|row| filter.matches(row));
        tables.insert(collection, kept);

        for row in &doomed {
            let Some(id) = present(row, "id").cloned() else {
                continue;
            };
            for (child, fk) in referencing(collection) {
                let child_filter = Filter::eq(fk.column, id.clone());
                match fk.on_delete {
                    OnDelete::Restrict => {
                        if rows_of(tables, child).iter().any(|r| child_filter.matches(r)) {
                            return Err(StoreError::new(
                                StoreErrorCode::ForeignKeyViolation,
                                format!(
                                    "update or delete on table \"{collection}\" violates foreign key constraint \"{child}_{}_fkey\"",
                                    fk.column
                                ),
                            ));
                        }
                    }
                    OnDelete::Cascade => {
                        let removed = Self::delete_matching(tables, child, &child_filter)?;
                        if removed > 0 {
                            debug!(table = %child, removed, "cascaded delete");
                        }
                    }
                }
            }
        }

        Ok(doomed.len())
    }
}

impl RecordStore for InMemoryStore {
    fn insert(&self, collection: Collection, row: Row) -> Result<Row> {
        let mut tables = self.tables.write();
        let row = Self::prepare(collection, row);
        let others: Vec<&Row> = rows_of(&tables, collection).iter().collect();
        Self::check_row(&tables, collection, &row, &others)?;

        tables.entry(collection).or_default().push(row.clone());
        debug!(table = %collection, "inserted row");
        Ok(row)
    }

    fn insert_many(&self, collection: Collection, rows: Vec<Row>) -> Result<Vec<Row>> {
        let mut tables = self.tables.write();
        let mut next = rows_of(&tables, collection).to_vec();
        let existing = next.len();

        for row in rows {
            let row = Self::prepare(collection, row);
            let others: Vec<&Row> = next.iter().collect();
            Self::check_row(&tables, collection, &row, &others)?;
            next.push(row);
        }

        let inserted = next[existing..].to_vec();
        tables.insert(collection, next);
        debug!(table = %collection, count = inserted.len(), "inserted rows");
        Ok(inserted)
    }

    fn update(&self, collection: Collection, patch: Row, filter: &Filter) -> Result<Vec<Row>> {
        let mut tables = self.tables.write();
        let mut next = rows_of(&tables, collection).to_vec();
        let matched: Vec<usize> = next
            .iter()
            .enumerate()
            .filter(|(_, row)| filter.matches(row))
            .map(|(index, _)| index)
            .collect();

        for &index in &matched {
            for (column, value) in &patch {
                if column != "id" {
                    next[index].insert(column.clone(), value.clone());
                }
            }
        }
        for &index in &matched {
            let others: Vec<&Row> = next
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, row)| row)
                .collect();
            Self::check_row(&tables, collection, &next[index], &others)?;
        }

        let updated = matched.iter().map(|&index| next[index].clone()).collect();
        tables.insert(collection, next);
        Ok(updated)
    }

    fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize> {
        let mut tables = self.tables.write();
        let mut next = tables.clone();
        let removed = Self::delete_matching(&mut next, collection, filter)?;
        *tables = next;
        debug!(table = %collection, removed, "deleted rows");
        Ok(removed)
    }

    fn select(
        &self,
        collection: Collection,
        filter: &Filter,
        ordering: Option<&Ordering>,
    ) -> Result<Vec<Row>> {
        let tables = self.tables.read();
        let mut rows: Vec<Row> = rows_of(&tables, collection)
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        if let Some(ordering) = ordering {
            ordering.sort(&mut rows);
        }
        Ok(rows)
    }
}
