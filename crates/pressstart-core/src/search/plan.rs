//! Turning criteria into a parameterized statement.

use crate::error::ValidationError;

use super::binding::FieldBinding;
use super::criteria::{SearchCriteria, SearchValue};

// =============================================================================
// Entity Search
// =============================================================================

/// Static description of one searchable table.
///
/// `fields` is the declared filter order. Predicates and placeholders are
/// always emitted in this order, whatever order the caller supplied.
#[derive(Debug)]
pub struct EntitySearch {
    /// Caller-facing entity name ("inventory", "members").
    pub entity: &'static str,
    pub table: &'static str,
    /// Comma-separated select list.
    pub columns: &'static str,
    pub primary_key: FieldBinding,
    pub fields: &'static [FieldBinding],
}

impl EntitySearch {
    /// Plans a search for `criteria`.
    ///
    /// ## Errors
    /// - `InvalidFormat` when a recognized value has the wrong type
    /// - `NoSearchCriteria` when nothing recognized and non-null was supplied
    pub fn plan(&self, criteria: &SearchCriteria) -> Result<QueryPlan<'_>, ValidationError> {
        if let Some(value) = criteria.get(self.primary_key.key) {
            return match self.primary_key.coerce(value)? {
                SearchValue::Int(id) => Ok(QueryPlan {
                    search: self,
                    lookup: Lookup::PrimaryKey(id),
                }),
                _ => Err(ValidationError::invalid_format(
                    self.primary_key.key,
                    "expected an integer",
                )),
            };
        }

        let mut predicates = Vec::new();
        for binding in self.fields {
            if let Some(value) = criteria.get(binding.key) {
                predicates.push(Predicate {
                    binding,
                    value: binding.coerce(value)?,
                });
            }
        }

        if predicates.is_empty() {
            return Err(ValidationError::NoSearchCriteria {
                allowed: self.recognized_keys().map(str::to_string).collect(),
            });
        }

        Ok(QueryPlan {
            search: self,
            lookup: Lookup::Filters(predicates),
        })
    }

    /// `id` followed by the filter keys, in declared order.
    pub fn recognized_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.primary_key.key).chain(self.fields.iter().map(|f| f.key))
    }

    pub fn select_all(&self) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {}",
            self.columns, self.table, self.primary_key.column
        )
    }

    pub fn select_by_id(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.columns, self.table, self.primary_key.column
        )
    }
}

// =============================================================================
// Query Plan
// =============================================================================

/// One bound filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate<'a> {
    pub binding: &'a FieldBinding,
    pub value: SearchValue,
}

#[derive(Debug, Clone, PartialEq)]
enum Lookup<'a> {
    PrimaryKey(i64),
    Filters(Vec<Predicate<'a>>),
}

/// A planned search. Built once per request and consumed by the executor.
#[derive(Debug, Clone)]
pub struct QueryPlan<'a> {
    search: &'a EntitySearch,
    lookup: Lookup<'a>,
}

impl<'a> QueryPlan<'a> {
    pub fn search(&self) -> &'a EntitySearch {
        self.search
    }

    pub fn is_primary_key_lookup(&self) -> bool {
        matches!(self.lookup, Lookup::PrimaryKey(_))
    }

    /// Number of predicates (1 for a primary-key lookup).
    pub fn len(&self) -> usize {
        match &self.lookup {
            Lookup::PrimaryKey(_) => 1,
            Lookup::Filters(predicates) => predicates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bound filters, empty for a primary-key lookup.
    pub fn predicates(&self) -> &[Predicate<'a>] {
        match &self.lookup {
            Lookup::PrimaryKey(_) => &[],
            Lookup::Filters(predicates) => predicates,
        }
    }

    /// The `WHERE` body with placeholders `$1..$N`.
    pub fn where_clause(&self) -> String {
        match &self.lookup {
            Lookup::PrimaryKey(_) => format!("{} = $1", self.search.primary_key.column),
            Lookup::Filters(predicates) => predicates
                .iter()
                .enumerate()
                .map(|(i, p)| p.binding.mode.render(p.binding.column, i + 1))
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }

    /// Parameter values in placeholder order.
    pub fn params(&self) -> Vec<SearchValue> {
        match &self.lookup {
            Lookup::PrimaryKey(id) => vec![SearchValue::Int(*id)],
            Lookup::Filters(predicates) => predicates.iter().map(|p| p.value.clone()).collect(),
        }
    }

    /// The full statement.
    pub fn to_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {}",
            self.search.columns,
            self.search.table,
            self.where_clause(),
            self.search.primary_key.column
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
