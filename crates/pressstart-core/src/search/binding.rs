//! Field bindings: how a caller-facing filter key maps onto a column.

use crate::error::ValidationError;

use super::criteria::SearchValue;

/// How a bound value is compared against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// `column = $n`. Identifiers, foreign keys, flags.
    Exact,
    /// `column ILIKE $n || '%'`. Free text; the wildcard is added in SQL.
    PrefixInsensitive,
}

impl MatchMode {
    /// Renders the predicate for `column` against placeholder `$n`.
    pub fn render(&self, column: &str, n: usize) -> String {
        match self {
            MatchMode::Exact => format!("{column} = ${n}"),
            MatchMode::PrefixInsensitive => format!("{column} ILIKE ${n} || '%'"),
        }
    }
}

/// The SQL type a bound value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Text,
    Bool,
}

/// Maps one filter key to a column, match mode and value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub key: &'static str,
    pub column: &'static str,
    pub mode: MatchMode,
    pub kind: ValueKind,
}

impl FieldBinding {
    /// An integer id or foreign key compared with `=`.
    pub const fn id(key: &'static str, column: &'static str) -> Self {
        FieldBinding {
            key,
            column,
            mode: MatchMode::Exact,
            kind: ValueKind::Int,
        }
    }

    /// A boolean flag compared with `=`.
    pub const fn flag(key: &'static str, column: &'static str) -> Self {
        FieldBinding {
            key,
            column,
            mode: MatchMode::Exact,
            kind: ValueKind::Bool,
        }
    }

    /// A text column compared with `=`.
    pub const fn exact_text(key: &'static str, column: &'static str) -> Self {
        FieldBinding {
            key,
            column,
            mode: MatchMode::Exact,
            kind: ValueKind::Text,
        }
    }

    /// A text column matched by case-insensitive prefix.
    pub const fn prefix(key: &'static str, column: &'static str) -> Self {
        FieldBinding {
            key,
            column,
            mode: MatchMode::PrefixInsensitive,
            kind: ValueKind::Text,
        }
    }

    /// Converts `value` to this binding's kind.
    ///
    /// Form posts deliver everything as text, so `"2"` is accepted for an
    /// integer field and `"true"`/`"false"` for a flag. Integers are accepted
    /// for text fields (phone numbers typed as numbers).
    pub fn coerce(&self, value: &SearchValue) -> Result<SearchValue, ValidationError> {
        match (self.kind, value) {
            (ValueKind::Int, SearchValue::Int(n)) => Ok(SearchValue::Int(*n)),
            (ValueKind::Int, SearchValue::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(SearchValue::Int)
                .map_err(|_| ValidationError::invalid_format(self.key, "expected an integer")),
            (ValueKind::Int, SearchValue::Bool(_) | SearchValue::Unsupported(_)) => {
                Err(ValidationError::invalid_format(self.key, "expected an integer"))
            }

            (ValueKind::Text, SearchValue::Text(s)) => Ok(SearchValue::Text(s.clone())),
            (ValueKind::Text, SearchValue::Int(n)) => Ok(SearchValue::Text(n.to_string())),
            (ValueKind::Text, SearchValue::Bool(_) | SearchValue::Unsupported(_)) => {
                Err(ValidationError::invalid_format(self.key, "expected text"))
            }

            (ValueKind::Bool, SearchValue::Bool(b)) => Ok(SearchValue::Bool(*b)),
            (ValueKind::Bool, SearchValue::Text(s)) => match s.trim() {
                "true" => Ok(SearchValue::Bool(true)),
                "false" => Ok(SearchValue::Bool(false)),
                _ => Err(ValidationError::invalid_format(self.key, "expected true or false")),
            },
            (ValueKind::Bool, SearchValue::Int(_) | SearchValue::Unsupported(_)) => {
                Err(ValidationError::invalid_format(self.key, "expected true or false"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: FieldBinding = FieldBinding::id("storeId", "store_id");
    const SIGNED: FieldBinding = FieldBinding::flag("signed", "trade_invoice_signed");
    const NAME: FieldBinding = FieldBinding::prefix("name", "item_name");

    #[test]
    fn test_render() {
        assert_eq!(MatchMode::Exact.render("store_id", 1), "store_id = $1");
        assert_eq!(
            MatchMode::PrefixInsensitive.render("item_name", 2),
            "item_name ILIKE $2 || '%'"
        );
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(STORE.coerce(&2.into()), Ok(SearchValue::Int(2)));
        assert_eq!(STORE.coerce(&" 2 ".into()), Ok(SearchValue::Int(2)));
        assert_eq!(
            STORE.coerce(&"two".into()),
            Err(ValidationError::invalid_format("storeId", "expected an integer"))
        );
        assert!(STORE.coerce(&true.into()).is_err());
        assert!(STORE.coerce(&"".into()).is_err());
        assert_eq!(
            STORE.coerce(&SearchValue::Unsupported(serde_json::json!(2.5))),
            Err(ValidationError::invalid_format("storeId", "expected an integer"))
        );
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(SIGNED.coerce(&"false".into()), Ok(SearchValue::Bool(false)));
        assert_eq!(SIGNED.coerce(&true.into()), Ok(SearchValue::Bool(true)));
        assert!(SIGNED.coerce(&"yes".into()).is_err());
        assert!(SIGNED.coerce(&1.into()).is_err());
    }

    #[test]
    fn test_coerce_text_keeps_raw_value() {
        assert_eq!(NAME.coerce(&"100%_".into()), Ok(SearchValue::Text("100%_".into())));
        assert_eq!(NAME.coerce(&64.into()), Ok(SearchValue::Text("64".into())));
        assert!(NAME.coerce(&false.into()).is_err());
        assert!(NAME.coerce(&SearchValue::Unsupported(serde_json::json!(["Zelda"]))).is_err());
    }
}
