use crate::error::{self, Result};
use crate::field::{self, IntoFields};
use crate::operator;
use crate::value::{Map, Value};

use super::{Query, DEFAULT_LIMIT};

/// The order in which to sort a field by.
///
/// Converts from `1`/`-1`, `true`/`false` and `"asc"`/`"desc"`: `-1`, `false` and `"desc"` (in
/// any case) sort descending, everything else ascending.
#[derive(Clone, Debug, PartialEq)]
pub enum Order {
    /// Sort in ascending order, which is equivalent to `1`
    Asc,
    /// Sort in descending order, which is equivalent to `-1`
    Desc,
    /// Sort on nested fields
    Nested(Vec<(String, Order)>),
}

impl Order {
    /// Builds a nested sort from `(field, order)` pairs.
    pub fn nested<F: IntoFields<Order>>(fields: F) -> Self {
        Order::Nested(fields.into_fields())
    }

    // Nested sorts must not be empty, at any depth.
    fn validate(&self, operation: &'static str) -> Result<()> {
        if let Order::Nested(fields) = self {
            if fields.is_empty() {
                return Err(error::validation(
                    operation,
                    "a nested sort must not be empty",
                ));
            }
            for (f, o) in fields {
                field::name(operation, f)?;
                o.validate(operation)?;
            }
        }
        Ok(())
    }
}

impl From<i32> for Order {
    fn from(n: i32) -> Self {
        if n == -1 {
            Order::Desc
        } else {
            Order::Asc
        }
    }
}

impl From<bool> for Order {
    fn from(asc: bool) -> Self {
        if asc {
            Order::Asc
        } else {
            Order::Desc
        }
    }
}

impl From<&str> for Order {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") || s == "-1" {
            Order::Desc
        } else {
            Order::Asc
        }
    }
}

impl From<Order> for Value {
    fn from(order: Order) -> Self {
        match order {
            // Mongo uses '1' and '-1' to denote sort order in the document
            // given to queries' '$sort' property
            Order::Asc => Value::from(1),
            Order::Desc => Value::from(-1),
            Order::Nested(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(f, o)| (f, Value::from(o)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl Query {
    /// Sorts the returned documents by the given fields.
    ///
    /// # Errors
    ///
    /// This method errors if no fields were given, or a field name or nested sort is empty.
    pub fn sort<F: IntoFields<Order>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            let fields = field::fields("sort", fields)?;
            for (_, o) in &fields {
                o.validate("sort")?;
            }
            for (f, o) in fields {
                q.push_sort(f, o.into());
            }
            Ok(())
        })
    }

    /// Sorts the returned documents by the text search score projected into `field`.
    pub fn text_score_sort(&mut self, field: &str) -> Result<&mut Self> {
        self.apply(|q| {
            field::name("text_score_sort", field)?;
            q.push_sort(field.to_owned(), operator::meta_text_score().into());
            Ok(())
        })
    }

    /// The maximum number of documents to return, `0` resets to the default.
    ///
    /// # Errors
    ///
    /// This method errors if `limit` is negative.
    pub fn limit(&mut self, limit: i64) -> Result<&mut Self> {
        self.apply(|q| {
            if limit < 0 {
                return Err(error::validation("limit", "limit can not be lower than 0"));
            }
            q.limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
            Ok(())
        })
    }

    /// The number of documents to skip.
    ///
    /// # Errors
    ///
    /// This method errors if `offset` is negative.
    pub fn offset(&mut self, offset: i64) -> Result<&mut Self> {
        self.apply(|q| {
            if offset < 0 {
                return Err(error::validation(
                    "offset",
                    "offset can not be lower than 0",
                ));
            }
            q.offset = offset;
            Ok(())
        })
    }
}
