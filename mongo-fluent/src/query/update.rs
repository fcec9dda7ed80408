use crate::error::{self, Result};
use crate::field::{self, FieldNames, IntoFields};
use crate::operator::{Bitwise, DateType, Number, Operator};
use crate::value::Value;

use super::{Order, Query};

/// The modifiers of a `$push` with `$each`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PushOptions {
    /// Keeps only this many elements after the push, from the end when negative.
    pub slice: Option<i32>,
    /// Sorts the array after the push.
    pub sort: Option<Order>,
    /// Inserts the values at this index instead of appending.
    pub position: Option<i32>,
}

impl Query {
    fn update_with<V, F>(&mut self, operation: &'static str, operator: &'static str, fields: F) -> Result<&mut Self>
    where
        V: Into<Value>,
        F: IntoFields<V>,
    {
        self.apply(|q| {
            for (f, v) in field::fields(operation, fields)? {
                q.push_update(operator, f, v.into());
            }
            Ok(())
        })
    }

    /// Increments fields by the given amounts.
    pub fn inc<F: IntoFields<Number>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("inc", "$inc", fields)
    }

    /// Multiplies fields by the given amounts.
    pub fn mul<F: IntoFields<Number>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("mul", "$mul", fields)
    }

    /// Renames fields, given as `(old, new)` pairs.
    ///
    /// # Errors
    ///
    /// This method errors if an old or new field name is empty.
    pub fn rename<F: IntoFields<String>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            let fields = field::fields("rename", fields)?;
            if fields.iter().any(|(_, new)| new.is_empty()) {
                return Err(error::validation(
                    "rename",
                    "new field name must not be an empty string",
                ));
            }
            for (old, new) in fields {
                q.push_update("$rename", old, new.into());
            }
            Ok(())
        })
    }

    /// Sets fields only when an update inserts a document, enabling upsert.
    pub fn set_on_insert<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            for (f, v) in field::fields("set_on_insert", fields)? {
                q.push_update("$setOnInsert", f, v);
            }
            q.upsert = true;
            Ok(())
        })
    }

    /// Sets fields to the given values.
    pub fn set<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("set", "$set", fields)
    }

    /// Removes fields.
    pub fn unset<N: FieldNames>(&mut self, fields: N) -> Result<&mut Self> {
        self.apply(|q| {
            for f in field::names("unset", fields)? {
                q.push_update("$unset", f, 1.into());
            }
            Ok(())
        })
    }

    /// Updates fields only if the given value is less than the current one.
    pub fn min<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("min", "$min", fields)
    }

    /// Updates fields only if the given value is greater than the current one.
    pub fn max<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("max", "$max", fields)
    }

    /// Sets fields to the current date or timestamp.
    pub fn set_current_date<F: IntoFields<DateType>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            for (f, t) in field::fields("set_current_date", fields)? {
                q.push_update("$currentDate", f, Operator::CurrentDate(t).into());
            }
            Ok(())
        })
    }

    /// Adds values to array fields unless already present.
    pub fn add_to_set<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("add_to_set", "$addToSet", fields)
    }

    /// Adds every value of `list` to an array field unless already present.
    ///
    /// # Errors
    ///
    /// This method errors if the field name or `list` is empty.
    pub fn add_to_set_all<T, I>(&mut self, field: &str, list: I) -> Result<&mut Self>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.apply(|q| {
            field::name("add_to_set_all", field)?;
            let values = field::non_empty("add_to_set_all", list)?;
            let each = Operator::Each {
                values,
                slice: None,
                sort: None,
                position: None,
            };
            q.push_update("$addToSet", field.to_owned(), each.into());
            Ok(())
        })
    }

    /// Removes the last element of array fields.
    pub fn pop<N: FieldNames>(&mut self, fields: N) -> Result<&mut Self> {
        self.apply(|q| {
            for f in field::names("pop", fields)? {
                q.push_update("$pop", f, 1.into());
            }
            Ok(())
        })
    }

    /// Removes the first element of array fields.
    pub fn shift<N: FieldNames>(&mut self, fields: N) -> Result<&mut Self> {
        self.apply(|q| {
            for f in field::names("shift", fields)? {
                q.push_update("$pop", f, (-1).into());
            }
            Ok(())
        })
    }

    /// Removes array elements equal to, or matching, the given values.
    pub fn pull<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("pull", "$pull", fields)
    }

    /// Removes every element of an array field equal to a value of `list`.
    ///
    /// # Errors
    ///
    /// This method errors if the field name or `list` is empty.
    pub fn pull_all<T, I>(&mut self, field: &str, list: I) -> Result<&mut Self>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.apply(|q| {
            field::name("pull_all", field)?;
            let values = field::non_empty("pull_all", list)?;
            q.push_update("$pullAll", field.to_owned(), Value::List(values));
            Ok(())
        })
    }

    /// Appends values to array fields.
    pub fn push<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.update_with("push", "$push", fields)
    }

    /// Appends every value of `list` to an array field, applying the `$push` modifiers.
    ///
    /// # Errors
    ///
    /// This method errors if the field name is empty or the sort modifier is an empty nested
    /// sort.
    pub fn push_all<T, I>(&mut self, field: &str, list: I, options: PushOptions) -> Result<&mut Self>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.apply(|q| {
            field::name("push_all", field)?;
            if let Some(Order::Nested(ref fields)) = options.sort {
                if fields.is_empty() {
                    return Err(error::validation(
                        "push_all",
                        "a nested sort must not be empty",
                    ));
                }
            }
            let each = Operator::Each {
                values: list.into_iter().map(Into::into).collect(),
                slice: options.slice,
                sort: options.sort.map(|o| Box::new(o.into())),
                position: options.position,
            };
            q.push_update("$push", field.to_owned(), each.into());
            Ok(())
        })
    }

    /// Applies a bitwise `and`, `or` or `xor` to an integer field.
    pub fn bit(&mut self, field: &str, op: Bitwise, value: i64) -> Result<&mut Self> {
        self.apply(|q| {
            field::name("bit", field)?;
            q.push_update("$bit", field.to_owned(), Operator::Bit(op, value).into());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn arithmetic() {
        let mut query = Query::new();
        query
            .inc([("views", 1)])
            .unwrap()
            .mul(("price", 1.5))
            .unwrap()
            .min(("low", 3))
            .unwrap()
            .max(("high", 9))
            .unwrap();
        assert_eq!(
            query.updates(),
            doc! {
                "$inc": { "views": 1 },
                "$mul": { "price": 1.5 },
                "$min": { "low": 3 },
                "$max": { "high": 9 },
            }
        );
    }

    #[test]
    fn set_on_insert_enables_upsert() {
        let mut query = Query::new();
        query.set_on_insert(("created", "now")).unwrap();
        assert!(query.is_upsert());
        assert_eq!(query.updates(), doc! { "$setOnInsert": { "created": "now" } });
    }

    #[test]
    fn rename_and_unset() {
        let mut query = Query::new();
        query
            .rename(("nmae", "name"))
            .unwrap()
            .unset(["tmp", "old"])
            .unwrap();
        assert_eq!(
            query.updates(),
            doc! { "$rename": { "nmae": "name" }, "$unset": { "tmp": 1, "old": 1 } }
        );
        assert!(query.rename(("a", "")).is_err());
        assert!(query.unset(()).is_err());
    }

    #[test]
    fn arrays() {
        let mut query = Query::new();
        query
            .add_to_set(("tags", "a"))
            .unwrap()
            .add_to_set_all("colors", vec!["red", "blue"])
            .unwrap()
            .pop("queue")
            .unwrap()
            .shift("stack")
            .unwrap()
            .pull_all("scores", vec![0, 5])
            .unwrap()
            .push_all(
                "quizzes",
                vec![3, 4],
                PushOptions {
                    slice: Some(-5),
                    sort: Some(Order::Desc),
                    position: None,
                },
            )
            .unwrap();
        assert_eq!(
            query.updates(),
            doc! {
                "$addToSet": { "tags": "a", "colors": { "$each": ["red", "blue"] } },
                "$pop": { "queue": 1, "stack": -1 },
                "$pullAll": { "scores": [0, 5] },
                "$push": { "quizzes": { "$each": [3, 4], "$slice": -5, "$sort": -1 } },
            }
        );
        assert!(query.pull_all("scores", Vec::<i32>::new()).is_err());
        assert!(query.add_to_set_all("", vec![1]).is_err());
    }

    #[test]
    fn dates_and_bits() {
        let mut query = Query::new();
        query
            .set_current_date([("modified", DateType::Date), ("stamp", DateType::Timestamp)])
            .unwrap()
            .bit("flags", Bitwise::Xor, 5)
            .unwrap();
        assert_eq!(
            query.updates(),
            doc! {
                "$currentDate": { "modified": { "$type": "date" }, "stamp": { "$type": "timestamp" } },
                "$bit": { "flags": { "xor": 5_i64 } },
            }
        );
    }
}
