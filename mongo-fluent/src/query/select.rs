use crate::error::{self, Result};
use crate::field::{self, FieldNames, IntoFields};
use crate::operator::{self, Slice};
use crate::value::Value;

use super::Query;

impl Query {
    /// Includes and excludes fields from the returned documents.
    ///
    /// # Errors
    ///
    /// This method errors if both lists are empty or a field name is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn doc() -> mongo_fluent::Result<()> {
    /// use mongo_fluent::bson::doc;
    /// use mongo_fluent::Query;
    ///
    /// let mut query = Query::new();
    /// query.select(["name", "email"], "_id")?;
    /// assert_eq!(query.selects(), doc! { "name": true, "email": true, "_id": false });
    /// # Ok(())
    /// # }
    /// ```
    pub fn select<I, E>(&mut self, includes: I, excludes: E) -> Result<&mut Self>
    where
        I: FieldNames,
        E: FieldNames,
    {
        self.apply(|q| {
            let includes = field::names_or_none("select", includes)?;
            let excludes = field::names_or_none("select", excludes)?;
            if includes.is_empty() && excludes.is_empty() {
                return Err(error::validation(
                    "select",
                    "includes or excludes must not be empty",
                ));
            }
            for f in includes {
                q.push_select(f, true.into());
            }
            for f in excludes {
                q.push_select(f, false.into());
            }
            Ok(())
        })
    }

    /// Returns only the first array element matching the filter, using the positional `$`.
    pub fn select_positional<N: FieldNames>(&mut self, fields: N) -> Result<&mut Self> {
        self.apply(|q| {
            for f in field::names("select_positional", fields)? {
                q.push_select(format!("{}.$", f), true.into());
            }
            Ok(())
        })
    }

    /// Returns only the first array element matching all `conditions`.
    ///
    /// # Errors
    ///
    /// This method errors if the field name or `conditions` is empty.
    pub fn select_elem_match<F: IntoFields<Value>>(
        &mut self,
        field: &str,
        conditions: F,
    ) -> Result<&mut Self> {
        self.apply(|q| {
            field::name("select_elem_match", field)?;
            let op = operator::elem_match(conditions)?;
            q.push_select(field.to_owned(), op.into());
            Ok(())
        })
    }

    /// Limits the number of array elements returned for the given fields.
    pub fn select_slice<F: IntoFields<Slice>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            for (f, s) in field::fields("select_slice", fields)? {
                q.push_select(f, operator::slice(s).into());
            }
            Ok(())
        })
    }

    /// Projects the text search score into `field`, sorting on it when `sort` is set.
    pub fn text_score(&mut self, field: &str, sort: bool) -> Result<&mut Self> {
        self.apply(|q| {
            field::name("text_score", field)?;
            q.push_select(field.to_owned(), operator::meta_text_score().into());
            if sort {
                q.push_sort(field.to_owned(), operator::meta_text_score().into());
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use crate::operator::gte;
    use crate::Query;

    #[test]
    fn select_requires_a_field() {
        let mut query = Query::new();
        assert!(query.select((), ()).is_err());
        assert!(query.select(["a", ""], ()).is_err());
        assert!(query.is_empty());
    }

    #[test]
    fn select_merges() {
        let mut query = Query::new();
        query.select("a", ()).unwrap();
        query.select(["b"], ["a"]).unwrap();
        assert_eq!(query.selects(), doc! { "a": false, "b": true });
    }

    #[test]
    fn projection_operators() {
        let mut query = Query::new();
        query
            .select_positional("grades")
            .unwrap()
            .select_elem_match("students", [("age", gte(12))])
            .unwrap()
            .select_slice([("comments", 5)])
            .unwrap()
            .select_slice(("tags", (10, 2)))
            .unwrap()
            .text_score("score", true)
            .unwrap();
        assert_eq!(
            query.selects(),
            doc! {
                "grades.$": true,
                "students": { "$elemMatch": { "age": { "$gte": 12 } } },
                "comments": { "$slice": 5 },
                "tags": { "$slice": [10, 2] },
                "score": { "$meta": "textScore" },
            }
        );
        assert_eq!(query.sorts(), doc! { "score": { "$meta": "textScore" } });
    }
}
