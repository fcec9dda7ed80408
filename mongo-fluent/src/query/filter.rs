use crate::error::Result;
use crate::field::{self, IntoFields};
use crate::operator::{self, BsonType, Bitmask, Logical, Number, Pattern, TextOptions};
use crate::value::{Map, Value};

use super::Query;

impl Query {
    /// Filters on plain values or operator constructs.
    ///
    /// # Errors
    ///
    /// This method errors if no fields were given or a field name is empty.
    pub fn filter<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            for (f, v) in field::fields("filter", fields)? {
                q.push_where(f, v);
            }
            Ok(())
        })
    }

    fn filter_with<F, O>(&mut self, operation: &'static str, fields: F, op: O) -> Result<&mut Self>
    where
        F: IntoFields<Value>,
        O: Fn(Value) -> operator::Operator,
    {
        self.apply(|q| {
            for (f, v) in field::fields(operation, fields)? {
                q.push_where(f, op(v).into());
            }
            Ok(())
        })
    }

    /// Filters on fields greater than the given values.
    pub fn filter_gt<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.filter_with("filter_gt", fields, operator::gt)
    }

    /// Filters on fields greater than or equal to the given values.
    pub fn filter_gte<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.filter_with("filter_gte", fields, operator::gte)
    }

    /// Filters on fields less than the given values.
    pub fn filter_lt<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.filter_with("filter_lt", fields, operator::lt)
    }

    /// Filters on fields less than or equal to the given values.
    pub fn filter_lte<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.filter_with("filter_lte", fields, operator::lte)
    }

    /// Filters on fields not equal to the given values.
    pub fn filter_ne<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.filter_with("filter_ne", fields, operator::ne)
    }

    /// Filters on fields negating the given conditions.
    pub fn not_filter<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.filter_with("not_filter", fields, operator::not)
    }

    fn filter_range(
        &mut self,
        operation: &'static str,
        field: &str,
        op: operator::Operator,
    ) -> Result<&mut Self> {
        self.apply(|q| {
            field::name(operation, field)?;
            q.push_where(field.to_owned(), op.into());
            Ok(())
        })
    }

    /// Filters on a field strictly between `lower` and `upper`.
    pub fn filter_between<L, U>(&mut self, field: &str, lower: L, upper: U) -> Result<&mut Self>
    where
        L: Into<Value>,
        U: Into<Value>,
    {
        self.filter_range("filter_between", field, operator::between(lower, upper))
    }

    /// Filters on a field between `lower` and `upper`, bounds included.
    pub fn filter_between_equal<L, U>(
        &mut self,
        field: &str,
        lower: L,
        upper: U,
    ) -> Result<&mut Self>
    where
        L: Into<Value>,
        U: Into<Value>,
    {
        self.filter_range(
            "filter_between_equal",
            field,
            operator::between_equal(lower, upper),
        )
    }

    /// Filters on a field outside of `lower` and `upper`, bounds included.
    pub fn filter_not_between<L, U>(
        &mut self,
        field: &str,
        lower: L,
        upper: U,
    ) -> Result<&mut Self>
    where
        L: Into<Value>,
        U: Into<Value>,
    {
        self.filter_range(
            "filter_not_between",
            field,
            operator::not_between(lower, upper),
        )
    }

    /// Filters on a field outside of `lower` and `upper`, bounds excluded.
    pub fn filter_not_between_equal<L, U>(
        &mut self,
        field: &str,
        lower: L,
        upper: U,
    ) -> Result<&mut Self>
    where
        L: Into<Value>,
        U: Into<Value>,
    {
        self.filter_range(
            "filter_not_between_equal",
            field,
            operator::not_between_equal(lower, upper),
        )
    }

    /// Filters on a field matching any value of `list`.
    ///
    /// # Errors
    ///
    /// This method errors if the field name or `list` is empty.
    pub fn filter_in<T, I>(&mut self, field: &str, list: I) -> Result<&mut Self>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.apply(|q| {
            field::name("filter_in", field)?;
            let op = operator::is_in(list)?;
            q.push_where(field.to_owned(), op.into());
            Ok(())
        })
    }

    /// Filters on a field matching none of the values of `list`.
    ///
    /// # Errors
    ///
    /// This method errors if the field name or `list` is empty.
    pub fn filter_nin<T, I>(&mut self, field: &str, list: I) -> Result<&mut Self>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.apply(|q| {
            field::name("filter_nin", field)?;
            let op = operator::not_in(list)?;
            q.push_where(field.to_owned(), op.into());
            Ok(())
        })
    }

    fn logical_filter<F>(&mut self, operation: &'static str, op: Logical, fields: F) -> Result<&mut Self>
    where
        F: IntoFields<Value>,
    {
        self.apply(|q| {
            let clauses: Vec<Value> = field::fields(operation, fields)?
                .into_iter()
                .map(|(f, v)| {
                    let mut clause = Map::new();
                    clause.insert(f, v);
                    Value::Map(clause)
                })
                .collect();
            let list = q
                .wheres
                .entry(op.key().to_owned())
                .or_insert_with(|| Value::List(vec![]));
            match list {
                Value::List(existing) => existing.extend(clauses),
                other => *other = Value::List(clauses),
            }
            Ok(())
        })
    }

    /// Appends one `$or` clause per field.
    ///
    /// # Errors
    ///
    /// This method errors if no fields were given or a field name is empty.
    pub fn or_filter<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.logical_filter("or_filter", Logical::Or, fields)
    }

    /// Appends one `$and` clause per field.
    ///
    /// # Errors
    ///
    /// This method errors if no fields were given or a field name is empty.
    pub fn and_filter<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.logical_filter("and_filter", Logical::And, fields)
    }

    /// Appends one `$nor` clause per field.
    ///
    /// # Errors
    ///
    /// This method errors if no fields were given or a field name is empty.
    pub fn nor_filter<F: IntoFields<Value>>(&mut self, fields: F) -> Result<&mut Self> {
        self.logical_filter("nor_filter", Logical::Nor, fields)
    }

    /// Filters on the presence of fields.
    pub fn filter_exists<F: IntoFields<bool>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            for (f, exists) in field::fields("filter_exists", fields)? {
                q.push_where(f, operator::exists(exists).into());
            }
            Ok(())
        })
    }

    /// Filters on the BSON type of fields.
    ///
    /// # Errors
    ///
    /// This method errors if a field name or type alias is empty.
    pub fn filter_type<F: IntoFields<BsonType>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            let ops = field::fields("filter_type", fields)?
                .into_iter()
                .map(|(f, t)| Ok((f, operator::of_type(t)?)))
                .collect::<Result<Vec<_>>>()?;
            for (f, op) in ops {
                q.push_where(f, op.into());
            }
            Ok(())
        })
    }

    /// Filters on a field where `value % divisor == remainder`.
    pub fn filter_mod<D, R>(&mut self, field: &str, divisor: D, remainder: R) -> Result<&mut Self>
    where
        D: Into<Number>,
        R: Into<Number>,
    {
        self.filter_range("filter_mod", field, operator::modulo(divisor, remainder))
    }

    /// Filters on a field matching a regular expression.
    ///
    /// A plain string is matched as an escaped, case insensitive literal anchored at both ends;
    /// use [`regex`](crate::operator::regex) to change the flags or anchors.
    pub fn like<P: Into<Pattern>>(&mut self, field: &str, pattern: P) -> Result<&mut Self> {
        self.apply(|q| {
            field::name("like", field)?;
            q.push_where(field.to_owned(), pattern.into().into());
            Ok(())
        })
    }

    /// Runs a `$text` search over the text index.
    ///
    /// # Errors
    ///
    /// This method errors if `search` is empty.
    pub fn filter_text(&mut self, search: &str, options: TextOptions) -> Result<&mut Self> {
        self.apply(|q| {
            let op = operator::text(search, options)?;
            q.push_where("$text".to_owned(), op.into());
            Ok(())
        })
    }

    /// Filters with a JavaScript expression.
    ///
    /// # Errors
    ///
    /// This method errors if `code` is empty.
    pub fn filter_js(&mut self, code: &str) -> Result<&mut Self> {
        self.apply(|q| {
            for (f, v) in operator::js(code)?.into_map() {
                q.push_where(f, v);
            }
            Ok(())
        })
    }

    /// Filters on an array field containing every value of `list`.
    ///
    /// # Errors
    ///
    /// This method errors if the field name or `list` is empty.
    pub fn filter_all<T, I>(&mut self, field: &str, list: I) -> Result<&mut Self>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.apply(|q| {
            field::name("filter_all", field)?;
            let op = operator::all(list)?;
            q.push_where(field.to_owned(), op.into());
            Ok(())
        })
    }

    /// Filters on an array field with an element matching all `conditions`.
    ///
    /// # Errors
    ///
    /// This method errors if the field name or `conditions` is empty.
    pub fn filter_elem_match<F: IntoFields<Value>>(
        &mut self,
        field: &str,
        conditions: F,
    ) -> Result<&mut Self> {
        self.apply(|q| {
            field::name("filter_elem_match", field)?;
            let op = operator::elem_match(conditions)?;
            q.push_where(field.to_owned(), op.into());
            Ok(())
        })
    }

    /// Filters on the length of array fields.
    pub fn filter_size<F: IntoFields<i32>>(&mut self, fields: F) -> Result<&mut Self> {
        self.apply(|q| {
            for (f, len) in field::fields("filter_size", fields)? {
                q.push_where(f, operator::size(len).into());
            }
            Ok(())
        })
    }

    fn filter_bits<M, O>(
        &mut self,
        operation: &'static str,
        field: &str,
        mask: M,
        op: O,
    ) -> Result<&mut Self>
    where
        M: Into<Bitmask>,
        O: FnOnce(Bitmask) -> Result<operator::Operator>,
    {
        self.apply(|q| {
            field::name(operation, field)?;
            let op = op(mask.into())?;
            q.push_where(field.to_owned(), op.into());
            Ok(())
        })
    }

    /// Filters on a field where all bits of `mask` are set.
    pub fn filter_bits_all_set<M: Into<Bitmask>>(&mut self, field: &str, mask: M) -> Result<&mut Self> {
        self.filter_bits("filter_bits_all_set", field, mask, operator::bits_all_set)
    }

    /// Filters on a field where any bit of `mask` is set.
    pub fn filter_bits_any_set<M: Into<Bitmask>>(&mut self, field: &str, mask: M) -> Result<&mut Self> {
        self.filter_bits("filter_bits_any_set", field, mask, operator::bits_any_set)
    }

    /// Filters on a field where all bits of `mask` are clear.
    pub fn filter_bits_all_clear<M: Into<Bitmask>>(
        &mut self,
        field: &str,
        mask: M,
    ) -> Result<&mut Self> {
        self.filter_bits("filter_bits_all_clear", field, mask, operator::bits_all_clear)
    }

    /// Filters on a field where any bit of `mask` is clear.
    pub fn filter_bits_any_clear<M: Into<Bitmask>>(
        &mut self,
        field: &str,
        mask: M,
    ) -> Result<&mut Self> {
        self.filter_bits("filter_bits_any_clear", field, mask, operator::bits_any_clear)
    }

    /// Prevents a multi document write from yielding to other operations.
    pub fn isolated(&mut self) -> Result<&mut Self> {
        self.apply(|q| {
            q.push_where("$isolated".to_owned(), true.into());
            Ok(())
        })
    }
}
