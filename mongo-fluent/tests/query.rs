use std::collections::BTreeMap;

use mongo_fluent::bson::{doc, Bson};
use mongo_fluent::operator::{
    self, all, between, elem_match, exists, gt, gte, lt, lte, ne, nor, not_between, or, regex,
    size, text, TextOptions,
};
use mongo_fluent::{ErrorKind, Map, Order, Query, Value};

#[test]
fn map_clauses_deep_merge() {
    let mut m1 = Map::new();
    let mut inner = Map::new();
    inner.insert("x".to_owned(), Value::from(1));
    m1.insert("nested".to_owned(), Value::Map(inner));
    m1.insert("keep".to_owned(), Value::from(true));

    let mut m2 = Map::new();
    let mut inner = Map::new();
    inner.insert("y".to_owned(), Value::from(2));
    m2.insert("nested".to_owned(), Value::Map(inner));

    let mut query = Query::new();
    query.filter(("doc", m1)).unwrap();
    query.filter(("doc", m2)).unwrap();
    assert_eq!(
        query.wheres(),
        doc! { "doc": { "nested": { "x": 1, "y": 2 }, "keep": true } }
    );
}

#[test]
fn scalar_then_map_replaces() {
    let mut query = Query::new();
    query.filter(("age", 30)).unwrap();
    query.filter(("age", gt(18))).unwrap();
    assert_eq!(query.wheres(), doc! { "age": { "$gt": 18 } });
    query.filter(("age", 40)).unwrap();
    assert_eq!(query.wheres(), doc! { "age": 40 });
}

#[test]
fn range_built_in_steps() {
    let mut query = Query::new();
    query
        .filter(("age", gte(18)))
        .unwrap()
        .filter(("age", lte(65)))
        .unwrap();
    assert_eq!(query.wheres(), doc! { "age": { "$gte": 18, "$lte": 65 } });
}

#[test]
fn many_shapes_of_fields() {
    let mut fields = BTreeMap::new();
    fields.insert("b", 2);
    fields.insert("a", 1);

    let mut query = Query::new();
    query
        .filter(fields)
        .unwrap()
        .filter(vec![("c", 3)])
        .unwrap()
        .filter(doc! { "d": 4 })
        .unwrap();
    assert_eq!(query.wheres(), doc! { "a": 1, "b": 2, "c": 3, "d": 4 });
}

#[test]
fn invalid_calls_never_mutate() {
    let mut query = Query::new();
    query.filter(("a", 1)).unwrap();
    let before = query.wheres();

    let err = query.filter([("b", 1), ("", 2)]).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::Validation);
    assert_eq!(err.operation(), Some("filter"));
    assert!(query.filter_in("c", Vec::<i32>::new()).is_err());
    assert!(query.set(Vec::<(&str, i32)>::new()).is_err());
    assert!(query.sort(("", 1)).is_err());
    assert!(query.select((), ()).is_err());

    assert_eq!(query.wheres(), before);
    assert!(query.updates().is_empty());
    assert!(query.sorts().is_empty());
    assert!(query.selects().is_empty());
}

#[test]
fn logical_clauses_append() {
    let mut query = Query::new();
    query
        .or_filter(("a", 1))
        .unwrap()
        .or_filter(("b", gt(2)))
        .unwrap()
        .filter(nor([("c", Value::from(3))]).unwrap())
        .unwrap();
    assert_eq!(
        query.wheres(),
        doc! {
            "$or": [{ "a": 1 }, { "b": { "$gt": 2 } }],
            "$nor": [{ "c": 3 }],
        }
    );
}

#[test]
fn operator_constructs() {
    let mut query = Query::new();
    query
        .filter([
            ("price", Value::from(between(1, 10))),
            ("qty", Value::from(not_between(5, 8))),
            ("name", Value::from(ne("x"))),
            ("tags", Value::from(all(vec!["a", "b"]).unwrap())),
            ("sizes", Value::from(size(3))),
            ("deleted", Value::from(exists(false))),
            ("items", Value::from(elem_match(("qty", gt(5))).unwrap())),
        ])
        .unwrap();
    assert_eq!(
        query.wheres(),
        doc! {
            "price": { "$gt": 1, "$lt": 10 },
            "qty": { "$not": { "$gt": 5, "$lt": 8 } },
            "name": { "$ne": "x" },
            "tags": { "$all": ["a", "b"] },
            "sizes": { "$size": 3 },
            "deleted": { "$exists": false },
            "items": { "$elemMatch": { "qty": { "$gt": 5 } } },
        }
    );
}

#[test]
fn regex_is_escaped_and_anchored() {
    let mut query = Query::new();
    query.like("name", regex("a.b")).unwrap();
    match query.wheres().get("name") {
        Some(Bson::RegularExpression(re)) => {
            assert_eq!(re.pattern, r"^a\.b$");
            assert_eq!(re.options, "i");
        }
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn text_and_or_at_top_level() {
    let mut query = Query::new();
    let options = TextOptions {
        language: Some(" en ".to_owned()),
        case_sensitive: Some(true),
        ..Default::default()
    };
    query
        .filter(text("coffee", options).unwrap())
        .unwrap()
        .filter(or([("a", Value::from(1)), ("b", Value::from(lt(0)))]).unwrap())
        .unwrap();
    assert_eq!(
        query.wheres(),
        doc! {
            "$text": { "$search": "coffee", "$language": "en", "$caseSensitive": true },
            "$or": [{ "a": 1 }, { "b": { "$lt": 0 } }],
        }
    );
}

#[test]
fn update_and_sort_accumulate() {
    let mut query = Query::new();
    query
        .set(("a", 1))
        .unwrap()
        .set(("b", operator::eq(2)))
        .unwrap()
        .unset("c")
        .unwrap()
        .sort([("x", Order::Asc), ("y", Order::from("desc"))])
        .unwrap();
    assert_eq!(
        query.updates(),
        doc! { "$set": { "a": 1, "b": { "$eq": 2 } }, "$unset": { "c": 1 } }
    );
    assert_eq!(query.sorts(), doc! { "x": 1, "y": -1 });
}
