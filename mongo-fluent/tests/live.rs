mod user;

use mongo_fluent::bson::doc;
use mongo_fluent::operator::gte;
use mongo_fluent::{Client, Collection};

use user::User;

// Needs a mongod listening on localhost:27017 without authentication.
#[test]
#[ignore]
fn live_round_trip() {
    let mut client = Client::builder()
        .connection_string("mongodb://localhost:27017/mongo_fluent_test")
        .auth(false)
        .build()
        .unwrap();
    client.delete_all(User::COLLECTION).unwrap();

    let ids = client
        .insert_all(
            "users",
            vec![doc! { "name": "foo", "age": 20 }, doc! { "name": "bar", "age": 10 }],
        )
        .unwrap();
    assert_eq!(ids.len(), 2);

    client.query().filter(("age", gte(18))).unwrap();
    let users: Vec<User> = client.get_as().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "foo");

    client
        .query()
        .filter(("name", "bar"))
        .unwrap()
        .inc(("age", 1))
        .unwrap();
    assert!(client.update("users").unwrap());
    let bar = client
        .get_one_where("users", ("name", "bar"))
        .unwrap()
        .unwrap();
    assert_eq!(bar.as_document().unwrap().get_i32("age").unwrap(), 11);

    assert_eq!(client.count("users").unwrap(), 2);

    let totals = client
        .aggregate(
            "users",
            vec![doc! { "$group": { "_id": null, "total": { "$sum": "$age" } } }],
            doc! {},
        )
        .unwrap();
    assert_eq!(totals.len(), 1);

    let pong = client.command(doc! { "ping": 1 }).unwrap();
    assert_eq!(pong.len(), 1);

    assert!(client.delete_all("users").unwrap());
    assert_eq!(client.count("users").unwrap(), 0);
}
