use std::sync::Arc;

use serde_json::json;
use storefront::{
    CatalogRepository, DuckdbCatalogRepository, DuckdbUserRepository, FilterSpec, Product,
    ProductInput, User, UserRepository,
};
use tempfile::tempdir;

fn product(name: &str, category: &str, price: f64, color: Option<&str>) -> Product {
    ProductInput {
        name: Some(name.to_string()),
        category: Some(category.to_string()),
        price: Some(price),
        stock: Some(2),
        color: color.map(String::from),
        model_src: Some(format!("{name}.glb")),
        ios_src: Some(format!("{name}.usdz")),
        ..Default::default()
    }
    .into_product()
    .expect("valid product")
}

fn filter(value: serde_json::Value) -> FilterSpec {
    serde_json::from_value(value).expect("filter object")
}

#[tokio::test]
async fn products_survive_reopening_the_database() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("storefront.duckdb");

    let desk = product("Desk", "Furniture", 300.0, Some("oak"));
    {
        let store = DuckdbCatalogRepository::new(&db_path).expect("duckdb init");
        store.insert(&desk).await.expect("insert");
    }

    let store = DuckdbCatalogRepository::new(&db_path).expect("duckdb reopen");
    let found = store
        .find_by_id(&desk.id)
        .await
        .expect("find_by_id")
        .expect("product exists");
    assert_eq!(found, desk);
    assert_eq!(store.count().await.expect("count"), 1);
}

#[tokio::test]
async fn find_applies_document_filters() {
    let store = DuckdbCatalogRepository::in_memory().expect("duckdb init");
    for p in [
        product("Desk", "Furniture", 300.0, Some("oak")),
        product("Sofa", "Furniture", 900.0, Some("red")),
        product("Lamp", "Lighting", 40.0, Some("red")),
    ] {
        store.insert(&p).await.expect("insert");
    }

    let red = store
        .find(&filter(json!({ "color": "red" })))
        .await
        .expect("find");
    assert_eq!(red.len(), 2);

    let cheap_furniture = store
        .find(&filter(json!({
            "category": { "$regex": "^furn", "$options": "i" },
            "price": { "$lt": 500 }
        })))
        .await
        .expect("find");
    assert_eq!(cheap_furniture.len(), 1);
    assert_eq!(cheap_furniture[0].name, "Desk");

    let everything = store.find(&FilterSpec::all()).await.expect("find");
    assert_eq!(everything.len(), 3);

    let unknown_field = store
        .find(&filter(json!({ "material": "steel" })))
        .await
        .expect("find");
    assert!(unknown_field.is_empty());
}

#[tokio::test]
async fn unsupported_operator_is_rejected() {
    let store = DuckdbCatalogRepository::in_memory().expect("duckdb init");
    let err = store
        .find(&filter(json!({ "price": { "$where": "1" } })))
        .await
        .unwrap_err();
    assert!(matches!(err, storefront::DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn insert_update_delete() {
    let store = DuckdbCatalogRepository::in_memory().expect("duckdb init");
    let mut lamp = product("Lamp", "Lighting", 40.0, None);

    store.insert(&lamp).await.expect("insert");
    let dup = store.insert(&lamp).await.unwrap_err();
    assert!(dup.is_already_exists());

    lamp.price = 35.0;
    lamp.touch();
    assert!(store.update(&lamp).await.expect("update"));
    let stored = store.find_by_id(&lamp.id).await.unwrap().unwrap();
    assert_eq!(stored.price, 35.0);

    assert!(store.delete(&lamp.id).await.expect("delete"));
    assert!(!store.delete(&lamp.id).await.expect("delete again"));
    assert!(!store.update(&lamp).await.expect("update missing"));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn user_store_shares_the_catalog_connection() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("storefront.duckdb");

    let catalog = DuckdbCatalogRepository::new(&db_path).expect("duckdb init");
    let users = Arc::new(
        DuckdbUserRepository::with_connection(catalog.shared_connection())
            .await
            .expect("users init"),
    );

    let lamp = product("Lamp", "Lighting", 40.0, None);
    catalog.insert(&lamp).await.expect("insert");

    let mut ada = User::new("Ada".into(), "Ada@Example.com".into(), "pw1");
    ada.toggle_wishlist(&lamp.id);
    users.save(&ada).await.expect("save");

    let by_email = users
        .find_by_email("ADA@example.com ")
        .await
        .expect("find_by_email")
        .expect("user exists");
    assert_eq!(by_email.id(), ada.id());
    assert_eq!(by_email.wishlist(), &[lamp.id.clone()]);
    assert!(by_email.verify_password("pw1"));
    assert!(!by_email.verify_password("pw2"));
}

#[tokio::test]
async fn user_store_enforces_unique_email_and_updates_in_place() {
    let catalog = DuckdbCatalogRepository::in_memory().expect("duckdb init");
    let users = DuckdbUserRepository::with_connection(catalog.shared_connection())
        .await
        .expect("users init");

    let mut ada = User::new("Ada".into(), "ada@example.com".into(), "pw");
    users.save(&ada).await.expect("save");

    let clash = User::new("Other".into(), "ADA@example.com".into(), "pw");
    assert!(users.save(&clash).await.unwrap_err().is_already_exists());

    ada.set_name("Ada Lovelace".into());
    users.save(&ada).await.expect("resave");

    let all = users.list().await.expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name(), "Ada Lovelace");

    assert!(users.delete(ada.id()).await.expect("delete"));
    assert!(users.find_by_id(ada.id()).await.expect("find").is_none());
}

#[tokio::test]
async fn user_store_modify_keeps_concurrent_changes() {
    let catalog = DuckdbCatalogRepository::in_memory().expect("duckdb init");
    let users = Arc::new(
        DuckdbUserRepository::with_connection(catalog.shared_connection())
            .await
            .expect("users init"),
    );

    let ada = User::new("Ada".into(), "ada@example.com".into(), "pw");
    users.save(&ada).await.expect("save");

    let mut handles = Vec::new();
    for i in 0..6 {
        let users = users.clone();
        let id = ada.id().to_string();
        handles.push(tokio::spawn(async move {
            users
                .modify(
                    &id,
                    Box::new(move |user: &mut User| {
                        user.toggle_wishlist(&format!("product-{i}"));
                    }),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("modify").expect("user exists");
    }

    let stored = users.find_by_id(ada.id()).await.unwrap().unwrap();
    assert_eq!(stored.wishlist().len(), 6);

    let missing = users
        .modify("missing", Box::new(|user: &mut User| user.set_name("x".into())))
        .await
        .expect("modify");
    assert!(missing.is_none());
}

#[tokio::test]
async fn unreadable_wishlist_loads_as_empty() {
    let catalog = DuckdbCatalogRepository::in_memory().expect("duckdb init");
    let conn = catalog.shared_connection();
    let users = DuckdbUserRepository::with_connection(conn.clone())
        .await
        .expect("users init");

    let mut ada = User::new("Ada".into(), "ada@example.com".into(), "pw");
    ada.toggle_wishlist("product-1");
    users.save(&ada).await.expect("save");

    conn.lock()
        .await
        .execute("UPDATE users SET wishlist = 'not json'", [])
        .expect("corrupt wishlist");

    let loaded = users
        .find_by_id(ada.id())
        .await
        .expect("find")
        .expect("user exists");
    assert!(loaded.wishlist().is_empty());
    assert!(loaded.verify_password("pw"));
}
