use std::io::Write;
use std::sync::Arc;

use order_desk::services::{ImageService, MenuService};
use order_desk::store::{MemoryBlobStore, MemoryStore, RestAuthenticator};
use order_desk::{Config, DeskState, ErrorCode};
use rust_decimal::Decimal;
use serde_json::json;
use shared::models::{FoodUpsert, SideUpsert};

fn food(name: &str, price: i64, category_id: i64) -> FoodUpsert {
    FoodUpsert {
        name: name.into(),
        description: "Smoky party jollof".into(),
        price: Decimal::new(price, 0),
        image_url: String::new(),
        category_id,
        is_available: true,
    }
}

fn side(name: &str, side_type: &str) -> SideUpsert {
    SideUpsert {
        name: name.into(),
        price: Decimal::new(500, 0),
        side_type: side_type.into(),
        image_url: String::new(),
    }
}

fn seeded() -> (Arc<MemoryStore>, MenuService) {
    let store = Arc::new(MemoryStore::new());
    store.seed(
        "categories",
        [
            json!({ "id": 1, "name": "Rice", "created_at": "2026-10-01T08:00:00+00:00" }),
            json!({ "id": 2, "name": "Soups", "created_at": "2026-10-02T08:00:00+00:00" }),
        ],
    );
    store.seed(
        "foods",
        [
            json!({ "id": 10, "category_id": 1, "name": "Jollof Rice", "description": null, "price": 2500,
                    "image_url": null, "is_available": true, "created_at": "2026-10-03T08:00:00+00:00" }),
            json!({ "id": 11, "category_id": 1, "name": "Fried Rice", "description": null, "price": 2700,
                    "image_url": null, "is_available": false, "created_at": "2026-10-04T08:00:00+00:00" }),
            json!({ "id": 12, "category_id": 2, "name": "Egusi", "description": null, "price": 3000,
                    "image_url": null, "is_available": true, "created_at": "2026-10-05T08:00:00+00:00" }),
        ],
    );
    let menu = MenuService::new(store.clone());
    (store, menu)
}

#[tokio::test]
async fn test_categories_newest_first_and_crud() {
    let (_, menu) = seeded();

    let names: Vec<String> = menu
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Soups", "Rice"]);

    let created = menu.create_category("  Grills ").await.unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(created.name, "Grills");

    menu.rename_category(created.id, "Suya & Grills").await.unwrap();
    let err = menu.rename_category(99, "Nothing").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CategoryNotFound);

    let err = menu.create_category("   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RequiredField);
}

#[tokio::test]
async fn test_category_delete_removes_linked_foods_first() {
    let (store, menu) = seeded();

    menu.delete_category(1).await.unwrap();

    let foods: Vec<i64> = store
        .rows("foods")
        .iter()
        .filter_map(|f| f["id"].as_i64())
        .collect();
    assert_eq!(foods, vec![12]);
    assert_eq!(store.rows("categories").len(), 1);
}

#[tokio::test]
async fn test_category_delete_aborts_when_foods_cannot_be_removed() {
    let (store, menu) = seeded();
    store.fail_table("foods");

    let err = menu.delete_category(1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CategoryHasFoods);
    assert_eq!(err.message, "Error deleting associated foods");
    assert_eq!(store.rows("categories").len(), 2);
}

#[tokio::test]
async fn test_foods_listing_with_category_names() {
    let (_, menu) = seeded();

    let all = menu.list_foods(None).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![12, 11, 10]);
    assert_eq!(all[0].category_name(), Some("Soups"));
    assert_eq!(all[2].category_name(), Some("Rice"));

    let rice = menu.list_foods(Some(1)).await.unwrap();
    assert_eq!(rice.len(), 2);
    assert!(rice.iter().all(|f| f.category_id == 1));
}

#[tokio::test]
async fn test_food_save_replaces_side_links() {
    let (store, menu) = seeded();

    let id = menu.save_food(None, &food("Ofada Rice", 3200, 1), &[1, 2]).await.unwrap();
    assert_eq!(id, 13);
    assert_eq!(menu.linked_side_ids(id).await.unwrap(), vec![1, 2]);

    menu.save_food(Some(id), &food("Ofada Rice (Large)", 4000, 1), &[3])
        .await
        .unwrap();
    assert_eq!(menu.linked_side_ids(id).await.unwrap(), vec![3]);

    menu.save_food(Some(id), &food("Ofada Rice (Large)", 4000, 1), &[])
        .await
        .unwrap();
    assert!(menu.linked_side_ids(id).await.unwrap().is_empty());

    let stored = store
        .rows("foods")
        .into_iter()
        .find(|f| f["id"] == id)
        .unwrap();
    assert_eq!(stored["name"], "Ofada Rice (Large)");
}

#[tokio::test]
async fn test_food_save_survives_link_failure() {
    let (store, menu) = seeded();
    store.fail_table("food_sides");

    let id = menu.save_food(None, &food("Ofada Rice", 3200, 1), &[1]).await.unwrap();
    assert!(store.rows("foods").iter().any(|f| f["id"] == id));
}

#[tokio::test]
async fn test_food_validation_and_missing_rows() {
    let (store, menu) = seeded();

    let err = menu.save_food(None, &food("", 3200, 1), &[]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RequiredField);
    let err = menu.save_food(None, &food("Ofada", -1, 1), &[]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::FoodInvalidPrice);
    assert_eq!(store.rows("foods").len(), 3);

    let err = menu.save_food(Some(404), &food("Ghost", 100, 1), &[]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::FoodNotFound);
    let err = menu.delete_food(404).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::FoodNotFound);
}

#[tokio::test]
async fn test_toggle_availability_and_delete() {
    let (store, menu) = seeded();

    assert!(menu.toggle_availability(11, false).await.unwrap());
    let row = store.rows("foods").into_iter().find(|f| f["id"] == 11).unwrap();
    assert_eq!(row["is_available"], true);

    menu.delete_food(11).await.unwrap();
    assert_eq!(store.rows("foods").len(), 2);
}

#[tokio::test]
async fn test_sides_crud_and_grouping() {
    let (_, menu) = seeded();

    let plantain = menu.save_side(None, &side("Plantain", "side")).await.unwrap();
    let chicken = menu.save_side(None, &side("Chicken", "protein")).await.unwrap();
    let coke = menu.save_side(None, &side("Coke", "drink")).await.unwrap();

    menu.save_side(Some(coke), &side("Zobo", "drink")).await.unwrap();
    let err = menu.save_side(None, &side("Cake", "dessert")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    let dodo = menu.save_side(None, &side("Dodo", " ")).await.unwrap();

    let sides = menu.list_sides().await.unwrap();
    assert_eq!(sides.len(), 4);
    let stored = sides.iter().find(|s| s.id == dodo).unwrap();
    assert_eq!(stored.side_type(), "side");
    let groups = order_desk::services::group_sides_by_type(&sides);
    let types: Vec<&str> = groups.iter().map(|g| g.side_type.as_str()).collect();
    assert_eq!(types, vec!["side", "protein", "drink"]);
    assert_eq!(groups[2].sides[0].name, "Zobo");

    menu.delete_side(plantain).await.unwrap();
    menu.delete_side(chicken).await.unwrap();
    let err = menu.delete_side(chicken).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SideNotFound);
}

#[tokio::test]
async fn test_upload_local_file() {
    let blobs = Arc::new(MemoryBlobStore::new("https://abc.example.co"));
    let images = ImageService::new(blobs.clone(), "food-images");

    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

    let uploaded = images.upload_file(file.path()).await.unwrap();
    assert!(uploaded.path.ends_with(".png"));
    assert_eq!(uploaded.content_type, "image/png");
    assert!(
        uploaded
            .public_url
            .starts_with("https://abc.example.co/storage/v1/object/public/food-images/")
    );
    assert_eq!(blobs.get("food-images", &uploaded.path).unwrap().data.len(), 4);
}

#[tokio::test]
async fn test_desk_state_over_memory_stores() {
    let config = Config::with_backend("http://localhost:54321", "anon");
    let store = Arc::new(MemoryStore::new());
    let blobs = Arc::new(MemoryBlobStore::default());
    let client = order_desk::store::BackendClient::new(&config).unwrap();

    let state = DeskState::with_stores(
        config,
        store,
        blobs,
        Arc::new(RestAuthenticator::new(client)),
    );
    assert_eq!(state.images.bucket(), state.config.image_bucket);
    assert!(state.menu.list_categories().await.unwrap().is_empty());
    assert!(state.orders.load_order_batch().await.orders.is_empty());
}
