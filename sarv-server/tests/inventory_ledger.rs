//! Inventory ledger invariants: the running stock counter is always the sum
//! of the product's ledger entries, under every mutation path.

mod common;

use common::{seed_user, test_state};
use sarv_server::db::models::{ProductCreate, ProductUpdate, SubscriptionTier};
use sarv_server::db::repository::{RepoError, product as product_repo};
use sarv_server::utils::snowflake_id;

fn product_input(name: &str, stock: Option<i64>) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        price: 200_000.0,
        stock,
        stock_unit: Some("kg".to_string()),
        category: "beans".to_string(),
        purchase_date: None,
        expiration_date: None,
    }
}

async fn assert_ledger_reconciles(
    pool: &sqlx::SqlitePool,
    user_id: i64,
    product_id: i64,
) {
    let product = product_repo::find_owned(pool, user_id, product_id)
        .await
        .expect("product");
    let sum = product_repo::ledger_sum(pool, product_id).await.expect("sum");
    assert_eq!(
        product.stock, sum,
        "stock counter diverged from ledger sum"
    );
}

#[tokio::test]
async fn initial_stock_is_logged_once() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000001", "secret1", SubscriptionTier::Basic, true).await;

    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(10)))
        .await
        .expect("create");
    assert_eq!(product.stock, 10);

    let ledger = product_repo::ledger(state.pool(), user, product.id)
        .await
        .expect("ledger");
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].change, 10);
    assert_eq!(ledger[0].reason, "initial stock");
    assert_ledger_reconciles(state.pool(), user, product.id).await;
}

#[tokio::test]
async fn zero_initial_stock_creates_no_entry() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000002", "secret1", SubscriptionTier::Basic, true).await;

    let product = product_repo::create(state.pool(), user, product_input("Milk", None))
        .await
        .expect("create");
    assert_eq!(product.stock, 0);
    let ledger = product_repo::ledger(state.pool(), user, product.id)
        .await
        .expect("ledger");
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn create_requires_name_price_category() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000003", "secret1", SubscriptionTier::Basic, true).await;

    let mut bad = product_input("", Some(1));
    assert!(matches!(
        product_repo::create(state.pool(), user, bad.clone()).await,
        Err(RepoError::Validation(_))
    ));
    bad.name = "Beans".to_string();
    bad.category = " ".to_string();
    assert!(matches!(
        product_repo::create(state.pool(), user, bad.clone()).await,
        Err(RepoError::Validation(_))
    ));
    bad.category = "beans".to_string();
    bad.price = -1.0;
    assert!(matches!(
        product_repo::create(state.pool(), user, bad).await,
        Err(RepoError::Validation(_))
    ));
}

#[tokio::test]
async fn adjustment_appends_exactly_one_entry() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000004", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(10)))
        .await
        .expect("create");

    let adjusted = product_repo::adjust_stock(state.pool(), user, product.id, -3, "breakage")
        .await
        .expect("adjust");
    assert_eq!(adjusted.stock, 7);

    let ledger = product_repo::ledger(state.pool(), user, product.id)
        .await
        .expect("ledger");
    assert_eq!(ledger.len(), 2);
    let breakage = ledger.iter().find(|e| e.reason == "breakage").expect("entry");
    assert_eq!(breakage.change, -3);
    // the initial entry is untouched
    let initial = ledger
        .iter()
        .find(|e| e.reason == "initial stock")
        .expect("initial entry");
    assert_eq!(initial.change, 10);
    assert_ledger_reconciles(state.pool(), user, product.id).await;
}

#[tokio::test]
async fn negative_resulting_stock_is_permitted_and_reconciles() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000005", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(2)))
        .await
        .expect("create");

    let adjusted = product_repo::adjust_stock(state.pool(), user, product.id, -5, "spillage")
        .await
        .expect("adjust");
    assert_eq!(adjusted.stock, -3);
    assert_ledger_reconciles(state.pool(), user, product.id).await;
}

#[tokio::test]
async fn stock_patch_logs_the_delta_as_manual_correction() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000006", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(10)))
        .await
        .expect("create");

    let updated = product_repo::update(
        state.pool(),
        user,
        product.id,
        ProductUpdate {
            stock: Some(23),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.stock, 23);

    let ledger = product_repo::ledger(state.pool(), user, product.id)
        .await
        .expect("ledger");
    let correction = ledger
        .iter()
        .find(|e| e.reason == "manual correction")
        .expect("correction entry");
    assert_eq!(correction.change, 13);
    assert_ledger_reconciles(state.pool(), user, product.id).await;
}

#[tokio::test]
async fn non_stock_patches_do_not_touch_the_ledger() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000007", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(10)))
        .await
        .expect("create");

    // same stock value: no delta, no entry
    let updated = product_repo::update(
        state.pool(),
        user,
        product.id,
        ProductUpdate {
            name: Some("Arabica Beans".to_string()),
            price: Some(250_000.0),
            stock: Some(10),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.name, "Arabica Beans");
    assert_eq!(updated.stock, 10);

    let ledger = product_repo::ledger(state.pool(), user, product.id)
        .await
        .expect("ledger");
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn foreign_products_are_forbidden_not_filtered() {
    let state = test_state().await;
    let owner = seed_user(&state, "09120000008", "secret1", SubscriptionTier::Basic, true).await;
    let intruder =
        seed_user(&state, "09120000009", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), owner, product_input("Beans", Some(10)))
        .await
        .expect("create");

    let result =
        product_repo::adjust_stock(state.pool(), intruder, product.id, -1, "tamper").await;
    assert!(matches!(result, Err(RepoError::Forbidden(_))));

    // the owner's stock and ledger are untouched
    let unchanged = product_repo::find_owned(state.pool(), owner, product.id)
        .await
        .expect("product");
    assert_eq!(unchanged.stock, 10);
    assert_ledger_reconciles(state.pool(), owner, product.id).await;
}

#[tokio::test]
async fn delete_with_recorded_sales_conflicts_and_leaves_everything() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000010", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(10)))
        .await
        .expect("create");

    // a direct raw-material sale line referencing the product
    let sale_id = snowflake_id();
    sqlx::query("INSERT INTO sale (id, user_id, total, tax, payment_method, created_at) VALUES (?, ?, 200000, 0, 'CASH', 0)")
        .bind(sale_id)
        .bind(user)
        .execute(state.pool())
        .await
        .expect("sale row");
    sqlx::query("INSERT INTO sale_item (id, sale_id, product_id, qty, price) VALUES (?, ?, ?, 1, 200000)")
        .bind(snowflake_id())
        .bind(sale_id)
        .bind(product.id)
        .execute(state.pool())
        .await
        .expect("sale item row");

    let result = product_repo::delete(state.pool(), user, product.id).await;
    assert!(matches!(result, Err(RepoError::Conflict(_))));

    // product and ledger survive the refused delete
    let survivor = product_repo::find_owned(state.pool(), user, product.id)
        .await
        .expect("product still there");
    assert_eq!(survivor.stock, 10);
    let ledger = product_repo::ledger(state.pool(), user, product.id)
        .await
        .expect("ledger");
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn clean_delete_cascades_the_ledger() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000011", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(10)))
        .await
        .expect("create");

    product_repo::delete(state.pool(), user, product.id)
        .await
        .expect("delete");

    assert!(matches!(
        product_repo::find_owned(state.pool(), user, product.id).await,
        Err(RepoError::NotFound(_))
    ));
    let sum = product_repo::ledger_sum(state.pool(), product.id)
        .await
        .expect("sum");
    assert_eq!(sum, 0, "ledger entries must be gone");
}

#[tokio::test]
async fn mixed_operation_sequence_always_reconciles() {
    let state = test_state().await;
    let user = seed_user(&state, "09120000012", "secret1", SubscriptionTier::Basic, true).await;
    let product = product_repo::create(state.pool(), user, product_input("Beans", Some(5)))
        .await
        .expect("create");

    product_repo::adjust_stock(state.pool(), user, product.id, 7, "restock")
        .await
        .expect("adjust");
    product_repo::update(
        state.pool(),
        user,
        product.id,
        ProductUpdate {
            stock: Some(4),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    product_repo::adjust_stock(state.pool(), user, product.id, -4, "sold out")
        .await
        .expect("adjust");

    let product = product_repo::find_owned(state.pool(), user, product.id)
        .await
        .expect("product");
    assert_eq!(product.stock, 0);
    assert_ledger_reconciles(state.pool(), user, product.id).await;
}
