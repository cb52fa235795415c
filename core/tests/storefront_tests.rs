// tests/storefront_tests.rs
mod common;

use common::*;
use rust_decimal::Decimal;
use uuid::Uuid;
use verdant::models::{NewPlant, Seller};
use verdant::payment::PaymentStatus;
use verdant::{CheckoutRequest, MemoryStore, Storefront, VerdantError};
use verdant::checkout::CheckoutCustomer;

fn checkout_request(plant_id: &str, price: Decimal, quantity: i64) -> CheckoutRequest {
  CheckoutRequest {
    price,
    name: "Monstera".to_string(),
    description: Some("Swiss cheese plant".to_string()),
    image: Some("https://img.example/monstera.png".to_string()),
    quantity,
    plant_id: plant_id.to_string(),
    customer: CheckoutCustomer {
      email: "buyer@example.com".to_string(),
      name: Some("Bea".to_string()),
      image: None,
    },
  }
}

#[tokio::test]
async fn start_checkout_builds_a_single_item_session() {
  setup_tracing();
  let p = plant("Monstera", 3, Decimal::new(1000, 2));
  let store = MemoryStore::with_plants([p.clone()]);
  let gateway = ScriptedGateway::new();
  let shop = Storefront::new(backends(&store, gateway.clone()), settings());

  let created = shop
    .start_checkout(checkout_request(&p.id.to_string(), Decimal::new(1000, 2), 1))
    .await
    .unwrap();

  assert_eq!(created.id, "cs_test_1");
  assert_eq!(created.url, "https://checkout.stripe.test/c/pay/cs_test_1");
  let requests = gateway.created_requests();
  assert_eq!(requests.len(), 1);
  let req = &requests[0];
  assert_eq!(req.line_item.unit_amount_minor, 1000);
  assert_eq!(req.line_item.quantity, 1);
  assert_eq!(req.line_item.name, "Monstera");
  assert_eq!(req.currency, "usd");
  assert_eq!(req.customer_email, "buyer@example.com");
  assert_eq!(req.metadata.plant_id, p.id.to_string());
  assert_eq!(req.metadata.customer, "buyer@example.com");
  assert_eq!(
    req.success_url,
    "https://shop.example/payment-success?session_id={CHECKOUT_SESSION_ID}"
  );
  assert_eq!(req.cancel_url, format!("https://shop.example/plant/{}", p.id));
}

#[tokio::test]
async fn checkout_then_fulfill_walks_the_whole_flow() {
  setup_tracing();
  let p = plant("Monstera", 3, Decimal::new(1000, 2));
  let store = MemoryStore::with_plants([p.clone()]);
  let gateway = ScriptedGateway::new();
  let shop = Storefront::new(backends(&store, gateway.clone()), settings());

  let created = shop
    .start_checkout(checkout_request(&p.id.to_string(), Decimal::new(1000, 2), 1))
    .await
    .unwrap();
  gateway.put_session(paid_session(&created.id, &p, "pi_1", 1000));
  shop.fulfill(&created.id).await.unwrap();
  shop.fulfill(&created.id).await.unwrap();

  let mine = shop.customer_orders("buyer@example.com").await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].transaction_id, "pi_1");
  assert_eq!(shop.plant(p.id).await.unwrap().quantity, 2);
  assert_eq!(shop.seller_orders(&p.seller.email).await.unwrap().len(), 1);
}

#[tokio::test]
async fn checkout_for_missing_or_sold_out_plants_is_refused() {
  setup_tracing();
  let sold_out = plant("Fern", 0, Decimal::new(500, 2));
  let store = MemoryStore::with_plants([sold_out.clone()]);
  let gateway = ScriptedGateway::new();
  let shop = Storefront::new(backends(&store, gateway.clone()), settings());

  let missing = shop
    .start_checkout(checkout_request(&Uuid::new_v4().to_string(), Decimal::ONE, 1))
    .await
    .unwrap_err();
  assert!(matches!(missing, VerdantError::NotFound(_)));

  let empty = shop
    .start_checkout(checkout_request(&sold_out.id.to_string(), Decimal::ONE, 1))
    .await
    .unwrap_err();
  assert!(matches!(empty, VerdantError::OutOfStock { plant_id } if plant_id == sold_out.id));

  let garbled = shop
    .start_checkout(checkout_request("P1", Decimal::ONE, 1))
    .await
    .unwrap_err();
  assert!(matches!(garbled, VerdantError::Validation(_)));

  assert!(gateway.created_requests().is_empty());
}

#[tokio::test]
async fn checkout_rejects_non_positive_amounts() {
  setup_tracing();
  let p = plant("Monstera", 3, Decimal::new(1000, 2));
  let store = MemoryStore::with_plants([p.clone()]);
  let shop = Storefront::new(backends(&store, ScriptedGateway::new()), settings());

  let zero_price = shop
    .start_checkout(checkout_request(&p.id.to_string(), Decimal::ZERO, 1))
    .await
    .unwrap_err();
  assert!(matches!(zero_price, VerdantError::Validation(_)));

  let zero_qty = shop
    .start_checkout(checkout_request(&p.id.to_string(), Decimal::ONE, 0))
    .await
    .unwrap_err();
  assert!(matches!(zero_qty, VerdantError::Validation(_)));
}

#[tokio::test]
async fn checkout_rejects_a_price_too_large_to_charge() {
  setup_tracing();
  let p = plant("Monstera", 3, Decimal::new(1000, 2));
  let store = MemoryStore::with_plants([p.clone()]);
  let gateway = ScriptedGateway::new();
  let shop = Storefront::new(backends(&store, gateway.clone()), settings());

  let request: CheckoutRequest = serde_json::from_value(serde_json::json!({
    "price": 1e27,
    "name": "Monstera",
    "quantity": 1,
    "plantId": p.id.to_string(),
    "customer": { "email": "buyer@example.com" }
  }))
  .unwrap();
  let err = shop.start_checkout(request).await.unwrap_err();

  assert!(matches!(err, VerdantError::Validation(_)));
  assert!(gateway.created_requests().is_empty());
}

#[tokio::test]
async fn listings_are_filtered_by_owner() {
  setup_tracing();
  let store = MemoryStore::new();
  let shop = Storefront::new(backends(&store, ScriptedGateway::new()), settings());

  let mine = shop
    .create_plant(NewPlant {
      name: "Aloe".to_string(),
      description: String::new(),
      category: "Succulent".to_string(),
      price: Decimal::new(850, 2),
      quantity: 2,
      image: String::new(),
      seller: seller(),
    })
    .await
    .unwrap();
  shop
    .create_plant(NewPlant {
      name: "Basil".to_string(),
      description: String::new(),
      category: "Herb".to_string(),
      price: Decimal::new(300, 2),
      quantity: 10,
      image: String::new(),
      seller: Seller {
        email: "other@example.com".to_string(),
        name: "Other".to_string(),
        image: None,
      },
    })
    .await
    .unwrap();

  assert_eq!(shop.list_plants().await.unwrap().len(), 2);
  let inventory = shop.inventory("grower@example.com").await.unwrap();
  assert_eq!(inventory.len(), 1);
  assert_eq!(inventory[0].id, mine);
  assert!(shop.inventory("nobody@example.com").await.unwrap().is_empty());
  assert!(shop.customer_orders("buyer@example.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn customer_orders_exclude_other_buyers() {
  setup_tracing();
  let p = plant("Cactus", 5, Decimal::new(700, 2));
  let store = MemoryStore::with_plants([p.clone()]);
  let gateway = ScriptedGateway::new();
  gateway.put_session(paid_session("S_a", &p, "pi_a", 700));
  let mut other = paid_session("S_b", &p, "pi_b", 700);
  other.metadata.customer = "someone@example.com".to_string();
  gateway.put_session(other);
  gateway.put_session(session("S_c", PaymentStatus::Unpaid, &p.id.to_string(), None, 700));
  let shop = Storefront::new(backends(&store, gateway), settings());

  for id in ["S_a", "S_b", "S_c"] {
    shop.fulfill(id).await.unwrap();
  }

  let mine = shop.customer_orders("buyer@example.com").await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].transaction_id, "pi_a");
  assert_eq!(shop.customer_orders("someone@example.com").await.unwrap().len(), 1);
  assert_eq!(shop.plant(p.id).await.unwrap().quantity, 3);
}

#[tokio::test]
async fn invalid_new_plant_is_rejected_before_storage() {
  setup_tracing();
  let store = MemoryStore::new();
  let shop = Storefront::new(backends(&store, ScriptedGateway::new()), settings());

  let err = shop
    .create_plant(NewPlant {
      name: "  ".to_string(),
      description: String::new(),
      category: String::new(),
      price: Decimal::ONE,
      quantity: 1,
      image: String::new(),
      seller: seller(),
    })
    .await
    .unwrap_err();

  assert!(matches!(err, VerdantError::Validation(_)));
  assert!(shop.list_plants().await.unwrap().is_empty());
}
