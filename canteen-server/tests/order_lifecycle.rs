//! Order lifecycle integration tests
//!
//! Drives the OrdersManager against an in-memory database: creation
//! validation, the transition table, ownership rules, event emission and the
//! per-order concurrency guard.

use std::sync::Arc;

use canteen_server::auth::CurrentUser;
use canteen_server::db::DbService;
use canteen_server::db::models::{
    CreateOrderRequest, MenuItemCreate, OrderLineRequest, OrderStatus,
};
use canteen_server::db::repository::{MenuItemRepository, OrderRepository};
use canteen_server::events::{EventBus, LifecycleEvent};
use canteen_server::orders::{OrderError, OrdersManager};
use tokio::sync::broadcast::error::TryRecvError;

fn student(id: &str, name: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        username: name.to_string(),
        role: "student".to_string(),
    }
}

fn request(lines: &[(&str, Option<u32>)]) -> CreateOrderRequest {
    CreateOrderRequest {
        items: lines
            .iter()
            .map(|(name, quantity)| OrderLineRequest {
                name: name.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

/// Fresh manager over an in-memory store with a small seeded catalog
async fn setup() -> (Arc<OrdersManager>, EventBus) {
    let db = DbService::memory().await.expect("in-memory db");

    let menu = MenuItemRepository::new(db.db.clone());
    for (name, price, available) in [
        ("Tea", 10.0, true),
        ("Samosa", 15.0, true),
        ("Coffee", 20.0, false),
    ] {
        menu.create(MenuItemCreate {
            name: name.to_string(),
            price,
            category: None,
            description: None,
            available: Some(available),
        })
        .await
        .expect("seed menu");
    }

    let events = EventBus::new();
    let manager = OrdersManager::new(
        OrderRepository::new(db.db.clone()),
        Arc::new(menu),
        events.clone(),
    )
    .await
    .expect("orders manager");

    (Arc::new(manager), events)
}

#[tokio::test]
async fn create_snapshots_catalog_price() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(2))]))
        .await
        .expect("create order");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 20.0);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].unit_price, 10.0);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.owner_id, "user:ravi");
    assert!(order.id.is_some());
}

#[tokio::test]
async fn quantity_defaults_to_one() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(2)), ("Samosa", None)]))
        .await
        .expect("create order");

    assert_eq!(order.items[1].quantity, 1);
    assert_eq!(order.total_amount, 35.0);
}

#[tokio::test]
async fn empty_order_persists_nothing_and_emits_nothing() {
    let (manager, events) = setup().await;
    let mut rx = events.subscribe();
    let ravi = student("user:ravi", "ravi");

    let err = manager.create(&ravi, request(&[])).await.unwrap_err();
    assert!(matches!(err, OrderError::EmptyOrder));

    assert!(manager.list_all().await.unwrap().is_empty());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn unknown_item_rejected() {
    let (manager, events) = setup().await;
    let mut rx = events.subscribe();
    let ravi = student("user:ravi", "ravi");

    let err = manager
        .create(&ravi, request(&[("Pizza", Some(1))]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ItemUnavailable(name) if name == "Pizza"));

    assert!(manager.list_all().await.unwrap().is_empty());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn unavailable_item_rejected() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    // Coffee exists in the catalog but is flagged unavailable
    let err = manager
        .create(&ravi, request(&[("Tea", Some(1)), ("Coffee", Some(1))]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ItemUnavailable(name) if name == "Coffee"));
    assert!(manager.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_quantity_rejected() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let err = manager
        .create(&ravi, request(&[("Tea", Some(0))]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidOrder(_)));
    assert!(manager.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_walks_the_full_happy_path() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();

    for target in [
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        let updated = manager.set_status(&id, target).await.expect("transition");
        assert_eq!(updated.status, target);
    }
}

#[tokio::test]
async fn skipping_a_stage_is_rejected() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();

    // pending -> ready is not an edge
    let err = manager.set_status(&id, OrderStatus::Ready).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Ready
        }
    ));

    let listed = manager.list_for_owner("user:ravi").await.unwrap();
    assert_eq!(listed[0].status, OrderStatus::Pending);
}

#[tokio::test]
async fn no_op_and_terminal_transitions_rejected_consistently() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();

    // Same-state no-op
    assert!(matches!(
        manager.set_status(&id, OrderStatus::Pending).await.unwrap_err(),
        OrderError::InvalidTransition { .. }
    ));

    manager.set_status(&id, OrderStatus::Cancelled).await.unwrap();

    // Terminal state admits nothing; rejection is identical on repeat
    for _ in 0..2 {
        let err = manager
            .set_status(&id, OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Preparing
            }
        ));
    }

    let listed = manager.list_for_owner("user:ravi").await.unwrap();
    assert_eq!(listed[0].status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn unknown_order_id_is_not_found() {
    let (manager, _events) = setup().await;

    let err = manager
        .set_status("order:doesnotexist", OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));

    let err = manager
        .set_status("garbage", OrderStatus::Preparing)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));
}

#[tokio::test]
async fn owner_cancels_pending_order() {
    let (manager, events) = setup().await;
    let mut rx = events.subscribe();
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();

    let cancelled = manager.cancel_own(&id, &ravi).await.expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Created then updated, both for this order
    assert!(matches!(rx.recv().await.unwrap(), LifecycleEvent::OrderCreated(_)));
    match rx.recv().await.unwrap() {
        LifecycleEvent::OrderUpdated(updated) => {
            assert_eq!(updated.id_string(), id);
            assert_eq!(updated.status, OrderStatus::Cancelled);
        }
        other => panic!("expected OrderUpdated, got {:?}", other),
    }
}

#[tokio::test]
async fn non_owner_cannot_cancel() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");
    let mala = student("user:mala", "mala");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();

    let err = manager.cancel_own(&id, &mala).await.unwrap_err();
    assert!(matches!(err, OrderError::Forbidden));

    let listed = manager.list_for_owner("user:ravi").await.unwrap();
    assert_eq!(listed[0].status, OrderStatus::Pending);
}

#[tokio::test]
async fn owner_cannot_cancel_once_preparing() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();

    manager.set_status(&id, OrderStatus::Preparing).await.unwrap();

    let err = manager.cancel_own(&id, &ravi).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Preparing,
            to: OrderStatus::Cancelled
        }
    ));
}

#[tokio::test]
async fn conflicting_concurrent_transitions_resolve_to_one_winner() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();
    manager.set_status(&id, OrderStatus::Preparing).await.unwrap();

    // Both start from `preparing`; only one may win
    let m1 = manager.clone();
    let m2 = manager.clone();
    let id1 = id.clone();
    let id2 = id.clone();
    let t1 = tokio::spawn(async move { m1.set_status(&id1, OrderStatus::Ready).await });
    let t2 = tokio::spawn(async move { m2.set_status(&id2, OrderStatus::Cancelled).await });

    let r1 = t1.await.unwrap();
    let r2 = t2.await.unwrap();

    let successes = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one transition may succeed");

    let failure = if r1.is_err() { r1.unwrap_err() } else { r2.unwrap_err() };
    assert!(matches!(failure, OrderError::InvalidTransition { .. }));

    let final_status = manager.list_for_owner("user:ravi").await.unwrap()[0].status;
    assert!(matches!(
        final_status,
        OrderStatus::Ready | OrderStatus::Cancelled
    ));
}

#[tokio::test]
async fn order_created_precedes_updates_for_the_same_order() {
    let (manager, events) = setup().await;
    let mut rx = events.subscribe();
    let ravi = student("user:ravi", "ravi");

    let order = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let id = order.id_string();
    manager.set_status(&id, OrderStatus::Preparing).await.unwrap();

    match rx.recv().await.unwrap() {
        LifecycleEvent::OrderCreated(created) => assert_eq!(created.id_string(), id),
        other => panic!("expected OrderCreated first, got {:?}", other),
    }
    match rx.recv().await.unwrap() {
        LifecycleEvent::OrderUpdated(updated) => assert_eq!(updated.id_string(), id),
        other => panic!("expected OrderUpdated second, got {:?}", other),
    }
}

#[tokio::test]
async fn listings_are_newest_first() {
    let (manager, _events) = setup().await;
    let ravi = student("user:ravi", "ravi");
    let mala = student("user:mala", "mala");

    let first = manager
        .create(&ravi, request(&[("Tea", Some(1))]))
        .await
        .unwrap();
    let second = manager
        .create(&mala, request(&[("Samosa", Some(1))]))
        .await
        .unwrap();
    let third = manager
        .create(&ravi, request(&[("Tea", Some(3))]))
        .await
        .unwrap();

    let mine = manager.list_for_owner("user:ravi").await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id_string(), third.id_string());
    assert_eq!(mine[1].id_string(), first.id_string());

    let all = manager.list_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id_string(), third.id_string());
    assert_eq!(all[1].id_string(), second.id_string());
    assert_eq!(all[2].id_string(), first.id_string());

    // Owner identity rides along for the admin view
    assert_eq!(all[1].owner_name, "mala");
}
