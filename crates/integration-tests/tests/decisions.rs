//! Integration tests for the order decision flow.
//!
//! These drive approve/reject/list through tool calls and the in-memory
//! store, then round-trip the result through an order file on disk.

#![allow(clippy::unwrap_used)]

use polvo_planner_core::{OrderId, OrderStatus};
use polvo_planner_engine::{
    DecisionDesk, DecisionError, DecisionOutcome, EngineConfig, InMemoryOrderStore, OrderStore,
    tool_definitions,
};
use polvo_planner_integration_tests::{OrderFixture, temp_path};
use rust_decimal_macros::dec;
use serde_json::json;

fn sample_store() -> (InMemoryOrderStore, OrderId, OrderId) {
    let luna = OrderFixture::new("Cafe Luna")
        .quantity(5)
        .price(dec!(50))
        .hours(dec!(2))
        .build();
    let stall = OrderFixture::new("Market stall")
        .quantity(2)
        .price(dec!(30))
        .hours(dec!(1))
        .build();
    let (luna_id, stall_id) = (luna.id, stall.id);
    let store = InMemoryOrderStore::new(vec![luna, stall]).unwrap();
    (store, luna_id, stall_id)
}

fn pending_count(desk: &mut DecisionDesk<'_, InMemoryOrderStore>) -> usize {
    match desk.handle_tool_call("listPendingOrders", &json!({})).unwrap() {
        DecisionOutcome::Pending(list) => list.len(),
        other => panic!("unexpected outcome {other:?}"),
    }
}

// =============================================================================
// Tool dispatch
// =============================================================================

#[test]
fn test_every_defined_tool_dispatches() {
    let (mut store, luna_id, _) = sample_store();
    let config = EngineConfig::default();
    let mut desk = DecisionDesk::new(&mut store, &config);

    for tool in tool_definitions() {
        let input = if tool.input_schema["required"].is_array() {
            json!({ "orderId": luna_id.to_string() })
        } else {
            json!({})
        };
        // Tools run in definition order: approve, then reject on the same order.
        let result = desk.handle_tool_call(&tool.name, &input);
        match tool.name.as_str() {
            "approveOrder" | "listPendingOrders" => assert!(result.is_ok(), "{}", tool.name),
            "rejectOrder" => assert!(matches!(result, Err(DecisionError::NotPending { .. }))),
            other => panic!("unexpected tool {other}"),
        }
    }
}

#[test]
fn test_unknown_tool_is_rejected() {
    let (mut store, _, _) = sample_store();
    let config = EngineConfig::default();
    let mut desk = DecisionDesk::new(&mut store, &config);

    let err = desk.handle_tool_call("deleteAllOrders", &json!({})).unwrap_err();
    assert_eq!(err.to_string(), "Unknown tool: deleteAllOrders");
}

#[test]
fn test_pending_list_shrinks_as_orders_are_decided() {
    let (mut store, luna_id, stall_id) = sample_store();
    let config = EngineConfig::default();

    let mut desk = DecisionDesk::new(&mut store, &config);
    assert_eq!(pending_count(&mut desk), 2);

    let approved = desk
        .handle_tool_call("approveOrder", &json!({ "orderId": luna_id.to_string() }))
        .unwrap();
    assert_eq!(approved.message().unwrap(), "Order Cafe Luna approved.");
    assert_eq!(pending_count(&mut desk), 1);

    let rejected = desk
        .handle_tool_call("rejectOrder", &json!({ "orderId": stall_id.to_string() }))
        .unwrap();
    assert_eq!(rejected.message().unwrap(), "Order Market stall rejected.");
    assert_eq!(pending_count(&mut desk), 0);

    assert_eq!(store.get(luna_id).unwrap().status, OrderStatus::Approved);
    assert_eq!(store.get(stall_id).unwrap().status, OrderStatus::Rejected);
}

// =============================================================================
// Order file round trip
// =============================================================================

#[tokio::test]
async fn test_decision_survives_file_round_trip() {
    let (mut store, luna_id, stall_id) = sample_store();
    let config = EngineConfig::default();
    let path = temp_path("orders", "json");

    DecisionDesk::new(&mut store, &config)
        .handle_tool_call("approveOrder", &json!({ "orderId": luna_id.to_string() }))
        .unwrap();
    tokio::fs::write(&path, store.to_json().unwrap()).await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let reloaded = InMemoryOrderStore::from_json(&content).unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    assert_eq!(reloaded.orders(), store.orders());
    assert_eq!(reloaded.get(luna_id).unwrap().status, OrderStatus::Approved);
    assert_eq!(reloaded.get(stall_id).unwrap().status, OrderStatus::Pending);

    let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(raw[0]["status"], "approved");
    assert_eq!(raw[0]["pricePerBatch"], "50");
    assert_eq!(raw[0]["laborHours"], "2");
}

#[tokio::test]
async fn test_order_file_with_camel_case_fields_loads() {
    let path = temp_path("legacy", "json");
    let json = r#"[
        {
            "id": "7d0c2a8e-3b9f-4c55-9a61-2f6f4b7e1c10",
            "name": "Santos wedding",
            "quantity": 5,
            "channel": "events",
            "week": "2025-W24",
            "dueDate": "2025-06-11",
            "pricePerBatch": 11.2,
            "laborHours": 1,
            "status": "pending",
            "flavors": [
                {"flavor": "milo", "quantity": 3, "pricePerBatch": 12},
                {"flavor": "cinnamon", "quantity": 2, "pricePerBatch": 10}
            ],
            "miscCosts": 40
        }
    ]"#;
    tokio::fs::write(&path, json).await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();
    let store = InMemoryOrderStore::from_json(&content).unwrap();

    let order = &store.orders()[0];
    assert_eq!(order.misc_costs, Some(dec!(40)));
    assert_eq!(order.flavors.as_ref().unwrap().len(), 2);
    assert_eq!(
        polvo_planner_engine::calculate_roi(order, &EngineConfig::default()).revenue,
        dec!(56)
    );
}
