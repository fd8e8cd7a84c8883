//! Approve/reject decisions on pending orders.
//!
//! A conversational assistant (or any other caller) drives decisions
//! through three tools: `approveOrder`, `rejectOrder` and
//! `listPendingOrders`. Tool calls are parsed into a [`DecisionCommand`]
//! and executed against an [`OrderStore`] by a [`DecisionDesk`].

use polvo_planner_core::{Order, OrderId, OrderStatus, StatusError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::roi::calculate_roi;
use crate::store::{OrderStore, StoreError};

pub const APPROVE_ORDER: &str = "approveOrder";
pub const REJECT_ORDER: &str = "rejectOrder";
pub const LIST_PENDING_ORDERS: &str = "listPendingOrders";

/// Errors from parsing or executing a decision.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required field: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid order id: {0}")]
    InvalidOrderId(String),

    #[error("Order with ID {0} not found.")]
    NotFound(OrderId),

    #[error("Order {name} is already {status}")]
    NotPending { name: String, status: OrderStatus },

    #[error(transparent)]
    Store(StoreError),
}

/// A tool the decision desk exposes, with its JSON input schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

fn order_id_tool(name: &str, description: &str, verb: &str) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "orderId": {
                    "type": "string",
                    "description": format!("The ID of the order to {verb}")
                }
            },
            "required": ["orderId"]
        }),
    }
}

/// Definitions of every decision tool.
#[must_use]
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        order_id_tool(APPROVE_ORDER, "Approve a pending order", "approve"),
        order_id_tool(REJECT_ORDER, "Reject a pending order", "reject"),
        Tool {
            name: LIST_PENDING_ORDERS.to_string(),
            description: "List all pending orders".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// A parsed decision request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionCommand {
    Approve(OrderId),
    Reject(OrderId),
    ListPending,
}

impl DecisionCommand {
    /// Parse a tool call.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::UnknownTool`] for a name outside the table,
    /// or an argument error when `orderId` is missing or not an id.
    pub fn from_tool_call(name: &str, input: &serde_json::Value) -> Result<Self, DecisionError> {
        match name {
            APPROVE_ORDER => Ok(Self::Approve(order_id_arg(input)?)),
            REJECT_ORDER => Ok(Self::Reject(order_id_arg(input)?)),
            LIST_PENDING_ORDERS => Ok(Self::ListPending),
            _ => Err(DecisionError::UnknownTool(name.to_string())),
        }
    }

    /// Tool name this command corresponds to.
    #[must_use]
    pub const fn tool_name(&self) -> &'static str {
        match self {
            Self::Approve(_) => APPROVE_ORDER,
            Self::Reject(_) => REJECT_ORDER,
            Self::ListPending => LIST_PENDING_ORDERS,
        }
    }
}

fn order_id_arg(input: &serde_json::Value) -> Result<OrderId, DecisionError> {
    let raw = input
        .get("orderId")
        .and_then(serde_json::Value::as_str)
        .ok_or(DecisionError::MissingArgument("orderId"))?;
    raw.parse()
        .map_err(|_| DecisionError::InvalidOrderId(raw.to_string()))
}

/// Compact view of a pending order for decision making.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrderSummary {
    pub id: OrderId,
    pub name: String,
    pub quantity: u32,
    pub price_per_batch: Decimal,
    /// Rounded to cents, halves away from zero.
    pub profit: Decimal,
}

impl PendingOrderSummary {
    fn new(order: &Order, config: &EngineConfig) -> Self {
        Self {
            id: order.id,
            name: order.name.clone(),
            quantity: order.quantity,
            price_per_batch: order.price_per_batch,
            profit: calculate_roi(order, config)
                .profit
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

/// Summaries of every pending order, in storage order.
#[must_use]
pub fn pending_summaries(orders: &[Order], config: &EngineConfig) -> Vec<PendingOrderSummary> {
    orders
        .iter()
        .filter(|order| order.status.is_pending())
        .map(|order| PendingOrderSummary::new(order, config))
        .collect()
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approved(Order),
    Rejected(Order),
    Pending(Vec<PendingOrderSummary>),
}

impl DecisionOutcome {
    /// Tool response text.
    ///
    /// # Errors
    ///
    /// Returns an error if the pending list cannot be serialized.
    pub fn message(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Approved(order) => Ok(format!("Order {} approved.", order.name)),
            Self::Rejected(order) => Ok(format!("Order {} rejected.", order.name)),
            Self::Pending(summaries) => serde_json::to_string(summaries),
        }
    }
}

/// Executes decision commands against a store.
pub struct DecisionDesk<'a, S: OrderStore> {
    store: &'a mut S,
    config: &'a EngineConfig,
}

impl<'a, S: OrderStore> DecisionDesk<'a, S> {
    #[must_use]
    pub const fn new(store: &'a mut S, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Execute one command.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::NotFound`] for an unknown order and
    /// [`DecisionError::NotPending`] when the order was already decided.
    #[instrument(skip(self), fields(tool = command.tool_name()))]
    pub fn execute(&mut self, command: DecisionCommand) -> Result<DecisionOutcome, DecisionError> {
        match command {
            DecisionCommand::Approve(id) => {
                self.decide(id, OrderStatus::Approved).map(DecisionOutcome::Approved)
            }
            DecisionCommand::Reject(id) => {
                self.decide(id, OrderStatus::Rejected).map(DecisionOutcome::Rejected)
            }
            DecisionCommand::ListPending => Ok(DecisionOutcome::Pending(pending_summaries(
                &self.store.list(),
                self.config,
            ))),
        }
    }

    /// Parse and execute a raw tool call.
    ///
    /// # Errors
    ///
    /// See [`DecisionCommand::from_tool_call`] and [`DecisionDesk::execute`].
    pub fn handle_tool_call(
        &mut self,
        name: &str,
        input: &serde_json::Value,
    ) -> Result<DecisionOutcome, DecisionError> {
        let command = DecisionCommand::from_tool_call(name, input)?;
        self.execute(command)
    }

    fn decide(&mut self, id: OrderId, status: OrderStatus) -> Result<Order, DecisionError> {
        match self.store.update_status(id, status) {
            Ok(order) => {
                info!(order_id = %id, name = %order.name, %status, "Order decided");
                Ok(order)
            }
            Err(StoreError::NotFound(id)) => Err(DecisionError::NotFound(id)),
            Err(StoreError::Status(StatusError::AlreadyDecided { current, .. })) => {
                let name = self.store.get(id).map(|o| o.name).unwrap_or_default();
                Err(DecisionError::NotPending {
                    name,
                    status: current,
                })
            }
            Err(e) => Err(DecisionError::Store(e)),
        }
    }
}
