//! The order-store seam consumed by higher layers.
//!
//! The price-negotiation loop and fill aggregation only need four
//! capabilities from the remote store; this trait is that boundary, so tests
//! can substitute scripted fakes for the live client.

use crate::client::BrokerClient;
use crate::error::Result;
use crate::types::{NewOrder, OrderFilters, OrderSnapshot, PlacedOrder};
use async_trait::async_trait;

/// Blocking-style access to the remote, authoritative order store.
///
/// Each call is fully synchronous from the caller's point of view; its
/// latency extends whatever pacing the caller applies between calls.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submits a new order, returning the assigned id and raw status.
    async fn create_order(&self, account: &str, order: &NewOrder) -> Result<PlacedOrder>;

    /// Replaces a live order's terms; the returned snapshot is authoritative
    /// for the order's new id, price, and status.
    async fn amend_order(
        &self,
        account: &str,
        order_id: u64,
        order: &NewOrder,
    ) -> Result<OrderSnapshot>;

    /// Fetches an order including its legs and nested fill events.
    async fn read_order(&self, account: &str, order_id: u64) -> Result<OrderSnapshot>;

    /// Fetches a filtered page of the account's order history.
    async fn list_orders(
        &self,
        account: &str,
        filters: &OrderFilters,
    ) -> Result<Vec<OrderSnapshot>>;
}

#[async_trait]
impl OrderGateway for BrokerClient {
    async fn create_order(&self, account: &str, order: &NewOrder) -> Result<PlacedOrder> {
        BrokerClient::create_order(self, account, order).await
    }

    async fn amend_order(
        &self,
        account: &str,
        order_id: u64,
        order: &NewOrder,
    ) -> Result<OrderSnapshot> {
        BrokerClient::amend_order(self, account, order_id, order).await
    }

    async fn read_order(&self, account: &str, order_id: u64) -> Result<OrderSnapshot> {
        BrokerClient::read_order(self, account, order_id).await
    }

    async fn list_orders(
        &self,
        account: &str,
        filters: &OrderFilters,
    ) -> Result<Vec<OrderSnapshot>> {
        BrokerClient::list_orders(self, account, filters).await
    }
}
