//! Scripted gateway fakes shared by the loop and aggregation tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Mutex;
use tastyleg_broker::error::Result;
use tastyleg_broker::gateway::OrderGateway;
use tastyleg_broker::types::{
    InstrumentType, NewOrder, OrderAction, OrderFilters, OrderLeg, OrderSnapshot, OrderStatus,
    OrderType, PlacedOrder, PriceEffect,
};

/// An [`OrderGateway`] that replays scripted responses and records calls.
#[derive(Default)]
pub(crate) struct FakeGateway {
    create_responses: Mutex<VecDeque<Result<PlacedOrder>>>,
    amend_responses: Mutex<VecDeque<Result<OrderSnapshot>>>,
    read_responses: Mutex<VecDeque<Result<OrderSnapshot>>>,
    list_responses: Mutex<VecDeque<Result<Vec<OrderSnapshot>>>>,
    creations: Mutex<Vec<NewOrder>>,
    amendments: Mutex<Vec<(u64, NewOrder)>>,
    list_filters: Mutex<Vec<OrderFilters>>,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_create(&self, response: Result<PlacedOrder>) {
        self.create_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_amend(&self, response: Result<OrderSnapshot>) {
        self.amend_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_read(&self, response: Result<OrderSnapshot>) {
        self.read_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_list(&self, response: Result<Vec<OrderSnapshot>>) {
        self.list_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn creations(&self) -> Vec<NewOrder> {
        self.creations.lock().unwrap().clone()
    }

    pub(crate) fn amendments(&self) -> Vec<(u64, NewOrder)> {
        self.amendments.lock().unwrap().clone()
    }

    pub(crate) fn list_filters(&self) -> Vec<OrderFilters> {
        self.list_filters.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderGateway for FakeGateway {
    async fn create_order(&self, _account: &str, order: &NewOrder) -> Result<PlacedOrder> {
        self.creations.lock().unwrap().push(order.clone());
        self.create_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("fake gateway: unscripted create_order call")
    }

    async fn amend_order(
        &self,
        _account: &str,
        order_id: u64,
        order: &NewOrder,
    ) -> Result<OrderSnapshot> {
        self.amendments.lock().unwrap().push((order_id, order.clone()));
        self.amend_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("fake gateway: unscripted amend_order call")
    }

    async fn read_order(&self, _account: &str, _order_id: u64) -> Result<OrderSnapshot> {
        self.read_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("fake gateway: unscripted read_order call")
    }

    async fn list_orders(
        &self,
        _account: &str,
        filters: &OrderFilters,
    ) -> Result<Vec<OrderSnapshot>> {
        self.list_filters.lock().unwrap().push(filters.clone());
        self.list_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("fake gateway: unscripted list_orders call")
    }
}

/// A two-leg put-spread leg set.
pub(crate) fn sample_legs() -> Vec<OrderLeg> {
    vec![
        leg(OrderAction::SellToOpen, "SPXW  240816P05400000"),
        leg(OrderAction::BuyToOpen, "SPXW  240816P05380000"),
    ]
}

pub(crate) fn leg(action: OrderAction, symbol: &str) -> OrderLeg {
    OrderLeg {
        action,
        symbol: symbol.to_string(),
        quantity: 1,
        instrument_type: InstrumentType::EquityOption,
    }
}

/// A limit payload over [`sample_legs`].
pub(crate) fn limit_payload(price: Decimal, effect: PriceEffect) -> NewOrder {
    NewOrder::limit(price, effect, sample_legs())
}

/// A live limit-order snapshot with no legs, as amendment responses carry.
pub(crate) fn snapshot(
    id: u64,
    price: Option<Decimal>,
    price_effect: Option<PriceEffect>,
) -> OrderSnapshot {
    OrderSnapshot {
        id,
        status: OrderStatus::Live,
        order_type: OrderType::Limit,
        price,
        price_effect,
        size: 1,
        received_at: None,
        legs: Vec::new(),
    }
}
