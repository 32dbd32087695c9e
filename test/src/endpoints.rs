//! Demo endpoints.

use std::sync::Mutex;

use serde::Serialize;

use endpoint_access::{endpoint, endpoint_exposed};

#[derive(Clone, Debug, Serialize)]
pub struct Order {
    pub id: u64,
    pub item: String,
    pub owner: String,
}

/// Methods every demo endpoint inherits.
pub struct StatusService;

#[endpoint_exposed]
impl StatusService {
    #[anonymous_allowed]
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    // no attribute: denied on every endpoint inheriting it
    pub fn internals(&self) -> &'static str {
        "not reachable"
    }
}

/// # Hilla Equivalent
/// ```java
/// @Endpoint("orders")
/// @PermitAll
/// public class OrderEndpoint extends StatusService { ... }
/// ```
#[derive(Default)]
pub struct OrderEndpoint {
    orders: Mutex<Vec<Order>>,
}

#[endpoint("orders", extends = StatusService)]
#[permit_all]
impl OrderEndpoint {
    #[anonymous_allowed]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn list(&self) -> Vec<Order> {
        self.lock().clone()
    }

    pub fn place(&self, owner: &str, item: &str) -> Order {
        let mut orders = self.lock();
        let order = Order {
            id: orders.last().map_or(1, |o| o.id + 1),
            item: item.to_string(),
            owner: owner.to_string(),
        };
        orders.push(order.clone());
        order
    }

    #[roles_allowed("ADMIN")]
    pub fn cancel(&self, id: u64) -> bool {
        let mut orders = self.lock();
        let before = orders.len();
        orders.retain(|o| o.id != id);
        orders.len() != before
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Order>> {
        self.orders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
