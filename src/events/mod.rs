use crate::core::{constants::EVENT_CHANNEL_CAPACITY, Address, SwapReceipt};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Settlement record broadcast once per successful swap, consumable by
/// external monitoring and bookkeeping tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    pub caller: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub venue_used: Address,
    pub venue_name: String,
    pub amount_out_delivered: u128,
    pub recipient: Address,
    pub timestamp: i64,
}

impl SwapEvent {
    pub fn receipt(&self) -> SwapReceipt {
        SwapReceipt {
            venue_used: self.venue_used,
            amount_out_delivered: self.amount_out_delivered,
        }
    }
}

/// Fan-out emitter for swap settlements. Emission never fails the swap:
/// having no subscribers is normal.
pub struct EventEmitter {
    tx: broadcast::Sender<SwapEvent>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SwapEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: SwapEvent) {
        info!(
            "swap settled: venue {} ({}) delivered {} of {} to {}",
            event.venue_name,
            event.venue_used,
            event.amount_out_delivered,
            event.token_out,
            event.recipient
        );
        if let Ok(json) = serde_json::to_string(&event) {
            debug!("swap event: {}", json);
        }
        let _ = self.tx.send(event);
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> SwapEvent {
        SwapEvent {
            caller: Address::new_unique(),
            token_in: Address::new_unique(),
            token_out: Address::new_unique(),
            amount_in: 1,
            venue_used: Address::new_unique(),
            venue_name: "uniswap-v2".to_string(),
            amount_out_delivered: 1800,
            recipient: Address::new_unique(),
            timestamp: now_timestamp(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let emitter = EventEmitter::new();
        let mut rx = emitter.subscribe();

        let sent = event();
        emitter.emit(sent.clone());

        let got = rx.recv().await.unwrap();
        assert_eq!(got, sent);
        assert_eq!(got.receipt().amount_out_delivered, 1800);
    }

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let emitter = EventEmitter::new();
        emitter.emit(event());
    }

    #[test]
    fn test_event_serializes_to_json() {
        let e = event();
        let json = serde_json::to_string(&e).unwrap();
        let back: SwapEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
