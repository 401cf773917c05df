pub mod core;
pub mod custody;
pub mod events;
pub mod ledger;
pub mod router;
pub mod selection;
pub mod utils;
pub mod venues;

// Re-export commonly used types
pub use core::{Address, Config, SwapError, SwapPhase, SwapReceipt, SwapRequest, SwapResult};
pub use custody::CustodyManager;
pub use events::{EventEmitter, SwapEvent};
pub use ledger::{InMemoryLedger, TokenLedger};
pub use router::SwapRouter;
pub use selection::{Quote, VenueSelector};
pub use venues::{ConstantProductVenue, Venue};
