use crate::core::{Address, Config, SwapError, SwapPhase, SwapReceipt, SwapRequest, SwapResult};
use crate::custody::CustodyManager;
use crate::events::{now_timestamp, EventEmitter, SwapEvent};
use crate::ledger::TokenLedger;
use crate::selection::VenueSelector;
use log::{debug, error, warn};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Top-level swap orchestrator.
///
/// Sequences custody pull, quote aggregation, venue execution, proceeds
/// forwarding and event emission, all-or-nothing: a failure while custody
/// still holds the input refunds it to the caller, and a failure after the
/// winning venue has executed hands the caller the realized output instead,
/// so no failed swap leaves the caller out of pocket or value stranded in
/// custody.
pub struct SwapRouter {
    config: Config,
    custody: CustodyManager,
    selector: VenueSelector,
    events: EventEmitter,
    address: Address,
    // Pinned at construction, never changes afterwards.
    wrapped_native: Address,
}

impl SwapRouter {
    pub fn new(config: Config, ledger: Arc<dyn TokenLedger>, address: Address) -> SwapResult<Self> {
        config.validate()?;
        let wrapped_native = config.wrapped_native;
        Ok(Self {
            config,
            custody: CustodyManager::new(ledger, address),
            selector: VenueSelector::new(),
            events: EventEmitter::new(),
            address,
            wrapped_native,
        })
    }

    /// Custody account the router settles through.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    /// Observe settlement events.
    pub fn subscribe(&self) -> broadcast::Receiver<SwapEvent> {
        self.events.subscribe()
    }

    /// Execute one best-execution swap.
    ///
    /// Quotes every candidate venue, executes through the one quoting the
    /// greatest output (first in supplied order on ties) with that quote as
    /// the minimum acceptable output, and forwards the realized proceeds to
    /// the request's recipient. The specific failure kind always reaches the
    /// caller; nothing is retried.
    pub async fn swap(&self, request: &SwapRequest) -> SwapResult<SwapReceipt> {
        request.validate()?;
        if request.venues.len() > self.config.max_candidate_venues {
            return Err(SwapError::InvalidRequest(format!(
                "{} candidate venues exceeds limit of {}",
                request.venues.len(),
                self.config.max_candidate_venues
            )));
        }

        let mut phase = SwapPhase::Idle;
        debug!("swap start: {:?}", request);

        self.custody
            .pull_in(request.token_in, request.caller, request.amount_in)
            .await?;
        advance(&mut phase, SwapPhase::Pulled);

        // Before execution custody holds the input; after execution it holds
        // the realized output. Compensation must hand back whichever asset
        // custody actually has, so the two stages fail differently.
        let (best, realized) = match self.execute_best(request, &mut phase).await {
            Ok(executed) => executed,
            Err(e) => {
                advance(&mut phase, SwapPhase::Failed);
                warn!("swap failed with input still in custody, refunding caller: {}", e);
                if let Err(refund_err) = self
                    .custody
                    .forward_out(request.token_in, request.amount_in, request.caller)
                    .await
                {
                    // Custody still holds the funds; surface the original
                    // failure but make the stuck refund loud.
                    error!(
                        "refund of {} {} to {} failed: {}",
                        request.amount_in, request.token_in, request.caller, refund_err
                    );
                }
                return Err(e);
            }
        };

        if let Err(e) = self
            .custody
            .forward_out(request.token_out, realized, request.recipient)
            .await
        {
            advance(&mut phase, SwapPhase::Failed);
            // The input is already spent on the winning venue; the caller is
            // made whole with the realized output instead.
            warn!(
                "proceeds delivery to {} failed, compensating caller with realized output: {}",
                request.recipient, e
            );
            if let Err(comp_err) = self
                .custody
                .forward_out(request.token_out, realized, request.caller)
                .await
            {
                error!(
                    "compensation of {} {} to caller {} failed, funds remain in custody: {}",
                    realized, request.token_out, request.caller, comp_err
                );
            }
            return Err(e);
        }
        advance(&mut phase, SwapPhase::Settled);

        self.events.emit(SwapEvent {
            caller: request.caller,
            token_in: request.token_in,
            token_out: request.token_out,
            amount_in: request.amount_in,
            venue_used: best.venue.address(),
            venue_name: best.venue.name().to_string(),
            amount_out_delivered: realized,
            recipient: request.recipient,
            timestamp: now_timestamp(),
        });

        Ok(SwapReceipt {
            venue_used: best.venue.address(),
            amount_out_delivered: realized,
        })
    }

    /// Select the winning venue and execute through it. On success custody
    /// holds the realized output; any error here leaves the pulled input in
    /// custody for the caller of this function to refund.
    async fn execute_best(
        &self,
        request: &SwapRequest,
        phase: &mut SwapPhase,
    ) -> SwapResult<(crate::selection::Quote, u128)> {
        let best = self
            .selector
            .select_best(
                request.token_in,
                request.token_out,
                request.amount_in,
                &request.venues,
            )
            .await?;
        advance(phase, SwapPhase::Quoted);

        // The winning quote becomes the floor: accepting less than the quote
        // that justified the venue's selection is never acceptable.
        let min_amount_out = best.amount_out;
        advance(phase, SwapPhase::Selected);

        self.custody
            .ensure_allowance(request.token_in, best.venue.address(), request.amount_in)
            .await?;
        let realized = best
            .venue
            .execute(
                request.token_in,
                request.token_out,
                request.amount_in,
                min_amount_out,
                self.address,
                self.address,
            )
            .await?;
        advance(phase, SwapPhase::Executed);

        Ok((best, realized))
    }
}

fn advance(phase: &mut SwapPhase, next: SwapPhase) {
    debug!("swap phase {} -> {}", phase, next);
    *phase = next;
}
