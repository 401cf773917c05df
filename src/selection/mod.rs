use crate::core::{Address, SwapError, SwapResult};
use crate::venues::Venue;
use log::{debug, info};
use std::fmt;
use std::sync::Arc;

/// A single venue's advertised output for a given input. Transient: produced
/// per request and never persisted.
#[derive(Clone)]
pub struct Quote {
    pub venue: Arc<dyn Venue>,
    pub amount_out: u128,
}

impl fmt::Debug for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quote")
            .field("venue", &self.venue.address())
            .field("amount_out", &self.amount_out)
            .finish()
    }
}

/// Queries every candidate venue for a quote and picks the winner.
#[derive(Debug, Default)]
pub struct VenueSelector;

impl VenueSelector {
    pub fn new() -> Self {
        Self
    }

    /// Quote every venue and return the one with the greatest output.
    ///
    /// Venues whose quote call fails are skipped; only when every venue fails
    /// does the whole selection fail with `NoRouteAvailable`. On equal maximum
    /// outputs the venue supplied first wins, so selection is stable in the
    /// caller's venue order.
    pub async fn select_best(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
        venues: &[Arc<dyn Venue>],
    ) -> SwapResult<Quote> {
        let quotes = self
            .collect_quotes(token_in, token_out, amount_in, venues)
            .await;

        match Self::best_of(quotes) {
            Some(best) => {
                info!(
                    "selected venue {} ({}) with quote {}",
                    best.venue.name(),
                    best.venue.address(),
                    best.amount_out
                );
                Ok(best)
            }
            None => Err(SwapError::NoRouteAvailable { token_in, token_out }),
        }
    }

    /// Quote every venue in supplied order with identical arguments. Failed
    /// quotes are logged and excluded; read-only against the venues.
    pub async fn collect_quotes(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
        venues: &[Arc<dyn Venue>],
    ) -> Vec<Quote> {
        let mut quotes = Vec::with_capacity(venues.len());

        for venue in venues {
            match venue.quote(token_in, token_out, amount_in).await {
                Ok(amount_out) => {
                    debug!(
                        "venue {} ({}): {} -> {}",
                        venue.name(),
                        venue.address(),
                        amount_in,
                        amount_out
                    );
                    quotes.push(Quote {
                        venue: venue.clone(),
                        amount_out,
                    });
                }
                Err(e) => {
                    debug!(
                        "venue {} ({}) failed to quote: {}",
                        venue.name(),
                        venue.address(),
                        e
                    );
                }
            }
        }

        quotes
    }

    /// Stable maximum: a later quote replaces the current best only when its
    /// output is strictly greater, so ties go to the earliest quote.
    fn best_of(quotes: Vec<Quote>) -> Option<Quote> {
        let mut best: Option<Quote> = None;
        for quote in quotes {
            match &best {
                Some(current) if quote.amount_out <= current.amount_out => {}
                _ => best = Some(quote),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;

    /// Venue stub quoting a fixed amount, or failing when `amount_out` is
    /// `None`. Never executes.
    struct StaticVenue {
        address: Address,
        name: String,
        amount_out: Option<u128>,
    }

    #[async_trait]
    impl Venue for StaticVenue {
        fn address(&self) -> Address {
            self.address
        }

        fn name(&self) -> &str {
            &self.name
        }

        async fn quote(
            &self,
            token_in: Address,
            token_out: Address,
            _amount_in: u128,
        ) -> SwapResult<u128> {
            self.amount_out.ok_or(SwapError::NoLiquidity {
                venue: self.address,
                token_in,
                token_out,
            })
        }

        async fn execute(
            &self,
            _token_in: Address,
            _token_out: Address,
            _amount_in: u128,
            _min_amount_out: u128,
            _payer: Address,
            _recipient: Address,
        ) -> SwapResult<u128> {
            Err(SwapError::Other("static venue cannot execute".to_string()))
        }
    }

    fn venue(amount_out: Option<u128>) -> Arc<dyn Venue> {
        Arc::new(StaticVenue {
            address: Address::new_unique(),
            name: "static".to_string(),
            amount_out,
        })
    }

    #[tokio::test]
    async fn test_selects_maximum_quote() {
        let selector = VenueSelector::new();
        let venues = vec![venue(Some(1795)), venue(Some(1800)), venue(Some(1700))];

        let best = selector
            .select_best(Address::new_unique(), Address::new_unique(), 1, &venues)
            .await
            .unwrap();

        assert_eq!(best.amount_out, 1800);
        assert_eq!(best.venue.address(), venues[1].address());
    }

    #[tokio::test]
    async fn test_tie_goes_to_first_in_order() {
        let selector = VenueSelector::new();
        let venues = vec![venue(Some(1800)), venue(Some(1800)), venue(Some(1800))];

        let best = selector
            .select_best(Address::new_unique(), Address::new_unique(), 1, &venues)
            .await
            .unwrap();

        assert_eq!(best.venue.address(), venues[0].address());
    }

    #[tokio::test]
    async fn test_failing_venue_is_skipped() {
        let selector = VenueSelector::new();
        let venues = vec![venue(None), venue(Some(1795)), venue(None)];

        let best = selector
            .select_best(Address::new_unique(), Address::new_unique(), 1, &venues)
            .await
            .unwrap();

        assert_eq!(best.amount_out, 1795);
        assert_eq!(best.venue.address(), venues[1].address());
    }

    #[tokio::test]
    async fn test_all_venues_failing_is_no_route() {
        let selector = VenueSelector::new();
        let venues = vec![venue(None), venue(None)];
        let token_in = Address::new_unique();
        let token_out = Address::new_unique();

        let err = selector
            .select_best(token_in, token_out, 1, &venues)
            .await
            .unwrap_err();

        match err {
            SwapError::NoRouteAvailable {
                token_in: t_in,
                token_out: t_out,
            } => {
                assert_eq!(t_in, token_in);
                assert_eq!(t_out, token_out);
            }
            other => panic!("expected NoRouteAvailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_quotes_collected_in_supplied_order() {
        let selector = VenueSelector::new();
        let venues = vec![venue(Some(3)), venue(None), venue(Some(1)), venue(Some(2))];

        let quotes = selector
            .collect_quotes(Address::new_unique(), Address::new_unique(), 1, &venues)
            .await;

        let outputs: Vec<u128> = quotes.iter().map(|q| q.amount_out).collect();
        assert_eq!(outputs, vec![3, 1, 2]);
    }

    proptest! {
        /// For any quote vector the selected venue is the first index holding
        /// the maximum output.
        #[test]
        fn prop_first_maximum_wins(amounts in proptest::collection::vec(0u128..10_000, 1..32)) {
            let venues: Vec<Arc<dyn Venue>> =
                amounts.iter().map(|a| venue(Some(*a))).collect();
            let selector = VenueSelector::new();

            let best = tokio_test::block_on(selector.select_best(
                Address::new_unique(),
                Address::new_unique(),
                1,
                &venues,
            ))
            .unwrap();

            let max = *amounts.iter().max().unwrap();
            let first_max = amounts.iter().position(|a| *a == max).unwrap();
            prop_assert_eq!(best.amount_out, max);
            prop_assert_eq!(best.venue.address(), venues[first_max].address());
        }
    }
}
