pub mod errors;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

use errors::CoreError;
use models::{
    holding::Holding, portfolio::Portfolio, refresh::RefreshOutcome, settings::Settings,
    valuation::ValuationSnapshot,
};
use providers::{
    frankfurter::FrankfurterProvider, registry::QuoteProviderRegistry, traits::FxRateProvider,
};
#[cfg(not(target_arch = "wasm32"))]
use services::refresh_service::{RefreshHandle, RefreshService};
use services::{
    currency_service::CurrencyService, portfolio_service::PortfolioService,
    quote_service::QuoteService, valuation_service::ValuationService,
};
use storage::{manager::StorageManager, store::KeyValueStore};

/// Main entry point for the Apex Wealth core library.
///
/// Owns the holdings list and every service that reads or writes it. The
/// handle is cheap to clone; the UI and the refresh loop each hold one and
/// all access to the holdings goes through a single lock inside.
#[derive(Clone)]
#[must_use]
pub struct WealthTracker {
    inner: Arc<TrackerState>,
}

struct TrackerState {
    portfolio: Mutex<Portfolio>,
    store: Arc<dyn KeyValueStore>,
    settings: Settings,
    portfolio_service: PortfolioService,
    quote_service: QuoteService,
    currency_service: CurrencyService,
    valuation_service: ValuationService,
    snapshots: watch::Sender<ValuationSnapshot>,
}

impl std::fmt::Debug for WealthTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WealthTracker")
            .field("holdings", &self.inner.portfolio.lock().len())
            .field("settings", &self.inner.settings)
            .field("quote_providers", &self.inner.quote_service.provider_names())
            .finish()
    }
}

impl WealthTracker {
    /// Open the tracker with the default quote provider (Yahoo Finance) and,
    /// if `auto_refresh_fx` is set, the Frankfurter fx provider.
    pub fn open(store: Arc<dyn KeyValueStore>, settings: Settings) -> Result<Self, CoreError> {
        let registry = QuoteProviderRegistry::new_with_defaults();
        let fx_provider: Option<Box<dyn FxRateProvider>> = if settings.auto_refresh_fx {
            Some(Box::new(FrankfurterProvider::new()))
        } else {
            None
        };
        Self::with_providers(store, settings, registry, fx_provider)
    }

    /// Open the tracker with explicit providers.
    ///
    /// Restores the holdings from `store`. A store that was never written
    /// gets the starter holdings (when enabled); unreadable data is logged
    /// and the tracker starts empty.
    pub fn with_providers(
        store: Arc<dyn KeyValueStore>,
        settings: Settings,
        registry: QuoteProviderRegistry,
        fx_provider: Option<Box<dyn FxRateProvider>>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;

        let mut currency_service = CurrencyService::new(
            &settings.base_currency,
            &settings.display_currency,
            settings.fx_rate,
        )?;
        if let Some(provider) = fx_provider {
            currency_service = currency_service.with_provider(provider);
        }
        let valuation_service =
            ValuationService::new(&settings.base_currency, &settings.display_currency);

        let (portfolio, seeded) = Self::restore_at_startup(store.as_ref(), &settings);
        let initial = valuation_service.compute_snapshot(&portfolio.holdings, settings.fx_rate);
        let (snapshots, _) = watch::channel(initial);

        let tracker = Self {
            inner: Arc::new(TrackerState {
                portfolio: Mutex::new(portfolio),
                store,
                settings,
                portfolio_service: PortfolioService::new(),
                quote_service: QuoteService::new(registry),
                currency_service,
                valuation_service,
                snapshots,
            }),
        };

        if seeded {
            tracker.commit(&tracker.inner.portfolio.lock());
        }

        Ok(tracker)
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Add or replace a holding from raw form input.
    ///
    /// Rejects the edit, leaving everything unchanged, if the ticker is
    /// blank or either number does not parse as a non-negative decimal.
    pub fn upsert(
        &self,
        ticker: &str,
        shares: &str,
        cost_basis: &str,
    ) -> Result<Holding, CoreError> {
        let mut portfolio = self.inner.portfolio.lock();
        let holding = self.inner.portfolio_service.upsert_from_input(
            &mut portfolio,
            ticker,
            shares,
            cost_basis,
        )?;
        tracing::info!(
            "Saved {} ({} shares @ {})",
            holding.ticker,
            holding.shares,
            holding.cost_basis
        );
        self.commit(&portfolio);
        Ok(holding)
    }

    /// Add or replace a holding from already-typed values.
    pub fn upsert_holding(
        &self,
        ticker: &str,
        shares: f64,
        cost_basis: f64,
    ) -> Result<Holding, CoreError> {
        let mut portfolio = self.inner.portfolio.lock();
        let holding =
            self.inner
                .portfolio_service
                .upsert(&mut portfolio, ticker, shares, cost_basis)?;
        tracing::info!(
            "Saved {} ({} shares @ {})",
            holding.ticker,
            holding.shares,
            holding.cost_basis
        );
        self.commit(&portfolio);
        Ok(holding)
    }

    /// Delete the holding for `ticker`. Returns false (and changes nothing)
    /// if it was not held.
    pub fn remove(&self, ticker: &str) -> bool {
        let mut portfolio = self.inner.portfolio.lock();
        let removed = self.inner.portfolio_service.remove(&mut portfolio, ticker);
        if removed {
            tracing::info!("Removed {}", ticker.trim().to_uppercase());
            self.commit(&portfolio);
        }
        removed
    }

    /// Current holdings, in insertion/edit order.
    #[must_use]
    pub fn holdings(&self) -> Vec<Holding> {
        let portfolio = self.inner.portfolio.lock();
        self.inner.portfolio_service.list(&portfolio).to_vec()
    }

    #[must_use]
    pub fn holding(&self, ticker: &str) -> Option<Holding> {
        let ticker = models::holding::normalize_ticker(ticker);
        self.inner.portfolio.lock().get(&ticker).cloned()
    }

    /// Overwrite the last price of one holding. No-op if it is not held.
    pub fn update_price(&self, ticker: &str, price: f64) -> bool {
        let mut portfolio = self.inner.portfolio.lock();
        let updated = self
            .inner
            .portfolio_service
            .update_price(&mut portfolio, ticker, price);
        if updated {
            self.commit(&portfolio);
        }
        updated
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Write the full holdings list to the store.
    pub fn persist(&self) -> Result<(), CoreError> {
        let portfolio = self.inner.portfolio.lock();
        self.write_to_store(&portfolio)
    }

    /// Replace the in-memory holdings with what the store holds.
    ///
    /// An empty store yields an empty portfolio. On error nothing changes.
    pub fn restore(&self) -> Result<(), CoreError> {
        let loaded =
            StorageManager::load(self.inner.store.as_ref(), &self.inner.settings.storage_key)?
                .unwrap_or_default();
        let mut portfolio = self.inner.portfolio.lock();
        *portfolio = loaded;
        self.publish(&portfolio);
        Ok(())
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Valuation of the current holdings at their last known prices.
    #[must_use]
    pub fn snapshot(&self) -> ValuationSnapshot {
        let portfolio = self.inner.portfolio.lock();
        self.compute(&portfolio)
    }

    /// Receiver that always holds the latest published snapshot.
    ///
    /// A new snapshot is published after every change to the holdings, every
    /// successful price refresh, and every exchange rate change.
    pub fn subscribe(&self) -> watch::Receiver<ValuationSnapshot> {
        self.inner.snapshots.subscribe()
    }

    #[must_use]
    pub fn fx_rate(&self) -> f64 {
        self.inner.currency_service.rate()
    }

    /// Set the base → display exchange rate pushed by the host app.
    pub fn set_fx_rate(&self, rate: f64) -> Result<(), CoreError> {
        self.inner.currency_service.set_rate(rate)?;
        self.publish(&self.inner.portfolio.lock());
        Ok(())
    }

    /// Fetch the exchange rate from the fx provider. The previous rate is
    /// kept if this fails.
    pub async fn refresh_fx_rate(&self) -> Result<f64, CoreError> {
        let rate = self.inner.currency_service.refresh().await?;
        tracing::info!(
            "Exchange rate {} → {} refreshed: {rate}",
            self.inner.currency_service.base_currency(),
            self.inner.currency_service.display_currency()
        );
        self.publish(&self.inner.portfolio.lock());
        Ok(rate)
    }

    // ── Price refresh ───────────────────────────────────────────────

    /// Fetch fresh prices for every held ticker in one batch and apply them.
    ///
    /// Tickers the quote source leaves out keep their last price. If the
    /// batch fails, or takes longer than one refresh interval, no price is
    /// touched and the error is returned.
    pub async fn refresh_prices(&self) -> Result<RefreshOutcome, CoreError> {
        let tickers = self.inner.portfolio.lock().tickers();
        if tickers.is_empty() {
            return Ok(RefreshOutcome::default());
        }

        let limit = self.inner.settings.refresh_interval();
        let prices = tokio::time::timeout(limit, self.inner.quote_service.fetch_prices(&tickers))
            .await
            .map_err(|_| CoreError::RefreshTimeout(limit))??;

        Ok(self.apply_prices(tickers, &prices))
    }

    /// One loop iteration: optional fx refresh alongside the price refresh.
    ///
    /// Both fetches run concurrently and the whole cycle is cut off after
    /// one refresh interval, so a hung fx source cannot hold back prices or
    /// later cycles. Errors are logged, never returned.
    pub async fn run_refresh_cycle(&self) {
        let limit = self.inner.settings.refresh_interval();
        let cycle = async {
            tokio::join!(self.refresh_fx_in_cycle(), self.refresh_prices_in_cycle());
        };
        if tokio::time::timeout(limit, cycle).await.is_err() {
            tracing::warn!("Refresh cycle abandoned after {limit:?}");
        }
    }

    async fn refresh_fx_in_cycle(&self) {
        if !self.inner.settings.auto_refresh_fx || !self.inner.currency_service.has_provider() {
            return;
        }
        if let Err(e) = self.refresh_fx_rate().await {
            tracing::warn!("Exchange rate refresh failed, keeping {}: {e}", self.fx_rate());
        }
    }

    async fn refresh_prices_in_cycle(&self) {
        match self.refresh_prices().await {
            Ok(outcome) if outcome.is_empty() => {
                tracing::debug!("No holdings, skipping price refresh");
            }
            Ok(outcome) => {
                if !outcome.missing.is_empty() {
                    tracing::warn!(
                        "No quote for {}, keeping last price",
                        outcome.missing.join(", ")
                    );
                }
                tracing::info!(
                    "Refreshed {}/{} prices",
                    outcome.updated.len(),
                    outcome.requested.len()
                );
            }
            Err(e) => {
                tracing::warn!("Price refresh abandoned: {e}");
            }
        }
    }

    /// Start the background refresh loop: one cycle now, then one per
    /// `refresh_interval`. Must be called from within a Tokio runtime.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_refresh_loop(&self) -> RefreshHandle {
        RefreshService::spawn(self.clone())
    }

    // ── Settings & providers ────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    #[must_use]
    pub fn quote_provider_names(&self) -> Vec<String> {
        self.inner.quote_service.provider_names()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn restore_at_startup(store: &dyn KeyValueStore, settings: &Settings) -> (Portfolio, bool) {
        match StorageManager::load(store, &settings.storage_key) {
            Ok(Some(portfolio)) => {
                tracing::info!("Restored {} holdings", portfolio.len());
                (portfolio, false)
            }
            Ok(None) if settings.seed_starter_holdings => {
                tracing::info!("No saved portfolio, seeding starter holdings");
                (Portfolio::starter(), true)
            }
            Ok(None) => (Portfolio::new(), false),
            Err(e) => {
                tracing::error!("Failed to restore portfolio, starting empty: {e}");
                (Portfolio::new(), false)
            }
        }
    }

    fn apply_prices(&self, tickers: Vec<String>, prices: &HashMap<String, f64>) -> RefreshOutcome {
        let mut outcome = RefreshOutcome::default();
        let mut portfolio = self.inner.portfolio.lock();

        for ticker in &tickers {
            match prices.get(ticker) {
                Some(&price) => {
                    if self
                        .inner
                        .portfolio_service
                        .update_price(&mut portfolio, ticker, price)
                    {
                        outcome.updated.push(ticker.clone());
                    }
                }
                None => outcome.missing.push(ticker.clone()),
            }
        }
        outcome.requested = tickers;

        if outcome.updated.is_empty() {
            self.publish(&portfolio);
        } else {
            self.commit(&portfolio);
        }
        outcome
    }

    fn compute(&self, portfolio: &Portfolio) -> ValuationSnapshot {
        self.inner
            .valuation_service
            .compute_snapshot(&portfolio.holdings, self.inner.currency_service.rate())
    }

    /// Persist (best effort) and publish. Callers hold the portfolio lock, so
    /// store writes land in the same order as the mutations they reflect.
    fn commit(&self, portfolio: &Portfolio) {
        if let Err(e) = self.write_to_store(portfolio) {
            tracing::error!("Failed to persist portfolio, in-memory state kept: {e}");
        }
        self.publish(portfolio);
    }

    fn write_to_store(&self, portfolio: &Portfolio) -> Result<(), CoreError> {
        StorageManager::save(self.inner.store.as_ref(), &self.inner.settings.storage_key, portfolio)
    }

    fn publish(&self, portfolio: &Portfolio) {
        self.inner.snapshots.send_replace(self.compute(portfolio));
    }
}
