use crate::core::config::BittrexConfig;
use crate::core::errors::BittrexError;
use crate::core::kernel::{ReqwestTransport, SignedRequest, Transport};
use crate::core::response::{parse_envelope, Payload, Record};
use crate::session::endpoints::{EndpointFactory, OrderBookType};
use crate::session::{find_market, latest_candle};
use std::path::Path;

/// Asynchronous session: one suspending HTTP GET per operation.
///
/// Calls are independent and stateless apart from the nonce clock; multiple
/// calls may be in flight concurrently and complete in any order.
/// Cancellation is whatever the transport offers (a reqwest timeout). The
/// session owns its connection pool for its whole lifetime; `close` releases
/// it.
pub struct BittrexSession<T: Transport = ReqwestTransport> {
    endpoints: EndpointFactory,
    transport: T,
}

impl BittrexSession {
    pub fn new(config: &BittrexConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    /// Initialise from a JSON config file `{"key", "secret", "version"?}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BittrexError> {
        Ok(Self::new(&BittrexConfig::from_file(path)?))
    }
}

impl<T: Transport> BittrexSession<T> {
    /// Build a session over a caller-supplied transport (tests inject canned
    /// responses through this seam).
    pub fn with_transport(config: &BittrexConfig, transport: T) -> Self {
        Self {
            endpoints: EndpointFactory::new(config),
            transport,
        }
    }

    /// Release the owned connection pool.
    pub fn close(self) {}

    async fn call(&self, request: SignedRequest) -> Result<Payload, BittrexError> {
        let body = self.transport.get(&request).await?;
        parse_envelope(&body)
    }

    /// Retrieve all public markets.
    pub async fn get_markets(&self) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.markets()?).await
    }

    /// Look up a single market by its exact `market_name`.
    ///
    /// Scans the full market list; an absent name is a request error.
    pub async fn get_market(&self, market_name: &str) -> Result<Record, BittrexError> {
        let markets = self.get_markets().await?.into_many()?;
        find_market(markets, market_name)
    }

    /// Last-24h summaries, optionally limited to one market.
    pub async fn get_market_summaries(
        &self,
        market_name: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.market_summaries(market_name)?)
            .await
    }

    /// Latest trades that occurred on the given market.
    pub async fn get_market_history(&self, market_name: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.market_history(market_name)?).await
    }

    /// Retrieve all listed currencies.
    pub async fn get_currencies(&self) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.currencies()?).await
    }

    /// Current ticker for the given market.
    pub async fn get_ticker(&self, market_name: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.ticker(market_name)?).await
    }

    pub async fn get_order_book(
        &self,
        market_name: &str,
        order_type: OrderBookType,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.order_book(market_name, order_type)?)
            .await
    }

    /// Place a limit buy order.
    pub async fn buy_limit(
        &self,
        market_name: &str,
        quantity: f64,
        rate: f64,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.buy_limit(market_name, quantity, rate)?)
            .await
    }

    /// Place a limit sell order.
    pub async fn sell_limit(
        &self,
        market_name: &str,
        quantity: f64,
        rate: f64,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.sell_limit(market_name, quantity, rate)?)
            .await
    }

    /// Cancel an open buy or sell order.
    pub async fn cancel_order(&self, uuid: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.cancel_order(uuid)?).await
    }

    /// All currently open orders, optionally limited to one market.
    pub async fn get_open_orders(
        &self,
        market_name: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.open_orders(market_name)?).await
    }

    /// Single order by uuid.
    pub async fn get_order(&self, uuid: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.order(uuid)?).await
    }

    pub async fn get_order_history(
        &self,
        market_name: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.order_history(market_name)?).await
    }

    /// Account balances, or one balance when `currency` is given.
    pub async fn get_balances(&self, currency: Option<&str>) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.balances(currency)?).await
    }

    /// Retrieve or generate the deposit address for a currency. The exchange
    /// answers `ADDRESS_GENERATING` until one is available.
    pub async fn get_deposit_address(&self, currency: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.deposit_address(currency)?).await
    }

    /// Withdraw funds; `payment_id` is the memo for CryptoNote-style chains.
    pub async fn withdraw(
        &self,
        currency: &str,
        quantity: f64,
        address: &str,
        payment_id: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(
            self.endpoints
                .withdraw(currency, quantity, address, payment_id)?,
        )
        .await
    }

    pub async fn get_withdrawal_history(
        &self,
        currency: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.withdrawal_history(currency)?)
            .await
    }

    pub async fn get_deposit_history(
        &self,
        currency: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.deposit_history(currency)?).await
    }

    /// Full candle series for the market at the given tick interval.
    pub async fn get_candles(
        &self,
        market_name: &str,
        tick_interval: &str,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.candles(market_name, tick_interval)?)
            .await
    }

    /// Most recent candle, as a single-element sequence.
    ///
    /// There is no single-candle endpoint, so this refetches the full series
    /// and keeps the last element.
    pub async fn get_latest_candle(
        &self,
        market_name: &str,
        tick_interval: &str,
    ) -> Result<Payload, BittrexError> {
        let candles = self
            .get_candles(market_name, tick_interval)
            .await?
            .into_many()?;
        latest_candle(candles)
    }
}
