use crate::core::config::BittrexConfig;
use crate::core::errors::BittrexError;
use crate::core::kernel::{BlockingTransport, ReqwestBlocking, SignedRequest};
use crate::core::response::{parse_envelope, Payload, Record};
use crate::session::endpoints::{EndpointFactory, OrderBookType};
use crate::session::{find_market, latest_candle};
use std::path::Path;

/// Blocking session: each operation holds the calling thread for one HTTP
/// round trip.
///
/// Concurrency across calls is the caller's business (one thread per
/// in-flight call, each paying for its own pool slot). Same contract and
/// error surface as [`super::BittrexSession`], minus the suspension points.
pub struct BittrexBlockingSession<T: BlockingTransport = ReqwestBlocking> {
    endpoints: EndpointFactory,
    transport: T,
}

impl BittrexBlockingSession {
    pub fn new(config: &BittrexConfig) -> Self {
        Self::with_transport(config, ReqwestBlocking::new())
    }

    /// Initialise from a JSON config file `{"key", "secret", "version"?}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BittrexError> {
        Ok(Self::new(&BittrexConfig::from_file(path)?))
    }
}

impl<T: BlockingTransport> BittrexBlockingSession<T> {
    pub fn with_transport(config: &BittrexConfig, transport: T) -> Self {
        Self {
            endpoints: EndpointFactory::new(config),
            transport,
        }
    }

    /// Release the owned connection pool.
    pub fn close(self) {}

    fn call(&self, request: SignedRequest) -> Result<Payload, BittrexError> {
        let body = self.transport.get(&request)?;
        parse_envelope(&body)
    }

    /// Retrieve all public markets.
    pub fn get_markets(&self) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.markets()?)
    }

    /// Look up a single market by its exact `market_name`.
    pub fn get_market(&self, market_name: &str) -> Result<Record, BittrexError> {
        let markets = self.get_markets()?.into_many()?;
        find_market(markets, market_name)
    }

    /// Last-24h summaries, optionally limited to one market.
    pub fn get_market_summaries(
        &self,
        market_name: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.market_summaries(market_name)?)
    }

    /// Latest trades that occurred on the given market.
    pub fn get_market_history(&self, market_name: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.market_history(market_name)?)
    }

    /// Retrieve all listed currencies.
    pub fn get_currencies(&self) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.currencies()?)
    }

    /// Current ticker for the given market.
    pub fn get_ticker(&self, market_name: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.ticker(market_name)?)
    }

    pub fn get_order_book(
        &self,
        market_name: &str,
        order_type: OrderBookType,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.order_book(market_name, order_type)?)
    }

    /// Place a limit buy order.
    pub fn buy_limit(
        &self,
        market_name: &str,
        quantity: f64,
        rate: f64,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.buy_limit(market_name, quantity, rate)?)
    }

    /// Place a limit sell order.
    pub fn sell_limit(
        &self,
        market_name: &str,
        quantity: f64,
        rate: f64,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.sell_limit(market_name, quantity, rate)?)
    }

    /// Cancel an open buy or sell order.
    pub fn cancel_order(&self, uuid: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.cancel_order(uuid)?)
    }

    /// All currently open orders, optionally limited to one market.
    pub fn get_open_orders(&self, market_name: Option<&str>) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.open_orders(market_name)?)
    }

    /// Single order by uuid.
    pub fn get_order(&self, uuid: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.order(uuid)?)
    }

    pub fn get_order_history(&self, market_name: Option<&str>) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.order_history(market_name)?)
    }

    /// Account balances, or one balance when `currency` is given.
    pub fn get_balances(&self, currency: Option<&str>) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.balances(currency)?)
    }

    /// Retrieve or generate the deposit address for a currency. The exchange
    /// answers `ADDRESS_GENERATING` until one is available.
    pub fn get_deposit_address(&self, currency: &str) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.deposit_address(currency)?)
    }

    /// Withdraw funds; `payment_id` is the memo for CryptoNote-style chains.
    pub fn withdraw(
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
    }

    pub fn get_withdrawal_history(
        &self,
        currency: Option<&str>,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.withdrawal_history(currency)?)
    }

    pub fn get_deposit_history(&self, currency: Option<&str>) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.deposit_history(currency)?)
    }

    /// Full candle series for the market at the given tick interval.
    pub fn get_candles(
        &self,
        market_name: &str,
        tick_interval: &str,
    ) -> Result<Payload, BittrexError> {
        self.call(self.endpoints.candles(market_name, tick_interval)?)
    }

    /// Most recent candle, as a single-element sequence.
    ///
    /// There is no single-candle endpoint, so this refetches the full series
    /// and keeps the last element.
    pub fn get_latest_candle(
        &self,
        market_name: &str,
        tick_interval: &str,
    ) -> Result<Payload, BittrexError> {
        let candles = self.get_candles(market_name, tick_interval)?.into_many()?;
        latest_candle(candles)
    }
}
