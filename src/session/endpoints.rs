use crate::core::config::BittrexConfig;
use crate::core::errors::BittrexError;
use crate::core::kernel::{nonce, ApiSigner, SignedRequest, UrlBuilder};
use secrecy::ExposeSecret;

/// Order book side selector for `public/getorderbook`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBookType {
    Buy,
    Sell,
    #[default]
    Both,
}

impl OrderBookType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Both => "both",
        }
    }
}

/// Builds and signs one request per exchange operation.
///
/// Shared by the blocking and async sessions so their method bodies stay
/// transport-free: each facade method is URL construction here plus one GET.
/// Private endpoints get `apikey` and a fresh `nonce` appended before the
/// operation's own parameters.
#[derive(Debug, Clone)]
pub struct EndpointFactory {
    urls: UrlBuilder,
    signer: ApiSigner,
    api_key: String,
}

impl EndpointFactory {
    pub fn new(config: &BittrexConfig) -> Self {
        Self {
            urls: UrlBuilder::new(&config.host, &config.version),
            signer: ApiSigner::new(config.api_secret.expose_secret().clone()),
            api_key: config.api_key.expose_secret().clone(),
        }
    }

    fn request(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<SignedRequest, BittrexError> {
        let url = self.urls.build(method, params);
        let apisign = self.signer.sign(&url)?;
        Ok(SignedRequest::new(url, apisign))
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        vec![("apikey", self.api_key.clone()), ("nonce", nonce())]
    }

    pub fn markets(&self) -> Result<SignedRequest, BittrexError> {
        self.request("public/getmarkets", &[])
    }

    /// `getmarketsummaries` for all markets, `getmarketsummary` for one.
    pub fn market_summaries(
        &self,
        market_name: Option<&str>,
    ) -> Result<SignedRequest, BittrexError> {
        match market_name {
            None => self.request("public/getmarketsummaries", &[]),
            Some(name) => {
                self.request("public/getmarketsummary", &[("market", name.to_string())])
            }
        }
    }

    pub fn market_history(&self, market_name: &str) -> Result<SignedRequest, BittrexError> {
        self.request(
            "public/getmarkethistory",
            &[("market", market_name.to_string())],
        )
    }

    pub fn currencies(&self) -> Result<SignedRequest, BittrexError> {
        self.request("public/getcurrencies", &[])
    }

    pub fn ticker(&self, market_name: &str) -> Result<SignedRequest, BittrexError> {
        self.request("public/getticker", &[("market", market_name.to_string())])
    }

    // Public path, but the source sends credentials here regardless.
    pub fn order_book(
        &self,
        market_name: &str,
        order_type: OrderBookType,
    ) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        params.push(("market", market_name.to_string()));
        params.push(("type", order_type.as_str().to_string()));
        self.request("public/getorderbook", &params)
    }

    pub fn buy_limit(
        &self,
        market_name: &str,
        quantity: f64,
        rate: f64,
    ) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        params.push(("market", market_name.to_string()));
        params.push(("quantity", quantity.to_string()));
        params.push(("rate", rate.to_string()));
        self.request("market/buylimit", &params)
    }

    pub fn sell_limit(
        &self,
        market_name: &str,
        quantity: f64,
        rate: f64,
    ) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        params.push(("market", market_name.to_string()));
        params.push(("quantity", quantity.to_string()));
        params.push(("rate", rate.to_string()));
        self.request("market/selllimit", &params)
    }

    pub fn cancel_order(&self, uuid: &str) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        params.push(("uuid", uuid.to_string()));
        self.request("market/cancel", &params)
    }

    pub fn open_orders(&self, market_name: Option<&str>) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        if let Some(name) = market_name {
            params.push(("market", name.to_string()));
        }
        self.request("market/getopenorders", &params)
    }

    pub fn order(&self, uuid: &str) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        params.push(("uuid", uuid.to_string()));
        self.request("account/getorder", &params)
    }

    pub fn order_history(&self, market_name: Option<&str>) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        if let Some(name) = market_name {
            params.push(("market", name.to_string()));
        }
        self.request("account/getorderhistory", &params)
    }

    /// `getbalance` when limited to one currency, `getbalances` otherwise.
    pub fn balances(&self, currency: Option<&str>) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        if let Some(currency) = currency {
            params.push(("currency", currency.to_string()));
            return self.request("account/getbalance", &params);
        }
        self.request("account/getbalances", &params)
    }

    pub fn deposit_address(&self, currency: &str) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        params.push(("currency", currency.to_string()));
        self.request("account/getdepositaddress", &params)
    }

    pub fn withdraw(
        &self,
        currency: &str,
        quantity: f64,
        address: &str,
        payment_id: Option<&str>,
    ) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        params.push(("currency", currency.to_string()));
        params.push(("quantity", quantity.to_string()));
        params.push(("address", address.to_string()));
        if let Some(payment_id) = payment_id {
            params.push(("paymentid", payment_id.to_string()));
        }
        self.request("account/withdraw", &params)
    }

    pub fn withdrawal_history(
        &self,
        currency: Option<&str>,
    ) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        if let Some(currency) = currency {
            params.push(("currency", currency.to_string()));
        }
        self.request("account/getwithdrawalhistory", &params)
    }

    pub fn deposit_history(&self, currency: Option<&str>) -> Result<SignedRequest, BittrexError> {
        let mut params = self.auth_params();
        if let Some(currency) = currency {
            params.push(("currency", currency.to_string()));
        }
        self.request("account/getdeposithistory", &params)
    }

    /// Candle series for one market and tick interval.
    ///
    /// The tick endpoint takes v2-style camelCase wire parameters
    /// (`marketName`, `tickInterval`) rather than the lowercase names every
    /// v1.1 path uses.
    pub fn candles(
        &self,
        market_name: &str,
        tick_interval: &str,
    ) -> Result<SignedRequest, BittrexError> {
        self.request(
            "pub/market/getticks",
            &[
                ("marketName", market_name.to_string()),
                ("tickInterval", tick_interval.to_string()),
            ],
        )
    }
}
