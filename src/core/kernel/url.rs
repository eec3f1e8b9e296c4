use url::form_urlencoded;

/// Assembles fully-qualified endpoint URLs for one host/version pair.
///
/// Parameters are appended in the order given; encoding follows standard
/// form-urlencoding. The output is deterministic for identical inputs.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(host: &str, version: &str) -> Self {
        Self {
            base: format!("https://{}/api/{}/", host, version),
        }
    }

    /// Compile the URL for `method`, appending `params` when non-empty.
    ///
    /// No parameters means no trailing `?`.
    pub fn build(&self, method: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base, method);

        if !params.is_empty() {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, value) in params {
                serializer.append_pair(key, value);
            }
            url.push('?');
            url.push_str(&serializer.finish());
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UrlBuilder {
        UrlBuilder::new("bittrex.com", "v1.1")
    }

    #[test]
    fn no_params_means_no_query_string() {
        let url = builder().build("public/getmarkets", &[]);
        assert_eq!(url, "https://bittrex.com/api/v1.1/public/getmarkets");
    }

    #[test]
    fn params_are_appended_in_order() {
        let params = [
            ("market", "BTC-LTC".to_string()),
            ("type", "both".to_string()),
        ];
        let url = builder().build("public/getorderbook", &params);
        assert_eq!(
            url,
            "https://bittrex.com/api/v1.1/public/getorderbook?market=BTC-LTC&type=both"
        );
    }

    #[test]
    fn query_string_round_trips_through_form_decoding() {
        let params = [
            ("market", "BTC LTC+1".to_string()),
            ("note", "a&b=c".to_string()),
        ];
        let url = builder().build("public/getticker", &params);

        let query = url.split_once('?').unwrap().1;
        let decoded: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        assert_eq!(
            decoded,
            vec![
                ("market".to_string(), "BTC LTC+1".to_string()),
                ("note".to_string(), "a&b=c".to_string()),
            ]
        );
    }

    #[test]
    fn identical_inputs_build_identical_urls() {
        let params = [("market", "BTC-ETH".to_string())];
        assert_eq!(
            builder().build("public/getticker", &params),
            builder().build("public/getticker", &params)
        );
    }
}
