//! `spec` and `discover`: the two static declarations.

use stock_ticker_core::{catalog, Envelope};

/// The SPEC envelope advertising the configuration schema.
pub fn spec() -> Result<Envelope, serde_json::Error> {
    Ok(Envelope::spec(catalog::connector_spec()?))
}

/// The CATALOG envelope listing the supported streams.
pub fn discover() -> Envelope {
    Envelope::catalog(catalog::discover())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_envelope_wraps_connection_specification() {
        let v = serde_json::to_value(spec().unwrap()).unwrap();
        assert_eq!(v["type"], "SPEC");
        assert_eq!(v["spec"]["connectionSpecification"]["type"], "object");
    }

    #[test]
    fn discover_envelope_lists_stock_prices() {
        let v = serde_json::to_value(discover()).unwrap();
        assert_eq!(v["type"], "CATALOG");
        assert_eq!(v["catalog"]["streams"][0]["name"], "stock_prices");
    }
}
