//! Install locations for Blesta extensions.

use super::Location;

/// Directory templates for every Blesta extension subtype.
pub(crate) const LOCATIONS: &[Location] = &[
    Location::new("plugin", "plugins/{$name}/"),
    Location::new("gateway-merchant", "components/gateways/merchant/{$name}/"),
    Location::new(
        "gateway-nonmerchant",
        "components/gateways/nonmerchant/{$name}/",
    ),
    Location::new("module", "components/modules/{$name}/"),
    Location::new("messenger", "components/messengers/{$name}/"),
    Location::new("invoice-template", "components/invoice_templates/{$name}/"),
    Location::new("report", "components/reports/{$name}/"),
];
