//! Display formatting for free-text addresses.

use std::sync::LazyLock;

use regex::Regex;

/// Street part, whitespace, five-digit postal code, whitespace, city part.
static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s+(\d{5})\s+(.*)$").expect("postal code pattern is valid")
});

/// Format an address for display, appending `place` after a comma.
///
/// Addresses without any comma get one inserted before the first
/// whitespace-delimited five-digit postal code, so
/// `"Musterstraße 123 12345 Musterstadt"` becomes
/// `"Musterstraße 123, 12345 Musterstadt"`. Everything else passes through.
pub fn format_address(address: &str, place: &str) -> String {
    let address = if !address.is_empty() && !address.contains(',') {
        POSTAL_CODE.replace(address, "$1, $2 $3").into_owned()
    } else {
        address.to_string()
    };

    match (address.is_empty(), place.is_empty()) {
        (false, false) => format!("{address}, {place}"),
        (false, true) => address,
        (true, _) => place.to_string(),
    }
}
