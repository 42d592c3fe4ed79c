/// Ordered token pattern table for grouping hard liquidations by
/// collateral token. First case-insensitive substring match wins, so
/// the order is load-bearing (wsteth must precede eth). The table is a
/// fixed convention shared with the market-name format.
pub const TOKEN_PATTERNS: &[(&str, &str)] = &[
    ("wsteth", "wstETH"),
    ("weth", "WETH"),
    ("wbtc", "WBTC"),
    ("sfrxeth", "sfrxETH"),
    ("eth", "ETH"),
    ("frxeth", "frxETH"),
    ("yneth", "ynETH"),
    ("pufeth", "pufETH"),
    ("asdcrv", "asdCRV"),
    ("arb", "ARB"),
    ("crv", "CRV"),
    ("fxs", "FXS"),
    ("lbtc", "lbtc"),
    ("weeeth", "weETH"),
    ("usde", "USDe"),
    ("usdc", "USDC"),
    ("usdt", "USDT"),
];

/// Extracts a display token from a market/controller name. Unmatched
/// names fall back to a cleaned prefix of the raw string, raw
/// contract addresses to "unknown".
pub fn extract_token(market: &str) -> String {
    if market.is_empty() {
        return String::from("unknown");
    }

    let lowered = market.to_lowercase();
    for (pattern, token) in TOKEN_PATTERNS {
        if lowered.contains(pattern) {
            return (*token).to_owned();
        }
    }

    if is_hex_address(market) {
        return String::from("unknown");
    }

    let prefix = market.split(['-', '_']).next().unwrap_or("");
    if prefix.is_empty() {
        String::from("unknown")
    } else {
        prefix.to_owned()
    }
}

fn is_hex_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(rest) => {
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "$12.34M" style figure used by the stat cards.
pub fn format_usd_millions(value: f64) -> String {
    format!("${:.2}M", value / 1_000_000.0)
}

/// Thousands-separated integer, e.g. 1234567 -> "1,234,567".
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Splits a "(a,b,c),(d,e,f)" env value into its tuple bodies.
pub fn parse_tuple_string(data: String) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    if data.len() < 2 {
        return items;
    }

    let inner = &data[1..];
    for part in inner.split(",(") {
        if let Some(index) = part.find(')') {
            items.push(part[0..index].to_owned());
        }
    }

    items
}
