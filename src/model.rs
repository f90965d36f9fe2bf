//! Various data structures

use alloy::{
    primitives::{utils::format_ether, Address, TxHash, U256},
    signers::local::PrivateKeySigner,
};

/// Token and native amounts both use 18 decimals.
pub const DECIMALS: u8 = 18;

/// Who a workflow acts as.
///
/// The dashboard only ever knows an address. The scripts hold the signing
/// secret as well; it is handed to the provider's wallet and never printed.
#[derive(Clone)]
pub enum AccountRef {
    Watch(Address),
    Signing(PrivateKeySigner),
}

impl AccountRef {
    pub fn address(&self) -> Address {
        match self {
            AccountRef::Watch(address) => *address,
            AccountRef::Signing(signer) => signer.address(),
        }
    }

    pub fn signer(&self) -> Option<&PrivateKeySigner> {
        match self {
            AccountRef::Watch(_) => None,
            AccountRef::Signing(signer) => Some(signer),
        }
    }
}

impl std::fmt::Debug for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRef::Watch(address) => f.debug_tuple("Watch").field(address).finish(),
            AccountRef::Signing(signer) => f
                .debug_struct("Signing")
                .field("address", &signer.address())
                .finish_non_exhaustive(),
        }
    }
}

/// Renders an 18-decimals amount rounded to `places` fractional digits,
/// without going through floating point.
pub fn format_amount(amount: U256, places: u8) -> String {
    let places = places.min(DECIMALS);
    let scale = U256::from(10u64).pow(U256::from(DECIMALS - places));
    let rounded = amount.saturating_add(scale / U256::from(2u8)) / scale;

    if places == 0 {
        return rounded.to_string();
    }

    let unit = U256::from(10u64).pow(U256::from(places));
    let integer = rounded / unit;
    let fraction = (rounded % unit).to_string();
    format!("{integer}.{fraction:0>width$}", width = places as usize)
}

/// Full 18-decimals rendering, trailing zeros trimmed the way wallets display it.
pub fn format_token(amount: U256) -> String {
    let formatted = format_ether(amount);
    match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{integer}.0")
            } else {
                format!("{integer}.{fraction}")
            }
        }
        None => formatted,
    }
}

/// `0x6Da879...` style shortening used for display.
pub fn short_address(address: &Address, head: usize, tail: usize) -> String {
    let full = address.to_string();
    if head + tail >= full.len() {
        return full;
    }
    format!("{}...{}", &full[..head], &full[full.len() - tail..])
}

/// Block explorer link for a transaction.
pub fn tx_link(explorer_url: &str, tx_hash: &TxHash) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), tx_hash)
}

/// Block explorer link for an address.
pub fn address_link(explorer_url: &str, address: &Address) -> String {
    format!("{}/address/{}", explorer_url.trim_end_matches('/'), address)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, utils::parse_ether};

    use super::*;

    #[test]
    fn format_amount_rounds_to_places() {
        let amount = parse_ether("1.23456").unwrap();
        assert_eq!(format_amount(amount, 4), "1.2346");
        assert_eq!(format_amount(amount, 2), "1.23");
        assert_eq!(format_amount(U256::ZERO, 4), "0.0000");
        assert_eq!(format_amount(parse_ether("0.01").unwrap(), 4), "0.0100");
        assert_eq!(format_amount(parse_ether("2.5").unwrap(), 0), "3");
    }

    #[test]
    fn format_token_trims_trailing_zeros() {
        assert_eq!(format_token(parse_ether("70000000").unwrap()), "70000000.0");
        assert_eq!(format_token(parse_ether("0.01").unwrap()), "0.01");
        assert_eq!(format_token(U256::ZERO), "0.0");
    }

    #[test]
    fn short_address_keeps_head_and_tail() {
        let token = address!("6Da8794e33549201B6d1a2559B57954dA6d6b3Cd");
        assert_eq!(short_address(&token, 8, 6), "0x6Da879...d6b3Cd");
        assert_eq!(short_address(&token, 6, 4), "0x6Da8...b3Cd");
        assert_eq!(short_address(&token, 40, 10), token.to_string());
    }

    #[test]
    fn explorer_links() {
        let token = address!("6Da8794e33549201B6d1a2559B57954dA6d6b3Cd");
        assert_eq!(
            address_link("https://bscscan.com/", &token),
            "https://bscscan.com/address/0x6Da8794e33549201B6d1a2559B57954dA6d6b3Cd"
        );
        let hash = TxHash::with_last_byte(1);
        assert!(tx_link("https://bscscan.com", &hash).starts_with("https://bscscan.com/tx/0x"));
    }

    #[test]
    fn account_debug_hides_secret() {
        let signer = PrivateKeySigner::random();
        let account = AccountRef::Signing(signer.clone());
        let debug = format!("{account:?}");
        assert!(debug.contains(&format!("{:?}", signer.address())));
        assert_eq!(account.address(), signer.address());
        assert!(account.signer().is_some());
        assert!(AccountRef::Watch(signer.address()).signer().is_none());
    }
}
