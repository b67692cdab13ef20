// AccountId tests

use sharevault::account::{AccountId, AccountIdError};
use std::collections::HashSet;

#[test]
fn test_generated_ids_are_unique() {
    let ids: HashSet<AccountId> = (0..100).map(|_| AccountId::generate()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_label_derivation_is_stable() {
    assert_eq!(AccountId::from_label("alice"), AccountId::from_label("alice"));
    assert_ne!(AccountId::from_label("alice"), AccountId::from_label("bob"));
}

#[test]
fn test_hex_round_trip() {
    let id = AccountId::from_label("carol");
    let parsed = AccountId::from_hex(&id.to_hex()).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_hex_rejects_bad_input() {
    assert!(matches!(AccountId::from_hex("zz"), Err(AccountIdError::InvalidHex(_))));
    assert!(matches!(AccountId::from_hex("abcd"), Err(AccountIdError::InvalidLength(2))));
}

#[test]
fn test_display_is_short_prefix() {
    let id = AccountId::from_bytes([0xab; 32]);
    assert_eq!(id.to_string(), "acct:abababababababab");
}

#[test]
fn test_raw_bytes_round_trip() {
    let id = AccountId::from_label("carol");
    let copy = AccountId::from_bytes(*id.as_bytes());

    assert_eq!(copy, id);
    assert_eq!(hex::encode(id.as_bytes()), id.to_hex());
}
