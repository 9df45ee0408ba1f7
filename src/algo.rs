//! Algorithm-id canonicalization
//!
//! Algorithm ids are lowercase strings out of a fixed supported set.
//! Anything else, including the empty string, canonicalizes to the
//! default `"ecdsa"`.

/// The default algorithm id, used for empty or unrecognized input
pub const DEFAULT_ALGORITHM: &str = "ecdsa";

/// Supported algorithm ids, canonical form
pub const SUPPORTED: [&str; 7] = [
    "ecdsa",
    "pkcs",
    "openpgp",
    "openpgp:rsa",
    "openpgp:dsa",
    "openpgp:ecdsa",
    "openpgp:eddsa",
];

/// Canonicalize an algorithm id.
///
/// Matching is case-insensitive; unknown or empty input falls back to
/// [`DEFAULT_ALGORITHM`].
pub fn canonicalize(id: &str) -> &'static str {
    let lower = id.to_ascii_lowercase();
    SUPPORTED
        .iter()
        .find(|supported| **supported == lower)
        .copied()
        .unwrap_or(DEFAULT_ALGORITHM)
}

/// Default key-file basename for an algorithm id.
///
/// The public key lives next to the private key as `{basename}.pub`.
pub fn key_basename(id: &str) -> &'static str {
    match canonicalize(id) {
        "pkcs" => "id_rsa",
        "openpgp" | "openpgp:rsa" => "id_openpgp_rsa",
        "openpgp:dsa" => "id_openpgp_dsa",
        "openpgp:ecdsa" => "id_openpgp_ecdsa",
        "openpgp:eddsa" => "id_openpgp_eddsa",
        _ => "id_ecdsa",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_is_case_insensitive() {
        assert_eq!(canonicalize("ECDSA"), "ecdsa");
        assert_eq!(canonicalize("OpenPGP:EdDSA"), "openpgp:eddsa");
    }

    #[test]
    fn test_canonicalize_defaults_unknown_and_empty() {
        assert_eq!(canonicalize("bogus"), "ecdsa");
        assert_eq!(canonicalize(""), "ecdsa");
    }

    #[test]
    fn test_canonicalize_keeps_supported_ids() {
        for id in SUPPORTED {
            assert_eq!(canonicalize(id), id);
        }
    }

    #[test]
    fn test_key_basename_table() {
        assert_eq!(key_basename("ecdsa"), "id_ecdsa");
        assert_eq!(key_basename("pkcs"), "id_rsa");
        assert_eq!(key_basename("openpgp"), "id_openpgp_rsa");
        assert_eq!(key_basename("openpgp:rsa"), "id_openpgp_rsa");
        assert_eq!(key_basename("openpgp:dsa"), "id_openpgp_dsa");
        assert_eq!(key_basename("openpgp:ecdsa"), "id_openpgp_ecdsa");
        assert_eq!(key_basename("openpgp:eddsa"), "id_openpgp_eddsa");
    }

    #[test]
    fn test_key_basename_canonicalizes_first() {
        assert_eq!(key_basename("PKCS"), "id_rsa");
        assert_eq!(key_basename("unknown"), "id_ecdsa");
    }
}
