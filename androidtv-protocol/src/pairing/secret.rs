//! Pairing secret derivation
//!
//! ```text
//! SHA256( client N || 01 00 01 || TV N || 01 00 01 || hex_decode(pin[2..6]) )
//! ```
//!
//! `N` is the big-endian RSA modulus without leading zeros and `01 00 01` is
//! the public exponent 65537. Only PIN characters 2 to 5 enter the hash.

use crate::{ProtocolError, Result};
use sha2::{Digest, Sha256};

/// Number of symbols in the on-screen code
pub const PIN_LENGTH: usize = 6;

/// RSA public exponent 65537, big-endian
const PUBLIC_EXPONENT: [u8; 3] = [0x01, 0x00, 0x01];

/// Derive the pairing secret from both RSA moduli and the PIN
pub fn compute_secret(client_modulus: &[u8], server_modulus: &[u8], pin: &str) -> Result<[u8; 32]> {
    let symbols = pin.get(2..PIN_LENGTH).ok_or_else(|| {
        ProtocolError::InvalidSecret(format!(
            "PIN must have {} characters, got {:?}",
            PIN_LENGTH, pin
        ))
    })?;
    let symbols = hex::decode(symbols).map_err(|e| {
        ProtocolError::InvalidSecret(format!("PIN {:?} is not hexadecimal: {}", pin, e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(client_modulus);
    hasher.update(PUBLIC_EXPONENT);
    hasher.update(server_modulus);
    hasher.update(PUBLIC_EXPONENT);
    hasher.update(&symbols);

    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moduli() -> (Vec<u8>, Vec<u8>) {
        ((1..=16u8).collect(), (0x80..=0x8fu8).collect())
    }

    #[test]
    fn test_known_secret() {
        let (client, server) = moduli();
        let secret = compute_secret(&client, &server, "AB1234").unwrap();
        assert_eq!(
            hex::encode(secret),
            "c45c28d56b4f8e2a3342b06e24eb897d6c49038c7f471ebe1dd173554e7e5df1"
        );
    }

    #[test]
    fn test_first_two_symbols_ignored() {
        let (client, server) = moduli();
        assert_eq!(
            compute_secret(&client, &server, "AB1234").unwrap(),
            compute_secret(&client, &server, "ff1234").unwrap()
        );
    }

    #[test]
    fn test_last_symbol_changes_secret() {
        let (client, server) = moduli();
        let secret = compute_secret(&client, &server, "AB1235").unwrap();
        assert_eq!(
            hex::encode(secret),
            "b423970adecc6cb3708116924c7b6aad744d57c586d320fe0e5c4cb7d61731e6"
        );
    }

    #[test]
    fn test_any_modulus_byte_changes_secret() {
        let (client, server) = moduli();
        let reference = compute_secret(&client, &server, "AB1234").unwrap();

        for i in 0..client.len() {
            let mut flipped = client.clone();
            flipped[i] ^= 0x01;
            assert_ne!(
                compute_secret(&flipped, &server, "AB1234").unwrap(),
                reference,
                "client byte {}",
                i
            );
        }
        for i in 0..server.len() {
            let mut flipped = server.clone();
            flipped[i] ^= 0x01;
            assert_ne!(
                compute_secret(&client, &flipped, "AB1234").unwrap(),
                reference,
                "server byte {}",
                i
            );
        }
    }

    #[test]
    fn test_key_order_matters() {
        let (client, server) = moduli();
        assert_ne!(
            compute_secret(&client, &server, "001234").unwrap(),
            compute_secret(&server, &client, "001234").unwrap()
        );
    }

    #[test]
    fn test_invalid_pins() {
        let (client, server) = moduli();
        for pin in ["", "AB12", "AB123", "ABxyzw", "AB12G4"] {
            assert!(
                matches!(
                    compute_secret(&client, &server, pin),
                    Err(ProtocolError::InvalidSecret(_))
                ),
                "pin {:?}",
                pin
            );
        }
    }
}
