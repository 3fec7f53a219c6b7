//! # Canonical Encoding
//!
//! Byte layout hashed by transactions and blocks.
//!
//! | Item | Layout |
//! |------|--------|
//! | domain tag | raw bytes (`mc.tx.v1`, `mc.block.v1`) |
//! | `u64` / `i64` | 8 bytes, big-endian |
//! | length / count | `u32`, big-endian |
//! | byte string | `u32` length + raw bytes |
//! | option | `0x00` absent, `0x01` + value present |
//! | payload variant | `0x01` Sealed, `0x02` Fields |

use crate::entities::{Block, Payload, SealedField, Transaction};
use shared_crypto::WrappedKey;

/// Domain tag prefixed to every transaction preimage.
pub const TX_DOMAIN: &[u8] = b"mc.tx.v1";

/// Domain tag prefixed to every block preimage.
pub const BLOCK_DOMAIN: &[u8] = b"mc.block.v1";

const PAYLOAD_SEALED: u8 = 0x01;
const PAYLOAD_FIELDS: u8 = 0x02;

/// Append-only buffer producing the canonical layout.
#[derive(Debug, Default)]
pub struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    /// Start a buffer with a domain tag.
    pub fn with_domain(tag: &[u8]) -> Self {
        let mut w = Self::default();
        w.buf.extend_from_slice(tag);
        w
    }

    pub fn put_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn put_u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn put_u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn put_i64(&mut self, v: i64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Length-prefixed byte string.
    pub fn put_bytes(&mut self, v: &[u8]) -> &mut Self {
        self.put_u32(len_u32(v.len()));
        self.buf.extend_from_slice(v);
        self
    }

    /// Presence tag followed by the value, if any.
    pub fn put_option<T>(
        &mut self,
        v: Option<&T>,
        write: impl FnOnce(&mut Self, &T),
    ) -> &mut Self
    where
        T: ?Sized,
    {
        match v {
            None => {
                self.put_u8(0x00);
            }
            Some(inner) => {
                self.put_u8(0x01);
                write(self, inner);
            }
        }
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

// Saturates; request bodies never get near u32::MAX.
fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn put_sealed_field(w: &mut CanonicalWriter, field: &SealedField) {
    w.put_bytes(&field.ciphertext).put_bytes(&field.nonce);
}

fn put_payload(w: &mut CanonicalWriter, payload: &Payload) {
    match payload {
        Payload::Sealed { ciphertext, nonce } => {
            w.put_u8(PAYLOAD_SEALED).put_bytes(ciphertext).put_bytes(nonce);
        }
        Payload::Fields {
            record_type,
            notes,
            results,
        } => {
            w.put_u8(PAYLOAD_FIELDS);
            put_sealed_field(w, record_type);
            put_sealed_field(w, notes);
            put_sealed_field(w, results);
        }
    }
}

fn put_wrapped_key(w: &mut CanonicalWriter, key: &WrappedKey) {
    w.put_bytes(&key.ephemeral_public_key)
        .put_bytes(&key.nonce)
        .put_bytes(&key.ciphertext);
}

fn write_transaction_body(w: &mut CanonicalWriter, tx: &Transaction) {
    put_payload(w, &tx.payload);
    w.put_option(tx.wrapped_key.as_ref(), put_wrapped_key);
    w.put_bytes(tx.sender_identity.as_bytes())
        .put_bytes(tx.recipient_identity.as_bytes())
        .put_i64(tx.timestamp);
}

/// Preimage of a transaction hash: every field except hash and signature.
pub fn transaction_preimage(tx: &Transaction) -> Vec<u8> {
    let mut w = CanonicalWriter::with_domain(TX_DOMAIN);
    write_transaction_body(&mut w, tx);
    w.finish()
}

/// Full encoding of a transaction as it is committed inside a block,
/// including its own hash and signature.
pub fn transaction_encoding(tx: &Transaction) -> Vec<u8> {
    let mut w = CanonicalWriter::with_domain(TX_DOMAIN);
    write_transaction_body(&mut w, tx);
    w.put_bytes(&tx.hash);
    w.put_option(tx.signature.as_ref(), |w, sig| {
        w.put_bytes(sig.as_bytes());
    });
    w.finish()
}

/// Preimage of a block hash. The block's own hash and signature are not
/// part of it.
pub fn block_preimage(block: &Block) -> Vec<u8> {
    let mut w = CanonicalWriter::with_domain(BLOCK_DOMAIN);
    w.put_u64(block.id);
    w.put_option(block.previous_hash.as_ref(), |w, h| {
        w.put_bytes(h);
    });
    w.put_u32(len_u32(block.transactions.len()));
    for tx in &block.transactions {
        w.put_bytes(&transaction_encoding(tx));
    }
    w.put_i64(block.timestamp);
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_big_endian() {
        let mut w = CanonicalWriter::default();
        w.put_u32(1).put_u64(2).put_i64(-1);
        assert_eq!(
            w.finish(),
            vec![
                0, 0, 0, 1, //
                0, 0, 0, 0, 0, 0, 0, 2, //
                0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff
            ]
        );
    }

    #[test]
    fn test_bytes_are_length_prefixed() {
        let mut w = CanonicalWriter::with_domain(b"t");
        w.put_bytes(b"abc");
        assert_eq!(w.finish(), b"t\x00\x00\x00\x03abc".to_vec());
    }

    #[test]
    fn test_option_tags() {
        let mut w = CanonicalWriter::default();
        w.put_option(None::<&[u8]>, |w, v| {
            w.put_bytes(v);
        });
        w.put_option(Some(&b"x"[..]), |w, v| {
            w.put_bytes(v);
        });
        assert_eq!(w.finish(), vec![0x00, 0x01, 0, 0, 0, 1, b'x']);
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        let mut a = CanonicalWriter::default();
        a.put_bytes(b"ab").put_bytes(b"c");
        let mut b = CanonicalWriter::default();
        b.put_bytes(b"a").put_bytes(b"bc");
        assert_ne!(a.finish(), b.finish());
    }
}
