//! sse/encrypt — детерминированный поблочный шифр для идентификаторов.
//!
//! AES-128 над одиночным 16-байтным блоком; на каждое ключевое слово
//! выводится свой ключ, поэтому режим сцепления не нужен.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use anyhow::{anyhow, Result};

use super::id::Id;

/// Поблочный AES-128 шифр для Id.
pub struct Enc {
    cipher: Aes128,
}

impl Enc {
    /// Создать шифр с 16-байтным ключом.
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = Aes128::new_from_slice(key)
            .map_err(|_| anyhow!("cipher key must be 16 bytes, got {}", key.len()))?;
        Ok(Self { cipher })
    }

    /// Зашифровать блок на месте.
    pub fn encrypt(&self, id: &mut Id) {
        self.cipher
            .encrypt_block(GenericArray::from_mut_slice(&mut id.0));
    }

    /// Расшифровать блок на месте.
    pub fn decrypt(&self, id: &mut Id) {
        self.cipher
            .decrypt_block(GenericArray::from_mut_slice(&mut id.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_roundtrip() {
        let enc = Enc::new(&[0u8; 16]).unwrap();

        let v = 0xa1a2a3a4e1e2e3e4u64;
        let mut id = Id::from_u64(v);

        enc.encrypt(&mut id);
        assert_ne!(id.u64(), v);
        enc.decrypt(&mut id);
        assert_eq!(id.u64(), v);
    }

    #[test]
    fn encrypt_bad_key() {
        assert!(Enc::new(&[0u8; 24]).is_err());
    }
}
