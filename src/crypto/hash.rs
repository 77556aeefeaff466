//! crypto/hash — 512-битный дайджест на AES-128-CBC с нулевым ключом.
//!
//! Конструкция:
//! - Вход раскладывается в 64-байтный буфер дайджеста 16-байтными шагами;
//!   каждый шаг XOR-ится с предыдущим шифроблоком (CBC) и шифруется на месте.
//! - Когда вход исчерпан, оставшиеся блоки (с нулевым заполнением на
//!   повторных кругах) продолжают цепочку, пока все четыре блока не станут
//!   шифротекстом.
//!
//! Это не криптографический хэш в формальном смысле.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;

const BLOCK: usize = 16;

/// Размер дайджеста (байт).
pub const HASH_SIZE: usize = 64;

/// AES-CBC-хэш с 512-битным выходом.
pub struct Hash {
    cipher: Aes128,
}

impl Hash {
    /// Создать хэш (фиксированный нулевой ключ).
    pub fn new() -> Self {
        let key = [0u8; 16];
        Self {
            cipher: Aes128::new(GenericArray::from_slice(&key)),
        }
    }

    /// Вычислить 512-битный дайджест данных.
    pub fn sum512(&self, mut data: &[u8]) -> [u8; HASH_SIZE] {
        let mut sum = [0u8; HASH_SIZE];
        let mut ofs = 0usize;
        let mut round = 0usize;
        let mut prev: Option<usize> = None;

        while !data.is_empty() || ofs < HASH_SIZE {
            if ofs >= HASH_SIZE {
                ofs = 0;
                round += 1;
            }
            let mut n = 0usize;
            if !data.is_empty() {
                n = data.len().min(BLOCK);
                sum[ofs..ofs + n].copy_from_slice(&data[..n]);
                data = &data[n..];
            }
            if round > 0 {
                for b in &mut sum[ofs + n..ofs + BLOCK] {
                    *b = 0;
                }
            }
            if let Some(p) = prev {
                // CBC: блок XOR предыдущий шифроблок.
                for i in 0..BLOCK {
                    sum[ofs + i] ^= sum[p + i];
                }
            }
            self.cipher
                .encrypt_block(GenericArray::from_mut_slice(&mut sum[ofs..ofs + BLOCK]));
            prev = Some(ofs);
            ofs += BLOCK;
        }

        sum
    }
}

impl Default for Hash {
    fn default() -> Self {
        Self::new()
    }
}
