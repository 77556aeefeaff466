//! crypto/prf — потоковая PRF: AES-128-CBC-MAC с нулевым IV.
//!
//! Семантика:
//! - write() буферизует вход 16-байтными блоками; каждый полный блок
//!   XOR-ится с предыдущим шифроблоком (нулевым для первого) и шифруется.
//! - sum() дополняет незавершённый блок нулями, прогоняет его и возвращает
//!   последний шифроблок; состояние сбрасывается, PRF переиспользуема.
//! - Детерминизм: одинаковый байтовый поток даёт одинаковый результат
//!   независимо от разбиения на вызовы write().

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};

/// Размер блока и выхода PRF (байт).
pub const PRF_SIZE: usize = 16;

/// Ключевая псевдослучайная функция с потоковым входом.
pub struct Prf {
    cipher: Aes128,
    input: [u8; PRF_SIZE],
    output: [u8; PRF_SIZE],
    ofs: usize,
    round: usize,
}

impl Prf {
    /// Создать PRF с 16-байтным ключом.
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = Aes128::new_from_slice(key)
            .map_err(|_| anyhow!("PRF key must be 16 bytes, got {}", key.len()))?;
        Ok(Self {
            cipher,
            input: [0u8; PRF_SIZE],
            output: [0u8; PRF_SIZE],
            ofs: 0,
            round: 0,
        })
    }

    /// Добавить байты во вход PRF.
    pub fn write(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let n = (PRF_SIZE - self.ofs).min(data.len());
            self.input[self.ofs..self.ofs + n].copy_from_slice(&data[..n]);
            self.ofs += n;
            data = &data[n..];
            if self.ofs >= PRF_SIZE {
                self.process_block();
            }
        }
    }

    /// Завершить вычисление: нулевой паддинг хвоста, сброс состояния,
    /// возврат последнего шифроблока.
    pub fn sum(&mut self) -> [u8; PRF_SIZE] {
        if self.ofs > 0 {
            for b in &mut self.input[self.ofs..] {
                *b = 0;
            }
            self.ofs = PRF_SIZE;
            self.process_block();
        }
        self.reset();
        self.output
    }

    /// Однострочный вариант: PRF(data).
    pub fn data(&mut self, data: &[u8]) -> [u8; PRF_SIZE] {
        self.write(data);
        self.sum()
    }

    /// PRF от 16-байтного блока с BE-кодированным v в первых 8 байтах.
    pub fn int(&mut self, v: u64) -> [u8; PRF_SIZE] {
        let mut block = [0u8; PRF_SIZE];
        BigEndian::write_u64(&mut block[..8], v);
        self.data(&block)
    }

    /// Сбросить состояние (последний выход остаётся читаемым).
    pub fn reset(&mut self) {
        self.ofs = 0;
        self.round = 0;
    }

    fn process_block(&mut self) {
        if self.round > 0 {
            // CBC: вход XOR предыдущий шифроблок.
            for i in 0..PRF_SIZE {
                self.input[i] ^= self.output[i];
            }
        }
        self.output = self.input;
        self.cipher
            .encrypt_block(GenericArray::from_mut_slice(&mut self.output));
        self.ofs = 0;
        self.round += 1;
    }
}
