//! sse/tset — T-Set: бакетированное шифрованное множество кортежей.
//!
//! Формат записи: label 16 B + value 17 B, value = [beta || id] XOR pad,
//! где beta != 0 означает «в цепочке есть продолжение». Адрес бакета,
//! label и pad выводятся из SHA-512(F_stag(i)), поэтому retrieve не требует
//! ничего, кроме stag.
//!
//! Размер: b = max(1, count/2) бакетов (средняя длина цепочки ~2 записи);
//! мягкая ёмкость бакета s = 8 — превышение логируется, но не фатально.

use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};
use log::warn;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};
use std::collections::HashMap;

use crate::crypto::Prf;

use super::id::{Id, ID_SIZE};

/// Мягкая ёмкость бакета (записей); превышение — предупреждение.
const BUCKET_SOFT_CAP: usize = 8;

const VALUE_SIZE: usize = 1 + ID_SIZE;

struct Record {
    label: [u8; ID_SIZE],
    value: [u8; VALUE_SIZE],
}

/// Шифрованный индекс keyword -> список Id с O(1)-поиском бакета.
pub struct TSet {
    buckets: Vec<Vec<Record>>,
    kt: [u8; 16],
    prf: Prf,
}

impl TSet {
    /// Построить T-Set по множеству кортежей.
    pub fn setup(t: &HashMap<String, Vec<Id>>) -> Result<TSet> {
        let count: usize = t.values().map(|v| v.len()).sum();
        let b = (count / 2).max(1);

        let mut kt = [0u8; 16];
        OsRng.fill_bytes(&mut kt);
        let mut prf = Prf::new(&kt)?;

        let mut buckets: Vec<Vec<Record>> = Vec::with_capacity(b);
        buckets.resize_with(b, Vec::new);
        let mut free = vec![0usize; b];

        for (w, tuples) in t {
            // stag = F(kt, w); F_w = PRF(stag).
            let stag = prf.data(w.as_bytes());
            let mut prf_w = Prf::new(&stag)?;

            for (i, id) in tuples.iter().enumerate() {
                let ilambda = prf_w.int(i as u64);
                let (bi, label, pad) = locate(b, &ilambda);

                free[bi] += 1;
                if free[bi] > BUCKET_SOFT_CAP {
                    warn!(
                        "tset bucket {} over soft capacity ({} records)",
                        bi, free[bi]
                    );
                }

                let beta: u8 = if i + 1 < tuples.len() { 0xff } else { 0 };
                let mut value = [0u8; VALUE_SIZE];
                value[0] = beta;
                value[1..].copy_from_slice(&id.0);
                for (v, k) in value.iter_mut().zip(pad.iter()) {
                    *v ^= k;
                }

                buckets[bi].push(Record { label, value });
            }
        }

        Ok(TSet { buckets, kt, prf })
    }

    /// stag для ключевого слова w.
    pub fn get_tag(&mut self, w: &[u8]) -> [u8; 16] {
        self.prf.data(w)
    }

    /// Извлечь все кортежи цепочки stag в порядке вставки.
    pub fn retrieve(&self, stag: &[u8]) -> Result<Vec<Id>> {
        let mut prf_w = Prf::new(stag)?;
        let mut out = Vec::new();
        let mut beta = 0xffu8;

        for i in 0u64.. {
            if beta == 0 {
                break;
            }
            let ilambda = prf_w.int(i);
            let (bi, label, pad) = locate(self.buckets.len(), &ilambda);

            let rec = self.buckets[bi]
                .iter()
                .find(|r| r.label == label)
                .ok_or_else(|| anyhow!("tuple set corrupted: chain broken at index {}", i))?;

            let mut value = rec.value;
            for (v, k) in value.iter_mut().zip(pad.iter()) {
                *v ^= k;
            }
            beta = value[0];

            let mut id = Id::default();
            id.0.copy_from_slice(&value[1..]);
            out.push(id);
        }

        Ok(out)
    }

    /// Ключ kt (диагностика/сериализация на будущее).
    pub fn key(&self) -> &[u8; 16] {
        &self.kt
    }
}

/// Адресация записи: SHA-512(ilambda) -> (бакет, label, pad).
fn locate(buckets: usize, ilambda: &[u8; 16]) -> (usize, [u8; ID_SIZE], [u8; VALUE_SIZE]) {
    let digest = Sha512::digest(ilambda);
    let bi = BigEndian::read_u32(&digest[0..4]) as usize % buckets;

    let mut label = [0u8; ID_SIZE];
    label.copy_from_slice(&digest[4..4 + ID_SIZE]);

    let mut pad = [0u8; VALUE_SIZE];
    pad.copy_from_slice(&digest[4 + ID_SIZE..4 + ID_SIZE + VALUE_SIZE]);

    (bi, label, pad)
}
