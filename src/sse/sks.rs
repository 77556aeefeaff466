//! sse/sks — SKS: схема поиска по одному ключевому слову.
//!
//! Setup шифрует номера документов per-keyword ключом ke = F(ks, w) и
//! складывает их в T-Set; search расшифровывает цепочку запрошенного слова.

use anyhow::{anyhow, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;

use crate::crypto::Prf;

use super::encrypt::Enc;
use super::id::Id;
use super::tset::TSet;
use super::{KeywordIndex, Sse};

/// Single-Keyword Scheme.
pub struct Sks {
    ks: [u8; 16],
    prf_ks: Prf,
    tset: TSet,
}

impl Sks {
    /// Setup со случайным ключом ks.
    pub fn setup(db: &KeywordIndex) -> Result<Sks> {
        let mut ks = [0u8; 16];
        OsRng.fill_bytes(&mut ks);
        Sks::with_key(ks, db)
    }

    /// Setup с заданным ключом ks (детерминированные тесты, внешнее
    /// управление ключами).
    pub fn with_key(ks: [u8; 16], db: &KeywordIndex) -> Result<Sks> {
        let mut prf_ks = Prf::new(&ks)?;

        let mut t: HashMap<String, Vec<Id>> = HashMap::new();
        for (w, indices) in db {
            let ke = prf_ks.data(w.as_bytes());
            let enc = Enc::new(&ke)?;

            let mut tuples = Vec::with_capacity(indices.len());
            for &ind in indices {
                let mut e = Id::from_u64(ind);
                enc.encrypt(&mut e);
                tuples.push(e);
            }
            t.insert(w.clone(), tuples);
        }

        let tset = TSet::setup(&t)?;
        Ok(Sks { ks, prf_ks, tset })
    }

    /// Ключ схемы (для внешнего хранения).
    pub fn key(&self) -> &[u8; 16] {
        &self.ks
    }
}

impl Sse for Sks {
    fn search(&mut self, query: &[&str]) -> Result<Vec<u64>> {
        if query.len() != 1 {
            return Err(anyhow!("SKS needs exactly one query term"));
        }
        let w = query[0].as_bytes();

        let stag = self.tset.get_tag(w);
        let ciphertexts = self.tset.retrieve(&stag)?;

        let ke = self.prf_ks.data(w);
        let dec = Enc::new(&ke)?;

        let mut result = Vec::with_capacity(ciphertexts.len());
        for mut id in ciphertexts {
            dec.decrypt(&mut id);
            result.push(id.u64());
        }
        Ok(result)
    }
}
