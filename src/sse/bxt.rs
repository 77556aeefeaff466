//! sse/bxt — BXT: Basic Cross-Tags Protocol.
//!
//! Расширение SKS для конъюнктивных запросов: первичный терм идёт через
//! T-Set, остальные проверяются по X-Set кросс-тегами
//! xtag = F(F(kx, w), plain_id). Ложные срабатывания возможны только при
//! коллизии 16-байтных тегов.

use anyhow::{anyhow, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;

use crate::crypto::Prf;

use super::encrypt::Enc;
use super::id::Id;
use super::tset::TSet;
use super::xset::XSet;
use super::{KeywordIndex, Sse};

/// Basic Cross-Tags Protocol.
pub struct Bxt {
    ks: [u8; 16],
    kx: [u8; 16],
    prf_ks: Prf,
    prf_kx: Prf,
    tset: TSet,
    xset: XSet,
}

impl Bxt {
    /// Setup со случайными ключами ks, kx.
    pub fn setup(db: &KeywordIndex) -> Result<Bxt> {
        let mut ks = [0u8; 16];
        OsRng.fill_bytes(&mut ks);
        let mut kx = [0u8; 16];
        OsRng.fill_bytes(&mut kx);
        Bxt::with_keys(ks, kx, db)
    }

    /// Setup с заданными ключами.
    pub fn with_keys(ks: [u8; 16], kx: [u8; 16], db: &KeywordIndex) -> Result<Bxt> {
        let mut prf_ks = Prf::new(&ks)?;
        let mut prf_kx = Prf::new(&kx)?;

        let occurrences: usize = db.values().map(|v| v.len()).sum();
        let mut xset = XSet::new(occurrences);

        let mut t: HashMap<String, Vec<Id>> = HashMap::new();
        for (w, indices) in db {
            let ke = prf_ks.data(w.as_bytes());
            let xtrap = prf_kx.data(w.as_bytes());
            let enc = Enc::new(&ke)?;

            let mut tuples = Vec::with_capacity(indices.len());
            for &ind in indices {
                let plain = Id::from_u64(ind);
                let mut e = plain;
                enc.encrypt(&mut e);
                tuples.push(e);

                let mut f = Prf::new(&xtrap)?;
                xset.add(f.data(&plain.0));
            }
            t.insert(w.clone(), tuples);
        }

        let tset = TSet::setup(&t)?;
        Ok(Bxt {
            ks,
            kx,
            prf_ks,
            prf_kx,
            tset,
            xset,
        })
    }

    /// Ключи схемы (ks, kx).
    pub fn keys(&self) -> (&[u8; 16], &[u8; 16]) {
        (&self.ks, &self.kx)
    }
}

impl Sse for Bxt {
    fn search(&mut self, query: &[&str]) -> Result<Vec<u64>> {
        if query.is_empty() {
            return Err(anyhow!("BXT needs one or more query terms"));
        }
        let q = query[0].as_bytes();

        let stag = self.tset.get_tag(q);

        // xtrap'ы вторичных термов.
        let mut xtraps = Vec::with_capacity(query.len() - 1);
        for w in &query[1..] {
            xtraps.push(self.prf_kx.data(w.as_bytes()));
        }

        let ciphertexts = self.tset.retrieve(&stag)?;

        let ke = self.prf_ks.data(q);
        let dec = Enc::new(&ke)?;

        let mut result = Vec::new();
        for mut id in ciphertexts {
            dec.decrypt(&mut id);

            let mut matches = true;
            for xtrap in &xtraps {
                let mut f = Prf::new(xtrap)?;
                let xtag = f.data(&id.0);
                if !self.xset.lookup(&xtag) {
                    matches = false;
                    break;
                }
            }
            if matches {
                result.push(id.u64());
            }
        }
        Ok(result)
    }
}
