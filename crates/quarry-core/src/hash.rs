//! Content digests for loaded tables, recorded in the run manifest.

use blake3::Hasher;

use crate::types::{RowBatch, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Order-sensitive digest of a batch's column names and values.
pub fn hash_batch(batch: &RowBatch) -> Hash256 {
    let mut h = Hasher::new();
    for col in &batch.columns {
        update_str(&mut h, &col.name);
        for v in &col.values {
            update_scalar(&mut h, v);
        }
    }
    Hash256(h.finalize().into())
}

fn update_str(h: &mut Hasher, s: &str) {
    h.update(&(s.len() as u64).to_le_bytes());
    h.update(s.as_bytes());
}

/// One tag byte, then a fixed-width or length-prefixed payload.
fn update_scalar(h: &mut Hasher, v: &Scalar) {
    match v {
        Scalar::Null => {
            h.update(&[0]);
        }
        Scalar::I64(i) => {
            h.update(&[2]);
            h.update(&i.to_le_bytes());
        }
        Scalar::F64(f) => {
            h.update(&[3]);
            h.update(&f.to_bits().to_le_bytes());
        }
        Scalar::Str(s) => {
            h.update(&[4]);
            update_str(h, s);
        }
        Scalar::Timestamp(ts) => {
            let utc = ts.and_utc();
            h.update(&[5]);
            h.update(&utc.timestamp().to_le_bytes());
            h.update(&utc.timestamp_subsec_nanos().to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    #[test]
    fn digest_depends_on_row_order() {
        let a = RowBatch::try_new(vec![Column::new(
            "k",
            vec![Scalar::I64(1), Scalar::I64(2)],
        )])
        .unwrap();
        let b = a.take_rows(&[1, 0]);
        assert_ne!(hash_batch(&a), hash_batch(&b));
        assert_eq!(hash_batch(&a), hash_batch(&a.clone()));
        assert_eq!(hash_batch(&a).to_hex().len(), 64);
    }
}
