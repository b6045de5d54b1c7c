//! ContentDigest: streaming fingerprints of local files.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256, Sha512};

use ferry_core::{Fingerprint, HashAlgorithm};

use crate::error::{io_err, TransferError};

/// Bytes read per block while hashing.
pub const DIGEST_BLOCK_SIZE: usize = 8096;

/// Computes [`Fingerprint`]s without holding the whole input in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentDigest {
    algorithm: HashAlgorithm,
}

impl ContentDigest {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        ContentDigest { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Fingerprint everything `reader` yields, [`DIGEST_BLOCK_SIZE`] bytes at a time.
    pub fn digest_reader<R: Read>(&self, reader: R) -> std::io::Result<Fingerprint> {
        match self.algorithm {
            HashAlgorithm::Sha256 => {
                stream_blocks::<Sha256, _>(reader).map(|d| Fingerprint::from_sha256(d.into()))
            }
            HashAlgorithm::Sha512 => {
                stream_blocks::<Sha512, _>(reader).map(|d| Fingerprint::from_sha512(to_array64(&d)))
            }
        }
    }

    pub fn digest_bytes(&self, bytes: &[u8]) -> Fingerprint {
        match self.algorithm {
            HashAlgorithm::Sha256 => Fingerprint::from_sha256(Sha256::digest(bytes).into()),
            HashAlgorithm::Sha512 => Fingerprint::from_sha512(to_array64(&Sha512::digest(bytes))),
        }
    }

    /// Fingerprint the file at `path`.
    ///
    /// Returns `Ok(None)` when `path` is not an existing regular file, so a
    /// missing file compares as absent instead of failing.
    pub fn digest_file(&self, path: &Path) -> Result<Option<Fingerprint>, TransferError> {
        if !path.is_file() {
            return Ok(None);
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(path, e)),
        };
        self.digest_reader(file)
            .map(Some)
            .map_err(|e| io_err(path, e))
    }
}

fn to_array64(digest: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(digest);
    out
}

fn stream_blocks<D: Digest, R: Read>(mut reader: R) -> std::io::Result<sha2::digest::Output<D>> {
    let mut hasher = D::new();
    let mut block = [0u8; DIGEST_BLOCK_SIZE];
    loop {
        let n = match reader.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&block[..n]);
    }
    Ok(hasher.finalize())
}
