//! Persistence-log codec.
//!
//! The database is a headerless, delimiter-free concatenation of raw
//! host-endian `u64` fingerprints, append-only. This module reads and
//! writes that format over any `Read`/`Write`; the interceptor wires it to
//! the real file and decides what a failure costs (it is fatal there).

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::hash::{HashEntry, HashTable};

/// Size of one record on disk.
pub const RECORD_SIZE: usize = 8;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unable to read database: {0}")]
    Read(#[source] io::Error),
    #[error("Unable to write database: {0}")]
    Write(#[source] io::Error),
}

/// Read one record. `Ok(false)` is end of input; a partial trailing record
/// is discarded the way `fread` discards short items.
fn read_record<R: Read>(r: &mut R, buf: &mut [u8; RECORD_SIZE]) -> Result<bool, DbError> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(DbError::Read(e)),
        }
    }
    Ok(true)
}

/// Load every recorded fingerprint into the call-site table.
///
/// Duplicate records are tolerated (the first wins). A zero fingerprint
/// that duplicates an already-present zero terminates the read early; this
/// copes with pathological databases such as `/dev/full`'s endless zero
/// stream. Returns the number of distinct fingerprints added.
pub fn load<R: Read>(mut r: R, table: &mut HashTable) -> Result<usize, DbError> {
    let mut added = 0;
    let mut buf = [0u8; RECORD_SIZE];
    while read_record(&mut r, &mut buf)? {
        let hash = u64::from_ne_bytes(buf);
        let duplicate = table.insert(HashEntry::new(hash, None)).is_some();
        if duplicate {
            if hash == 0 {
                break;
            }
        } else {
            added += 1;
        }
    }
    Ok(added)
}

/// Append one fingerprint and flush so the record survives a target that
/// crashes inside its error path.
pub fn append<W: Write>(mut w: W, hash: u64) -> Result<(), DbError> {
    w.write_all(&hash.to_ne_bytes()).map_err(DbError::Write)?;
    w.flush().map_err(DbError::Write)
}

/// Raw record list, duplicates included, no terminator rule. Used by the
/// harness to assert on database contents.
pub fn snapshot<R: Read>(mut r: R) -> Result<Vec<u64>, DbError> {
    let mut out = Vec::new();
    let mut buf = [0u8; RECORD_SIZE];
    while read_record(&mut r, &mut buf)? {
        out.push(u64::from_ne_bytes(buf));
    }
    Ok(out)
}
