//! Solution cache files: a raw little-endian dump of the whole table.
//!
//! `gobblet_<num_sizes>_<num_per_size>_<allow_move:0|1>.dat` holds exactly
//! `2^exp` words in slot order, with no header. The filename carries the
//! rule triple and readers trust it; the only guard is that the byte
//! length must match the table size, so truncated files are rejected and
//! the caller falls back to a fresh solve.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use gobblers_core::Rules;

use crate::table::StateTable;

/// Cache filename for a rule triple.
pub fn filename(rules: Rules) -> String {
    format!(
        "gobblet_{}_{}_{}.dat",
        rules.num_sizes(),
        rules.num_per_size(),
        rules.allow_move() as u8
    )
}

/// Serialize every slot of the table, empty ones included.
pub fn save(path: &Path, table: &StateTable) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for &word in table.as_slice() {
        writer.write_all(&word.to_le_bytes())?;
    }
    writer.flush()
}

/// Load a table of `2^exp` slots.
pub fn load(path: &Path, exp: u32) -> io::Result<StateTable> {
    let file = File::open(path)?;
    let expected = 8u64 << exp;
    let actual = file.metadata()?.len();
    if actual != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("cache file is {actual} bytes, expected {expected}"),
        ));
    }
    let mut reader = BufReader::with_capacity(1 << 20, file);
    let mut slots = Vec::with_capacity(1usize << exp);
    let mut word = [0u8; 8];
    for _ in 0..1usize << exp {
        reader.read_exact(&mut word)?;
        slots.push(u64::from_le_bytes(word));
    }
    Ok(StateTable::from_slots(slots))
}
