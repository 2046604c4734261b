//! Persistence codec for the seven value tables.
//!
//! The save format is a plain-text layout of seven blocks in the fixed
//! order `[MC_values, TD_values, Q_values, S_MC, N_MC, N_TD, N_Q]`,
//! separated by a single blank line, with a trailing blank line after the
//! last block. Each entry is one `<key> <value>` line where the key is the
//! state's wire form (`(14,0,6)`) and the value is a space-free literal:
//! a scalar for the single-column tables, a bracketed pair (`[0.12,0]`)
//! for the per-action ones.
//!
//! Loading is all-or-nothing: every block is parsed into staging tables
//! first and the live tables are only replaced once the whole file has
//! been validated. Any malformed line fails the call with an error naming
//! the offending line.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    error::{Error, Result},
    tables::ValueTables,
    types::State,
};

/// Number of table blocks in a save file.
const BLOCK_COUNT: usize = 7;

/// Write all seven tables to a writer in the fixed block order.
pub fn save<W: Write>(tables: &ValueTables, writer: &mut W) -> Result<()> {
    write_block(writer, &tables.mc_values, |v| v.to_string())?;
    write_block(writer, &tables.td_values, |v| v.to_string())?;
    write_block(writer, &tables.q_values, |[hit, stand]| {
        format!("[{hit},{stand}]")
    })?;
    write_block(writer, &tables.s_mc, |v| v.to_string())?;
    write_block(writer, &tables.n_mc, |v| v.to_string())?;
    write_block(writer, &tables.n_td, |v| v.to_string())?;
    write_block(writer, &tables.n_q, |[hit, stand]| format!("[{hit},{stand}]"))?;
    Ok(())
}

/// Parse a save file from a reader and replace the table contents.
pub fn load<R: Read>(tables: &mut ValueTables, reader: &mut R) -> Result<()> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let blocks = split_blocks(&text)?;
    let mc_values = parse_block(&blocks[0], parse_float)?;
    let td_values = parse_block(&blocks[1], parse_float)?;
    let q_values = parse_block(&blocks[2], parse_float_pair)?;
    let s_mc = parse_block(&blocks[3], parse_float)?;
    let n_mc = parse_block(&blocks[4], parse_count)?;
    let n_td = parse_block(&blocks[5], parse_count)?;
    let n_q = parse_block(&blocks[6], parse_count_pair)?;

    tables.mc_values = mc_values;
    tables.td_values = td_values;
    tables.q_values = q_values;
    tables.s_mc = s_mc;
    tables.n_mc = n_mc;
    tables.n_td = n_td;
    tables.n_q = n_q;
    Ok(())
}

/// Write all seven tables to a file.
pub fn save_to_file<P: AsRef<Path>>(tables: &ValueTables, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(|source| Error::Io {
        operation: format!("create save file {}", path.as_ref().display()),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    save(tables, &mut writer)?;
    writer.flush().map_err(|source| Error::Io {
        operation: format!("flush save file {}", path.as_ref().display()),
        source,
    })
}

/// Load all seven tables from a file.
pub fn load_from_file<P: AsRef<Path>>(tables: &mut ValueTables, path: P) -> Result<()> {
    let file = File::open(path.as_ref()).map_err(|source| Error::Io {
        operation: format!("open save file {}", path.as_ref().display()),
        source,
    })?;
    let mut reader = BufReader::new(file);
    load(tables, &mut reader)
}

fn write_block<W: Write, T>(
    writer: &mut W,
    table: &HashMap<State, T>,
    format_value: impl Fn(&T) -> String,
) -> Result<()> {
    for (state, value) in table {
        writeln!(writer, "{state} {}", format_value(value))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Group the file's lines into blank-line-delimited blocks, keeping
/// 1-based line numbers for error reporting.
fn split_blocks(text: &str) -> Result<Vec<Vec<(usize, &str)>>> {
    let mut blocks = Vec::new();
    let mut current: Vec<(usize, &str)> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((index + 1, line));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    if blocks.len() != BLOCK_COUNT {
        return Err(Error::BlockCount {
            expected: BLOCK_COUNT,
            got: blocks.len(),
        });
    }
    Ok(blocks)
}

fn parse_block<T>(
    lines: &[(usize, &str)],
    parse_value: impl Fn(usize, &str) -> Result<T>,
) -> Result<HashMap<State, T>> {
    let mut table = HashMap::with_capacity(lines.len());
    for &(line_number, line) in lines {
        let (key, value) = line.split_once(' ').ok_or_else(|| Error::MalformedLine {
            line_number,
            line: line.to_string(),
        })?;
        let state = State::parse(key).ok_or_else(|| Error::ParseKey {
            line_number,
            key: key.to_string(),
        })?;
        table.insert(state, parse_value(line_number, value)?);
    }
    Ok(table)
}

fn parse_float(line_number: usize, value: &str) -> Result<f64> {
    value.parse().map_err(|_| Error::ParseValue {
        line_number,
        kind: "float",
        value: value.to_string(),
    })
}

fn parse_count(line_number: usize, value: &str) -> Result<u32> {
    value.parse().map_err(|_| Error::ParseValue {
        line_number,
        kind: "count",
        value: value.to_string(),
    })
}

fn parse_pair(value: &str) -> Option<(&str, &str)> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    let (first, second) = inner.split_once(',')?;
    if first.is_empty() || second.is_empty() || second.contains(',') {
        return None;
    }
    Some((first, second))
}

fn parse_float_pair(line_number: usize, value: &str) -> Result<[f64; 2]> {
    let malformed = || Error::ParseValue {
        line_number,
        kind: "float pair",
        value: value.to_string(),
    };
    let (first, second) = parse_pair(value).ok_or_else(malformed)?;
    Ok([
        first.parse().map_err(|_| malformed())?,
        second.parse().map_err(|_| malformed())?,
    ])
}

fn parse_count_pair(line_number: usize, value: &str) -> Result<[u32; 2]> {
    let malformed = || Error::ParseValue {
        line_number,
        kind: "count pair",
        value: value.to_string(),
    };
    let (first, second) = parse_pair(value).ok_or_else(malformed)?;
    Ok([
        first.parse().map_err(|_| malformed())?,
        second.parse().map_err(|_| malformed())?,
    ])
}
