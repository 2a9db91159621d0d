use std::path::Path;

use crate::action_log::{LogEntry, SensedState, StepLog};
use crate::error::{Result, SimError};
use crate::policy::Action;

/// Compact binary step log format
///
/// Per entry:
/// - header byte: action code in bits 0-1, depth bit in bit 2
/// - reward as zigzag varint
/// - beam count as varint
/// - each lidar distance as 4 little-endian f32 bytes
///
/// Typical entry with 8 beams is 35 bytes against ~200 for pretty JSON.
pub struct CompactLogWriter {
    buffer: Vec<u8>,
    entry_count: usize,
}

const DEPTH_BIT: u8 = 0x04;
const ACTION_MASK: u8 = 0x03;

impl CompactLogWriter {
    pub fn new() -> Self {
        CompactLogWriter {
            buffer: Vec::new(),
            entry_count: 0,
        }
    }

    pub fn write_entry(&mut self, entry: &LogEntry) {
        let depth_bit = if entry.state.depth != 0 { DEPTH_BIT } else { 0 };
        self.buffer.push(entry.action.code() | depth_bit);
        self.write_i32(entry.reward);
        self.write_varint(entry.state.lidar.len() as u64);
        for &distance in &entry.state.lidar {
            self.write_f32(distance);
        }
        self.entry_count += 1;
    }

    pub fn write_log(&mut self, log: &StepLog) {
        for entry in log.entries() {
            self.write_entry(entry);
        }
    }

    /// Write variable-length integer (smaller values use fewer bytes)
    fn write_varint(&mut self, mut value: u64) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.buffer.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    /// ZigZag: 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...
    fn write_i32(&mut self, value: i32) {
        let encoded = ((value << 1) ^ (value >> 31)) as u32 as u64;
        self.write_varint(encoded);
    }

    fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.buffer)?;
        Ok(())
    }

    pub fn stats(&self) -> CompactLogStats {
        CompactLogStats {
            binary_size: self.buffer.len(),
            entry_count: self.entry_count,
        }
    }
}

impl Default for CompactLogWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CompactLogStats {
    pub binary_size: usize,
    pub entry_count: usize,
}

impl CompactLogStats {
    pub fn avg_bytes_per_entry(&self) -> f64 {
        if self.entry_count == 0 {
            0.0
        } else {
            self.binary_size as f64 / self.entry_count as f64
        }
    }
}

/// Reads entries written by [`CompactLogWriter`]
pub struct CompactLogReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CompactLogReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        CompactLogReader { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Next entry, `Ok(None)` at a clean end of input
    pub fn read_entry(&mut self) -> Result<Option<LogEntry>> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }

        let start = self.pos;
        let header = self.read_u8()?;
        if header & !(ACTION_MASK | DEPTH_BIT) != 0 {
            return Err(SimError::decode(start, format!("bad header byte {:#04x}", header)));
        }
        let action = Action::from_code(header & ACTION_MASK)
            .ok_or_else(|| {
                SimError::decode(start, format!("unknown action code {}", header & ACTION_MASK))
            })?;
        let depth = u8::from(header & DEPTH_BIT != 0);

        let reward = self.read_i32()?;
        let count = self.read_varint()? as usize;
        let remaining = self.data.len() - self.pos;
        if count.saturating_mul(4) > remaining {
            return Err(SimError::decode(
                self.pos,
                format!("{} beams need more than the {} bytes left", count, remaining),
            ));
        }

        let mut lidar = Vec::with_capacity(count);
        for _ in 0..count {
            lidar.push(self.read_f32()?);
        }

        Ok(Some(LogEntry {
            state: SensedState { depth, lidar },
            action,
            reward,
        }))
    }

    pub fn read_log(mut self) -> Result<StepLog> {
        let mut entries = Vec::new();
        while let Some(entry) = self.read_entry()? {
            entries.push(entry);
        }
        Ok(StepLog::from_entries(entries))
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| SimError::decode(self.pos, "unexpected end of data"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_varint(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut result = 0u64;
        let mut shift = 0;
        loop {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7F) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift >= 64 {
                return Err(SimError::decode(start, "varint too long"));
            }
        }
    }

    fn read_i32(&mut self) -> Result<i32> {
        let start = self.pos;
        let encoded = self.read_varint()?;
        let encoded = u32::try_from(encoded)
            .map_err(|_| SimError::decode(start, "zigzag value exceeds 32 bits"))?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let end = self.pos + 4;
        let bytes: [u8; 4] = self
            .data
            .get(self.pos..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| SimError::decode(self.pos, "truncated f32"))?;
        self.pos = end;
        Ok(f32::from_le_bytes(bytes))
    }
}

/// Load a compact log file into a [`StepLog`]
pub fn load_compact_file(path: impl AsRef<Path>) -> Result<StepLog> {
    let data = std::fs::read(path)?;
    CompactLogReader::new(&data).read_log()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> StepLog {
        StepLog::from_entries(vec![
            LogEntry {
                state: SensedState {
                    depth: 0,
                    lidar: vec![50.0, 11.0, 9.0, 50.0],
                },
                action: Action::Forward,
                reward: 1,
            },
            LogEntry {
                state: SensedState {
                    depth: 1,
                    lidar: vec![1.0, 2.5, 50.0, 7.0],
                },
                action: Action::TurnRight,
                reward: 0,
            },
            LogEntry {
                state: SensedState {
                    depth: 0,
                    lidar: vec![],
                },
                action: Action::Forward,
                reward: -1,
            },
        ])
    }

    #[test]
    fn test_writer_reader_preserve_entries() {
        let log = sample_log();
        let mut writer = CompactLogWriter::new();
        writer.write_log(&log);

        let decoded = CompactLogReader::new(writer.bytes()).read_log().unwrap();
        assert_eq!(decoded, log);
        assert_eq!(writer.stats().entry_count, 3);
    }

    #[test]
    fn test_entry_layout() {
        let mut writer = CompactLogWriter::new();
        writer.write_entry(&LogEntry {
            state: SensedState {
                depth: 1,
                lidar: vec![1.0],
            },
            action: Action::TurnLeft,
            reward: -1,
        });
        let mut expected = vec![0x05, 0x01, 0x01];
        expected.extend_from_slice(&1.0f32.to_le_bytes());
        assert_eq!(writer.bytes(), expected.as_slice());
    }

    #[test]
    fn test_truncated_data_is_an_error() {
        let mut writer = CompactLogWriter::new();
        writer.write_log(&sample_log());
        let bytes = writer.bytes();

        let truncated = &bytes[..bytes.len() - 2];
        assert!(CompactLogReader::new(truncated).read_log().is_err());
    }

    #[test]
    fn test_bad_header_is_an_error() {
        let err = CompactLogReader::new(&[0x03, 0x00, 0x00]).read_log();
        assert!(err.is_err());
        let err = CompactLogReader::new(&[0x80]).read_log();
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_input_is_empty_log() {
        let log = CompactLogReader::new(&[]).read_log().unwrap();
        assert!(log.is_empty());
    }
}
