//! src/counters.rs
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    pub map_input_records: u64,
    pub map_output_records: u64,
    pub combine_output_records: u64,
    pub reduce_input_groups: u64,
    pub reduce_output_records: u64,
    pub skipped: BTreeMap<&'static str, u64>,
}

impl Counters {
    pub fn skip(&mut self, reason: &'static str) {
        *self.skipped.entry(reason).or_default() += 1;
    }

    pub fn skipped(&self, reason: &str) -> u64 {
        self.skipped.get(reason).copied().unwrap_or_default()
    }

    pub fn merge(&mut self, other: &Counters) {
        self.map_input_records += other.map_input_records;
        self.map_output_records += other.map_output_records;
        self.combine_output_records += other.combine_output_records;
        self.reduce_input_groups += other.reduce_input_groups;
        self.reduce_output_records += other.reduce_output_records;
        for (reason, count) in &other.skipped {
            *self.skipped.entry(*reason).or_default() += count;
        }
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Map input records={}", self.map_input_records)?;
        writeln!(f, "Map output records={}", self.map_output_records)?;
        writeln!(f, "Combine output records={}", self.combine_output_records)?;
        writeln!(f, "Reduce input groups={}", self.reduce_input_groups)?;
        write!(f, "Reduce output records={}", self.reduce_output_records)?;
        for (reason, count) in &self.skipped {
            write!(f, "\nSkipped {reason}={count}")?;
        }
        Ok(())
    }
}
