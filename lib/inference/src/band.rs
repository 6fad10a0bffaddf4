use serde::Serialize;
use std::fmt;

/// Coarse salary bracket for a predicted annual salary
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SalaryBand {
    EntryLevel,
    MidLevel,
    SeniorLevel,
    Expert,
}

impl SalaryBand {
    pub fn classify(salary: f64) -> Self {
        if salary < 40_000.0 {
            SalaryBand::EntryLevel
        } else if salary < 80_000.0 {
            SalaryBand::MidLevel
        } else if salary < 120_000.0 {
            SalaryBand::SeniorLevel
        } else {
            SalaryBand::Expert
        }
    }
}

impl fmt::Display for SalaryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SalaryBand::EntryLevel => "entry-level",
            SalaryBand::MidLevel => "mid-level",
            SalaryBand::SeniorLevel => "senior-level",
            SalaryBand::Expert => "expert/leadership",
        };
        write!(f, "{}", label)
    }
}
