//! Letter grades (A+ … F-) for accessibility indices.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::color::ColorBand;
use super::table::{BoundConvention, ClassTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Score at or below zero: no usable result
    Error,
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    EPlus,
    E,
    EMinus,
    FPlus,
    F,
    FMinus,
}

pub static GRADE_TABLE: ClassTable<Grade> = ClassTable {
    stops: &[
        (0.0, Grade::Error),
        (0.28, Grade::APlus),
        (0.32, Grade::A),
        (0.35, Grade::AMinus),
        (0.4, Grade::BPlus),
        (0.45, Grade::B),
        (0.5, Grade::BMinus),
        (0.56, Grade::CPlus),
        (0.63, Grade::C),
        (0.71, Grade::CMinus),
        (0.8, Grade::DPlus),
        (0.9, Grade::D),
        (1.0, Grade::DMinus),
        (1.12, Grade::EPlus),
        (1.26, Grade::E),
        (1.41, Grade::EMinus),
        (1.59, Grade::FPlus),
        (1.78, Grade::F),
    ],
    overflow: Grade::FMinus,
    nan: Grade::Error,
};

impl Grade {
    /// The 18 real grades, best first.
    pub const ALL: [Grade; 18] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::EPlus,
        Grade::E,
        Grade::EMinus,
        Grade::FPlus,
        Grade::F,
        Grade::FMinus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Error => "Error",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::EPlus => "E+",
            Grade::E => "E",
            Grade::EMinus => "E-",
            Grade::FPlus => "F+",
            Grade::F => "F",
            Grade::FMinus => "F-",
        }
    }

    /// Coarse colour band this grade's letter belongs to.
    pub fn sextet(&self) -> ColorBand {
        match self {
            Grade::Error => ColorBand::NoData,
            Grade::APlus | Grade::A | Grade::AMinus => ColorBand::Green,
            Grade::BPlus | Grade::B | Grade::BMinus => ColorBand::LightGreen,
            Grade::CPlus | Grade::C | Grade::CMinus => ColorBand::Yellow,
            Grade::DPlus | Grade::D | Grade::DMinus => ColorBand::Orange,
            Grade::EPlus | Grade::E | Grade::EMinus => ColorBand::Red,
            Grade::FPlus | Grade::F | Grade::FMinus => ColorBand::Purple,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade of an index using inclusive upper bounds.
pub fn grade_of(score: f64) -> Grade {
    grade_of_with(score, BoundConvention::Inclusive)
}

/// Zero, negative and NaN scores mean "no data" under either convention.
pub fn grade_of_with(score: f64, convention: BoundConvention) -> Grade {
    if score.is_nan() || score <= 0.0 {
        return Grade::Error;
    }
    GRADE_TABLE.classify(score, convention)
}
