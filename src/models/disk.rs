use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel selection label shown in the computer picker.
pub const ALL_COMPUTERS: &str = "All Computers";

/// One drive's raw inventory snapshot as it comes out of the `DiskSpace` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskRow {
    pub computer:      String,
    pub drive:         String,
    pub total_size_gb: f64,
    pub free_space_gb: f64,
    /// `None` when the source timestamp could not be parsed.
    pub updated_at:    Option<NaiveDateTime>,
}

impl DiskRow {
    pub fn new(
        computer: impl Into<String>,
        drive: impl Into<String>,
        total_size_gb: f64,
        free_space_gb: f64,
        updated_at: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            computer: computer.into(),
            drive: drive.into(),
            total_size_gb,
            free_space_gb,
            updated_at,
        }
    }

    /// Free space larger than the volume itself. Passed through, never clamped.
    pub fn is_anomalous(&self) -> bool {
        self.free_space_gb > self.total_size_gb || self.free_space_gb < 0.0
    }
}

/// Fraction of a drive in use. `Undefined` marks a zero-sized drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsageRatio {
    Ratio(f64),
    Undefined,
}

impl UsageRatio {
    pub fn compute(used_gb: f64, total_gb: f64) -> Self {
        if total_gb == 0.0 {
            return UsageRatio::Undefined;
        }
        let r = used_gb / total_gb;
        if r.is_finite() { UsageRatio::Ratio(r) } else { UsageRatio::Undefined }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            UsageRatio::Ratio(r)  => Some(*r),
            UsageRatio::Undefined => None,
        }
    }
}

/// A `DiskRow` enriched with usage metrics. Recomputed for every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedDiskRow {
    #[serde(flatten)]
    pub row:              DiskRow,
    pub used_space_gb:    f64,
    pub percentage_used:  UsageRatio,
}

impl DerivedDiskRow {
    pub fn from_row(row: DiskRow) -> Self {
        let used_space_gb = row.total_size_gb - row.free_space_gb;
        let percentage_used = UsageRatio::compute(used_space_gb, row.total_size_gb);
        Self { row, used_space_gb, percentage_used }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceType {
    Used,
    Free,
}

impl SpaceType {
    pub fn label(&self) -> &'static str {
        match self {
            SpaceType::Used => "Used",
            SpaceType::Free => "Free",
        }
    }
}

/// One long-form chart value. A derived row melts into a Used and a Free point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeriesPoint {
    pub computer:   String,
    pub drive:      String,
    pub space_type: SpaceType,
    pub value_gb:   f64,
}

impl ChartSeriesPoint {
    /// Grouping key. Always includes the computer so equal drive letters on
    /// different machines stay apart.
    pub fn key(&self) -> (&str, &str) {
        (&self.computer, &self.drive)
    }
}

/// Scope of a report request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    AllComputers,
    Computer(String),
}

impl Selection {
    /// Interpret user input (CLI flag or config value). Inventory names
    /// taken from the picker bypass this and are used verbatim.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name == ALL_COMPUTERS {
            Selection::AllComputers
        } else {
            Selection::Computer(name.to_string())
        }
    }

    pub fn matches(&self, computer: &str) -> bool {
        match self {
            Selection::AllComputers => true,
            Selection::Computer(c)  => c == computer,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::AllComputers => ALL_COMPUTERS,
            Selection::Computer(c)  => c,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Selection {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

/// Last-updated time for a scoped set of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentativeTimestamp {
    At(NaiveDateTime),
    /// Empty scope, or a scope spanning every machine.
    NotApplicable,
    /// Rows exist but none carried a parsable timestamp.
    Unknown,
}

impl RepresentativeTimestamp {
    pub fn format(&self, fmt: &str, placeholder: &str) -> String {
        match self {
            RepresentativeTimestamp::At(t)         => t.format(fmt).to_string(),
            RepresentativeTimestamp::NotApplicable => placeholder.to_string(),
            RepresentativeTimestamp::Unknown       => "unknown".to_string(),
        }
    }
}
