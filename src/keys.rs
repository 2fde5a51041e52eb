//! Enums for the single character codes used in Argo data files.
use strum_macros::{Display, EnumIter, EnumString};

/// Quality control flags, Argo reference table 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display)]
pub enum QcFlag {
    /// No QC was performed
    #[strum(serialize = "0")]
    NoQc,
    /// Good data
    #[strum(serialize = "1")]
    Good,
    /// Probably good data
    #[strum(serialize = "2")]
    ProbablyGood,
    /// Bad data that are potentially correctable
    #[strum(serialize = "3")]
    ProbablyBad,
    /// Bad data
    #[strum(serialize = "4")]
    Bad,
    /// Value changed
    #[strum(serialize = "5")]
    Changed,
    /// Not used
    #[strum(serialize = "6")]
    Unused6,
    /// Not used
    #[strum(serialize = "7")]
    Unused7,
    /// Estimated value
    #[strum(serialize = "8")]
    Estimated,
    /// Missing value
    #[strum(serialize = "9")]
    Missing,
}

impl QcFlag {
    /// Parse a flag from its character code. A blank is a missing flag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::QcFlag;
    ///
    /// assert_eq!(QcFlag::from_code('1'), Some(QcFlag::Good));
    /// assert_eq!(QcFlag::from_code(' '), None);
    /// assert_eq!(QcFlag::from_code('x'), None);
    /// ```
    pub fn from_code(code: char) -> Option<Self> {
        let mut buf = [0u8; 4];
        code.encode_utf8(&mut buf).parse().ok()
    }

    /// The character code for this flag.
    pub fn code(self) -> char {
        (b'0' + self as u8) as char
    }

    /// Flags kept by standard mode filtering.
    #[inline]
    pub fn is_good(self) -> bool {
        matches!(self, QcFlag::Good | QcFlag::ProbablyGood)
    }
}

/// Direction of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum Direction {
    /// Ascending profile
    #[strum(serialize = "A")]
    Ascending,
    /// Descending profile
    #[strum(serialize = "D")]
    Descending,
}

/// Processing state of the measurements in a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum DataMode {
    /// Real-time data
    #[strum(serialize = "R")]
    RealTime,
    /// Real-time data with adjusted values
    #[strum(serialize = "A")]
    Adjusted,
    /// Delayed mode data
    #[strum(serialize = "D")]
    Delayed,
}

/// Ocean basin code of the profile index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum Ocean {
    /// Atlantic ocean
    #[strum(serialize = "A")]
    Atlantic,
    /// Indian ocean
    #[strum(serialize = "I")]
    Indian,
    /// Pacific ocean
    #[strum(serialize = "P")]
    Pacific,
}
