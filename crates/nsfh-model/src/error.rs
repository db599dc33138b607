use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("bin set {set}: bin {label} has start {start} not below end {end}")]
    EmptyBin {
        set: String,
        label: String,
        start: i32,
        end: i32,
    },
    #[error("bin set {set}: bin {label} is open below but is not the first bin")]
    OpenStartNotFirst { set: String, label: String },
    #[error("bin set {set}: bin {label} is open above but is not the last bin")]
    OpenEndNotLast { set: String, label: String },
    #[error("bin set {set}: bins {previous} and {next} are not contiguous")]
    NotContiguous {
        set: String,
        previous: String,
        next: String,
    },
    #[error("bin set {set}: duplicate label {label}")]
    DuplicateLabel { set: String, label: String },
    #[error("bin width must be positive, got {0}")]
    InvalidWidth(i32),
    #[error("bin set {set}: width {width} bins starting at {start} overflow the year range")]
    YearOverflow { set: String, start: i32, width: i32 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
