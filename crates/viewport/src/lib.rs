pub mod focus;
pub mod state;
pub mod zoom;

pub use focus::*;
pub use state::*;
pub use zoom::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportError {
    DegenerateContainer { width: f64, height: f64 },
    DegenerateMap { width: f64, height: f64 },
    InvalidScale(f64),
    InvalidZoom { step: f64, max_step: u32 },
    InvalidFocus(&'static str),
}

impl std::fmt::Display for ViewportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewportError::DegenerateContainer { width, height } => {
                write!(f, "container size {width}x{height} must be positive and finite")
            }
            ViewportError::DegenerateMap { width, height } => {
                write!(f, "map design size {width}x{height} must be positive and finite")
            }
            ViewportError::InvalidScale(s) => write!(f, "scale {s} must be positive and finite"),
            ViewportError::InvalidZoom { step, max_step } => write!(
                f,
                "zoom step factor {step} must be > 1 and max step {max_step} must be >= 1 with a finite top factor"
            ),
            ViewportError::InvalidFocus(why) => write!(f, "invalid focus: {why}"),
        }
    }
}

impl std::error::Error for ViewportError {}
