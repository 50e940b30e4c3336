#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod asynch;
mod driver;
mod error;
mod magnet;
mod register;

pub use driver::{ANGLE_MAX, As5600, DEVICE_ADDRESS};
pub use error::Error;
pub use magnet::MagnetStatus;
pub use register::{ConfRegister, OutputMode, Register, StatusRegister};
