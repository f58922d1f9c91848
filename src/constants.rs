//! Fixed sizes and limits of the mcu8 microcontroller.

/// Size in bytes of both the code memory and the lookup table.
pub const MEMORY_SIZE: usize = 256;

/// Address of the first byte of code memory. Assembly always starts here.
pub const PROGRAM_START_ADDRESS: u8 = 0;

/// Number of general-purpose 8-bit registers.
pub const REGISTER_COUNT: usize = 8;

/// Minimum analogue input voltage.
pub const ANALOGUE_INPUT_MIN: f64 = 0.0;

/// Maximum analogue input voltage.
pub const ANALOGUE_INPUT_MAX: f64 = 5.0;

/// Lowest clock speed the engine will accept.
pub const MIN_CLOCK_SPEED_HZ: u32 = 1;

/// Highest clock speed the engine will accept.
pub const MAX_CLOCK_SPEED_HZ: u32 = 1000;
