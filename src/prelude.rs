//! Prelude

pub use crate::bus::DataBus as _ad7616_parallel_DataBus;
pub use crate::bus::{PinBus, PortBus};
pub use crate::line::{DigitalLine, Level, LineId};
pub use crate::report::Reporter;
pub use crate::sequencer::{Ad7616, ControlLines, DataBuses};
pub use crate::timing::Timing;
pub use embedded_hal::delay::DelayNs as _ad7616_parallel_DelayNs;
pub use embedded_io::Write as _ad7616_parallel_Write;
