//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to                      |
//! |---------------|-------------|----------------------------------|
//! | `haptic`      | HapticPort  | Log output + pulse counter       |
//! | `log_display` | DisplayPort | Log output (frame + readout)     |
//! | `log_sink`    | EventSink   | Log output                       |
//! | `sensor`      | SensorPort  | Simulated accelerometer thread   |

pub mod haptic;
pub mod log_display;
pub mod log_sink;
pub mod sensor;
