mod appointment;
mod provider;
mod review;
mod voice;
mod work_schedule;

pub use appointment::*;
pub use provider::*;
pub use review::*;
pub use voice::*;
pub use work_schedule::*;
