//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! Host side: `producer_task` and `link_server_task`. Face side: `sync_task`
//! (I/O context), `face_task` (render context), `render_tick_task` and
//! `time_tick_task`. `lifecycle_task` plays the scenario script.

pub mod face;
pub mod lifecycle;
pub mod link_server;
pub mod producer;
pub mod sync;
pub mod tick;

pub use face::face_task;
pub use lifecycle::lifecycle_task;
pub use link_server::link_server_task;
pub use producer::producer_task;
pub use sync::sync_task;
pub use tick::{render_tick_task, time_tick_task};
