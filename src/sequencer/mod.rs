// Sequencer module
// Transport clock and the loop-aware block scheduler

pub mod scheduler;
pub mod transport;

pub use scheduler::schedule_block;
pub use transport::Transport;
