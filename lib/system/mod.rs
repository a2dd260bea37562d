mod runner;

#[cfg(test)]
pub(crate) use self::runner::lock_signal_listeners;
pub use self::runner::{
    Completion, EXIT_CODE_GOT_SIGNAL, EXIT_CODE_UNKNOWN, run_interruptible, wait_interruptible,
};
