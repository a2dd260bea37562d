use std::{ffi::OsStr, io::Result as IoResult, process::ExitStatus};

#[cfg(windows)]
use command_group::AsyncCommandGroup;

use async_signal::{Signal, Signals};
use futures::StreamExt;
use tokio::{
    process::Command,
    task::{JoinHandle, spawn},
};
use tracing::{debug, error};

/*
    A tool that was interrupted by a signal exits with 128 + the signal
    number, the same way a shell reports it, so that scripts calling us
    can tell an interrupted tool apart from one that failed by itself.
*/
pub const EXIT_CODE_GOT_SIGNAL: i32 = 128;

/*
    A tool that exited without a code (killed on unix) is reported as a
    generic failure, since there is no better code to forward.
*/
pub const EXIT_CODE_UNKNOWN: i32 = 1;

fn listen_for_signals() -> IoResult<JoinHandle<i32>> {
    let mut signals = if cfg!(target_os = "windows") {
        Signals::new([Signal::Int])?
    } else {
        Signals::new([Signal::Int, Signal::Term, Signal::Quit])?
    };

    let task = spawn(async move {
        while let Some(result) = signals.next().await {
            match result {
                Ok(sig) => return EXIT_CODE_GOT_SIGNAL + (sig as i32),
                Err(err) => error!("Failed to listen for signal: {err}"),
            }
        }
        EXIT_CODE_GOT_SIGNAL
    });

    Ok(task)
}

/**
    How a program that was run under our signal listeners finished.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The program exited by itself.
    Exited(ExitStatus),
    /// We received a signal and killed the program. Holds the exit code to use.
    Interrupted(i32),
}

impl Completion {
    /**
        Returns the exit code to report for this completion.
    */
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Exited(status) => exit_code_of(status),
            Self::Interrupted(code) => code,
        }
    }
}

pub(crate) fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(EXIT_CODE_UNKNOWN)
}

/**
    Spawns the given command and waits for it, killing it if
    any of the signals listed in [`run_interruptible`] arrive.

    # Errors

    - If signal listeners could not be created
    - If the command could not be started or waited for
*/
pub async fn wait_interruptible(mut command: Command) -> IoResult<Completion> {
    let signal_handle = listen_for_signals()?;
    let signal_aborter = signal_handle.abort_handle();

    // NOTE: The child must not outlive us if this future is dropped, and
    // on Windows it must be spawned into our process group for that to work
    let spawned = {
        #[cfg(unix)]
        {
            command.kill_on_drop(true).spawn()
        }
        #[cfg(windows)]
        {
            command.group().kill_on_drop(true).spawn()
        }
    };
    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            signal_aborter.abort();
            return Err(e);
        }
    };

    tokio::select! {
        status = child.wait() => {
            signal_aborter.abort();
            Ok(Completion::Exited(status?))
        }
        task_result = signal_handle => {
            child.kill().await.ok();
            let code = task_result.unwrap_or(EXIT_CODE_GOT_SIGNAL);
            debug!(code, "program interrupted");
            Ok(Completion::Interrupted(code))
        }
    }
}

/**
    Runs the given program with the given arguments and returns its exit code.

    The program shares stdin, stdout and stderr with the current process,
    and its arguments are passed through exactly as given.

    The program is killed if any of the following signals are received:

    - SIGINT (Ctrl+C)
    - SIGTERM
    - SIGQUIT

    In that case the returned exit code is `128` plus the signal number.
    Note that on Windows, only SIGINT (Ctrl+C) is supported, but the
    program is also part of our job group and exits together with us.

    # Errors

    - If signal listeners could not be created
    - If the given program could not be started or waited for
*/
pub async fn run_interruptible<C, A, S>(program: C, args: A) -> IoResult<i32>
where
    C: AsRef<OsStr>,
    A: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program.as_ref());
    command.args(args);

    let code = wait_interruptible(command).await?.code();
    debug!(code, "program exited");
    Ok(code)
}

/**
    Serializes tests that install signal listeners, since a
    signal sent to the test process reaches all of them.
*/
#[cfg(test)]
pub(crate) async fn lock_signal_listeners() -> tokio::sync::MutexGuard<'static, ()> {
    static LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());
    LOCK.lock().await
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_exit_code() {
        let _guard = lock_signal_listeners().await;
        assert_eq!(run_interruptible("sh", ["-c", "exit 0"]).await.unwrap(), 0);
        assert_eq!(run_interruptible("sh", ["-c", "exit 7"]).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn forwards_arguments_verbatim() {
        let _guard = lock_signal_listeners().await;
        let code = run_interruptible(
            "sh",
            ["-c", r#"[ "$1" = "--flag" ] && [ "$2" = "a b" ]"#, "sh", "--flag", "a b"],
        )
        .await
        .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn missing_program_fails_to_start() {
        let _guard = lock_signal_listeners().await;
        let dir = tempfile::tempdir().unwrap();
        let err = run_interruptible(dir.path().join("missing"), Vec::<String>::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn signal_kills_program_and_is_reported() {
        let _guard = lock_signal_listeners().await;
        // The child signals its parent, which is this test process
        let code = run_interruptible("sh", ["-c", "kill -TERM $PPID; sleep 5"])
            .await
            .unwrap();
        assert_eq!(code, EXIT_CODE_GOT_SIGNAL + 15);
    }

    #[tokio::test]
    async fn interrupted_command_is_not_an_exit() {
        let _guard = lock_signal_listeners().await;
        let mut command = Command::new("sh");
        command.args(["-c", "kill -INT $PPID; sleep 5"]);
        let completion = wait_interruptible(command).await.unwrap();
        assert_eq!(completion, Completion::Interrupted(EXIT_CODE_GOT_SIGNAL + 2));
    }

    #[tokio::test]
    async fn killed_program_has_unknown_exit_code() {
        let _guard = lock_signal_listeners().await;
        let code = run_interruptible("sh", ["-c", "kill -KILL $$"])
            .await
            .unwrap();
        assert_eq!(code, EXIT_CODE_UNKNOWN);
    }
}
