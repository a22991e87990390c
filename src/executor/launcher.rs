//! Per-executable launch
//!
//! Spawns one child, drains stdout and stderr on two independent tasks, and
//! only then waits for the exit status. Reading the pipes one after the
//! other can deadlock once the child fills the pipe that isn't being read.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ChildError;
use crate::models::ChildOutcome;

/// Bytes requested per read while draining a pipe
pub const READ_CHUNK_SIZE: usize = 4096;

/// Readable end of a child's output pipe
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Resolves once the child has terminated
pub type ExitFuture = BoxFuture<'static, Result<(), ChildError>>;

/// A started child: its two output streams and a handle on its exit
pub struct SpawnedChild {
    pub stdout: Option<ByteStream>,
    pub stderr: Option<ByteStream>,
    pub exit: ExitFuture,
}

impl SpawnedChild {
    pub fn new<O, E, F>(stdout: O, stderr: E, exit: F) -> Self
    where
        O: AsyncRead + Send + Unpin + 'static,
        E: AsyncRead + Send + Unpin + 'static,
        F: Future<Output = Result<(), ChildError>> + Send + 'static,
    {
        Self {
            stdout: Some(Box::new(stdout)),
            stderr: Some(Box::new(stderr)),
            exit: exit.boxed(),
        }
    }
}

/// Process-execution capability
///
/// Implementations start `executable` and hand back its output streams.
/// A start failure is reported as `Err` and becomes the outcome's error.
pub trait Spawner: Send + Sync {
    fn spawn(&self, executable: &str) -> Result<SpawnedChild, ChildError>;
}

/// `Spawner` that runs real OS processes via `tokio::process`
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessSpawner;

impl Spawner for ProcessSpawner {
    fn spawn(&self, executable: &str) -> Result<SpawnedChild, ChildError> {
        let mut child = Command::new(executable)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ChildError::Spawn)?;

        debug!("Spawned {} (pid {:?})", executable, child.id());

        let stdout = child.stdout.take().map(|s| Box::new(s) as ByteStream);
        let stderr = child.stderr.take().map(|s| Box::new(s) as ByteStream);

        let exit = async move {
            let status = child.wait().await.map_err(ChildError::Wait)?;
            if status.success() {
                Ok(())
            } else {
                Err(ChildError::from_status(status))
            }
        }
        .boxed();

        Ok(SpawnedChild {
            stdout,
            stderr,
            exit,
        })
    }
}

/// Read `stream` to end-of-file, keeping each read as its own chunk
///
/// A read error ends the drain; whatever was read before it is kept.
pub async fn drain<R>(mut stream: R, label: String) -> Vec<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut chunks = Vec::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => chunks.push(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Reading {} failed: {}", label, e);
                break;
            }
        }
    }

    chunks
}

/// Run one executable to completion and capture its outcome
///
/// Always yields an outcome. A spawn failure skips everything else; a
/// missing stream is reported only once the child has exited.
pub async fn launch_executable(spawner: &dyn Spawner, executable: &str) -> ChildOutcome {
    let child = match spawner.spawn(executable) {
        Ok(child) => child,
        Err(e) => {
            debug!("Could not start {}: {}", executable, e);
            return ChildOutcome::failed(executable, e);
        }
    };

    let SpawnedChild {
        stdout,
        stderr,
        exit,
    } = child;

    // A missing stream is the outcome's error, but the child is still
    // drained and reaped so it never outlives its concurrency slot.
    let missing = match (&stdout, &stderr) {
        (None, _) => Some("stdout"),
        (_, None) => Some("stderr"),
        _ => None,
    };

    let stdout_task = stdout.map(|s| tokio::spawn(drain(s, format!("{executable} stdout"))));
    let stderr_task = stderr.map(|s| tokio::spawn(drain(s, format!("{executable} stderr"))));
    let (stdout, stderr) = tokio::join!(
        finish_drain(stdout_task, executable, "stdout"),
        finish_drain(stderr_task, executable, "stderr"),
    );

    let exited = exit.await;
    let error = match missing {
        Some(stream) => Some(ChildError::StreamUnavailable(stream)),
        None => exited.err(),
    };
    match &error {
        None => debug!("{} exited cleanly", executable),
        Some(e) => debug!("{} failed: {}", executable, e),
    }

    ChildOutcome {
        executable: executable.to_string(),
        error,
        stdout,
        stderr,
    }
}

async fn finish_drain(
    task: Option<JoinHandle<Vec<Vec<u8>>>>,
    executable: &str,
    stream: &str,
) -> Vec<Vec<u8>> {
    let Some(task) = task else {
        return Vec::new();
    };
    task.await.unwrap_or_else(|e| {
        warn!("{} drain for {} did not finish: {}", stream, executable, e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_drain_keeps_chunks() {
        let mock = Builder::new().read(b"stdout ").read(b"here").build();
        let chunks = drain(mock, "mock".to_string()).await;
        assert_eq!(chunks, vec![b"stdout ".to_vec(), b"here".to_vec()]);
    }

    #[tokio::test]
    async fn test_drain_stops_on_read_error() {
        let mock = Builder::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let chunks = drain(mock, "mock".to_string()).await;
        assert_eq!(chunks.concat(), b"partial".to_vec());
    }

    #[tokio::test]
    async fn test_drain_empty_stream() {
        let chunks = drain(tokio::io::empty(), "empty".to_string()).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_launch_captures_both_streams() {
        struct Fixed;
        impl Spawner for Fixed {
            fn spawn(&self, _: &str) -> Result<SpawnedChild, ChildError> {
                Ok(SpawnedChild::new(
                    &b"to stdout"[..],
                    &b"to stderr"[..],
                    async { Ok(()) },
                ))
            }
        }

        let outcome = launch_executable(&Fixed, "t/x").await;
        assert!(outcome.is_success());
        assert_eq!(outcome.executable, "t/x");
        assert_eq!(outcome.stdout_text(), "to stdout");
        assert_eq!(outcome.stderr_text(), "to stderr");
    }

    #[tokio::test]
    async fn test_launch_exit_error_keeps_output() {
        struct Failing;
        impl Spawner for Failing {
            fn spawn(&self, _: &str) -> Result<SpawnedChild, ChildError> {
                Ok(SpawnedChild::new(
                    tokio::io::empty(),
                    &b"assertion failed"[..],
                    async { Err(ChildError::Exit(1)) },
                ))
            }
        }

        let outcome = launch_executable(&Failing, "t/x").await;
        assert!(matches!(outcome.error, Some(ChildError::Exit(1))));
        assert_eq!(outcome.stderr_text(), "assertion failed");
    }

    #[tokio::test]
    async fn test_launch_missing_stream_still_reaps_child() {
        struct NoStderr {
            reaped: Arc<AtomicBool>,
        }
        impl Spawner for NoStderr {
            fn spawn(&self, _: &str) -> Result<SpawnedChild, ChildError> {
                let reaped = self.reaped.clone();
                let mut child = SpawnedChild::new(&b"partial"[..], tokio::io::empty(), async move {
                    reaped.store(true, Ordering::SeqCst);
                    Ok(())
                });
                child.stderr = None;
                Ok(child)
            }
        }

        let reaped = Arc::new(AtomicBool::new(false));
        let spawner = NoStderr {
            reaped: reaped.clone(),
        };

        let outcome = launch_executable(&spawner, "t/x").await;
        assert!(matches!(
            outcome.error,
            Some(ChildError::StreamUnavailable("stderr"))
        ));
        assert_eq!(outcome.stdout_text(), "partial");
        assert!(reaped.load(Ordering::SeqCst), "exit was never awaited");
    }

    #[tokio::test]
    async fn test_process_spawn_failure() {
        let outcome = launch_executable(&ProcessSpawner, "/nonexistent/runt-test-binary").await;
        assert!(matches!(outcome.error, Some(ChildError::Spawn(_))));
        assert!(outcome.stdout.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_exit_status() {
        if Path::new("/bin/false").exists() {
            let outcome = launch_executable(&ProcessSpawner, "/bin/false").await;
            assert!(matches!(outcome.error, Some(ChildError::Exit(1))));
        }

        if Path::new("/bin/echo").exists() {
            let outcome = launch_executable(&ProcessSpawner, "/bin/echo").await;
            assert!(outcome.is_success());
            assert_eq!(outcome.stdout_text(), "\n");
        }
    }
}
