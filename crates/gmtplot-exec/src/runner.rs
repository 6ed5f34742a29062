//! Child process execution with deadlock-free pipe multiplexing.
//!
//! GMT programs are filters: they read a payload from stdin and stream
//! PostScript or table data to stdout. Feeding a large payload while the
//! child is already producing output deadlocks as soon as either pipe's OS
//! buffer fills, because both ends would block. All three pipes are
//! therefore switched to non-blocking mode and serviced from a single
//! `poll(2)` loop: output is drained whenever it is readable, input is fed
//! in bounded chunks whenever stdin is writable, and stdin is closed once
//! the payload is exhausted.

use std::io::{self, Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use crate::error::{ExecError, ExecResult};

/// Upper bound on a single stdin write. Keeps the loop responsive so the
/// output side is drained between chunks; the exact value is not load-bearing.
const WRITE_CHUNK: usize = 8192;

const READ_CHUNK: usize = 4096;

/// Captured streams and exit status of one finished child process.
#[derive(Debug)]
pub(crate) struct Execution {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: ExitStatus,
}

/// Runs `program` with `args`, feeding `input` on stdin and capturing both
/// output streams. Blocks until the child exits; there is no timeout, so a
/// hung child hangs the caller.
pub(crate) fn execute(program: &Path, args: &[&str], input: &[u8]) -> ExecResult<Execution> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: program.display().to_string(),
            source,
        })?;

    match pump(&mut child, input) {
        Ok((stdout, stderr)) => {
            let status = child.wait()?;
            Ok(Execution {
                stdout,
                stderr,
                status,
            })
        }
        Err(err) => {
            // Do not leave a zombie behind on an IO failure mid-transfer.
            let _ = child.kill();
            let _ = child.wait();
            Err(err)
        }
    }
}

/// Moves bytes between the caller and the child until the input is delivered
/// and both output streams reach end-of-file.
fn pump(child: &mut Child, input: &[u8]) -> ExecResult<(Vec<u8>, Vec<u8>)> {
    let (Some(stdin), Some(mut stdout), Some(mut stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        return Err(ExecError::Io(io::Error::new(
            io::ErrorKind::Other,
            "child pipes were not captured",
        )));
    };

    set_nonblocking(stdin.as_raw_fd())?;
    set_nonblocking(stdout.as_raw_fd())?;
    set_nonblocking(stderr.as_raw_fd())?;

    // Dropping the handle closes the pipe and signals end-of-input.
    let mut stdin = if input.is_empty() {
        drop(stdin);
        None
    } else {
        Some(stdin)
    };

    let mut out_buf = Vec::new();
    let mut err_buf = Vec::new();
    let mut cursor = 0usize;
    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open || stdin.is_some() {
        let ready = wait_ready(
            out_open.then(|| stdout.as_raw_fd()),
            err_open.then(|| stderr.as_raw_fd()),
            stdin.as_ref().map(|pipe| pipe.as_raw_fd()),
        )?;

        if ready.stdout && drain(&mut stdout, &mut out_buf)? {
            out_open = false;
        }
        if ready.stderr && drain(&mut stderr, &mut err_buf)? {
            err_open = false;
        }
        if ready.stdin {
            if let Some(pipe) = stdin.as_mut() {
                match feed(pipe, input, &mut cursor) {
                    Ok(true) => stdin = None,
                    Ok(false) => {}
                    // The child stopped reading; the exit status decides
                    // whether that was a failure.
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => stdin = None,
                    Err(err) => return Err(ExecError::Io(err)),
                }
            }
        }
    }

    Ok((out_buf, err_buf))
}

struct Readiness {
    stdout: bool,
    stderr: bool,
    stdin: bool,
}

/// Waits until at least one of the given descriptors is ready. Closed
/// streams are passed as `None` and excluded from the set (`poll` ignores
/// negative descriptors). The wait is unbounded; the child closing its end
/// of a pipe wakes it up.
fn wait_ready(out: Option<RawFd>, err: Option<RawFd>, inp: Option<RawFd>) -> ExecResult<Readiness> {
    let mut fds = [
        libc::pollfd {
            fd: out.unwrap_or(-1),
            events: libc::POLLIN,
            revents: 0,
        },
        libc::pollfd {
            fd: err.unwrap_or(-1),
            events: libc::POLLIN,
            revents: 0,
        },
        libc::pollfd {
            fd: inp.unwrap_or(-1),
            events: libc::POLLOUT,
            revents: 0,
        },
    ];

    loop {
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
        if rc >= 0 {
            break;
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(ExecError::Io(err));
        }
    }

    let readable = libc::POLLIN | libc::POLLHUP | libc::POLLERR;
    let writable = libc::POLLOUT | libc::POLLHUP | libc::POLLERR;
    Ok(Readiness {
        stdout: fds[0].revents & readable != 0,
        stderr: fds[1].revents & readable != 0,
        stdin: fds[2].revents & writable != 0,
    })
}

/// Reads everything currently available from `stream` into `buf`.
/// Returns `true` once the stream reaches end-of-file.
fn drain<R: Read>(stream: &mut R, buf: &mut Vec<u8>) -> ExecResult<bool> {
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return Ok(true),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(false),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(ExecError::Io(err)),
        }
    }
}

/// Writes at most one chunk of the remaining input. Returns `true` once the
/// whole payload has been delivered.
fn feed(pipe: &mut ChildStdin, input: &[u8], cursor: &mut usize) -> io::Result<bool> {
    loop {
        if *cursor >= input.len() {
            return Ok(true);
        }
        let end = (*cursor + WRITE_CHUNK).min(input.len());
        match pipe.write(&input[*cursor..end]) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => {
                *cursor += n;
                return Ok(*cursor >= input.len());
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(false),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
