//! Operator keyboard input.
//!
//! Lines read from stdin are translated with [`Command::parse`] and queued
//! for the runner. The reader runs on a detached OS thread: a blocked
//! `read_line` must not keep the runtime alive once the simulation ends.

use std::io::BufRead;
use std::thread;

use savanna_core::command::{Command, CommandSender};
use tracing::{debug, warn};

/// Forward every recognised line from `reader` onto the command queue.
///
/// Returns the number of commands sent. Stops at end of input, on a read
/// error, or once the runner has dropped its receiver.
pub fn forward_commands<R: BufRead>(reader: R, commands: &CommandSender) -> usize {
    let mut sent: usize = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "stdin read failed, input disabled");
                break;
            }
        };
        let Some(command) = Command::parse(&line) else {
            debug!(input = line.trim(), "Ignoring unrecognised input");
            continue;
        };
        if commands.send(command).is_err() {
            break;
        }
        sent = sent.saturating_add(1);
    }
    sent
}

/// Start reading stdin on a background thread.
pub fn spawn_stdin_reader(commands: CommandSender) -> std::io::Result<thread::JoinHandle<usize>> {
    thread::Builder::new()
        .name("savanna-stdin".to_owned())
        .spawn(move || forward_commands(std::io::stdin().lock(), &commands))
}
