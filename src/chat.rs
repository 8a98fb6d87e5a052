//! Chat-script engine: drives the modem's AT command dialect and the
//! notification wait loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::ChatError;
use crate::parse;
use crate::transport::{ModemTransport, ReadOutcome};

const RETRIEVE_COMMAND: &str = "AT+CMGR=";
const DELETE_COMMAND: &str = "AT+CMGD=";

/// Pause before retrying after an empty read.
const STREAM_END_PAUSE: Duration = Duration::from_millis(250);

/// One scripted step.
#[derive(Debug, Clone)]
pub enum ChatStep {
    /// Write a command, read one response, optionally enforce that the
    /// trimmed response equals `expect` exactly.
    Send {
        command: String,
        expect: String,
        enforce: bool,
    },
    /// Block until a chunk starting with `prefix` arrives. This is the
    /// terminal step: from here the engine handles notifications and
    /// never returns to the script.
    Wait { prefix: String },
}

impl ChatStep {
    fn send(command: &str, expect: &str, enforce: bool) -> Self {
        Self::Send {
            command: command.to_string(),
            expect: expect.to_string(),
            enforce,
        }
    }
}

/// The modem initialization script: echo off, unsolicited result codes
/// off, SIM message storage, text mode, new-message indications, then
/// the `+CMTI` notification wait.
pub fn setup_script() -> Vec<ChatStep> {
    vec![
        ChatStep::send("ATE0", "OK", false),
        ChatStep::send("AT^CURC=0", "OK", true),
        ChatStep::send("AT+CPMS=\"SM\"", "+CPMS: 0,30,0,30,0,30\r\n\r\nOK", false),
        ChatStep::send("AT+CMGF=1", "OK", true),
        ChatStep::send("AT+CNMI=1,1,0,1,0", "OK", true),
        ChatStep::Wait {
            prefix: "+CMTI:".to_string(),
        },
    ]
}

/// Executes a chat script against an exclusively owned transport.
///
/// One notification is fully retrieved, deleted, parsed, and
/// dispatched before the next read; there is no concurrent handling of
/// two notifications against one modem.
pub struct ChatEngine<T: ModemTransport> {
    transport: T,
    script: Vec<ChatStep>,
    dispatcher: Dispatcher,
    shutdown: Arc<AtomicBool>,
}

impl<T: ModemTransport> ChatEngine<T> {
    pub fn new(
        transport: T,
        script: Vec<ChatStep>,
        dispatcher: Dispatcher,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            transport,
            script,
            dispatcher,
            shutdown,
        }
    }

    /// Run the script to completion.
    ///
    /// An enforced response mismatch aborts the whole run; no later
    /// steps execute. A `Wait` step never finishes on its own, so this
    /// returns `Ok(())` only when the shutdown flag is raised. The
    /// transport is dropped (closed) on return either way.
    pub fn run(mut self) -> Result<(), ChatError> {
        let script = std::mem::take(&mut self.script);
        for step in script {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(());
            }
            match step {
                ChatStep::Send {
                    command,
                    expect,
                    enforce,
                } => {
                    let response = self.send_command(&command)?;
                    if response != expect {
                        if enforce {
                            return Err(ChatError::ProtocolMismatch {
                                command,
                                expected: expect,
                                actual: response,
                            });
                        }
                        debug!(command = %command, response = %response, "Unenforced mismatch, continuing");
                    }
                }
                ChatStep::Wait { prefix } => {
                    info!(prefix = %prefix, "Setup complete, waiting for notifications");
                    while let Some(chunk) = self.wait_for(&prefix) {
                        let index = parse::parse_notification(&chunk).to_string();
                        self.handle_notification(&index);
                    }
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Write `command` (unless empty) and perform one bounded read,
    /// returning the trimmed response.
    fn send_command(&mut self, command: &str) -> Result<String, ChatError> {
        if !command.is_empty() {
            self.transport.write_all(format!("{command}\r\n").as_bytes())?;
        }
        match self.transport.read_chunk()? {
            ReadOutcome::Data(bytes) => Ok(String::from_utf8_lossy(&bytes).trim().to_string()),
            ReadOutcome::EndOfStream => Err(ChatError::Closed {
                command: command.to_string(),
            }),
        }
    }

    /// Read until a chunk starts with `prefix`. Returns `None` when
    /// the shutdown flag is raised.
    fn wait_for(&mut self, prefix: &str) -> Option<String> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return None;
            }
            match self.transport.read_chunk() {
                Ok(ReadOutcome::Data(bytes)) => {
                    let chunk = String::from_utf8_lossy(&bytes).trim().to_string();
                    if chunk.starts_with(prefix) {
                        return Some(chunk);
                    }
                }
                Ok(ReadOutcome::EndOfStream) => std::thread::sleep(STREAM_END_PAUSE),
                // Swallowed per iteration; a persistently failing port
                // turns this into a busy-retry loop. Kept until a
                // bounded-retry policy is decided.
                Err(e) => warn!("Read error while waiting: {e}"),
            }
        }
    }

    /// Retrieve, delete, parse, and dispatch one notified message.
    ///
    /// A failed retrieval skips the notification and the loop carries
    /// on; there is no message-loss accounting.
    fn handle_notification(&mut self, index: &str) {
        let payload = match self.send_command(&format!("{RETRIEVE_COMMAND}{index}")) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(index = %index, "Retrieval failed, skipping: {e}");
                return;
            }
        };
        // The delete result is not checked; a stuck message would be
        // re-notified by the modem anyway.
        if let Err(e) = self.send_command(&format!("{DELETE_COMMAND}{index}")) {
            debug!(index = %index, "Delete failed: {e}");
        }
        let message = parse::parse_retrieved(&payload);
        self.dispatcher.dispatch(&message.sender, &message.body);
    }
}
