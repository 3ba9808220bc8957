//! Terminal input on a dedicated thread.
//!
//! rustyline blocks on the terminal, so lines are read on a plain OS thread
//! and forwarded into the async side over a channel. The channel closes on
//! Ctrl-C, Ctrl-D or a terminal error.

use std::thread;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, oneshot};

use crate::error::ClientError;

const INPUT_BUFFER: usize = 16;

/// Start reading terminal lines in the background
pub(crate) async fn spawn_line_reader() -> Result<mpsc::Receiver<String>, ClientError> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    let (ready_tx, ready_rx) = oneshot::channel();

    thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => {
                let _ = ready_tx.send(Ok(()));
                editor
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        read_lines(&mut editor, &tx);
    });

    match ready_rx.await {
        Ok(Ok(())) => Ok(rx),
        Ok(Err(e)) => Err(ClientError::Readline(e)),
        // The thread only exits early after reporting
        Err(_) => Err(ClientError::Readline(ReadlineError::Eof)),
    }
}

fn read_lines(editor: &mut DefaultEditor, tx: &mpsc::Sender<String>) {
    loop {
        match editor.readline("") {
            Ok(line) => {
                if !line.is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Terminal input failed");
                break;
            }
        }
    }
    tracing::debug!("Terminal input closed");
}
