// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionToken(u64);

impl SubmissionToken {
    pub const fn get(self) -> u64 {
        self.0
    }
}

// Only an elapsed timeout fires the callback. Cancel and drop join the worker,
// so once either returns the callback has run or never will.
#[derive(Debug)]
pub struct PendingSubmission {
    token: SubmissionToken,
    cancel_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PendingSubmission {
    pub fn start<F>(token: SubmissionToken, delay: Duration, on_ready: F) -> Result<Self>
    where
        F: FnOnce(SubmissionToken) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let worker = thread::Builder::new()
            .name(format!("submit-{}", token.get()))
            .spawn(move || match cancel_rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => on_ready(token),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!(token = token.get(), "submission abandoned before delay");
                }
            })
            .context("spawn submission worker")?;

        Ok(Self {
            token,
            cancel_tx: Some(cancel_tx),
            worker: Some(worker),
        })
    }

    pub fn token(&self) -> SubmissionToken {
        self.token
    }

    pub fn is_finished(&self) -> bool {
        self.worker
            .as_ref()
            .map(JoinHandle::is_finished)
            .unwrap_or(true)
    }

    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.cancel_tx.take());
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            debug!(token = self.token.get(), "submission worker panicked");
        }
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug, Default)]
pub struct SubmissionSlot {
    next_token: u64,
    pending: Option<PendingSubmission>,
}

impl SubmissionSlot {
    pub fn begin<F>(&mut self, delay: Duration, on_ready: F) -> Result<SubmissionToken>
    where
        F: FnOnce(SubmissionToken) + Send + 'static,
    {
        self.cancel();
        self.next_token = self.next_token.wrapping_add(1);
        let token = SubmissionToken(self.next_token);
        self.pending = Some(PendingSubmission::start(token, delay, on_ready)?);
        debug!(token = token.get(), delay_ms = delay.as_millis(), "submission started");
        Ok(token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<SubmissionToken> {
        self.pending.as_ref().map(PendingSubmission::token)
    }

    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                debug!(token = pending.token().get(), "submission cancelled");
                pending.cancel();
                true
            }
            None => false,
        }
    }

    pub fn complete(&mut self, token: SubmissionToken) -> bool {
        if self.pending_token() != Some(token) {
            debug!(token = token.get(), "stale submission completion ignored");
            return false;
        }
        self.pending = None;
        true
    }
}
