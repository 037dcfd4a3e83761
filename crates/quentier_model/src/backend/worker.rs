//! Background worker thread that owns local storage.

mod mutate;
mod query;

use crate::backend::{RequestId, StorageCmd, StorageEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use quentier_core::{config::env_flag_enabled, Database};
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// Handle for sending commands to, and receiving events from, the storage worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<StorageCmd>,
    pub evt_rx: Receiver<StorageEvent>,
}

pub(super) struct WorkerState {
    db: Database,
    evt_tx: Sender<StorageEvent>,
    perf_log_enabled: bool,
}

impl WorkerState {
    fn emit(&self, event: StorageEvent) {
        if let Err(err) = self.evt_tx.send(event) {
            debug!(
                request_id = %err.0.request_id(),
                "storage event dropped: receiver gone"
            );
        }
    }
}

fn log_command_perf(
    enabled: bool,
    request_id: RequestId,
    op: &str,
    started: Instant,
    items: usize,
) {
    if !enabled {
        return;
    }
    info!(
        target: "quentier_model::backend_perf",
        %request_id,
        op = op,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        items = items,
        "storage command perf"
    );
}

fn dispatch(state: &mut WorkerState, cmd: StorageCmd) {
    let started = Instant::now();
    let id = cmd.request_id();
    let perf = state.perf_log_enabled;
    match cmd {
        StorageCmd::Create { request_id, entity } => {
            mutate::handle_create(state, request_id, entity);
            log_command_perf(perf, id, "create", started, 1);
        }
        StorageCmd::Update { request_id, entity } => {
            mutate::handle_update(state, request_id, entity);
            log_command_perf(perf, id, "update", started, 1);
        }
        StorageCmd::Expunge {
            request_id,
            kind,
            local_id,
        } => {
            mutate::handle_expunge(state, request_id, kind, local_id);
            log_command_perf(perf, id, "expunge", started, 1);
        }
        StorageCmd::Find {
            request_id,
            kind,
            local_id,
        } => {
            query::handle_find(state, request_id, kind, local_id);
            log_command_perf(perf, id, "find", started, 1);
        }
        StorageCmd::List {
            request_id,
            kind,
            filter,
            offset,
            limit,
            order,
        } => {
            let items = query::handle_list(state, request_id, kind, filter, offset, limit, order);
            log_command_perf(perf, id, "list", started, items);
        }
        StorageCmd::CountNotes {
            request_id,
            kind,
            local_id,
        } => {
            query::handle_count_notes(state, request_id, kind, local_id);
            log_command_perf(perf, id, "count_notes", started, 1);
        }
    }
}

/// Spawn the storage worker thread that performs blocking database access.
///
/// All I/O stays off the UI thread; the worker answers every command with
/// exactly one [`StorageEvent`], in command order. The thread exits when every
/// command sender has been dropped.
///
/// # Returns
/// A [`BackendHandle`] containing the command sender and event receiver.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_backend(db: Database) -> BackendHandle {
    spawn_backend_with_perf_log(db, env_flag_enabled("QUENTIER_BACKEND_PERF_LOG"))
}

/// Like [`spawn_backend`], with per-command timing logs switched explicitly.
pub fn spawn_backend_with_perf_log(db: Database, perf_log_enabled: bool) -> BackendHandle {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("quentier-storage".to_string())
        .spawn(move || {
            let mut state = WorkerState {
                db,
                evt_tx,
                perf_log_enabled,
            };
            for cmd in cmd_rx.iter() {
                dispatch(&mut state, cmd);
            }
            debug!("storage worker stopped");
        })
        .expect("spawn storage worker thread");

    BackendHandle { cmd_tx, evt_rx }
}
