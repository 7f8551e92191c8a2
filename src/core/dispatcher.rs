//! Background dispatcher: the single consumer of the event queue
//!
//! Exactly one worker thread drains the queue, renders each record once, and
//! fans the rendered line out to every sink whose filter accepts it. Sinks are
//! exclusively owned by the worker thread, so no per-sink locking is needed.
//!
//! Lifecycle state machine: `Stopped -> Running -> Draining -> Stopped`.
//! `stop()` drains the queue to completion, flushes and closes every sink,
//! and blocks the caller until the worker reaches `Stopped`.

use super::filter::SeverityFilter;
use super::metrics::PipelineMetrics;
use super::record::Record;
use super::renderer::JsonRenderer;
use crate::sinks::Sink;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Stopped,
    Running,
    Draining,
}

pub struct Dispatcher {
    stop_sender: Sender<()>,
    state: Arc<RwLock<DispatcherState>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Dispatcher {
    /// Start the worker thread; called exactly once at pipeline construction
    pub fn spawn(
        records: Receiver<Record>,
        sinks: Vec<(Box<dyn Sink>, SeverityFilter)>,
        renderer: JsonRenderer,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        let (stop_sender, stop_receiver) = bounded::<()>(1);
        let state = Arc::new(RwLock::new(DispatcherState::Running));
        let state_clone = Arc::clone(&state);

        let handle = thread::Builder::new()
            .name("logpipe-dispatcher".to_string())
            .spawn(move || {
                worker_loop(records, stop_receiver, sinks, renderer, metrics, state_clone);
            })
            .expect("failed to spawn dispatcher thread");

        Self {
            stop_sender,
            state,
            handle: Mutex::new(Some(handle)),
        }
    }

    pub fn state(&self) -> DispatcherState {
        *self.state.read()
    }

    /// Stop the dispatcher, draining the queue and closing all sinks
    ///
    /// Blocks until the worker reaches `Stopped`, which is the
    /// guaranteed-flush-before-exit property. Idempotent: after the first
    /// transition out of `Running`, further calls are no-ops. Concurrent
    /// callers serialize on the handle lock and all return once the worker
    /// has stopped.
    pub fn stop(&self) {
        let mut guard = self.handle.lock();
        if let Some(handle) = guard.take() {
            // Signal may fail if the worker already exited; join regardless
            let _ = self.stop_sender.try_send(());
            if handle.join().is_err() {
                eprintln!("[LOGPIPE ERROR] Dispatcher thread panicked during shutdown");
                *self.state.write() = DispatcherState::Stopped;
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(
    records: Receiver<Record>,
    stop_receiver: Receiver<()>,
    mut sinks: Vec<(Box<dyn Sink>, SeverityFilter)>,
    renderer: JsonRenderer,
    metrics: Arc<PipelineMetrics>,
    state: Arc<RwLock<DispatcherState>>,
) {
    loop {
        select! {
            recv(records) -> msg => match msg {
                Ok(record) => deliver(&mut sinks, &renderer, &record, &metrics),
                // Every producer handle dropped: drain is implicit, exit
                Err(_) => break,
            },
            recv(stop_receiver) -> _ => {
                *state.write() = DispatcherState::Draining;
                // Producers may still enqueue during the drain; stop once the
                // queue is observed empty
                while let Ok(record) = records.try_recv() {
                    deliver(&mut sinks, &renderer, &record, &metrics);
                }
                break;
            }
        }
    }

    for (sink, _) in sinks.iter_mut() {
        if let Err(e) = sink.flush() {
            eprintln!("[LOGPIPE ERROR] Sink '{}' flush failed: {}", sink.name(), e);
        }
        if let Err(e) = sink.close() {
            eprintln!("[LOGPIPE ERROR] Sink '{}' close failed: {}", sink.name(), e);
        }
    }

    *state.write() = DispatcherState::Stopped;
}

/// Render a record once and write it to every accepting sink
///
/// A record no filter accepts is skipped without rendering and without
/// counting as delivered. Per-sink failures and panics are isolated: they are
/// reported on the stderr fallback channel and counted, and never stop
/// delivery to other sinks or halt the dispatcher.
fn deliver(
    sinks: &mut [(Box<dyn Sink>, SeverityFilter)],
    renderer: &JsonRenderer,
    record: &Record,
    metrics: &Arc<PipelineMetrics>,
) {
    if !sinks
        .iter()
        .any(|(_, filter)| filter.accepts(record.severity))
    {
        return;
    }

    let line = renderer.render(record);

    for (sink, filter) in sinks.iter_mut() {
        if !filter.accepts(record.severity) {
            continue;
        }

        let write_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sink.write(line.as_bytes())
        }));

        match write_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics.record_sink_error();
                eprintln!("[LOGPIPE ERROR] Sink '{}' write failed: {}", sink.name(), e);
            }
            Err(panic_info) => {
                metrics.record_sink_error();
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                eprintln!(
                    "[LOGPIPE CRITICAL] Sink '{}' panicked: {}. Other sinks continue.",
                    sink.name(),
                    panic_msg
                );
            }
        }
    }

    metrics.record_delivered();
}
