use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Mutex;
use anyhow::anyhow;
use log::{Level, LevelFilter, Log, Metadata, Record};
use crate::load::UserSource;

// Error entries are counted per thread, so tests running in parallel don't see each other's logs
thread_local! {
    static ERROR_COUNT: Cell<usize> = const { Cell::new(0) };
}

// Warnings are counted per target across all threads, some of them are only ever logged once per process
static WARNINGS: once_cell::sync::Lazy<Mutex<HashMap<String, usize>>> = once_cell::sync::Lazy::new(Default::default);

static LOGGER: CapturingLogger = CapturingLogger;
static INSTALLED: once_cell::sync::OnceCell<()> = once_cell::sync::OnceCell::new();

struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        match record.level() {
            Level::Error => ERROR_COUNT.with(|count| count.set(count.get() + 1)),
            Level::Warn => {
                let mut warnings = WARNINGS.lock().unwrap();
                *warnings.entry(record.target().to_string()).or_default() += 1;
            }
            _ => {}
        }
    }

    fn flush(&self) {}
}

/// Installs the capturing logger, once. Call before anything is logged that a test wants to count.
pub fn install_logger() {
    INSTALLED.get_or_init(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Number of `error` entries logged on the current thread so far
pub fn captured_errors() -> usize {
    install_logger();
    ERROR_COUNT.with(Cell::get)
}

/// Number of `warn` entries logged with `target`, on any thread
pub fn captured_warnings(target: &str) -> usize {
    install_logger();
    WARNINGS.lock().unwrap().get(target).copied().unwrap_or(0)
}

/// An in-memory [`UserSource`] that counts how often it was asked
#[derive(Debug, Clone)]
pub struct StaticSource {
    response: Result<String, String>,
    pub calls: Rc<Cell<usize>>,
    pub pending: Rc<RefCell<Option<tokio::sync::oneshot::Receiver<()>>>>,
}

impl StaticSource {

    pub fn body(body: &str) -> Self {
        Self {
            response: Ok(body.to_string()),
            calls: Default::default(),
            pending: Default::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Default::default(),
            pending: Default::default(),
        }
    }

    /// Holds the response back until the returned sender fires (or is dropped)
    pub fn gated(mut self) -> (Self, tokio::sync::oneshot::Sender<()>) {
        let (sender, receiver) = tokio::sync::oneshot::channel();
        self.pending = Rc::new(RefCell::new(Some(receiver)));
        (self, sender)
    }

}

impl UserSource for StaticSource {

    async fn fetch_body(&self) -> anyhow::Result<String> {
        self.calls.set(self.calls.get() + 1);
        let gate = self.pending.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.response.clone().map_err(|message| anyhow!(message))
    }

}
