//! Interrupt capture.
//!
//! The fixture subscribes to the user-interrupt signal before anything else
//! runs. Delivered signals land in a single-slot inbox so that one interrupt
//! raised before anybody waits is still observed later; further interrupts
//! arriving while the slot is full are dropped.
//!
//! | Source | Platform | Fed by |
//! |--------|----------|--------|
//! | [`SignalListener`] | Unix | SIGINT via `signal-hook` |
//! | [`CtrlCListener`] | Windows | console Ctrl-C via `ctrlc` |
//! | [`InertListener`] | other | nothing (never fires) |
//! | [`ManualInterrupts`] | any | [`InterruptTrigger::trigger`] |

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
#[cfg(any(windows, test))]
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[cfg(unix)]
use signal_hook::consts::signal::SIGINT;
#[cfg(unix)]
use signal_hook::iterator::Signals;

#[cfg(any(unix, windows))]
use crate::error::FixtureError;
use crate::error::Result;

/// `SIGINT` as numbered by the C runtime outside Unix.
#[cfg(not(unix))]
const SIGINT: i32 = 2;

/// A delivered interrupt, identified by its raw signal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupt {
    signal: i32,
}

impl Interrupt {
    /// The platform's user interrupt (Ctrl-C).
    pub const USER: Self = Self { signal: SIGINT };

    #[must_use]
    pub const fn from_signal(signal: i32) -> Self {
        Self { signal }
    }

    #[must_use]
    pub const fn signal(self) -> i32 {
        self.signal
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.signal {
            SIGINT => f.write_str("interrupt"),
            other => write!(f, "signal {other}"),
        }
    }
}

/// Something the wait mode can block on until an interrupt arrives.
pub trait InterruptSource {
    /// Suspend the calling thread until an interrupt is delivered or
    /// `timeout` elapses. Returns `None` on timeout.
    fn wait_for(&mut self, timeout: Duration) -> Option<Interrupt>;
}

/// Single-slot inbox shared by every source implementation.
#[derive(Debug)]
struct Inbox {
    rx: Receiver<Interrupt>,
}

impl Inbox {
    fn new() -> (SyncSender<Interrupt>, Self) {
        let (tx, rx) = mpsc::sync_channel(1);
        (tx, Self { rx })
    }

    fn wait_for(&self, timeout: Duration) -> Option<Interrupt> {
        match self.rx.recv_timeout(timeout) {
            Ok(interrupt) => Some(interrupt),
            Err(RecvTimeoutError::Timeout) => None,
            // Every sender is gone; nothing can arrive, so sit out the timer.
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(timeout);
                None
            }
        }
    }
}

fn deliver(tx: &SyncSender<Interrupt>, interrupt: Interrupt) -> bool {
    match tx.try_send(interrupt) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::trace!(%interrupt, "inbox full, dropping interrupt");
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

/// Sender that an OS callback can keep forever while the listener still
/// controls when deliveries stop.
#[cfg(any(windows, test))]
#[derive(Debug, Clone)]
struct SharedSender {
    slot: Arc<Mutex<Option<SyncSender<Interrupt>>>>,
}

#[cfg(any(windows, test))]
impl SharedSender {
    fn new(tx: SyncSender<Interrupt>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        }
    }

    fn deliver(&self, interrupt: Interrupt) -> bool {
        match self.slot.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|tx| deliver(tx, interrupt)),
            Err(_) => false,
        }
    }

    fn release(&self) {
        if let Ok(mut guard) = self.slot.lock() {
            guard.take();
        }
    }

    #[cfg(test)]
    fn is_released(&self) -> bool {
        self.slot.lock().map_or(true, |guard| guard.is_none())
    }
}

// ── OS signal listener ───────────────────────────────────────────────────

/// SIGINT subscription backed by a forwarding thread.
///
/// While alive, the default terminate action for SIGINT is replaced by
/// delivery into the inbox. Dropping the listener closes the subscription and
/// joins the forwarding thread.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalListener {
    inbox: Inbox,
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalListener {
    pub fn arm() -> Result<Self> {
        let mut signals = Signals::new([SIGINT])
            .map_err(|source| FixtureError::SignalSetup { source })?;
        let handle = signals.handle();
        let (tx, inbox) = Inbox::new();
        let thread = std::thread::Builder::new()
            .name("termtest-signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    let interrupt = Interrupt::from_signal(signal);
                    tracing::debug!(%interrupt, "signal received");
                    deliver(&tx, interrupt);
                }
            })
            .map_err(|source| FixtureError::SignalSetup { source })?;
        tracing::debug!("interrupt listener armed");
        Ok(Self {
            inbox,
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl InterruptSource for SignalListener {
    fn wait_for(&mut self, timeout: Duration) -> Option<Interrupt> {
        self.inbox.wait_for(timeout)
    }
}

#[cfg(unix)]
impl Drop for SignalListener {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        tracing::debug!("interrupt listener released");
    }
}

/// Console Ctrl-C subscription.
///
/// `ctrlc` installs a console control handler that swallows the default
/// `ExitProcess` action. The handler cannot be uninstalled, so dropping the
/// listener cuts it off from the inbox instead.
#[cfg(windows)]
#[derive(Debug)]
pub struct CtrlCListener {
    inbox: Inbox,
    sender: SharedSender,
}

#[cfg(windows)]
impl CtrlCListener {
    pub fn arm() -> Result<Self> {
        let (tx, inbox) = Inbox::new();
        let sender = SharedSender::new(tx);
        let handler_sender = sender.clone();
        ctrlc::set_handler(move || {
            tracing::debug!("console ctrl-c received");
            handler_sender.deliver(Interrupt::USER);
        })
        .map_err(|error| FixtureError::SignalSetup {
            source: std::io::Error::other(error),
        })?;
        tracing::debug!("interrupt listener armed");
        Ok(Self { inbox, sender })
    }
}

#[cfg(windows)]
impl InterruptSource for CtrlCListener {
    fn wait_for(&mut self, timeout: Duration) -> Option<Interrupt> {
        self.inbox.wait_for(timeout)
    }
}

#[cfg(windows)]
impl Drop for CtrlCListener {
    fn drop(&mut self) {
        self.sender.release();
        tracing::debug!("interrupt listener released");
    }
}

/// Listener for platforms without console interrupts. Never fires.
#[derive(Debug)]
pub struct InertListener {
    inbox: Inbox,
    _tx: SyncSender<Interrupt>,
}

impl InertListener {
    #[must_use]
    pub fn new() -> Self {
        let (tx, inbox) = Inbox::new();
        Self { inbox, _tx: tx }
    }
}

impl Default for InertListener {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptSource for InertListener {
    fn wait_for(&mut self, timeout: Duration) -> Option<Interrupt> {
        self.inbox.wait_for(timeout)
    }
}

/// Subscribe to the platform interrupt signal.
#[cfg(unix)]
pub fn arm() -> Result<SignalListener> {
    SignalListener::arm()
}

/// Subscribe to the platform interrupt signal.
#[cfg(windows)]
pub fn arm() -> Result<CtrlCListener> {
    CtrlCListener::arm()
}

/// Subscribe to the platform interrupt signal.
#[cfg(not(any(unix, windows)))]
pub fn arm() -> Result<InertListener> {
    Ok(InertListener::new())
}

// ── In-process source ────────────────────────────────────────────────────

/// Interrupt source driven from inside the process.
#[derive(Debug)]
pub struct ManualInterrupts {
    inbox: Inbox,
    tx: SyncSender<Interrupt>,
}

/// Cloneable handle that delivers into a [`ManualInterrupts`] inbox.
#[derive(Debug, Clone)]
pub struct InterruptTrigger {
    tx: SyncSender<Interrupt>,
}

impl ManualInterrupts {
    #[must_use]
    pub fn new() -> Self {
        let (tx, inbox) = Inbox::new();
        Self { inbox, tx }
    }

    #[must_use]
    pub fn trigger(&self) -> InterruptTrigger {
        InterruptTrigger {
            tx: self.tx.clone(),
        }
    }
}

impl Default for ManualInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptSource for ManualInterrupts {
    fn wait_for(&mut self, timeout: Duration) -> Option<Interrupt> {
        self.inbox.wait_for(timeout)
    }
}

impl InterruptTrigger {
    /// Deliver `interrupt`. Returns `false` if the slot was already full.
    pub fn trigger(&self, interrupt: Interrupt) -> bool {
        deliver(&self.tx, interrupt)
    }
}
