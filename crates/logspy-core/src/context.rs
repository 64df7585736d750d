//! Ambient per-chain context: correlation id and scope stack
//!
//! Every logical chain of execution owns one `AmbientContext`. On a plain
//! thread the context lives in thread-local storage, so unrelated threads
//! never observe each other's state. Async work carries its own context
//! inside a [`WithContext`] wrapper, which swaps the context in for the
//! duration of every poll and stores it back afterwards. A future therefore
//! keeps its correlation id and scopes across `.await` points even when the
//! executor moves it between worker threads, and sibling futures sharing a
//! worker thread stay isolated.
//!
//! Child chains inherit a snapshot of their parent: capture it with
//! [`AmbientContext::capture`] and hand it to [`AmbientContext::run`] (for a
//! thread) or [`AmbientContext::scope`] (for a future). Changes made by the
//! child never flow back into the parent.
//!
//! Futures that are not wrapped share the context of whatever worker thread
//! polls them. A guard held across `.await` therefore requires the future to
//! run under [`ContextFutureExt::in_current_context`] (or
//! [`AmbientContext::scope`]); otherwise sibling tasks on the same worker
//! observe its correlation id and scopes. Opening a guard inside a tokio
//! runtime outside any wrapped unit of work logs a one-time warning under
//! the `logspy` target.

use logspy_core_types::schema::DIAGNOSTICS_TARGET;
use logspy_core_types::CorrelationId;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static AMBIENT: RefCell<AmbientContext> = RefCell::new(AmbientContext::default());
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
    static TASK_ID: Cell<Option<u64>> = const { Cell::new(None) };
    static WARNED_UNWRAPPED: Cell<bool> = const { Cell::new(false) };
}

/// Warn once per thread when ambient state is changed from async code that
/// is not running inside a [`WithContext`]
fn warn_if_unwrapped(operation: &'static str) {
    if current_task_id().is_some() || tokio::runtime::Handle::try_current().is_err() {
        return;
    }
    let first = WARNED_UNWRAPPED
        .try_with(|warned| !warned.replace(true))
        .unwrap_or(false);
    if first {
        tracing::warn!(
            target: DIAGNOSTICS_TARGET,
            operation,
            "ambient context changed inside an async runtime outside in_current_context(); \
             sibling tasks on this worker thread share it"
        );
    }
}

#[derive(Debug, Clone)]
struct ScopeFrame {
    id: u64,
    label: Arc<str>,
}

/// Snapshot of the ambient state of one logical chain
#[derive(Debug, Clone, Default)]
pub struct AmbientContext {
    correlation_id: Option<CorrelationId>,
    scopes: Vec<ScopeFrame>,
}

impl AmbientContext {
    /// Snapshot the calling chain's context
    pub fn capture() -> Self {
        AMBIENT
            .try_with(|ambient| ambient.borrow().clone())
            .unwrap_or_default()
    }

    /// Correlation id held by this snapshot
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    /// Scope labels held by this snapshot, outermost first
    pub fn scopes(&self) -> Vec<String> {
        self.scopes.iter().map(|f| f.label.to_string()).collect()
    }

    /// Run `f` with this context installed on the current thread
    ///
    /// The caller's own context is restored when `f` returns or unwinds.
    pub fn run<R>(self, f: impl FnOnce() -> R) -> R {
        let previous = swap_ambient(self);
        let _restore = RestoreOnDrop {
            previous: Some(previous),
        };
        f()
    }

    /// Wrap `future` so it runs as its own unit of work inside this context
    ///
    /// The wrapped future is assigned a fresh task id, reported on every
    /// entry it logs.
    pub fn scope<F: Future>(self, future: F) -> WithContext<F> {
        WithContext {
            inner: Box::pin(future),
            context: Some(self),
            task_id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
        }
    }
}

fn swap_ambient(next: AmbientContext) -> AmbientContext {
    AMBIENT
        .try_with(|ambient| std::mem::replace(&mut *ambient.borrow_mut(), next))
        .unwrap_or_default()
}

fn with_ambient<R>(f: impl FnOnce(&mut AmbientContext) -> R) -> Option<R> {
    AMBIENT
        .try_with(|ambient| f(&mut ambient.borrow_mut()))
        .ok()
}

struct RestoreOnDrop {
    previous: Option<AmbientContext>,
}

impl Drop for RestoreOnDrop {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            swap_ambient(previous);
        }
    }
}

/// Future carrying its own ambient context; see [`AmbientContext::scope`]
#[must_use = "futures do nothing unless polled"]
pub struct WithContext<F> {
    inner: Pin<Box<F>>,
    context: Option<AmbientContext>,
    task_id: u64,
}

impl<F> WithContext<F> {
    /// Task id assigned to this unit of work
    pub fn task_id(&self) -> u64 {
        self.task_id
    }
}

struct Entered<'a> {
    slot: &'a mut Option<AmbientContext>,
    previous_context: Option<AmbientContext>,
    previous_task: Option<u64>,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        let previous = self.previous_context.take().unwrap_or_default();
        *self.slot = Some(swap_ambient(previous));
        let _ = TASK_ID.try_with(|task| task.set(self.previous_task));
    }
}

impl<F: Future> Future for WithContext<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let context = this.context.take().unwrap_or_default();
        let previous_task = TASK_ID
            .try_with(|task| task.replace(Some(this.task_id)))
            .ok()
            .flatten();
        let _entered = Entered {
            slot: &mut this.context,
            previous_context: Some(swap_ambient(context)),
            previous_task,
        };
        this.inner.as_mut().poll(cx)
    }
}

/// Extension methods for carrying ambient context into futures
pub trait ContextFutureExt: Future + Sized {
    /// Run this future inside a snapshot of the caller's context
    fn in_current_context(self) -> WithContext<Self> {
        AmbientContext::capture().scope(self)
    }

    /// Run this future inside `context`
    fn in_context(self, context: AmbientContext) -> WithContext<Self> {
        context.scope(self)
    }
}

impl<F: Future> ContextFutureExt for F {}

/// Numeric id of the calling thread, stable for the thread's lifetime
pub fn current_thread_id() -> u64 {
    THREAD_ID.try_with(|id| *id).unwrap_or(0)
}

/// Task id of the unit of work currently being polled, if any
pub fn current_task_id() -> Option<u64> {
    TASK_ID.try_with(|task| task.get()).ok().flatten()
}

// ========== Correlation ==========

/// Ambient correlation id with save/restore scopes
pub struct CorrelationContext;

impl CorrelationContext {
    /// Correlation id of the calling chain, if a scope is open
    pub fn current_id() -> Option<CorrelationId> {
        with_ambient(|ambient| ambient.correlation_id.clone()).flatten()
    }

    /// Set the calling chain's correlation id until the guard is dropped
    ///
    /// Dropping the guard restores whatever id was current before, so
    /// scopes nest.
    ///
    /// In async code, a guard held across `.await` requires the future to
    /// run under [`ContextFutureExt::in_current_context`]; otherwise the id
    /// is visible to every task polled on the same worker thread.
    pub fn begin_scope(id: impl Into<CorrelationId>) -> CorrelationGuard {
        warn_if_unwrapped("begin_scope");
        let id = id.into();
        let previous = with_ambient(|ambient| ambient.correlation_id.replace(id)).flatten();
        CorrelationGuard { previous }
    }
}

/// Restores the previous correlation id on drop
#[must_use = "dropping the guard immediately ends the correlation scope"]
#[derive(Debug)]
pub struct CorrelationGuard {
    previous: Option<CorrelationId>,
}

impl Drop for CorrelationGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        with_ambient(|ambient| ambient.correlation_id = previous);
    }
}

// ========== Scopes ==========

/// Ambient stack of scope labels for the calling chain
pub struct ScopeStack;

impl ScopeStack {
    /// Push `label` until the returned guard is dropped
    ///
    /// As with [`CorrelationContext::begin_scope`], a guard held across
    /// `.await` requires the future to run under
    /// [`ContextFutureExt::in_current_context`].
    pub fn push(label: impl Into<Arc<str>>) -> ScopeGuard {
        warn_if_unwrapped("push_scope");
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        let label = label.into();
        with_ambient(|ambient| ambient.scopes.push(ScopeFrame { id, label }));
        ScopeGuard { id: Some(id) }
    }

    /// Labels of the open scopes, outermost first
    pub fn snapshot() -> Vec<String> {
        with_ambient(|ambient| ambient.scopes.iter().map(|f| f.label.to_string()).collect())
            .unwrap_or_default()
    }

    /// Number of open scopes
    pub fn depth() -> usize {
        with_ambient(|ambient| ambient.scopes.len()).unwrap_or(0)
    }
}

/// Pops exactly the scope it pushed on drop
#[must_use = "dropping the guard immediately closes the scope"]
#[derive(Debug)]
pub struct ScopeGuard {
    id: Option<u64>,
}

impl ScopeGuard {
    /// Guard that owns no scope
    pub fn noop() -> Self {
        Self { id: None }
    }

    pub fn is_noop(&self) -> bool {
        self.id.is_none()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        with_ambient(|ambient| {
            if let Some(pos) = ambient.scopes.iter().rposition(|f| f.id == id) {
                ambient.scopes.remove(pos);
            }
        });
    }
}
