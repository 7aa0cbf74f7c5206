use std::sync::OnceLock;

use tokio::task::JoinHandle;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("vigil-worker")
			.build()
			.expect("failed to build vigil-worker tokio runtime")
	});
	runtime.handle().clone()
}

/// Runs blocking producer work, such as a validation sweep, on the blocking
/// pool. Falls back to a shared runtime when called outside of one.
pub fn spawn_blocking<F, R>(label: &'static str, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(task = label, "worker.spawn_blocking");
	runtime_handle().spawn_blocking(f)
}
