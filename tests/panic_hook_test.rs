//! Panic boundary tests
//!
//! The panic hook is process-wide, so every scenario runs inside one test and
//! the default hook is restored before asserting.

use legion::logging::{ConsoleStreams, SharedBuffer};
use legion::platform::NoAlert;
use legion::{install_panic_hook, Cancelled, Logger, LoggerConfig, Reporter};
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[inline(never)]
fn load_settings() {
    panic!("settings file is corrupt");
}

#[test]
fn test_panic_hook_reports_panics_and_passes_cancellation_through() {
    let previous_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&previous_calls);
    panic::set_hook(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let stderr = SharedBuffer::new();
    let logger = Logger::with_console(ConsoleStreams::memory(SharedBuffer::new(), stderr.clone()))
        .with_program_name("tool");
    logger.configure(&LoggerConfig::console_only()).unwrap();
    install_panic_hook(Reporter::with_presenter(Arc::new(logger), Box::new(NoAlert)));

    let panicked = thread::spawn(load_settings).join().is_err();
    let report = stderr.contents();
    let calls_after_panic = previous_calls.load(Ordering::SeqCst);

    stderr.clear();
    let cancelled = thread::spawn(|| panic::panic_any(Cancelled)).join().is_err();
    let output_after_cancel = stderr.contents();
    let calls_after_cancel = previous_calls.load(Ordering::SeqCst);

    let _ = panic::take_hook();

    assert!(panicked);
    assert!(report.contains("*** Error in tool."));
    assert!(report.contains("    Unhandled exception."));
    assert!(report.contains("│ type = Panic"));
    assert!(report.contains("│ value = settings file is corrupt"));
    assert!(report.contains("│ traceback:"));
    assert!(report.contains("│ ▸ "));
    assert!(report.contains("panic_hook_test.rs"));
    assert!(report.contains("load_settings"));
    assert!(report.trim_end().ends_with("╰"));
    assert_eq!(calls_after_panic, 0);

    assert!(cancelled);
    assert!(output_after_cancel.is_empty());
    assert_eq!(calls_after_cancel, 1);
}
