//! Panic boundary

use super::{traceback, Arg, Cancelled, Disposition, Failure, GenericFailure, Reporter};
use crate::oserror::OsFailure;
use std::any::Any;
use std::io;
use std::panic::{self, Location, PanicHookInfo};

const PANIC_TYPE: &str = "Panic";

/// Route panics through `reporter`
///
/// Cancellations (a `Cancelled` payload) go to the hook that was installed
/// before. Everything else is reported and the previous hook is not run.
pub fn install_panic_hook(reporter: Reporter) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        let failure = classify(info.payload(), info.location());
        if reporter.report(&failure) == Disposition::PassThrough {
            previous(info);
        }
    }));
}

/// Turn a panic payload into a `Failure`
fn classify(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> Failure {
    if payload.is::<Cancelled>() {
        return Failure::Cancellation;
    }
    if let Some(os) = payload.downcast_ref::<OsFailure>() {
        return Failure::Os(os.clone());
    }
    if let Some(err) = payload.downcast_ref::<io::Error>() {
        return Failure::Os(OsFailure::from_io(err));
    }

    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    };

    let mut generic =
        GenericFailure::new(PANIC_TYPE, message.clone()).with_arg(Arg::new("str", message));
    if let Some(location) = location {
        generic = generic.with_arg(Arg::new("Location", location.to_string()));
    }
    Failure::Generic(generic.with_frames(traceback::capture()))
}
