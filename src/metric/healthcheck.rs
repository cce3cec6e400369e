use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// A user-supplied check of some service's health
///
/// The check function inspects whatever it needs to and reports back by
/// calling `healthy` or `unhealthy` on the `Healthcheck` it is handed.
/// Healthchecks are never shipped as series.
pub struct Healthcheck {
    check: Box<dyn Fn(&Healthcheck) + Send + Sync>,
    error: Mutex<Option<String>>,
}

impl fmt::Debug for Healthcheck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Healthcheck")
            .field("error", &self.error())
            .finish()
    }
}

impl Healthcheck {
    pub fn new<F>(check: F) -> Healthcheck
    where
        F: Fn(&Healthcheck) + Send + Sync + 'static,
    {
        Healthcheck {
            check: Box::new(check),
            error: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<Option<String>> {
        match self.error.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Run the check function
    pub fn check(&self) {
        (self.check)(self)
    }

    /// The error from the last failed check, if the check is failing
    pub fn error(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn healthy(&self) {
        *self.lock() = None;
    }

    pub fn unhealthy<S>(&self, err: S)
    where
        S: Into<String>,
    {
        *self.lock() = Some(err.into());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_check_toggles_state() {
        let up = Arc::new(AtomicBool::new(false));
        let probe = up.clone();
        let hc = Healthcheck::new(move |h| {
            if probe.load(Ordering::Relaxed) {
                h.healthy()
            } else {
                h.unhealthy("backend down")
            }
        });
        assert_eq!(None, hc.error());
        hc.check();
        assert_eq!(Some("backend down".to_string()), hc.error());
        up.store(true, Ordering::Relaxed);
        hc.check();
        assert_eq!(None, hc.error());
    }
}
