//! The set of live metrics, keyed by identifier.
//!
//! A `Registry` remembers the order in which metrics were registered and
//! always enumerates them in that order. Identifiers are opaque here; the
//! `name[tag,tag]` convention is interpreted only when series are built.

use metric::Metric;
use std::error;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Registry errors
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A metric is already registered under this identifier.
    DuplicateMetric(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::DuplicateMetric(ref id) => {
                write!(f, "duplicate metric: {}", id)
            }
        }
    }
}

impl error::Error for Error {}

/// Insertion-ordered collection of named metrics
#[derive(Debug, Default)]
pub struct Registry {
    metrics: Mutex<Vec<(String, Metric)>>,
}

impl Registry {
    /// Create an empty `Registry`
    pub fn new() -> Registry {
        Registry::default()
    }

    fn lock(&self) -> MutexGuard<Vec<(String, Metric)>> {
        match self.metrics.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register `metric` under `id`
    ///
    /// Fails if `id` is already taken; the existing metric is left in place.
    pub fn register<S, M>(&self, id: S, metric: M) -> Result<(), Error>
    where
        S: Into<String>,
        M: Into<Metric>,
    {
        let id = id.into();
        let mut metrics = self.lock();
        if metrics.iter().any(|&(ref k, _)| *k == id) {
            return Err(Error::DuplicateMetric(id));
        }
        trace!("registering {}", id);
        metrics.push((id, metric.into()));
        Ok(())
    }

    /// Return the metric registered under `id`, registering the result of
    /// `f` first if there is none
    pub fn get_or_register<S, F, M>(&self, id: S, f: F) -> Metric
    where
        S: Into<String>,
        F: FnOnce() -> M,
        M: Into<Metric>,
    {
        let id = id.into();
        let mut metrics = self.lock();
        if let Some(&(_, ref m)) = metrics.iter().find(|&&(ref k, _)| *k == id) {
            return m.clone();
        }
        let metric = f().into();
        trace!("registering {}", id);
        metrics.push((id, metric.clone()));
        metric
    }

    /// Look up the metric registered under `id`
    pub fn get(&self, id: &str) -> Option<Metric> {
        self.lock()
            .iter()
            .find(|&&(ref k, _)| k == id)
            .map(|&(_, ref m)| m.clone())
    }

    /// Remove the metric registered under `id`, returning it
    pub fn unregister(&self, id: &str) -> Option<Metric> {
        let mut metrics = self.lock();
        match metrics.iter().position(|&(ref k, _)| k == id) {
            Some(idx) => Some(metrics.remove(idx).1),
            None => None,
        }
    }

    /// Remove every metric
    pub fn unregister_all(&self) {
        self.lock().clear()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Call `f` for every registered metric, in registration order
    ///
    /// `f` runs against a copy of the entry list, not under the registry's
    /// lock, so it may itself register or read metrics.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Metric),
    {
        let entries = self.lock().clone();
        for &(ref id, ref metric) in &entries {
            f(id, metric)
        }
    }
}

#[cfg(test)]
mod test {
    use metric::{Counter, Gauge, Meter};
    use super::*;

    #[test]
    fn test_each_in_registration_order() {
        let reg = Registry::new();
        reg.register("zeta", Counter::new()).unwrap();
        reg.register("alpha", Gauge::new()).unwrap();
        reg.register("mu", Meter::new()).unwrap();

        let mut seen = Vec::new();
        reg.each(|id, m| seen.push((id.to_string(), m.kind())));
        assert_eq!(
            vec![
                ("zeta".to_string(), "counter"),
                ("alpha".to_string(), "gauge"),
                ("mu".to_string(), "meter"),
            ],
            seen
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let reg = Registry::new();
        assert!(reg.register("a", Counter::new()).is_ok());
        assert_eq!(
            Err(Error::DuplicateMetric("a".to_string())),
            reg.register("a", Gauge::new())
        );
        assert_eq!(Some("counter"), reg.get("a").map(|m| m.kind()));
        assert_eq!(1, reg.len());
    }

    #[test]
    fn test_get_or_register_returns_existing() {
        let reg = Registry::new();
        let first = reg.get_or_register("hits", Counter::new);
        first.counter().unwrap().inc(2);
        let second = reg.get_or_register("hits", Counter::new);
        assert_eq!(2, second.counter().unwrap().count());
        assert_eq!(1, reg.len());
    }

    #[test]
    fn test_unregister() {
        let reg = Registry::new();
        reg.register("a", Counter::new()).unwrap();
        reg.register("b", Counter::new()).unwrap();
        assert!(reg.unregister("a").is_some());
        assert!(reg.unregister("a").is_none());
        assert_eq!(1, reg.len());
        reg.unregister_all();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_each_may_reenter() {
        let reg = Registry::new();
        reg.register("a", Counter::new()).unwrap();
        let mut n = 0;
        reg.each(|_, _| n += reg.len());
        assert_eq!(1, n);
    }
}
