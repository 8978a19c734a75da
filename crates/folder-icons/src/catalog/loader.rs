//! Background catalog loading with single delivery.
//!
//! The worker thread builds the catalog and sends it over a channel of
//! capacity one. The consumer either polls from its own scheduling loop or
//! blocks. If the handle is dropped first, the worker's send fails and the
//! result is discarded.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use folder_icons_theme::IconTheme;
use tracing::{debug, warn};

use super::{Catalog, CatalogConfig, load_catalog};
use crate::logging::targets;

/// Progress of a background load, as seen by the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogStatus {
    /// Still building.
    Loading,
    /// The finished catalog. Returned once.
    Ready(Catalog),
    /// The catalog was already handed over.
    Delivered,
    /// The worker ended without producing a catalog.
    Failed,
}

impl CatalogStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The catalog, if this is [`CatalogStatus::Ready`].
    pub fn into_catalog(self) -> Option<Catalog> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }
}

/// Starts background catalog loads.
#[derive(Debug)]
pub struct CatalogLoader;

impl CatalogLoader {
    /// Build the catalog of `theme` on a new named thread.
    pub fn spawn(theme: Arc<dyn IconTheme>, config: CatalogConfig) -> CatalogHandle {
        let (sender, receiver) = bounded(1);
        let name = config.thread_name.clone();

        let worker = thread::Builder::new().name(name.clone()).spawn(move || {
            let catalog = load_catalog(theme.as_ref(), &config);
            match sender.send(catalog) {
                Ok(()) => true,
                Err(_) => {
                    debug!(target: targets::CATALOG, "catalog handle dropped, discarding result");
                    false
                }
            }
        });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                // The sender went down with the closure, so the handle reports Failed
                warn!(target: targets::CATALOG, thread = %name, error = %err, "failed to spawn catalog worker");
                None
            }
        };

        CatalogHandle {
            receiver,
            worker,
            delivered: false,
        }
    }
}

/// The consumer side of a background load.
#[derive(Debug)]
pub struct CatalogHandle {
    receiver: Receiver<Catalog>,
    worker: Option<JoinHandle<bool>>,
    delivered: bool,
}

impl CatalogHandle {
    /// Check for the catalog without blocking.
    pub fn poll(&mut self) -> CatalogStatus {
        match self.receiver.try_recv() {
            Ok(catalog) => self.deliver(catalog),
            Err(TryRecvError::Empty) if !self.delivered => CatalogStatus::Loading,
            Err(_) => self.finished(),
        }
    }

    /// Block until the load finishes.
    pub fn wait(&mut self) -> CatalogStatus {
        if self.delivered {
            return CatalogStatus::Delivered;
        }
        match self.receiver.recv() {
            Ok(catalog) => self.deliver(catalog),
            Err(_) => self.finished(),
        }
    }

    /// Block for at most `timeout`.
    pub fn wait_timeout(&mut self, timeout: Duration) -> CatalogStatus {
        if self.delivered {
            return CatalogStatus::Delivered;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(catalog) => self.deliver(catalog),
            Err(RecvTimeoutError::Timeout) => CatalogStatus::Loading,
            Err(RecvTimeoutError::Disconnected) => self.finished(),
        }
    }

    /// Give up on the result and take the worker thread.
    ///
    /// Joining it yields whether the catalog was delivered, which is always
    /// `false` once the handle is gone.
    pub fn into_worker(self) -> Option<JoinHandle<bool>> {
        self.worker
    }

    fn deliver(&mut self, catalog: Catalog) -> CatalogStatus {
        self.delivered = true;
        debug!(target: targets::CATALOG, icons = catalog.len(), "catalog delivered");
        CatalogStatus::Ready(catalog)
    }

    fn finished(&self) -> CatalogStatus {
        if self.delivered {
            CatalogStatus::Delivered
        } else {
            CatalogStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folder_icons_theme::StaticTheme;

    #[test]
    fn test_delivered_once() {
        let theme = Arc::new(StaticTheme::new(&["folder", "folder-music"]));
        let mut handle = CatalogLoader::spawn(theme, CatalogConfig::new().preview_size(8));

        let catalog = handle.wait().into_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(handle.poll(), CatalogStatus::Delivered);
        assert_eq!(handle.wait(), CatalogStatus::Delivered);
    }

    #[test]
    fn test_worker_thread_name() {
        let theme = Arc::new(StaticTheme::new(&["folder"]));
        let config = CatalogConfig::new().thread_name("catalog-test");
        let handle = CatalogLoader::spawn(theme, config);
        let worker = handle.into_worker().unwrap();
        assert_eq!(worker.thread().name(), Some("catalog-test"));
        worker.join().unwrap();
    }
}
