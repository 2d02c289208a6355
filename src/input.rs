use std::io;
use std::thread;

use log::{debug, error, info};
use tokio::sync::watch;

/// A host input queue the worker can drain.
pub trait InputQueue: Clone + Send + Sync + 'static {
    /// Reads every pending event, logging each one. Returns how many were read.
    fn process(&self) -> usize;
}

/// Background thread that owns input-queue processing.
///
/// Queue handles go through a single watch slot, so a handle sent before the worker
/// got to the previous one replaces it.
pub struct InputWorker<Q> {
    tx: Option<watch::Sender<Option<Q>>>,
    jh: Option<thread::JoinHandle<()>>,
}

impl<Q: InputQueue> InputWorker<Q> {
    pub fn spawn<F>(on_handled: F) -> io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (tx, mut rx) = watch::channel::<Option<Q>>(None);

        let jh = thread::Builder::new().name("input_queue".to_string()).spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread().build() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to build input runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                while rx.changed().await.is_ok() {
                    let queue = rx.borrow_and_update().clone();
                    match queue {
                        Some(queue) => {
                            let read = queue.process();
                            debug!("Input queue processed, {} events", read);
                            on_handled();
                        }
                        None => info!("Input queue detached"),
                    }
                }
            });
            debug!("Input thread finished");
        })?;

        Ok(Self {
            tx: Some(tx),
            jh: Some(jh),
        })
    }

    pub fn attach(&self, queue: Q) {
        if let Some(tx) = &self.tx {
            tx.send_replace(Some(queue));
        }
    }

    pub fn detach(&self) {
        if let Some(tx) = &self.tx {
            tx.send_replace(None);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| tx.borrow().is_some())
    }
}

impl<Q> Drop for InputWorker<Q> {
    fn drop(&mut self) {
        // closing the channel ends the worker loop
        drop(self.tx.take());
        if let Some(jh) = self.jh.take() {
            if jh.join().is_err() {
                error!("Input thread panicked");
            }
        }
    }
}
