//! Asynchronous asset fetching
//!
//! Fetches are fire-and-poll: `fetch` returns an `AsyncOp` immediately and
//! the session checks it once per frame. Native builds read on a background
//! thread. On wasm the requests are queued and the host drives them from its
//! async main loop with `pump`.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use super::AssetError;

/// Result type for async operations
pub type AssetResult<T> = Result<T, AssetError>;

/// A handle to a pending async operation that can be polled
pub struct AsyncOp<T> {
    receiver: Receiver<AssetResult<T>>,
    result: Option<AssetResult<T>>,
}

impl<T> AsyncOp<T> {
    /// A pending operation and the sender that completes it
    pub fn pending() -> (Sender<AssetResult<T>>, Self) {
        let (sender, receiver) = channel();
        (
            sender,
            Self {
                receiver,
                result: None,
            },
        )
    }

    /// An operation that is already finished
    pub fn ready(result: AssetResult<T>) -> Self {
        let (_, mut op) = Self::pending();
        op.result = Some(result);
        op
    }

    /// Check if the operation has completed (polls the channel)
    pub fn is_complete(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }

        match self.receiver.try_recv() {
            Ok(result) => {
                self.result = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                // Worker dropped the sender without answering
                self.result = Some(Err(AssetError::Disconnected));
                true
            }
        }
    }

    /// Take the result if complete
    pub fn take(mut self) -> Option<AssetResult<T>> {
        if self.result.is_none() {
            self.is_complete();
        }
        self.result
    }

    /// Get a reference to the result if complete
    pub fn result(&self) -> Option<&AssetResult<T>> {
        self.result.as_ref()
    }
}

/// Resolves asset locators to bytes
pub trait AssetSource {
    fn fetch(&self, asset_ref: &str) -> AsyncOp<Vec<u8>>;
}

/// Loads assets from a directory (native) or the page origin (wasm)
pub struct FileAssetSource {
    base_dir: PathBuf,
    #[cfg(target_arch = "wasm32")]
    queue: std::cell::RefCell<Vec<(String, Sender<AssetResult<Vec<u8>>>)>>,
}

impl FileAssetSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            #[cfg(target_arch = "wasm32")]
            queue: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Locators are rooted at the base directory; a leading `/` is ignored
    pub fn resolve(&self, asset_ref: &str) -> PathBuf {
        let rel = asset_ref.trim_start_matches('/');
        self.base_dir.join(rel)
    }

    /// Complete queued requests. Native reads never queue, so this returns
    /// immediately there.
    pub async fn pump(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            use macroquad::prelude::load_file;

            let jobs: Vec<_> = self.queue.borrow_mut().drain(..).collect();
            for (path, sender) in jobs {
                let result = load_file(&path).await.map_err(|e| AssetError::Fetch {
                    path: path.clone(),
                    message: e.to_string(),
                });
                let _ = sender.send(result);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetSource for FileAssetSource {
    fn fetch(&self, asset_ref: &str) -> AsyncOp<Vec<u8>> {
        let (sender, op) = AsyncOp::pending();
        let path = self.resolve(asset_ref);

        std::thread::spawn(move || {
            let result = std::fs::read(&path).map_err(|source| AssetError::Io {
                path: path.display().to_string(),
                source,
            });
            let _ = sender.send(result);
        });

        op
    }
}

#[cfg(target_arch = "wasm32")]
impl AssetSource for FileAssetSource {
    fn fetch(&self, asset_ref: &str) -> AsyncOp<Vec<u8>> {
        let (sender, op) = AsyncOp::pending();
        let path = self.resolve(asset_ref).to_string_lossy().replace('\\', "/");
        self.queue.borrow_mut().push((path, sender));
        op
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Test source whose fetches complete only when the test says so
    #[derive(Default)]
    pub(crate) struct ManualSource {
        senders: RefCell<HashMap<String, Vec<Sender<AssetResult<Vec<u8>>>>>>,
    }

    impl ManualSource {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Complete the oldest outstanding fetch for `asset_ref`.
        /// Returns false if nothing was waiting or the receiver is gone.
        pub(crate) fn complete(&self, asset_ref: &str, result: AssetResult<Vec<u8>>) -> bool {
            let mut senders = self.senders.borrow_mut();
            let Some(queue) = senders.get_mut(asset_ref) else {
                return false;
            };
            if queue.is_empty() {
                return false;
            }
            queue.remove(0).send(result).is_ok()
        }

        pub(crate) fn outstanding(&self) -> usize {
            self.senders.borrow().values().map(Vec::len).sum()
        }
    }

    impl AssetSource for ManualSource {
        fn fetch(&self, asset_ref: &str) -> AsyncOp<Vec<u8>> {
            let (sender, op) = AsyncOp::pending();
            self.senders
                .borrow_mut()
                .entry(asset_ref.to_string())
                .or_default()
                .push(sender);
            op
        }
    }

    #[test]
    fn test_op_completes_when_sent() {
        let (sender, mut op) = AsyncOp::<u32>::pending();
        assert!(!op.is_complete());
        sender.send(Ok(7)).unwrap();
        assert!(op.is_complete());
        assert_eq!(op.take().unwrap().unwrap(), 7);
    }

    #[test]
    fn test_dropped_sender_is_error() {
        let (sender, mut op) = AsyncOp::<u32>::pending();
        drop(sender);
        assert!(op.is_complete());
        assert!(matches!(op.result(), Some(Err(AssetError::Disconnected))));
    }

    #[test]
    fn test_resolve_strips_leading_slash() {
        let source = FileAssetSource::new("/srv/assets");
        assert_eq!(
            source.resolve("/models/RobotArm/base.glb"),
            PathBuf::from("/srv/assets/models/RobotArm/base.glb")
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_source_reads_on_worker() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("part.glb"), b"glTF").unwrap();
        let source = FileAssetSource::new(dir.path());

        let mut op = source.fetch("/part.glb");
        let start = std::time::Instant::now();
        while !op.is_complete() {
            assert!(start.elapsed().as_secs() < 5, "worker never answered");
            std::thread::yield_now();
        }
        assert_eq!(op.take().unwrap().unwrap(), b"glTF".to_vec());

        let mut missing = source.fetch("nope.glb");
        while !missing.is_complete() {
            std::thread::yield_now();
        }
        assert!(matches!(missing.take(), Some(Err(AssetError::Io { .. }))));
    }
}
