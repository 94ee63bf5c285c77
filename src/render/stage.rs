use tokio::sync::{Mutex, MutexGuard};

use super::tree::VisualTree;

/// Scratch surface a composition is mounted on while it is rasterized.
///
/// One tree at a time: [`Stage::mount`] waits until the previous
/// [`Mounted`] guard is dropped, so concurrent compositions never see each
/// other's nodes.
#[derive(Debug, Default)]
pub struct Stage {
    slot: Mutex<Option<VisualTree>>,
}

/// Exclusive handle on a mounted tree. Dropping it unmounts the tree.
#[derive(Debug)]
pub struct Mounted<'a> {
    guard: MutexGuard<'a, Option<VisualTree>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&self, tree: VisualTree) -> Mounted<'_> {
        let mut guard = self.slot.lock().await;
        log::debug!("Mounting {}x{} composition", tree.width, tree.height);
        *guard = Some(tree);
        Mounted { guard }
    }

    /// `true` when nothing is mounted and no mount is in progress.
    pub fn is_idle(&self) -> bool {
        self.slot.try_lock().map(|slot| slot.is_none()).unwrap_or(false)
    }
}

impl Mounted<'_> {
    pub fn tree(&self) -> &VisualTree {
        // Only `Drop` clears the slot.
        self.guard.as_ref().unwrap_or_else(|| unreachable!("mounted slot is empty"))
    }
}

impl Drop for Mounted<'_> {
    fn drop(&mut self) {
        if self.guard.take().is_some() {
            log::debug!("Unmounted composition");
        }
    }
}
