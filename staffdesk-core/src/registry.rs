//! Process-wide screen action registry.
//!
//! Navigation chrome (header buttons, tab bars) needs to trigger actions that
//! live inside whatever screen is currently mounted, without a reference to
//! the screen itself. Screens register their actions under a stable key while
//! mounted; dropping the returned handle deregisters them again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

/// Stable identity of a screen that can expose actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKey {
    Calendar,
    Tasks,
    Messages,
    Rooms,
}

type Action = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    // Generation guards a remount race: a stale handle dropping late must not
    // remove the replacement registration.
    entries: HashMap<(ScreenKey, &'static str), (u64, Action)>,
    next_generation: u64,
}

static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();

fn registry() -> &'static Mutex<Registry> {
    REGISTRY.get_or_init(Mutex::default)
}

/// Deregisters the action when dropped (screen unmount).
#[must_use = "dropping the handle immediately deregisters the action"]
pub struct ActionHandle {
    screen: ScreenKey,
    action: &'static str,
    generation: u64,
}

/// Register an action for a mounted screen. A second registration under the
/// same key replaces the first.
pub fn register(
    screen: ScreenKey,
    action: &'static str,
    f: impl Fn() + Send + Sync + 'static,
) -> ActionHandle {
    let mut reg = registry().lock().expect("action registry poisoned");
    let generation = reg.next_generation;
    reg.next_generation += 1;
    reg.entries.insert((screen, action), (generation, Arc::new(f)));
    ActionHandle {
        screen,
        action,
        generation,
    }
}

/// Invoke a registered action. Returns false when nothing is registered for
/// the key, so callers can fall back the way a guarded call would.
pub fn invoke(screen: ScreenKey, action: &'static str) -> bool {
    let handler = {
        let reg = registry().lock().expect("action registry poisoned");
        reg.entries.get(&(screen, action)).map(|(_, f)| Arc::clone(f))
    };
    match handler {
        Some(f) => {
            f();
            true
        }
        None => {
            debug!(?screen, action, "no action registered");
            false
        }
    }
}

impl Drop for ActionHandle {
    fn drop(&mut self) {
        let mut reg = registry().lock().expect("action registry poisoned");
        if let Some((generation, _)) = reg.entries.get(&(self.screen, self.action))
            && *generation == self.generation
        {
            reg.entries.remove(&(self.screen, self.action));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Each test uses a distinct action key: the registry is process-global
    // and tests run in parallel.

    #[test]
    fn test_invoke_runs_registered_action() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let _handle = register(ScreenKey::Tasks, "open-task-modal", move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        assert!(invoke(ScreenKey::Tasks, "open-task-modal"));
        assert!(invoke(ScreenKey::Tasks, "open-task-modal"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invoke_without_registration_is_noop() {
        assert!(!invoke(ScreenKey::Rooms, "never-registered"));
    }

    #[test]
    fn test_drop_deregisters() {
        let handle = register(ScreenKey::Calendar, "toggle-grid", || {});
        assert!(invoke(ScreenKey::Calendar, "toggle-grid"));
        drop(handle);
        assert!(!invoke(ScreenKey::Calendar, "toggle-grid"));
    }

    #[test]
    fn test_remount_replaces_and_survives_stale_drop() {
        let calls = Arc::new(AtomicUsize::new(0));

        let stale = register(ScreenKey::Messages, "open-chat", || {});
        let counted = Arc::clone(&calls);
        let _current = register(ScreenKey::Messages, "open-chat", move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        // The old screen unmounting must not tear down the new registration
        drop(stale);
        assert!(invoke(ScreenKey::Messages, "open-chat"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
