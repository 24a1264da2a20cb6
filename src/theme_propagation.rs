/*
 * Theme propagation protocol.
 *
 * Themable elements declare the `Themable` capability. Containers keep a
 * `ThemeListeners` registry of non-owning references to their children (added
 * and removed alongside the children themselves) and expose it through
 * `Themable::theme_listeners`, so `update_theme` can cascade depth-first: the
 * element updates its own state, then forwards the same theme to each child.
 *
 * `update_theme` is infallible for the caller. A failure while applying a theme
 * to one element is logged and queued as a `ShowError` command; siblings and
 * descendants still receive the theme.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::theme::Theme;
use crate::types::{EffectQueue, ElementId, PlatformCommand};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub trait Themable {
    fn element_id(&self) -> ElementId;

    /*
     * Applies the theme to this element only: build a fresh `StyleManager`, copy
     * the needed fields, queue a repaint, then raise `ThemeChanged`. Must leave
     * the element untouched when it returns an error.
     */
    fn apply_theme(&mut self, theme: &Theme, effects: &mut EffectQueue) -> PlatformResult<()>;

    /// Children registered for propagation, for elements that contain others.
    fn theme_listeners(&mut self) -> Option<&mut ThemeListeners> {
        None
    }
}

pub type SharedThemable = Rc<RefCell<dyn Themable>>;

/// Applies `theme` to `element` and then to everything registered beneath it.
pub fn update_theme(element: &mut dyn Themable, theme: &Theme, effects: &mut EffectQueue) {
    let id = element.element_id();
    match element.apply_theme(theme, effects) {
        Ok(()) => log::debug!("ThemePropagation: applied '{}' to {id}", theme.name()),
        Err(err) => report_theme_error(id, theme, &err, effects),
    }

    if let Some(listeners) = element.theme_listeners() {
        listeners.propagate(theme, effects);
    }
}

fn report_theme_error(id: ElementId, theme: &Theme, err: &PlatformError, effects: &mut EffectQueue) {
    log::warn!(
        "ThemePropagation: failed to apply theme '{}' to {id}: {err}",
        theme.name()
    );
    effects.command(PlatformCommand::ShowError {
        message: format!("Could not apply theme '{}' to {id}: {err}", theme.name()),
    });
}

struct ListenerEntry {
    id: ElementId,
    element: Weak<RefCell<dyn Themable>>,
}

/*
 * Registry of children that receive a container's theme. Entries are weak: a
 * child dropped without being unregistered is pruned on the next propagation.
 * Registering an id twice replaces the earlier entry so each child is updated
 * exactly once per propagation.
 */
#[derive(Default)]
pub struct ThemeListeners {
    entries: Vec<ListenerEntry>,
}

impl std::fmt::Debug for ThemeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.id))
            .finish()
    }
}

impl ThemeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, element: &SharedThemable) -> PlatformResult<ElementId> {
        let id = element
            .try_borrow()
            .map_err(|_| PlatformError::ElementBusy("child being registered".to_string()))?
            .element_id();
        let weak = Rc::downgrade(element);
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(existing) => {
                log::debug!("ThemePropagation: replacing registration for {id}");
                existing.element = weak;
            }
            None => self.entries.push(ListenerEntry { id, element: weak }),
        }
        Ok(id)
    }

    pub fn unregister(&mut self, id: ElementId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Forwards `theme` to every live child. Returns how many children were reached.
    pub fn propagate(&mut self, theme: &Theme, effects: &mut EffectQueue) -> usize {
        self.entries.retain(|entry| {
            let alive = entry.element.strong_count() > 0;
            if !alive {
                log::debug!("ThemePropagation: pruning dropped listener {}", entry.id);
            }
            alive
        });

        let mut reached = 0;
        for entry in &self.entries {
            let Some(child) = entry.element.upgrade() else {
                continue;
            };
            match child.try_borrow_mut() {
                Ok(mut child) => {
                    update_theme(&mut *child, theme, effects);
                    reached += 1;
                }
                Err(_) => {
                    let err = PlatformError::ElementBusy(entry.id.to_string());
                    report_theme_error(entry.id, theme, &err, effects);
                }
            }
        }
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{BuiltinThemes, StyleId, ThemeSource};
    use crate::types::{AppEvent, ControlId};

    struct TestElement {
        id: ElementId,
        fail: bool,
        applied: Vec<String>,
        children: ThemeListeners,
    }

    impl TestElement {
        fn shared(raw: u32, fail: bool) -> Rc<RefCell<TestElement>> {
            Rc::new(RefCell::new(TestElement {
                id: ElementId::Control(ControlId::new(raw)),
                fail,
                applied: Vec::new(),
                children: ThemeListeners::new(),
            }))
        }
    }

    impl Themable for TestElement {
        fn element_id(&self) -> ElementId {
            self.id
        }

        fn apply_theme(&mut self, theme: &Theme, effects: &mut EffectQueue) -> PlatformResult<()> {
            if self.fail {
                return Err(PlatformError::OperationFailed("incompatible".to_string()));
            }
            self.applied.push(theme.name().to_string());
            effects.request_repaint(self.id);
            effects.emit(AppEvent::ThemeChanged {
                source: self.id,
                theme: theme.name().to_string(),
            });
            Ok(())
        }

        fn theme_listeners(&mut self) -> Option<&mut ThemeListeners> {
            Some(&mut self.children)
        }
    }

    fn as_shared(element: &Rc<RefCell<TestElement>>) -> SharedThemable {
        element.clone()
    }

    #[test]
    fn each_child_receives_theme_exactly_once() {
        let root = TestElement::shared(1, false);
        let a = TestElement::shared(2, false);
        let b = TestElement::shared(3, false);
        {
            let mut root = root.borrow_mut();
            root.children.register(&as_shared(&a)).unwrap();
            root.children.register(&as_shared(&b)).unwrap();
            // Re-registering replaces instead of duplicating.
            root.children.register(&as_shared(&a)).unwrap();
            assert_eq!(root.children.len(), 2);
        }
        let theme = BuiltinThemes.load(StyleId::Enigma);
        let mut effects = EffectQueue::new();

        update_theme(&mut *root.borrow_mut(), &theme, &mut effects);

        assert_eq!(root.borrow().applied, vec!["Enigma"]);
        assert_eq!(a.borrow().applied, vec!["Enigma"]);
        assert_eq!(b.borrow().applied, vec!["Enigma"]);
    }

    #[test]
    fn failing_child_does_not_block_siblings() {
        let root = TestElement::shared(1, false);
        let broken = TestElement::shared(2, true);
        let healthy = TestElement::shared(3, false);
        root.borrow_mut().children.register(&as_shared(&broken)).unwrap();
        root.borrow_mut().children.register(&as_shared(&healthy)).unwrap();
        let theme = BuiltinThemes.load(StyleId::Neo);
        let mut effects = EffectQueue::new();

        update_theme(&mut *root.borrow_mut(), &theme, &mut effects);

        assert_eq!(healthy.borrow().applied, vec!["Neo"]);
        assert!(broken.borrow().applied.is_empty());
        let errors: Vec<_> = effects
            .commands()
            .filter(|cmd| matches!(cmd, PlatformCommand::ShowError { .. }))
            .collect();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn failing_container_still_forwards_to_children() {
        let root = TestElement::shared(1, true);
        let child = TestElement::shared(2, false);
        root.borrow_mut().children.register(&as_shared(&child)).unwrap();
        let theme = BuiltinThemes.load(StyleId::Visual);
        let mut effects = EffectQueue::new();

        update_theme(&mut *root.borrow_mut(), &theme, &mut effects);

        assert_eq!(child.borrow().applied, vec!["Visual"]);
    }

    #[test]
    fn propagation_is_depth_first() {
        let root = TestElement::shared(1, false);
        let branch = TestElement::shared(2, false);
        let leaf = TestElement::shared(3, false);
        let sibling = TestElement::shared(4, false);
        branch.borrow_mut().children.register(&as_shared(&leaf)).unwrap();
        root.borrow_mut().children.register(&as_shared(&branch)).unwrap();
        root.borrow_mut().children.register(&as_shared(&sibling)).unwrap();
        let theme = BuiltinThemes.load(StyleId::Visual);
        let mut effects = EffectQueue::new();

        update_theme(&mut *root.borrow_mut(), &theme, &mut effects);

        let order: Vec<ElementId> = effects
            .events()
            .map(|event| match event {
                AppEvent::ThemeChanged { source, .. } => *source,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        let ids = |raw: &[u32]| -> Vec<ElementId> {
            raw.iter()
                .map(|r| ElementId::Control(ControlId::new(*r)))
                .collect()
        };
        assert_eq!(order, ids(&[1, 2, 3, 4]));
    }

    #[test]
    fn every_child_ends_with_same_theme_regardless_of_order() {
        let theme = BuiltinThemes.load(StyleId::Enigma);
        for reversed in [false, true] {
            let root = TestElement::shared(1, false);
            let mut children: Vec<_> = (2..6).map(|raw| TestElement::shared(raw, false)).collect();
            if reversed {
                children.reverse();
            }
            for child in &children {
                root.borrow_mut().children.register(&as_shared(child)).unwrap();
            }
            let mut effects = EffectQueue::new();

            update_theme(&mut *root.borrow_mut(), &theme, &mut effects);

            for child in &children {
                assert_eq!(child.borrow().applied, vec!["Enigma"]);
            }
        }
    }

    #[test]
    fn dropped_children_are_pruned() {
        let mut listeners = ThemeListeners::new();
        let child = TestElement::shared(9, false);
        listeners.register(&as_shared(&child)).unwrap();
        drop(child);
        let mut effects = EffectQueue::new();

        let reached = listeners.propagate(&BuiltinThemes.load(StyleId::Visual), &mut effects);

        assert_eq!(reached, 0);
        assert!(listeners.is_empty());
    }

    #[test]
    fn busy_child_is_reported_not_panicked() {
        let mut listeners = ThemeListeners::new();
        let child = TestElement::shared(5, false);
        listeners.register(&as_shared(&child)).unwrap();
        let _held = child.borrow_mut();
        let mut effects = EffectQueue::new();

        let reached = listeners.propagate(&BuiltinThemes.load(StyleId::Visual), &mut effects);

        assert_eq!(reached, 0);
        assert_eq!(effects.commands().count(), 1);
    }

    #[test]
    fn unregister_removes_child() {
        let mut listeners = ThemeListeners::new();
        let child = TestElement::shared(5, false);
        let id = listeners.register(&as_shared(&child)).unwrap();
        assert!(listeners.contains(id));
        assert!(listeners.unregister(id));
        assert!(!listeners.unregister(id));
        assert!(listeners.ids().is_empty());
    }
}
