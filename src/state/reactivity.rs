// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers con payload tipado
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Callback<E> = Rc<dyn Fn(&E)>;

struct Subscribers<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Callback<E>)>>,
    dispatching: Cell<bool>,
    /// Eventos emitidos mientras otra ronda de notificación sigue en curso
    pending: RefCell<VecDeque<E>>,
}

/// Emisor de eventos de un solo hilo. Los clones comparten subscribers.
pub struct Observable<E> {
    inner: Rc<Subscribers<E>>,
}

impl<E: Clone + 'static> Observable<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Subscribers {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
                dispatching: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Suscribirse a cambios. El handle devuelto quita exactamente este callback.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let callback: Callback<E> = Rc::new(callback);
        self.inner.entries.borrow_mut().push((id, callback));

        let weak: Weak<Subscribers<E>> = Rc::downgrade(&self.inner);
        let remove: Box<dyn FnOnce()> = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
            }
        });
        Subscription {
            remove: RefCell::new(Some(remove)),
        }
    }

    /// Notifica en orden de suscripción. Un emit hecho desde un callback se
    /// encola y se entrega cuando termina la ronda actual, así todos los
    /// subscribers reciben los eventos en el mismo orden y el último que ven
    /// es siempre el más reciente.
    pub fn emit(&self, event: &E) {
        self.inner.pending.borrow_mut().push_back(event.clone());
        if self.inner.dispatching.replace(true) {
            return;
        }

        let _guard = DispatchGuard(&*self.inner);
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            match next {
                Some(event) => self.deliver(&event),
                None => break,
            }
        }
    }

    /// Se itera sobre una copia de la lista: un callback puede desuscribirse
    /// o mutar el store que emite
    fn deliver(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .inner
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn clear(&self) {
        self.inner.entries.borrow_mut().clear();
        self.inner.pending.borrow_mut().clear();
    }
}

/// Baja el flag aunque un callback entre en pánico
struct DispatchGuard<'a, E>(&'a Subscribers<E>);

impl<E> Drop for DispatchGuard<'_, E> {
    fn drop(&mut self) {
        self.0.pending.borrow_mut().clear();
        self.0.dispatching.set(false);
    }
}

impl<E: Clone + 'static> Default for Observable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Observable<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Handle de desuscripción. Llamarlo más de una vez no tiene efecto.
/// Soltarlo sin llamar a `unsubscribe` deja el callback registrado.
pub struct Subscription {
    remove: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        let remove = self.remove.borrow_mut().take();
        if let Some(remove) = remove {
            remove();
        }
    }

    pub fn is_active(&self) -> bool {
        self.remove.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn Fn(&u32)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_for = {
            let log = log.clone();
            move |name: &'static str| -> Box<dyn Fn(&u32)> {
                let log = log.clone();
                Box::new(move |value: &u32| log.borrow_mut().push(format!("{}:{}", name, value)))
            }
        };
        (log, log_for)
    }

    #[test]
    fn emits_in_subscription_order() {
        let observable = Observable::<u32>::new();
        let (log, log_for) = recorder();
        let _a = observable.subscribe(log_for("a"));
        let _b = observable.subscribe(log_for("b"));
        let _c = observable.subscribe(log_for("c"));

        observable.emit(&7);
        assert_eq!(*log.borrow(), vec!["a:7", "b:7", "c:7"]);
    }

    #[test]
    fn unsubscribe_is_idempotent_and_targeted() {
        let observable = Observable::<u32>::new();
        let (log, log_for) = recorder();
        let a = observable.subscribe(log_for("a"));
        let _b = observable.subscribe(log_for("b"));

        a.unsubscribe();
        a.unsubscribe();
        assert!(!a.is_active());
        assert_eq!(observable.subscriber_count(), 1);

        observable.emit(&1);
        assert_eq!(*log.borrow(), vec!["b:1"]);
    }

    #[test]
    fn callback_may_unsubscribe_itself_during_emit() {
        let observable = Observable::<u32>::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let sub = {
            let slot = slot.clone();
            let hits = hits.clone();
            observable.subscribe(move |_| {
                hits.set(hits.get() + 1);
                if let Some(sub) = slot.borrow().as_ref() {
                    sub.unsubscribe();
                }
            })
        };
        *slot.borrow_mut() = Some(sub);

        observable.emit(&1);
        observable.emit(&2);
        assert_eq!(hits.get(), 1);
        assert_eq!(observable.subscriber_count(), 0);
    }

    #[test]
    fn nested_emit_is_delivered_after_current_round() {
        let observable = Rc::new(Observable::<u32>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _first = {
            let weak = Rc::downgrade(&observable);
            let seen = seen.clone();
            observable.subscribe(move |value: &u32| {
                seen.borrow_mut().push(format!("first:{}", value));
                if *value == 1 {
                    if let Some(observable) = weak.upgrade() {
                        observable.emit(&2);
                    }
                }
            })
        };
        let _second = {
            let seen = seen.clone();
            observable.subscribe(move |value: &u32| seen.borrow_mut().push(format!("second:{}", value)))
        };

        observable.emit(&1);
        assert_eq!(*seen.borrow(), vec!["first:1", "second:1", "first:2", "second:2"]);

        observable.emit(&3);
        assert_eq!(seen.borrow().last().map(String::as_str), Some("second:3"));
    }

    #[test]
    fn unsubscribe_after_observable_dropped_is_harmless() {
        let observable = Observable::<u32>::new();
        let sub = observable.subscribe(|_| {});
        drop(observable);
        sub.unsubscribe();
    }
}
