// ============================================================================
// CART STORE - Única fuente de verdad del carrito
// ============================================================================
// Solo este store escribe las líneas. Cada mutación difunde una foto
// {skus, lastAction, addedUnits} a todos los subscribers, de forma síncrona
// y en orden de suscripción.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{CartAction, CartChange, CartEntry, ProductSnapshot};
use crate::state::reactivity::{Observable, Subscription};
use crate::utils::{load_from_storage, save_to_storage, KeyValueStorage};

struct Persistence {
    storage: Rc<dyn KeyValueStorage>,
    key: String,
}

pub struct CartStore {
    /// Orden de inserción
    entries: RefCell<Vec<CartEntry>>,
    events: Observable<CartChange>,
    persistence: Option<Persistence>,
}

impl CartStore {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            events: Observable::new(),
            persistence: None,
        }
    }

    /// Carrito persistido: restaura lo guardado y escribe en cada mutación.
    /// Un contenido ilegible se trata como carrito vacío y las líneas
    /// repetidas de un mismo producto se fusionan.
    pub fn with_storage(storage: Rc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let restored = merge_lines(
            load_from_storage::<Vec<CartEntry>>(storage.as_ref(), &key).unwrap_or_default(),
        );
        if !restored.is_empty() {
            log::info!("🛒 [CART] {} productos restaurados", restored.len());
        }

        Self {
            entries: RefCell::new(restored),
            events: Observable::new(),
            persistence: Some(Persistence { storage, key }),
        }
    }

    /// Suma `quantity` unidades del producto. Cantidad 0 no hace nada.
    pub fn add_to_cart(&self, product: &ProductSnapshot, quantity: u32) {
        if quantity == 0 {
            log::debug!("🛒 [CART] Cantidad 0 para {}, ignorado", product.id);
            return;
        }

        {
            let mut entries = self.entries.borrow_mut();
            match entries.iter_mut().find(|e| e.product_id == product.id) {
                Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
                None => entries.push(CartEntry {
                    product_id: product.id.clone(),
                    quantity,
                    unit_snapshot: product.clone(),
                }),
            }
        }

        log::info!("🛒 [CART] +{} × {}", quantity, product.name);
        self.commit(CartAction::Add, quantity);
    }

    /// Devuelve false si el producto no estaba en el carrito
    pub fn remove_from_cart(&self, product_id: &str) -> bool {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|e| e.product_id != product_id);
            entries.len() != before
        };
        if removed {
            self.commit(CartAction::Remove, 0);
        }
        removed
    }

    /// Fija la cantidad exacta; 0 elimina la línea
    pub fn set_quantity(&self, product_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_from_cart(product_id);
        }
        let updated = {
            let mut entries = self.entries.borrow_mut();
            match entries.iter_mut().find(|e| e.product_id == product_id) {
                Some(entry) if entry.quantity != quantity => {
                    entry.quantity = quantity;
                    true
                }
                _ => false,
            }
        };
        if updated {
            self.commit(CartAction::Update, 0);
        }
        updated
    }

    pub fn clear(&self) {
        if self.entries.borrow().is_empty() {
            return;
        }
        self.entries.borrow_mut().clear();
        self.commit(CartAction::Clear, 0);
    }

    /// Productos distintos, no unidades. Válido antes de cualquier suscripción.
    pub fn cart_count_skus(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn total_units(&self) -> u32 {
        self.entries.borrow().iter().map(|e| e.quantity).sum()
    }

    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.product_id == product_id)
            .map(|e| e.quantity)
            .unwrap_or(0)
    }

    pub fn entries(&self) -> Vec<CartEntry> {
        self.entries.borrow().clone()
    }

    pub fn on_cart_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CartChange) + 'static,
    {
        self.events.subscribe(callback)
    }

    pub fn dispose(&self) {
        self.events.clear();
    }

    /// Persiste y difunde. Ningún borrow de `entries` sigue vivo al notificar.
    fn commit(&self, last_action: CartAction, added_units: u32) {
        if let Some(persistence) = &self.persistence {
            let entries = self.entries.borrow().clone();
            if let Err(e) = save_to_storage(persistence.storage.as_ref(), &persistence.key, &entries) {
                log::warn!("⚠️ [CART] No se pudo persistir el carrito: {}", e);
            }
        }

        let change = CartChange {
            skus: self.cart_count_skus(),
            last_action,
            added_units,
        };
        self.events.emit(&change);
    }
}

/// Una línea por producto: las repetidas se suman conservando la primera foto
/// y su posición; las de cantidad 0 se descartan
fn merge_lines(lines: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut merged: Vec<CartEntry> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|line| line.quantity > 0) {
        match merged.iter_mut().find(|e| e.product_id == line.product_id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
