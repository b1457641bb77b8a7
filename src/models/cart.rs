use serde::{Deserialize, Serialize};

/// Datos del producto capturados en el momento de añadirlo al carrito
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: String,
    pub quantity: u32,
    pub unit_snapshot: ProductSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    Add,
    Remove,
    Update,
    Clear,
}

/// Foto del carrito difundida tras cada mutación (no es un diff)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartChange {
    pub skus: usize,
    pub last_action: CartAction,
    pub added_units: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_event_uses_camel_case_wire_names() {
        let change = CartChange {
            skus: 2,
            last_action: CartAction::Add,
            added_units: 3,
        };
        assert_eq!(
            serde_json::to_string(&change).unwrap(),
            r#"{"skus":2,"lastAction":"add","addedUnits":3}"#
        );
    }
}
