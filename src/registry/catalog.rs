//! Catalog descriptors and the built-in item set.
//!
//! A catalog only carries keys, labels and accents. Renderables are attached
//! afterwards by key lookup so the catalog stays plain data that can come from
//! JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::core::{Item, ItemRegistry, Renderable};

pub const SHORTCUT_ACCENT: &str = "#102F44";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

impl ItemSpec {
    fn into_item(self, renderable: Renderable) -> Item {
        let item = Item::new(self.key, self.label).with_renderable(renderable);
        match self.accent {
            Some(accent) => item.with_accent(accent),
            None => item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSpec {
    pub shortcuts: Vec<ItemSpec>,
    #[serde(default)]
    pub more: Vec<ItemSpec>,
}

impl CatalogSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ItemRegistry {
    /// Build a registry from a catalog. `resolve` supplies the renderable for
    /// a key; keys it does not know get a title-only placeholder.
    pub fn from_catalog<F>(catalog: CatalogSpec, resolve: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<Renderable>,
    {
        let build = |spec: ItemSpec| {
            let renderable = resolve(&spec.key)
                .unwrap_or_else(|| Renderable::screen(spec.label.as_str()));
            spec.into_item(renderable)
        };
        let shortcuts = catalog.shortcuts.into_iter().map(&build).collect();
        let more = catalog.more.into_iter().map(&build).collect();
        ItemRegistry::from_parts(shortcuts, more)
    }

    pub fn from_json<F>(json: &str, resolve: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<Renderable>,
    {
        Self::from_catalog(CatalogSpec::from_json(json)?, resolve)
    }

    /// Calendar, Store and Settings as shortcuts plus the eight tools.
    pub fn builtin() -> Result<Self> {
        Self::from_catalog(builtin_catalog(), builtin_renderable)
    }
}

pub fn builtin_catalog() -> CatalogSpec {
    let shortcut = |key: &str, label: &str| ItemSpec {
        key: key.to_string(),
        label: label.to_string(),
        accent: Some(SHORTCUT_ACCENT.to_string()),
    };
    let tool = |key: &str, label: &str| ItemSpec {
        key: key.to_string(),
        label: label.to_string(),
        accent: None,
    };

    CatalogSpec {
        shortcuts: vec![
            shortcut("calendar", "Calendar"),
            shortcut("store", "Store"),
            shortcut("settings", "Settings"),
        ],
        more: vec![
            tool("email-signature", "Email Signature"),
            tool("meeting-space", "Meeting Space"),
            tool("hotel-booking", "Hotel Booking"),
            tool("contacts", "Contacts"),
            tool("conferencing-tool", "Conferencing Tool"),
            tool("custom-form", "Custom Form"),
            tool("personal-website", "Personal Website"),
            tool("stripe-integration", "Stripe Integration"),
        ],
    }
}

/// Renderable table for the built-in keys.
pub fn builtin_renderable(key: &str) -> Option<Renderable> {
    let renderable = match key {
        "calendar" => Renderable::screen("Calendar"),
        "store" => Renderable::screen("Store"),
        "settings" => Renderable::screen("Settings"),
        "email-signature" => Renderable::coming_soon("Email Signature"),
        "meeting-space" => Renderable::coming_soon("Meeting Space"),
        "hotel-booking" => Renderable::coming_soon("Hotel Booking"),
        "contacts" => Renderable::coming_soon("Contacts"),
        "conferencing-tool" => Renderable::coming_soon("Conferencing Tool"),
        "custom-form" => Renderable::coming_soon("Custom Form"),
        "personal-website" => Renderable::coming_soon("Personal Website"),
        "stripe-integration" => Renderable::coming_soon("Stripe Integration"),
        _ => return None,
    };
    Some(renderable)
}
