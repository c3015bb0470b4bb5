use std::fs;
use std::io;
use std::path::PathBuf;

use super::store::InventoryStore;

pub fn inventory_save_path() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home_dir.join(".luckymerge").join("inventory.json"))
}

/// Loads the saved inventory, falling back to an empty store when the save
/// file is missing or unreadable.
pub fn load_inventory() -> InventoryStore {
    let path = match inventory_save_path() {
        Ok(p) => p,
        Err(_) => return InventoryStore::new(),
    };
    match fs::read_to_string(&path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => InventoryStore::new(),
    }
}

pub fn save_inventory(store: &InventoryStore) -> io::Result<()> {
    let path = inventory_save_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(store)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)?;
    Ok(())
}
