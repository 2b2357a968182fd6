//! Built-in game presets
//!
//! Each preset is plain configuration for the shared engine; nothing here
//! adds behavior.

pub mod flyer;
pub mod platformer;
pub mod racer;
pub mod shooter;

use crate::config::GameConfig;

/// One launchable game
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub config: fn() -> GameConfig,
}

static CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        name: platformer::NAME,
        title: platformer::TITLE,
        config: platformer::config,
    },
    CatalogEntry {
        name: flyer::NAME,
        title: flyer::TITLE,
        config: flyer::config,
    },
    CatalogEntry {
        name: racer::NAME,
        title: racer::TITLE,
        config: racer::config,
    },
    CatalogEntry {
        name: shooter::NAME,
        title: shooter::TITLE,
        config: shooter::config,
    },
];

pub fn catalog() -> &'static [CatalogEntry] {
    &CATALOG
}

pub fn find(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.name.eq_ignore_ascii_case(name))
}

/// Next (`offset > 0`) or previous entry, wrapping around the catalog
pub fn neighbor(name: &str, offset: isize) -> &'static CatalogEntry {
    let len = CATALOG.len() as isize;
    let current = CATALOG
        .iter()
        .position(|entry| entry.name.eq_ignore_ascii_case(name))
        .unwrap_or(0) as isize;
    &CATALOG[(current + offset).rem_euclid(len) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_match_configs() {
        for entry in catalog() {
            let config = (entry.config)();
            assert_eq!(config.name, entry.name);
            assert_eq!(config.title, entry.title);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("Racer").map(|e| e.name), Some("racer"));
        assert!(find("tetris").is_none());
    }

    #[test]
    fn test_neighbor_wraps() {
        assert_eq!(neighbor("platformer", 1).name, "flyer");
        assert_eq!(neighbor("platformer", -1).name, "shooter");
        assert_eq!(neighbor("shooter", 1).name, "platformer");
        assert_eq!(neighbor("unknown", 1).name, "flyer");
    }
}
