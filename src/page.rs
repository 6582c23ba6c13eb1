//! Which content domains a page hosts

use crate::config::StorageKeys;
use crate::store::{KeyValueStore, Storage};

/// Domains active on a page, from markers in its path
///
/// A path may carry more than one marker; each domain is checked on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveDomains {
    pub media: bool,
    pub team: bool,
    pub publications: bool,
}

impl ActiveDomains {
    pub fn from_path(path: &str) -> Self {
        let path = path.to_lowercase();
        Self {
            media: path.contains("media"),
            team: path.contains("team"),
            publications: path.contains("publication"),
        }
    }

    pub fn any(&self) -> bool {
        self.media || self.team || self.publications
    }
}

/// Stored site name to show in the brand, if one was set
pub fn site_name<S: KeyValueStore>(storage: &Storage<S>, keys: &StorageKeys) -> Option<String> {
    storage.get_raw(&keys.site_name).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_domains_from_path() {
        assert_eq!(
            ActiveDomains::from_path("/lab/Media.html"),
            ActiveDomains { media: true, team: false, publications: false }
        );
        assert!(ActiveDomains::from_path("/publications.html").publications);
        assert!(ActiveDomains::from_path("/team/").team);
        assert!(!ActiveDomains::from_path("/index.html").any());
    }

    #[test]
    fn test_site_name() {
        let storage = Storage::new(MemoryStore::new());
        let keys = StorageKeys::default();
        assert_eq!(site_name(&storage, &keys), None);
        storage.set_raw(&keys.site_name, "").unwrap();
        assert_eq!(site_name(&storage, &keys), None);
        storage.set_raw(&keys.site_name, "Robotics Lab").unwrap();
        assert_eq!(site_name(&storage, &keys).as_deref(), Some("Robotics Lab"));
    }
}
