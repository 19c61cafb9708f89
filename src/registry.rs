use std::{borrow::Borrow, collections::HashMap, fmt, hash::Hash, sync::OnceLock};

use crate::host::Capability;

pub struct PluginEntry<K, P: ?Sized> {
    pub key: K,
    pub name: &'static str,
    pub capability: Capability,
    pub create: fn() -> Box<P>,
}

struct Slot<P: ?Sized> {
    name: &'static str,
    capability: Capability,
    create: fn() -> Box<P>,
    instance: OnceLock<Box<P>>,
}

pub struct Registry<K, P: ?Sized> {
    slots: HashMap<K, Slot<P>>,
}

impl<K, P> Registry<K, P>
where
    K: Eq + Hash + fmt::Display,
    P: ?Sized,
{
    pub fn discover(entries: impl IntoIterator<Item = PluginEntry<K, P>>) -> Self {
        let mut slots: HashMap<K, Slot<P>> = HashMap::new();
        for entry in entries {
            if let Some(existing) = slots.get(&entry.key) {
                log::warn!(
                    "Already registered {} for {}, ignoring {}",
                    existing.name,
                    entry.key,
                    entry.name
                );
                continue;
            }
            log::debug!("Registering {} for {}", entry.name, entry.key);
            slots.insert(
                entry.key,
                Slot {
                    name: entry.name,
                    capability: entry.capability,
                    create: entry.create,
                    instance: OnceLock::new(),
                },
            );
        }
        Self { slots }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.slots.contains_key(key)
    }

    pub fn capability<Q>(&self, key: &Q) -> Option<Capability>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.slots.get(key).map(|slot| slot.capability)
    }

    pub fn name<Q>(&self, key: &Q) -> Option<&'static str>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.slots.get(key).map(|slot| slot.name)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&P>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let slot = self.slots.get(key)?;
        let instance = slot.instance.get_or_init(|| {
            log::debug!("Initialising {}", slot.name);
            (slot.create)()
        });
        Some(&**instance)
    }

    pub fn is_instantiated<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.slots
            .get(key)
            .is_some_and(|slot| slot.instance.get().is_some())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter {
        fn greet(&self) -> &'static str;
    }

    struct English;
    struct French;

    impl Greeter for English {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }

    impl Greeter for French {
        fn greet(&self) -> &'static str {
            "bonjour"
        }
    }

    fn entry(key: &'static str, name: &'static str, create: fn() -> Box<dyn Greeter>) -> PluginEntry<&'static str, dyn Greeter> {
        PluginEntry {
            key,
            name,
            capability: Capability::Midi,
            create,
        }
    }

    #[test]
    fn first_registration_wins() {
        let registry = Registry::discover([
            entry("F", "english", || Box::new(English)),
            entry("F", "french", || Box::new(French)),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.name("F"), Some("english"));
        assert_eq!(registry.get("F").unwrap().greet(), "hello");
    }

    #[test]
    fn plugins_are_created_lazily() {
        let registry = Registry::discover([
            entry("F", "english", || Box::new(English)),
            entry("M", "french", || Box::new(French)),
        ]);
        assert!(!registry.is_instantiated("F"));
        assert!(registry.get("M").is_some());
        assert!(registry.is_instantiated("M"));
        assert!(!registry.is_instantiated("F"));
        assert_eq!(registry.capability("F"), Some(Capability::Midi));
        assert!(registry.get("Z").is_none());
    }
}
